//! # Farmhand Core Library
//!
//! Headless engine for render job presets: the settings tree, the field table
//! walked by the merge and the inspector, per-job override ledgers, and the
//! submission summaries derived from resolved settings.
//!

pub mod config;
pub mod domain;
pub mod error;
pub mod job;
pub mod ledger;
pub mod merge;
pub mod options;
pub mod preset;
pub mod schema;
pub mod settings;
pub mod submission;

pub use config::{CollectorConfig, CompletionPolicy, FarmhandConfig};
pub use domain::FieldPath;
pub use error::SettingsError;
pub use job::{AutoDetectAction, JobInstance, PresetBoundJob, SavedJob, SceneReference};
pub use ledger::{OverrideLedger, PropertyRowEnabledInfo};
pub use merge::resolve_with_overrides;
pub use options::{JobOptionsProvider, StaticJobOptions};
pub use preset::{JobPreset, PresetLibrary};
pub use settings::JobPresetSettings;
pub use submission::{AttachmentSummary, JobHostRequirements};
