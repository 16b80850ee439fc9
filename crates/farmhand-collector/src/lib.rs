//! # Farmhand Collector
//!
//! Fills a job's auto-detected input files. The asset registry is walked for
//! every dependency of the job's scene, and the walk runs as a background task
//! whose result is handed back to the thread that owns the job.

pub mod dispatcher;
pub mod paths;
pub mod registry;
pub mod source;
pub mod walker;

pub use dispatcher::AutoDetectDispatcher;
pub use paths::ContentPaths;
pub use registry::{AssetRegistry, InMemoryAssetRegistry};
pub use source::{DependencySource, RegistryDependencySource};
pub use walker::{DependencyCollector, DependencyFilter};
