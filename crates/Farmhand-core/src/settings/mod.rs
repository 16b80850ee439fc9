//! # Job Settings Tree
//!
//! The fixed-shape record describing one job's cloud render configuration.
//! A preset owns one canonical tree; a job owns a second tree holding its
//! candidate override values. Both share the same schema.

mod attachments;
mod host;
mod shared;

pub use attachments::{DirectoryAttachments, FileAttachments, JobAttachments};
pub use host::{HostRequirements, IntervalRange, RANGE_LIMIT};
pub use shared::{InitialState, JobSharedSettings};

use serde::{Deserialize, Serialize};

/// All job settings, grouped the way the inspector displays them.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct JobPresetSettings {
    /// Name, description and retry policy.
    #[serde(default)]
    pub job_shared_settings: JobSharedSettings,
    /// Worker host constraints.
    #[serde(default)]
    pub host_requirements: HostRequirements,
    /// Files and directories shipped with the job.
    #[serde(default)]
    pub job_attachments: JobAttachments,
}
