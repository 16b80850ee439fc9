//! # Submission Summaries
//!
//! Renders resolved settings into the shapes the render farm expects: host
//! requirements as attribute/amount capabilities, and the full set of files and
//! directories that travel with the job.

use crate::settings::{HostRequirements, IntervalRange, JobPresetSettings};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

const GIB_TO_MIB: u32 = 1024;

/// Host requirements in farm capability form.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobHostRequirements {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<AttributeRequirement>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub amounts: Vec<AmountRequirement>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeRequirement {
    pub name: String,
    #[serde(rename = "anyOf")]
    pub any_of: Vec<String>,
}

/// A numeric capability. Absent bounds are unconstrained.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmountRequirement {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<u32>,
}

impl AmountRequirement {
    fn from_range(name: &str, range: IntervalRange, scale: u32) -> Option<Self> {
        if range.is_unbounded() {
            return None;
        }
        let bound = |value: u32| (value > 0).then(|| value * scale);
        Some(Self {
            name: name.to_string(),
            min: bound(range.min()),
            max: bound(range.max()),
        })
    }
}

impl HostRequirements {
    /// Capability form of these requirements.
    ///
    /// `None` when the job may run on every worker, or when nothing is
    /// actually constrained.
    pub fn to_job_host_requirements(&self) -> Option<JobHostRequirements> {
        if self.run_on_all_worker_nodes {
            return None;
        }

        let attributes = [
            ("attr.worker.os.family", &self.operating_system),
            ("attr.worker.cpu.arch", &self.cpu_architecture),
        ]
        .into_iter()
        .filter(|(_, value)| !value.is_empty())
        .map(|(name, value)| AttributeRequirement {
            name: name.to_string(),
            any_of: vec![value.clone()],
        })
        .collect();

        let amounts = [
            ("amount.worker.vcpu", self.cpus, 1),
            ("amount.worker.memory", self.memory, GIB_TO_MIB),
            ("amount.worker.gpu.memory", self.gpu_memory, GIB_TO_MIB),
            ("amount.worker.disk.scratch", self.scratch_space, 1),
        ]
        .into_iter()
        .filter_map(|(name, range, scale)| AmountRequirement::from_range(name, range, scale))
        .collect();

        let requirements = JobHostRequirements { attributes, amounts };
        if requirements.attributes.is_empty() && requirements.amounts.is_empty() {
            return None;
        }
        Some(requirements)
    }
}

/// Every path attached to a job, absolute, de-duplicated and sorted.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachmentSummary {
    pub input_files: Vec<PathBuf>,
    pub input_directories: Vec<PathBuf>,
    pub output_directories: Vec<PathBuf>,
}

impl AttachmentSummary {
    /// Collects manual and auto-detected paths of `settings`. Relative paths
    /// are taken from `project_dir`.
    pub fn from_settings(settings: &JobPresetSettings, project_dir: &Path) -> Self {
        let attachments = &settings.job_attachments;
        Self {
            input_files: absolute_paths(
                project_dir,
                &attachments.input_files.files,
                &attachments.input_files.auto_detected,
            ),
            input_directories: absolute_paths(
                project_dir,
                &attachments.input_directories.directories,
                &attachments.input_directories.auto_detected_directories,
            ),
            output_directories: absolute_paths(
                project_dir,
                &attachments.output_directories.directories,
                &attachments.output_directories.auto_detected_directories,
            ),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.input_files.is_empty()
            && self.input_directories.is_empty()
            && self.output_directories.is_empty()
    }
}

fn absolute_paths(project_dir: &Path, manual: &[PathBuf], detected: &[PathBuf]) -> Vec<PathBuf> {
    manual
        .iter()
        .chain(detected)
        .map(|path| {
            if path.is_absolute() {
                path.clone()
            } else {
                project_dir.join(path)
            }
        })
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
