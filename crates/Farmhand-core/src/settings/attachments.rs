use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Input files attached to the job.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileAttachments {
    /// Show the auto-detected list in the job inspector (and keep it filled).
    pub show_auto_detected: bool,
    /// Files added by hand.
    pub files: Vec<PathBuf>,
    /// Files found by the dependency collector; never edited by the user.
    pub auto_detected: Vec<PathBuf>,
}

/// A group of attached directories (inputs or outputs).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectoryAttachments {
    pub show_auto_detected: bool,
    pub directories: Vec<PathBuf>,
    pub auto_detected_directories: Vec<PathBuf>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobAttachments {
    pub input_files: FileAttachments,
    pub input_directories: DirectoryAttachments,
    pub output_directories: DirectoryAttachments,
}
