use crate::options::StaticJobOptions;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Workspace configuration.
///
/// Every field has a default, so an empty file (or no file at all) is a valid
/// configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FarmhandConfig {
    /// Directory holding the preset YAML files. Default: `presets`.
    pub presets_dir: PathBuf,
    /// Project root; relative attachment paths are resolved against it.
    /// Default: current directory.
    pub project_dir: PathBuf,
    /// Directory `/Game/` asset paths map to. Default: `<project_dir>/Content`.
    pub content_dir: Option<PathBuf>,
    /// Choice lists offered for OS, CPU architecture and initial state.
    pub options: StaticJobOptions,
    #[serde(default)]
    pub collector: CollectorConfig,
}

impl Default for FarmhandConfig {
    fn default() -> Self {
        Self {
            presets_dir: PathBuf::from("presets"),
            project_dir: PathBuf::from("."),
            content_dir: None,
            options: StaticJobOptions::default(),
            collector: CollectorConfig::default(),
        }
    }
}

impl FarmhandConfig {
    /// Reads a YAML config file.
    #[tracing::instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        let config: FarmhandConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;
        tracing::info!(presets_dir = %config.presets_dir.display(), "Loaded configuration");
        Ok(config)
    }

    /// Like [`FarmhandConfig::load`], but falls back to defaults when the file
    /// does not exist.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        if !path.as_ref().exists() {
            tracing::warn!(path = %path.as_ref().display(), "Config file not found, using defaults");
            return Ok(Self::default());
        }
        Self::load(path)
    }

    pub fn content_dir(&self) -> PathBuf {
        self.content_dir
            .clone()
            .unwrap_or_else(|| self.project_dir.join("Content"))
    }
}

/// How completions of overlapping dependency collections are applied.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionPolicy {
    /// Every completion is applied in arrival order; the last one wins.
    #[default]
    LastWriteWins,
    /// Only the completion of the most recent request is applied. A
    /// synchronous clear also invalidates requests still in flight.
    LatestRequestOnly,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectorConfig {
    pub completion_policy: CompletionPolicy,
}
