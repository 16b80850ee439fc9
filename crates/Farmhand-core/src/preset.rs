use crate::settings::JobPresetSettings;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

/// A named, reusable set of default job settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct JobPreset {
    /// Unique name, used by saved jobs to refer back to the preset.
    pub name: String,
    #[serde(default)]
    pub settings: JobPresetSettings,
}

impl JobPreset {
    pub fn new(name: impl Into<String>, settings: JobPresetSettings) -> Self {
        Self {
            name: name.into(),
            settings,
        }
    }
}

/// Presets available to the project, keyed by name.
#[derive(Clone, Debug, Default)]
pub struct PresetLibrary {
    presets: HashMap<String, Arc<JobPreset>>,
}

impl PresetLibrary {
    /// Loads every `.yaml`/`.yml` preset in `path`.
    ///
    /// A missing directory is not an error; nothing is loaded.
    #[tracing::instrument(skip(self, path), fields(path = %path.as_ref().display()))]
    pub fn load_from_directory(&mut self, path: impl AsRef<Path>) -> Result<usize> {
        let dir_path = path.as_ref();
        if !dir_path.exists() {
            tracing::warn!("Preset directory does not exist");
            return Ok(0);
        }

        let mut count = 0;
        for entry in fs::read_dir(dir_path)? {
            let path = entry?.path();
            let is_yaml = matches!(
                path.extension().and_then(|s| s.to_str()),
                Some("yaml") | Some("yml")
            );
            if !is_yaml {
                continue;
            }

            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read preset file: {:?}", path))?;
            let preset: JobPreset = serde_yaml::from_str(&content)
                .with_context(|| format!("Failed to parse preset: {:?}", path))?;

            tracing::info!(preset = %preset.name, path = ?path, "Loaded job preset");
            self.insert(preset);
            count += 1;
        }
        Ok(count)
    }

    /// Adds or replaces a preset and returns the shared handle.
    pub fn insert(&mut self, preset: JobPreset) -> Arc<JobPreset> {
        let preset = Arc::new(preset);
        if self
            .presets
            .insert(preset.name.clone(), preset.clone())
            .is_some()
        {
            tracing::warn!(preset = %preset.name, "Replacing job preset with the same name");
        }
        preset
    }

    pub fn get(&self, name: &str) -> Option<Arc<JobPreset>> {
        self.presets.get(name).cloned()
    }

    /// Deletes the preset. Jobs already holding it keep their handle.
    pub fn remove(&mut self, name: &str) -> Option<Arc<JobPreset>> {
        self.presets.remove(name)
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.presets.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.presets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }
}
