//! # Job Instances
//!
//! A job references at most one preset and carries its own override tree and
//! override ledger. Resolution against the preset is only reachable through
//! [`JobInstance::with_preset`], so a job without a preset cannot be resolved.

use crate::domain::FieldPath;
use crate::error::SettingsError;
use crate::ledger::{OverrideLedger, PropertyRowEnabledInfo};
use crate::merge;
use crate::preset::{JobPreset, PresetLibrary};
use crate::schema::{self, FieldValue};
use crate::settings::JobPresetSettings;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use uuid::Uuid;

const SHOW_AUTO_DETECTED_FILES: &str = "job_attachments.input_files.show_auto_detected";

/// The scene a job renders: a map and the sequence played in it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SceneReference {
    #[serde(default)]
    pub map: Option<String>,
    #[serde(default)]
    pub sequence: Option<String>,
}

impl SceneReference {
    pub fn new(map: impl Into<String>, sequence: impl Into<String>) -> Self {
        Self {
            map: Some(map.into()),
            sequence: Some(sequence.into()),
        }
    }
}

/// What the caller must do about the auto-detected input files after an edit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AutoDetectAction {
    /// Start a dependency collection for this scene.
    Collect(SceneReference),
    /// The list was emptied synchronously; nothing to start.
    Cleared,
}

#[derive(Clone, Debug)]
pub struct JobInstance {
    id: Uuid,
    scene: SceneReference,
    preset: Option<Arc<JobPreset>>,
    preset_overrides: JobPresetSettings,
    enabled_overrides: OverrideLedger,
}

impl Default for JobInstance {
    fn default() -> Self {
        Self::new(SceneReference::default())
    }
}

impl JobInstance {
    pub fn new(scene: SceneReference) -> Self {
        Self {
            id: Uuid::new_v4(),
            scene,
            preset: None,
            preset_overrides: JobPresetSettings::default(),
            enabled_overrides: OverrideLedger::new(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn scene(&self) -> &SceneReference {
        &self.scene
    }

    /// Changes the rendered scene. Auto-detected files depend on it, so a new
    /// collection is requested when they are shown.
    pub fn set_scene(&mut self, scene: SceneReference) -> Option<AutoDetectAction> {
        if self.scene == scene {
            return None;
        }
        self.scene = scene;
        if self.preset_overrides.job_attachments.input_files.show_auto_detected {
            Some(self.update_attachment_fields())
        } else {
            None
        }
    }

    pub fn preset(&self) -> Option<&Arc<JobPreset>> {
        self.preset.as_ref()
    }

    /// Selects a preset and seeds the override tree from it.
    ///
    /// Shared settings, host requirements and the manual attachment lists are
    /// copied so that enabling an override starts from the preset's value.
    /// Auto-detected state belongs to the job and is left alone.
    pub fn set_preset(&mut self, preset: Option<Arc<JobPreset>>) {
        if let Some(selected) = &preset {
            let source = &selected.settings;
            let overrides = &mut self.preset_overrides;
            overrides.job_shared_settings = source.job_shared_settings.clone();
            overrides.host_requirements = source.host_requirements.clone();

            let attachments = &mut overrides.job_attachments;
            attachments.input_files.files = source.job_attachments.input_files.files.clone();
            attachments.input_directories.directories =
                source.job_attachments.input_directories.directories.clone();
            attachments.output_directories.directories =
                source.job_attachments.output_directories.directories.clone();

            tracing::info!(job = %self.id, preset = %selected.name, "Job preset selected");
        }
        self.preset = preset;
    }

    pub fn preset_overrides(&self) -> &JobPresetSettings {
        &self.preset_overrides
    }

    /// Writes one value into the override tree.
    ///
    /// Returns the collector action when the edit toggled the auto-detected
    /// input files.
    pub fn set_override_value(
        &mut self,
        path: &FieldPath,
        value: FieldValue,
    ) -> Result<Option<AutoDetectAction>, SettingsError> {
        schema::write_value(&mut self.preset_overrides, path, value)?;
        tracing::debug!(job = %self.id, %path, "Job setting changed");

        if path == SHOW_AUTO_DETECTED_FILES {
            return Ok(Some(self.update_attachment_fields()));
        }
        Ok(None)
    }

    pub fn is_property_row_enabled(&self, path: &FieldPath) -> bool {
        self.enabled_overrides.is_enabled(path)
    }

    pub fn set_property_row_enabled(&mut self, path: FieldPath, enabled: bool) {
        tracing::debug!(job = %self.id, %path, enabled, "Override toggled");
        self.enabled_overrides.set_enabled(path, enabled);
    }

    pub fn ledger(&self) -> &OverrideLedger {
        &self.enabled_overrides
    }

    /// Clears the auto-detected files or asks for them to be collected,
    /// depending on the show flag.
    pub fn update_attachment_fields(&mut self) -> AutoDetectAction {
        let input_files = &mut self.preset_overrides.job_attachments.input_files;
        if input_files.show_auto_detected {
            tracing::info!(job = %self.id, "Collecting dependencies");
            AutoDetectAction::Collect(self.scene.clone())
        } else {
            input_files.auto_detected.clear();
            AutoDetectAction::Cleared
        }
    }

    pub fn auto_detected_files(&self) -> &[PathBuf] {
        &self.preset_overrides.job_attachments.input_files.auto_detected
    }

    /// Replaces the auto-detected input files wholesale.
    pub fn replace_auto_detected_files(&mut self, files: Vec<PathBuf>) {
        tracing::debug!(job = %self.id, count = files.len(), "Auto-detected files updated");
        self.preset_overrides.job_attachments.input_files.auto_detected = files;
    }

    /// Borrows the job together with its preset, if one is selected.
    pub fn with_preset(&self) -> Option<PresetBoundJob<'_>> {
        self.preset.as_deref().map(|preset| PresetBoundJob { job: self, preset })
    }

    pub fn save(&self) -> SavedJob {
        SavedJob {
            id: self.id,
            scene: self.scene.clone(),
            preset: self.preset.as_ref().map(|p| p.name.clone()),
            preset_overrides: self.preset_overrides.clone(),
            enabled_property_overrides: self.enabled_overrides.entries().to_vec(),
        }
    }

    /// Restores a saved job. A preset missing from `library` loads as no
    /// preset; the overrides and ledger are kept as saved.
    pub fn load(saved: SavedJob, library: &PresetLibrary) -> Self {
        let preset = saved.preset.as_deref().and_then(|name| {
            let found = library.get(name);
            if found.is_none() {
                tracing::warn!(job = %saved.id, preset = %name, "Saved job refers to an unknown preset");
            }
            found
        });

        Self {
            id: saved.id,
            scene: saved.scene,
            preset,
            preset_overrides: saved.preset_overrides,
            enabled_overrides: OverrideLedger::from(saved.enabled_property_overrides),
        }
    }
}

/// A job whose preset is known to be set.
#[derive(Clone, Copy, Debug)]
pub struct PresetBoundJob<'a> {
    job: &'a JobInstance,
    preset: &'a JobPreset,
}

impl<'a> PresetBoundJob<'a> {
    pub fn job(&self) -> &'a JobInstance {
        self.job
    }

    pub fn preset(&self) -> &'a JobPreset {
        self.preset
    }

    /// The settings that should actually be submitted.
    pub fn resolve_with_overrides(&self) -> JobPresetSettings {
        merge::resolve_with_overrides(
            &self.preset.settings,
            &self.job.preset_overrides,
            &self.job.enabled_overrides,
        )
    }
}

/// Persisted form of a [`JobInstance`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SavedJob {
    pub id: Uuid,
    #[serde(default)]
    pub scene: SceneReference,
    /// Name of the selected preset.
    #[serde(default)]
    pub preset: Option<String>,
    #[serde(default)]
    pub preset_overrides: JobPresetSettings,
    #[serde(default)]
    pub enabled_property_overrides: Vec<PropertyRowEnabledInfo>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::IntervalRange;

    fn preset_with_retries(retries: u32) -> Arc<JobPreset> {
        let mut settings = JobPresetSettings::default();
        settings.job_shared_settings.maximum_retries_per_task = retries;
        settings.job_shared_settings.maximum_failed_tasks_count = 3;
        settings.job_attachments.input_files.files = vec![PathBuf::from("Content/Movies/intro.mp4")];
        Arc::new(JobPreset::new("Default Render", settings))
    }

    fn path(p: &str) -> FieldPath {
        FieldPath::new(p)
    }

    #[test]
    fn job_without_preset_cannot_be_resolved() {
        let job = JobInstance::default();
        assert!(job.with_preset().is_none());
    }

    #[test]
    fn selecting_a_preset_seeds_the_override_tree() {
        let mut job = JobInstance::default();
        job.replace_auto_detected_files(vec![PathBuf::from("/tmp/level.umap")]);
        job.set_preset(Some(preset_with_retries(50)));

        let overrides = job.preset_overrides();
        assert_eq!(overrides.job_shared_settings.maximum_retries_per_task, 50);
        assert_eq!(
            overrides.job_attachments.input_files.files,
            vec![PathBuf::from("Content/Movies/intro.mp4")]
        );
        assert_eq!(job.auto_detected_files(), [PathBuf::from("/tmp/level.umap")]);
    }

    #[test]
    fn only_enabled_overrides_reach_resolved_settings() {
        let mut job = JobInstance::default();
        job.set_preset(Some(preset_with_retries(50)));

        let retries = path("job_shared_settings.maximum_retries_per_task");
        let failed = path("job_shared_settings.maximum_failed_tasks_count");
        job.set_override_value(&retries, FieldValue::Count(10)).unwrap();
        job.set_override_value(&failed, FieldValue::Count(99)).unwrap();
        job.set_property_row_enabled(retries.clone(), true);

        let resolved = job.with_preset().unwrap().resolve_with_overrides();
        assert_eq!(resolved.job_shared_settings.maximum_retries_per_task, 10);
        assert_eq!(resolved.job_shared_settings.maximum_failed_tasks_count, 3);

        job.set_property_row_enabled(retries, false);
        let resolved = job.with_preset().unwrap().resolve_with_overrides();
        assert_eq!(resolved.job_shared_settings.maximum_retries_per_task, 50);
    }

    #[test]
    fn showing_auto_detected_files_requests_collection() {
        let scene = SceneReference::new("/Game/Maps/Arena", "/Game/Cinematics/Flyby");
        let mut job = JobInstance::new(scene.clone());
        let flag = path(SHOW_AUTO_DETECTED_FILES);

        let action = job.set_override_value(&flag, FieldValue::Flag(true)).unwrap();
        assert_eq!(action, Some(AutoDetectAction::Collect(scene)));
    }

    #[test]
    fn hiding_auto_detected_files_clears_them_synchronously() {
        let mut job = JobInstance::default();
        let flag = path(SHOW_AUTO_DETECTED_FILES);
        job.set_override_value(&flag, FieldValue::Flag(true)).unwrap();
        job.replace_auto_detected_files(vec![PathBuf::from("/proj/Content/Maps/Arena.umap")]);

        let action = job.set_override_value(&flag, FieldValue::Flag(false)).unwrap();
        assert_eq!(action, Some(AutoDetectAction::Cleared));
        assert!(job.auto_detected_files().is_empty());
    }

    #[test]
    fn scene_change_only_collects_while_shown() {
        let mut job = JobInstance::default();
        let arena = SceneReference::new("/Game/Maps/Arena", "/Game/Cinematics/Flyby");
        assert_eq!(job.set_scene(arena.clone()), None);

        job.set_override_value(&path(SHOW_AUTO_DETECTED_FILES), FieldValue::Flag(true))
            .unwrap();
        assert_eq!(job.set_scene(arena), None);

        let docks = SceneReference::new("/Game/Maps/Docks", "/Game/Cinematics/Flyby");
        assert_eq!(job.set_scene(docks.clone()), Some(AutoDetectAction::Collect(docks)));
    }

    #[test]
    fn other_edits_do_not_touch_collection() {
        let mut job = JobInstance::default();
        let memory = path("host_requirements.memory");
        let action = job
            .set_override_value(&memory, FieldValue::Range(IntervalRange::new(8, 16).unwrap()))
            .unwrap();
        assert_eq!(action, None);
    }

    #[test]
    fn saved_job_restores_preset_and_ledger() {
        let mut library = PresetLibrary::default();
        let preset = library.insert(JobPreset::new("Default Render", JobPresetSettings::default()));

        let mut job = JobInstance::new(SceneReference::new("/Game/Maps/Arena", "/Game/Seq"));
        job.set_preset(Some(preset));
        job.set_property_row_enabled(path("host_requirements.cpus"), true);

        let restored = JobInstance::load(job.save(), &library);
        assert_eq!(restored.id(), job.id());
        assert_eq!(restored.scene(), job.scene());
        assert_eq!(restored.preset().map(|p| p.name.as_str()), Some("Default Render"));
        assert!(restored.is_property_row_enabled(&path("host_requirements.cpus")));
    }

    #[test]
    fn unknown_preset_loads_as_none() {
        let mut job = JobInstance::default();
        job.set_preset(Some(preset_with_retries(7)));
        job.set_property_row_enabled(path("job_shared_settings.name"), true);

        let restored = JobInstance::load(job.save(), &PresetLibrary::default());
        assert!(restored.preset().is_none());
        assert!(restored.with_preset().is_none());
        assert_eq!(restored.ledger().len(), 1);
        assert_eq!(
            restored.preset_overrides().job_shared_settings.maximum_retries_per_task,
            7
        );
    }
}
