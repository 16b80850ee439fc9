use crate::context::OuterContext;
use farmhand_core::{FieldPath, JobInstance};
use std::collections::HashSet;

/// Decides whether a row's value can be edited in a given context.
#[derive(Clone, Debug, Default)]
pub struct PropertyAvailability {
    disabled_in_preset: HashSet<FieldPath>,
}

impl PropertyAvailability {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `path` as read-only when a preset is edited.
    pub fn disable_in_preset(&mut self, path: FieldPath) {
        self.disabled_in_preset.insert(path);
    }

    pub fn is_enabled(&self, path: &FieldPath, context: &OuterContext<'_>) -> bool {
        match context {
            OuterContext::PresetAsset(_) => !self.disabled_in_preset.contains(path),
            OuterContext::JobInstance(job) => job.is_property_row_enabled(path),
            OuterContext::None => true,
        }
    }

    /// Toggles the override of `path` on `job`.
    pub fn set_enabled(&self, job: &mut JobInstance, path: FieldPath, enabled: bool) {
        job.set_property_row_enabled(path, enabled);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use farmhand_core::{JobPreset, JobPresetSettings};

    #[test]
    fn preset_context_only_disables_registered_paths() {
        let preset = JobPreset::new("Default", JobPresetSettings::default());
        let context = OuterContext::PresetAsset(&preset);
        let mut availability = PropertyAvailability::new();
        let auto = FieldPath::new("job_attachments.input_files.auto_detected");
        availability.disable_in_preset(auto.clone());

        assert!(!availability.is_enabled(&auto, &context));
        assert!(availability.is_enabled(&FieldPath::new("job_attachments.input_files.files"), &context));
    }

    #[test]
    fn job_context_follows_the_ledger() {
        let availability = PropertyAvailability::new();
        let path = FieldPath::new("host_requirements.cpus");
        let mut job = JobInstance::default();

        assert!(!availability.is_enabled(&path, &OuterContext::JobInstance(&job)));

        availability.set_enabled(&mut job, path.clone(), true);
        assert!(availability.is_enabled(&path, &OuterContext::JobInstance(&job)));

        availability.set_enabled(&mut job, path.clone(), false);
        assert!(!availability.is_enabled(&path, &OuterContext::JobInstance(&job)));
    }

    #[test]
    fn no_context_is_always_enabled() {
        let mut availability = PropertyAvailability::new();
        let path = FieldPath::new("job_attachments.input_files.auto_detected");
        availability.disable_in_preset(path.clone());

        assert!(availability.is_enabled(&path, &OuterContext::None));
    }
}
