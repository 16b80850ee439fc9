//! # Farmhand Inspector
//!
//! This crate provides the headless logic for the job settings inspector.
//! It decides which rows are shown and editable for a preset, a job or a bare
//! settings tree, and applies edits coming back from the UI.

pub mod availability;
pub mod context;
pub mod error;
pub mod row;

use availability::PropertyAvailability;
use context::{OuterContext, Owner, get_outer_context};
pub use error::InspectorError;
use farmhand_core::options::{self, JobOptionsProvider};
use farmhand_core::schema::{self, FieldKind, FieldRole, FieldValue, Section};
use farmhand_core::settings::IntervalRange;
use farmhand_core::{
    AutoDetectAction, FieldPath, JobInstance, JobPreset, JobPresetSettings, SettingsError,
};
use row::SectionRows;
use std::collections::HashMap;
use std::sync::Arc;

/// The object an inspector edits.
#[derive(Debug)]
pub enum InspectedTarget<'a> {
    Preset(&'a mut JobPreset),
    Job(&'a mut JobInstance),
    Settings(&'a mut JobPresetSettings),
}

impl InspectedTarget<'_> {
    fn owner(&self) -> Option<Owner<'_>> {
        match self {
            InspectedTarget::Preset(preset) => Some(Owner::Preset(preset)),
            InspectedTarget::Job(job) => Some(Owner::Job(job)),
            InspectedTarget::Settings(_) => None,
        }
    }

    /// The tree whose values the rows display.
    fn shown(&self) -> &JobPresetSettings {
        match self {
            InspectedTarget::Preset(preset) => &preset.settings,
            InspectedTarget::Job(job) => job.preset_overrides(),
            InspectedTarget::Settings(settings) => &**settings,
        }
    }
}

/// The state of the inspector for one preset, job or settings tree.
pub struct InspectorState<'a> {
    target: InspectedTarget<'a>,
    availability: PropertyAvailability,
    provider: Option<Arc<dyn JobOptionsProvider>>,
    /// Validation errors for each field.
    pub errors: HashMap<FieldPath, String>,
}

impl<'a> InspectorState<'a> {
    pub fn new(target: InspectedTarget<'a>) -> Self {
        Self {
            target,
            availability: PropertyAvailability::new(),
            provider: None,
            errors: HashMap::new(),
        }
    }

    pub fn for_preset(preset: &'a mut JobPreset) -> Self {
        Self::new(InspectedTarget::Preset(preset))
    }

    pub fn for_job(job: &'a mut JobInstance) -> Self {
        Self::new(InspectedTarget::Job(job))
    }

    pub fn for_settings(settings: &'a mut JobPresetSettings) -> Self {
        Self::new(InspectedTarget::Settings(settings))
    }

    pub fn with_options(mut self, provider: Arc<dyn JobOptionsProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    pub fn context(&self) -> OuterContext<'_> {
        let handle = row::section_handle(Section::JobSharedSettings, self.target.owner());
        get_outer_context(&handle)
    }

    /// Builds every section, in display order.
    pub fn rows(&mut self) -> Vec<SectionRows> {
        let Self {
            target,
            availability,
            provider,
            ..
        } = self;
        let provider = provider.as_deref();

        Section::ALL
            .into_iter()
            .map(|section| {
                let handle = row::section_handle(section, target.owner());
                row::build_section(section, &handle, target.shown(), availability, provider)
            })
            .collect()
    }

    pub fn is_enabled(&self, path: &FieldPath) -> bool {
        self.availability.is_enabled(path, &self.context())
    }

    /// Toggles the override checkbox of `path`. Only a job has overrides.
    pub fn set_enabled(&mut self, path: FieldPath, enabled: bool) -> Result<(), InspectorError> {
        match &mut self.target {
            InspectedTarget::Job(job) => {
                self.availability.set_enabled(job, path, enabled);
                Ok(())
            }
            _ => Err(InspectorError::NotAJob),
        }
    }

    /// Writes a value coming from the UI and validates it.
    ///
    /// Rejected edits are also recorded in [`InspectorState::errors`].
    /// Returns the collector action when the edit toggled auto-detection.
    pub fn update_value(
        &mut self,
        path: &FieldPath,
        value: FieldValue,
    ) -> Result<Option<AutoDetectAction>, InspectorError> {
        let result = self.apply_value(path, value);
        self.record(path, result)
    }

    /// Validates raw range bounds before writing them.
    pub fn update_range(
        &mut self,
        path: &FieldPath,
        min: u32,
        max: u32,
    ) -> Result<Option<AutoDetectAction>, InspectorError> {
        let result = IntervalRange::new(min, max)
            .map_err(InspectorError::from)
            .and_then(|range| self.apply_value(path, FieldValue::Range(range)));
        self.record(path, result)
    }

    /// Returns true if all fields are valid.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Keeps [`InspectorState::errors`] in step with the outcome of an edit.
    fn record(
        &mut self,
        path: &FieldPath,
        result: Result<Option<AutoDetectAction>, InspectorError>,
    ) -> Result<Option<AutoDetectAction>, InspectorError> {
        match &result {
            Ok(_) => {
                self.errors.remove(path);
            }
            Err(err) => {
                tracing::debug!(%path, error = %err, "Rejected inspector edit");
                self.errors.insert(path.clone(), err.to_string());
            }
        }
        result
    }

    fn apply_value(
        &mut self,
        path: &FieldPath,
        value: FieldValue,
    ) -> Result<Option<AutoDetectAction>, InspectorError> {
        let field = schema::field(path)
            .ok_or_else(|| SettingsError::UnknownField(path.clone()))?;

        let enabled = match field.role {
            FieldRole::AutoDetected => false,
            FieldRole::JobLocal => true,
            FieldRole::Overridable => self.is_enabled(path),
        };
        if !enabled || !field.is_editable_in(self.target.shown()) {
            return Err(InspectorError::ReadOnly(path.clone()));
        }

        if let (FieldKind::Choice(source), FieldValue::Text(text)) = (field.kind, &value) {
            let offered = options::options_for(self.provider.as_deref(), source);
            if !offered.is_empty() && !offered.contains(text) {
                return Err(InspectorError::InvalidOption {
                    path: path.clone(),
                    value: text.clone(),
                });
            }
        }

        match &mut self.target {
            InspectedTarget::Job(job) => Ok(job.set_override_value(path, value)?),
            InspectedTarget::Preset(preset) => {
                field.write(&mut preset.settings, value)?;
                Ok(None)
            }
            InspectedTarget::Settings(settings) => {
                field.write(settings, value)?;
                Ok(None)
            }
        }
    }
}
