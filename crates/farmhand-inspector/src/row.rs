use crate::availability::PropertyAvailability;
use crate::context::{OuterContext, Owner, StructureHandle, get_outer_context};
use farmhand_core::options::{self, JobOptionsProvider};
use farmhand_core::schema::{self, Field, FieldKind, FieldRole, FieldValue, Section};
use farmhand_core::{FieldPath, JobPresetSettings};
use serde::Serialize;

/// Everything the UI needs to draw one field.
#[derive(Debug, Clone, Serialize)]
pub struct PropertyRow {
    pub path: FieldPath,
    pub label: String,
    pub section: Section,
    pub kind: FieldKind,
    pub role: FieldRole,
    /// Value shown in the value widget.
    pub value: FieldValue,
    /// Valid values of a choice field, empty otherwise.
    pub options: Vec<String>,
    /// Checkbox state, present only on overridable rows of a job.
    pub override_checkbox: Option<bool>,
    /// Whether the value widget accepts input.
    pub editable: bool,
    pub visible: bool,
    /// Inherited preset value, shown while a job row is not overridden.
    pub preset_value: Option<FieldValue>,
}

/// A group of rows under one heading.
#[derive(Debug, Clone, Serialize)]
pub struct SectionRows {
    pub section: Section,
    pub title: &'static str,
    pub rows: Vec<PropertyRow>,
}

/// Builds the rows of `section` for `handle`.
///
/// In a preset context the auto-detected rows are registered with
/// `availability` as disabled, so later queries see them read-only.
pub fn build_section(
    section: Section,
    handle: &StructureHandle<'_>,
    shown: &JobPresetSettings,
    availability: &mut PropertyAvailability,
    provider: Option<&dyn JobOptionsProvider>,
) -> SectionRows {
    let context = get_outer_context(handle);
    let rows = schema::fields_in(section)
        .map(|field| build_row(field, &context, shown, availability, provider))
        .collect();

    SectionRows {
        section,
        title: section.display_name(),
        rows,
    }
}

fn build_row(
    field: &Field,
    context: &OuterContext<'_>,
    shown: &JobPresetSettings,
    availability: &mut PropertyAvailability,
    provider: Option<&dyn JobOptionsProvider>,
) -> PropertyRow {
    let path = field.path();

    if field.role == FieldRole::AutoDetected && context.is_preset() {
        availability.disable_in_preset(path.clone());
    }

    let enabled = match field.role {
        FieldRole::JobLocal => true,
        FieldRole::Overridable | FieldRole::AutoDetected => availability.is_enabled(&path, context),
    };
    let editable = enabled && field.role != FieldRole::AutoDetected && field.is_editable_in(shown);

    let visible = match (field.role, context) {
        (FieldRole::AutoDetected, OuterContext::JobInstance(_)) => {
            auto_detected_shown(field.section, shown)
        }
        _ => true,
    };

    let override_checkbox = match (field.role, context) {
        (FieldRole::Overridable, OuterContext::JobInstance(_)) => Some(enabled),
        _ => None,
    };

    let preset_value = match context {
        OuterContext::JobInstance(job) if override_checkbox == Some(false) => {
            job.preset().map(|preset| field.read(&preset.settings))
        }
        _ => None,
    };

    let options = match field.kind {
        FieldKind::Choice(source) => options::options_for(provider, source),
        _ => Vec::new(),
    };

    PropertyRow {
        label: field.display_name.to_string(),
        section: field.section,
        kind: field.kind,
        role: field.role,
        value: field.read(shown),
        options,
        override_checkbox,
        editable,
        visible,
        preset_value,
        path,
    }
}

fn auto_detected_shown(section: Section, shown: &JobPresetSettings) -> bool {
    let flag = section.path().join("show_auto_detected");
    matches!(schema::read_value(shown, &flag), Ok(FieldValue::Flag(true)))
}

/// Owner chain for a section drawn inside `outer`.
pub fn section_handle<'a>(section: Section, outer: Option<Owner<'a>>) -> StructureHandle<'a> {
    let handle = StructureHandle::new(section.path()).owned_by(Owner::Section(section));
    match outer {
        Some(owner) => handle.owned_by(owner),
        None => handle,
    }
}
