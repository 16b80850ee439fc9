//! # Settings Field Table
//!
//! Every leaf field of [`JobPresetSettings`] declared once, with its path,
//! display metadata and typed accessors. The merge and the inspector both walk
//! this table instead of inspecting structs at runtime, so adding a field to the
//! settings tree means adding exactly one row here.

use crate::domain::FieldPath;
use crate::error::SettingsError;
use crate::settings::{InitialState, IntervalRange, JobPresetSettings};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Top-level groups of the settings tree, in display order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    JobSharedSettings,
    HostRequirements,
    InputFiles,
    InputDirectories,
    OutputDirectories,
}

impl Section {
    pub const ALL: [Section; 5] = [
        Section::JobSharedSettings,
        Section::HostRequirements,
        Section::InputFiles,
        Section::InputDirectories,
        Section::OutputDirectories,
    ];

    pub fn path(&self) -> FieldPath {
        FieldPath::new(match self {
            Section::JobSharedSettings => "job_shared_settings",
            Section::HostRequirements => "host_requirements",
            Section::InputFiles => "job_attachments.input_files",
            Section::InputDirectories => "job_attachments.input_directories",
            Section::OutputDirectories => "job_attachments.output_directories",
        })
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Section::JobSharedSettings => "Job Shared Settings",
            Section::HostRequirements => "Host Requirements",
            Section::InputFiles => "Input Files",
            Section::InputDirectories => "Input Directories",
            Section::OutputDirectories => "Output Directories",
        }
    }
}

/// Where the list of valid values for a choice field comes from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OptionSource {
    OperatingSystems,
    CpuArchitectures,
    JobInitialStates,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Text,
    Choice(OptionSource),
    Flag,
    Count,
    Range,
    FilePaths,
    DirectoryPaths,
}

impl FieldKind {
    fn value_name(&self) -> &'static str {
        match self {
            FieldKind::Text | FieldKind::Choice(_) => "text",
            FieldKind::Flag => "flag",
            FieldKind::Count => "count",
            FieldKind::Range => "range",
            FieldKind::FilePaths | FieldKind::DirectoryPaths => "paths",
        }
    }
}

/// How a field takes part in the preset/job override workflow.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldRole {
    /// Edited on the preset, selectively overridden per job.
    Overridable,
    /// A per-job switch edited directly, never through the override checkbox.
    JobLocal,
    /// Filled by the dependency collector; read-only everywhere.
    AutoDetected,
}

/// Condition on a sibling field that must hold for a field to be editable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditCondition {
    FlagIsFalse(&'static str),
}

impl EditCondition {
    pub fn holds(&self, settings: &JobPresetSettings) -> bool {
        match self {
            EditCondition::FlagIsFalse(path) => {
                !matches!(find_field(path).map(|f| f.read(settings)), Some(FieldValue::Flag(true)))
            }
        }
    }
}

/// A field value detached from its position in the tree.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum FieldValue {
    Text(String),
    Flag(bool),
    Count(u32),
    Range(IntervalRange),
    Paths(Vec<PathBuf>),
}

impl FieldValue {
    pub fn kind_name(&self) -> &'static str {
        match self {
            FieldValue::Text(_) => "text",
            FieldValue::Flag(_) => "flag",
            FieldValue::Count(_) => "count",
            FieldValue::Range(_) => "range",
            FieldValue::Paths(_) => "paths",
        }
    }
}

impl std::fmt::Display for FieldValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldValue::Text(text) => f.write_str(text),
            FieldValue::Flag(flag) => write!(f, "{flag}"),
            FieldValue::Count(count) => write!(f, "{count}"),
            FieldValue::Range(range) => write!(f, "{}..{}", range.min(), range.max()),
            FieldValue::Paths(paths) => {
                let joined: Vec<String> = paths.iter().map(|p| p.display().to_string()).collect();
                write!(f, "[{}]", joined.join(", "))
            }
        }
    }
}

/// Raised by the table accessors when a value of the wrong kind is written.
#[derive(Debug)]
pub struct KindMismatch {
    found: &'static str,
}

macro_rules! value_conversions {
    ($($ty:ty => $variant:ident),+ $(,)?) => {
        $(
            impl From<$ty> for FieldValue {
                fn from(value: $ty) -> Self {
                    FieldValue::$variant(value)
                }
            }

            impl TryFrom<FieldValue> for $ty {
                type Error = KindMismatch;

                fn try_from(value: FieldValue) -> Result<Self, Self::Error> {
                    match value {
                        FieldValue::$variant(inner) => Ok(inner),
                        other => Err(KindMismatch { found: other.kind_name() }),
                    }
                }
            }
        )+
    };
}

value_conversions! {
    String => Text,
    bool => Flag,
    u32 => Count,
    IntervalRange => Range,
    Vec<PathBuf> => Paths,
}

impl From<InitialState> for FieldValue {
    fn from(state: InitialState) -> Self {
        FieldValue::Text(state.into())
    }
}

impl TryFrom<FieldValue> for InitialState {
    type Error = KindMismatch;

    fn try_from(value: FieldValue) -> Result<Self, Self::Error> {
        String::try_from(value).map(InitialState::from)
    }
}

/// One row of the field table.
pub struct Field {
    pub path: &'static str,
    pub section: Section,
    pub display_name: &'static str,
    pub kind: FieldKind,
    pub role: FieldRole,
    pub edit_condition: Option<EditCondition>,
    read: fn(&JobPresetSettings) -> FieldValue,
    write: fn(&mut JobPresetSettings, FieldValue) -> Result<(), KindMismatch>,
}

impl std::fmt::Debug for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Field")
            .field("path", &self.path)
            .field("kind", &self.kind)
            .field("role", &self.role)
            .finish()
    }
}

impl Field {
    pub fn path(&self) -> FieldPath {
        FieldPath::new(self.path)
    }

    pub fn read(&self, settings: &JobPresetSettings) -> FieldValue {
        (self.read)(settings)
    }

    pub fn write(
        &self,
        settings: &mut JobPresetSettings,
        value: FieldValue,
    ) -> Result<(), SettingsError> {
        (self.write)(settings, value).map_err(|mismatch| SettingsError::TypeMismatch {
            path: self.path(),
            expected: self.kind.value_name(),
            found: mismatch.found,
        })
    }

    /// Copies this field, and only this field, from `source` into `target`.
    pub fn copy(&self, source: &JobPresetSettings, target: &mut JobPresetSettings) {
        // Both sides share the schema, so the kind always matches.
        let _ = (self.write)(target, (self.read)(source));
    }

    /// Evaluates the edit condition against the tree the field is shown in.
    pub fn is_editable_in(&self, settings: &JobPresetSettings) -> bool {
        self.edit_condition.is_none_or(|condition| condition.holds(settings))
    }
}

macro_rules! field {
    (@cond) => { None };
    (@cond $cond:expr) => { Some($cond) };
    ($path:literal, $section:ident, $display:literal, $kind:expr, $role:ident, $($access:ident).+ $(, when $cond:expr)?) => {
        Field {
            path: $path,
            section: Section::$section,
            display_name: $display,
            kind: $kind,
            role: FieldRole::$role,
            edit_condition: field!(@cond $($cond)?),
            read: |settings: &JobPresetSettings| FieldValue::from(settings.$($access).+.clone()),
            write: |settings: &mut JobPresetSettings, value: FieldValue| {
                settings.$($access).+ = value.try_into()?;
                Ok(())
            },
        }
    };
}

const SPECIFIC_HOSTS: EditCondition =
    EditCondition::FlagIsFalse("host_requirements.run_on_all_worker_nodes");

static FIELDS: &[Field] = &[
    field!("job_shared_settings.name", JobSharedSettings, "Name", FieldKind::Text, Overridable,
        job_shared_settings.name),
    field!("job_shared_settings.description", JobSharedSettings, "Description", FieldKind::Text, Overridable,
        job_shared_settings.description),
    field!("job_shared_settings.initial_state", JobSharedSettings, "Initial State",
        FieldKind::Choice(OptionSource::JobInitialStates), Overridable,
        job_shared_settings.initial_state),
    field!("job_shared_settings.maximum_failed_tasks_count", JobSharedSettings, "Maximum Failed Tasks Count",
        FieldKind::Count, Overridable, job_shared_settings.maximum_failed_tasks_count),
    field!("job_shared_settings.maximum_retries_per_task", JobSharedSettings, "Maximum Retries Per Task",
        FieldKind::Count, Overridable, job_shared_settings.maximum_retries_per_task),
    field!("host_requirements.run_on_all_worker_nodes", HostRequirements, "Run On All Worker Nodes",
        FieldKind::Flag, Overridable, host_requirements.run_on_all_worker_nodes),
    field!("host_requirements.operating_system", HostRequirements, "Operating System",
        FieldKind::Choice(OptionSource::OperatingSystems), Overridable,
        host_requirements.operating_system, when SPECIFIC_HOSTS),
    field!("host_requirements.cpu_architecture", HostRequirements, "CPU Architecture",
        FieldKind::Choice(OptionSource::CpuArchitectures), Overridable,
        host_requirements.cpu_architecture, when SPECIFIC_HOSTS),
    field!("host_requirements.cpus", HostRequirements, "vCPUs", FieldKind::Range, Overridable,
        host_requirements.cpus, when SPECIFIC_HOSTS),
    field!("host_requirements.memory", HostRequirements, "Memory (GiB)", FieldKind::Range, Overridable,
        host_requirements.memory, when SPECIFIC_HOSTS),
    field!("host_requirements.gpu_memory", HostRequirements, "GPU Memory (GiB)", FieldKind::Range, Overridable,
        host_requirements.gpu_memory, when SPECIFIC_HOSTS),
    field!("host_requirements.scratch_space", HostRequirements, "Scratch Space", FieldKind::Range, Overridable,
        host_requirements.scratch_space, when SPECIFIC_HOSTS),
    field!("job_attachments.input_files.show_auto_detected", InputFiles, "Show Auto-Detected",
        FieldKind::Flag, JobLocal, job_attachments.input_files.show_auto_detected),
    field!("job_attachments.input_files.files", InputFiles, "Files", FieldKind::FilePaths, Overridable,
        job_attachments.input_files.files),
    field!("job_attachments.input_files.auto_detected", InputFiles, "Auto Detected Files",
        FieldKind::FilePaths, AutoDetected, job_attachments.input_files.auto_detected),
    field!("job_attachments.input_directories.show_auto_detected", InputDirectories, "Show Auto-Detected",
        FieldKind::Flag, JobLocal, job_attachments.input_directories.show_auto_detected),
    field!("job_attachments.input_directories.directories", InputDirectories, "Directories",
        FieldKind::DirectoryPaths, Overridable, job_attachments.input_directories.directories),
    field!("job_attachments.input_directories.auto_detected_directories", InputDirectories,
        "Auto Detected Directories", FieldKind::DirectoryPaths, AutoDetected,
        job_attachments.input_directories.auto_detected_directories),
    field!("job_attachments.output_directories.show_auto_detected", OutputDirectories, "Show Auto-Detected",
        FieldKind::Flag, JobLocal, job_attachments.output_directories.show_auto_detected),
    field!("job_attachments.output_directories.directories", OutputDirectories, "Directories",
        FieldKind::DirectoryPaths, Overridable, job_attachments.output_directories.directories),
    field!("job_attachments.output_directories.auto_detected_directories", OutputDirectories,
        "Auto Detected Directories", FieldKind::DirectoryPaths, AutoDetected,
        job_attachments.output_directories.auto_detected_directories),
];

/// All leaf fields, grouped by section in display order.
pub fn fields() -> &'static [Field] {
    FIELDS
}

pub fn find_field(path: &str) -> Option<&'static Field> {
    FIELDS.iter().find(|field| field.path == path)
}

pub fn field(path: &FieldPath) -> Option<&'static Field> {
    find_field(path.as_str())
}

pub fn fields_in(section: Section) -> impl Iterator<Item = &'static Field> {
    FIELDS.iter().filter(move |field| field.section == section)
}

pub fn read_value(settings: &JobPresetSettings, path: &FieldPath) -> Result<FieldValue, SettingsError> {
    field(path)
        .map(|f| f.read(settings))
        .ok_or_else(|| SettingsError::UnknownField(path.clone()))
}

pub fn write_value(
    settings: &mut JobPresetSettings,
    path: &FieldPath,
    value: FieldValue,
) -> Result<(), SettingsError> {
    field(path)
        .ok_or_else(|| SettingsError::UnknownField(path.clone()))?
        .write(settings, value)
}
