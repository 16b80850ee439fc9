use farmhand_core::schema::Section;
use farmhand_core::{FieldPath, JobInstance, JobPreset};

/// One link of the chain of objects that own the structure being inspected.
#[derive(Clone, Copy, Debug)]
pub enum Owner<'a> {
    Job(&'a JobInstance),
    Preset(&'a JobPreset),
    /// A nested settings structure with no override semantics of its own.
    Section(Section),
}

/// A structure being drawn, with its owners listed innermost first.
#[derive(Clone, Debug)]
pub struct StructureHandle<'a> {
    path: FieldPath,
    owners: Vec<Owner<'a>>,
}

impl<'a> StructureHandle<'a> {
    pub fn new(path: FieldPath) -> Self {
        Self {
            path,
            owners: Vec::new(),
        }
    }

    /// Adds the next outer owner.
    pub fn owned_by(mut self, owner: Owner<'a>) -> Self {
        self.owners.push(owner);
        self
    }

    pub fn path(&self) -> &FieldPath {
        &self.path
    }

    pub fn owners(&self) -> &[Owner<'a>] {
        &self.owners
    }
}

/// The object whose rules apply to a structure.
#[derive(Clone, Copy, Debug)]
pub enum OuterContext<'a> {
    PresetAsset(&'a JobPreset),
    JobInstance(&'a JobInstance),
    None,
}

impl OuterContext<'_> {
    pub fn is_job(&self) -> bool {
        matches!(self, OuterContext::JobInstance(_))
    }

    pub fn is_preset(&self) -> bool {
        matches!(self, OuterContext::PresetAsset(_))
    }
}

/// Finds the context of `handle`.
///
/// The nearest job in the owner chain wins, even when a preset sits closer.
/// A chain with a preset and no job is a preset context; anything else has no
/// override semantics.
pub fn get_outer_context<'a>(handle: &StructureHandle<'a>) -> OuterContext<'a> {
    let owners = handle.owners();
    if let Some(job) = owners.iter().find_map(|owner| match owner {
        Owner::Job(job) => Some(*job),
        _ => None,
    }) {
        return OuterContext::JobInstance(job);
    }

    owners
        .iter()
        .find_map(|owner| match owner {
            Owner::Preset(preset) => Some(OuterContext::PresetAsset(*preset)),
            _ => None,
        })
        .unwrap_or(OuterContext::None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use farmhand_core::JobPresetSettings;

    fn handle<'a>() -> StructureHandle<'a> {
        StructureHandle::new(Section::HostRequirements.path())
            .owned_by(Owner::Section(Section::HostRequirements))
    }

    #[test]
    fn job_owned_structure_is_job_context() {
        let job = JobInstance::default();
        let preset = JobPreset::new("Default", JobPresetSettings::default());
        let handle = handle()
            .owned_by(Owner::Preset(&preset))
            .owned_by(Owner::Job(&job));

        match get_outer_context(&handle) {
            OuterContext::JobInstance(found) => assert_eq!(found.id(), job.id()),
            other => panic!("Expected job context, got {:?}", other),
        }
    }

    #[test]
    fn preset_owned_structure_is_preset_context() {
        let preset = JobPreset::new("Default", JobPresetSettings::default());
        let handle = handle().owned_by(Owner::Preset(&preset));

        assert!(get_outer_context(&handle).is_preset());
    }

    #[test]
    fn unowned_structure_has_no_context() {
        assert!(matches!(get_outer_context(&handle()), OuterContext::None));
        let bare = StructureHandle::new(FieldPath::new("job_shared_settings"));
        assert!(matches!(get_outer_context(&bare), OuterContext::None));
    }
}
