use crate::domain::FieldPath;
use crate::schema;
use serde::{Deserialize, Serialize};

/// Saved checkbox state of one inspector row.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyRowEnabledInfo {
    pub property_path: FieldPath,
    pub is_enabled: bool,
}

/// Per-job record of which fields override the preset.
///
/// Entries appear lazily on first toggle and keep their insertion order when
/// saved. A path without an entry is disabled, i.e. inherits the preset value.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OverrideLedger {
    entries: Vec<PropertyRowEnabledInfo>,
}

impl OverrideLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_enabled(&self, path: &FieldPath) -> bool {
        self.entries
            .iter()
            .find(|info| &info.property_path == path)
            .is_some_and(|info| info.is_enabled)
    }

    /// Inserts or updates the entry for `path`.
    pub fn set_enabled(&mut self, path: FieldPath, enabled: bool) {
        match self.entries.iter_mut().find(|info| info.property_path == path) {
            Some(info) => info.is_enabled = enabled,
            None => self.entries.push(PropertyRowEnabledInfo {
                property_path: path,
                is_enabled: enabled,
            }),
        }
    }

    pub fn entries(&self) -> &[PropertyRowEnabledInfo] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries whose path no longer names a field of the settings tree.
    pub fn stale_entries(&self) -> impl Iterator<Item = &PropertyRowEnabledInfo> {
        self.entries
            .iter()
            .filter(|info| schema::field(&info.property_path).is_none())
    }
}

impl From<Vec<PropertyRowEnabledInfo>> for OverrideLedger {
    fn from(entries: Vec<PropertyRowEnabledInfo>) -> Self {
        Self { entries }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn untouched_paths_are_disabled() {
        let ledger = OverrideLedger::new();
        assert!(!ledger.is_enabled(&FieldPath::new("job_shared_settings.name")));
        assert!(ledger.is_empty());
    }

    #[test]
    fn set_is_read_back_immediately() {
        let mut ledger = OverrideLedger::new();
        let path = FieldPath::new("host_requirements.cpus");

        ledger.set_enabled(path.clone(), true);
        assert!(ledger.is_enabled(&path));

        ledger.set_enabled(path.clone(), false);
        assert!(!ledger.is_enabled(&path));
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn repeated_set_is_idempotent() {
        let mut ledger = OverrideLedger::new();
        let path = FieldPath::new("job_shared_settings.description");

        ledger.set_enabled(path.clone(), true);
        let after_first = ledger.clone();
        ledger.set_enabled(path, true);

        assert_eq!(ledger, after_first);
    }

    #[test]
    fn persists_as_ordered_records() {
        let mut ledger = OverrideLedger::new();
        ledger.set_enabled("job_shared_settings.name".into(), true);
        ledger.set_enabled("host_requirements.memory".into(), false);

        let json = serde_json::to_value(&ledger).unwrap();
        assert_eq!(
            json,
            serde_json::json!([
                { "property_path": "job_shared_settings.name", "is_enabled": true },
                { "property_path": "host_requirements.memory", "is_enabled": false },
            ])
        );

        let restored: OverrideLedger = serde_json::from_value(json).unwrap();
        assert_eq!(restored, ledger);
    }

    #[test]
    fn unknown_paths_are_reported_as_stale() {
        let mut ledger = OverrideLedger::new();
        ledger.set_enabled("host_requirements.gpus".into(), true);
        ledger.set_enabled("host_requirements.gpu_memory".into(), true);

        let stale: Vec<_> = ledger.stale_entries().collect();
        assert_eq!(stale.len(), 1);
        assert_eq!(stale[0].property_path, "host_requirements.gpus");
    }
}
