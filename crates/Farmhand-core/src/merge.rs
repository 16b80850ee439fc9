use crate::ledger::OverrideLedger;
use crate::schema;
use crate::settings::JobPresetSettings;

/// Merges a preset's settings with a job's overrides.
///
/// Starts from a copy of `preset` and, for every field of the table whose
/// path is enabled in `ledger`, takes the value from `overrides` instead.
/// Fields are copied one by one; a sub-structure is never swapped whole, so
/// overriding one host range leaves its siblings inherited.
///
/// Ledger entries naming fields the table does not know are ignored and the
/// preset value stands.
#[tracing::instrument(level = "debug", skip_all, fields(entries = ledger.len()))]
pub fn resolve_with_overrides(
    preset: &JobPresetSettings,
    overrides: &JobPresetSettings,
    ledger: &OverrideLedger,
) -> JobPresetSettings {
    let mut resolved = preset.clone();
    let mut applied = 0usize;

    for field in schema::fields() {
        if ledger.is_enabled(&field.path()) {
            field.copy(overrides, &mut resolved);
            applied += 1;
        }
    }

    for stale in ledger.stale_entries() {
        tracing::debug!(path = %stale.property_path, "Skipping override for unknown field");
    }
    tracing::debug!(applied, "Resolved job settings");

    resolved
}
