use farmhand_core::schema::FieldValue;
use farmhand_core::settings::IntervalRange;
use farmhand_core::{FieldPath, JobInstance, JobPreset, JobPresetSettings, SceneReference};
use std::sync::Arc;

fn render_preset() -> Arc<JobPreset> {
    let mut settings = JobPresetSettings::default();
    settings.job_shared_settings.name = "Arena Flyby".into();
    settings.job_shared_settings.maximum_retries_per_task = 50;
    settings.job_shared_settings.maximum_failed_tasks_count = 5;
    settings.host_requirements.run_on_all_worker_nodes = false;
    settings.host_requirements.cpus = IntervalRange::new(8, 32).expect("valid range");
    settings.host_requirements.memory = IntervalRange::new(16, 64).expect("valid range");
    Arc::new(JobPreset::new("Arena Flyby", settings))
}

#[test]
fn test_retries_override_leaves_failed_tasks_inherited() {
    // 1. Job on a preset with retries 50
    let mut job = JobInstance::new(SceneReference::new("/Game/Maps/Arena", "/Game/Seq/Flyby"));
    job.set_preset(Some(render_preset()));

    // 2. Override retries to 10 and enable only that row
    let retries = FieldPath::new("job_shared_settings.maximum_retries_per_task");
    job.set_override_value(&retries, FieldValue::Count(10))
        .expect("Failed to write override");
    job.set_property_row_enabled(retries, true);

    // 3. Resolve
    let resolved = job
        .with_preset()
        .expect("Preset should be bound")
        .resolve_with_overrides();

    assert_eq!(resolved.job_shared_settings.maximum_retries_per_task, 10);
    assert_eq!(resolved.job_shared_settings.maximum_failed_tasks_count, 5);
    assert_eq!(resolved.job_shared_settings.name, "Arena Flyby");
}

#[test]
fn test_single_host_range_override_is_field_granular() {
    let mut job = JobInstance::default();
    job.set_preset(Some(render_preset()));

    let memory = FieldPath::new("host_requirements.memory");
    let cpus = FieldPath::new("host_requirements.cpus");
    job.set_override_value(
        &memory,
        FieldValue::Range(IntervalRange::new(128, 256).expect("valid range")),
    )
    .expect("Failed to write memory");
    job.set_override_value(
        &cpus,
        FieldValue::Range(IntervalRange::new(1, 2).expect("valid range")),
    )
    .expect("Failed to write cpus");
    job.set_property_row_enabled(memory, true);

    let resolved = job.with_preset().expect("Preset should be bound").resolve_with_overrides();

    assert_eq!(resolved.host_requirements.memory.min(), 128);
    assert_eq!(resolved.host_requirements.cpus.min(), 8);
    assert_eq!(resolved.host_requirements.cpus.max(), 32);
    assert!(!resolved.host_requirements.run_on_all_worker_nodes);
}

#[test]
fn test_toggling_is_idempotent_and_read_after_write() {
    let mut job = JobInstance::default();
    let path = FieldPath::new("host_requirements.operating_system");

    assert!(!job.is_property_row_enabled(&path));

    job.set_property_row_enabled(path.clone(), true);
    let after_first = job.ledger().clone();
    job.set_property_row_enabled(path.clone(), true);

    assert!(job.is_property_row_enabled(&path));
    assert_eq!(job.ledger(), &after_first);
    assert_eq!(job.ledger().len(), 1);
}

#[test]
fn test_stale_ledger_entries_are_ignored() {
    let mut job = JobInstance::default();
    job.set_preset(Some(render_preset()));
    job.set_property_row_enabled(FieldPath::new("job_shared_settings.priority"), true);

    let resolved = job.with_preset().expect("Preset should be bound").resolve_with_overrides();

    assert_eq!(resolved, render_preset().settings);
    assert_eq!(job.ledger().stale_entries().count(), 1);
}
