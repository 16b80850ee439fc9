use farmhand_core::{
    FarmhandConfig, FieldPath, JobInstance, JobPreset, JobPresetSettings, PresetLibrary, SavedJob,
    SceneReference,
};
use std::fs;

const PRESET_YAML: &str = r#"
name: "Studio Default"
settings:
  job_shared_settings:
    name: "Studio Render"
    maximum_retries_per_task: 20
  host_requirements:
    run_on_all_worker_nodes: false
    operating_system: linux
    cpus: { min: 16, max: 64 }
  job_attachments:
    output_directories:
      directories: ["Saved/MovieRenders"]
"#;

#[test]
fn test_preset_library_loads_yaml_directory() {
    // 1. Setup a presets folder
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    fs::write(dir.path().join("studio.yaml"), PRESET_YAML).expect("Failed to write preset");
    fs::write(dir.path().join("notes.txt"), "not a preset").expect("Failed to write notes");

    // 2. Load
    let mut library = PresetLibrary::default();
    let loaded = library
        .load_from_directory(dir.path())
        .expect("Failed to load presets");

    // 3. Verify
    assert_eq!(loaded, 1);
    let preset = library.get("Studio Default").expect("Preset not found");
    assert_eq!(preset.settings.job_shared_settings.maximum_retries_per_task, 20);
    assert_eq!(preset.settings.job_shared_settings.maximum_failed_tasks_count, 1);
    assert_eq!(preset.settings.host_requirements.cpus.max(), 64);
}

#[test]
fn test_missing_presets_directory_loads_nothing() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let mut library = PresetLibrary::default();

    let loaded = library
        .load_from_directory(dir.path().join("missing"))
        .expect("Missing directory should not fail");

    assert_eq!(loaded, 0);
    assert!(library.is_empty());
}

#[test]
fn test_invalid_preset_reports_file() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    fs::write(
        dir.path().join("broken.yml"),
        "name: Broken\nsettings:\n  host_requirements:\n    cpus: { min: 9, max: 3 }\n",
    )
    .expect("Failed to write preset");

    let mut library = PresetLibrary::default();
    let err = library
        .load_from_directory(dir.path())
        .expect_err("Inverted range should be rejected");

    assert!(format!("{:#}", err).contains("broken.yml"));
}

#[test]
fn test_saved_job_round_trips_through_json() {
    let mut library = PresetLibrary::default();
    let preset = library.insert(JobPreset::new("Studio Default", JobPresetSettings::default()));

    let mut job = JobInstance::new(SceneReference::new("/Game/Maps/Docks", "/Game/Seq/Dawn"));
    job.set_preset(Some(preset));
    job.set_property_row_enabled(FieldPath::new("job_shared_settings.description"), true);
    job.set_property_row_enabled(FieldPath::new("host_requirements.memory"), false);

    let json = serde_json::to_string(&job.save()).expect("Failed to serialize job");
    let saved: SavedJob = serde_json::from_str(&json).expect("Failed to parse job");
    let restored = JobInstance::load(saved, &library);

    assert_eq!(restored.id(), job.id());
    assert!(restored.with_preset().is_some());
    assert_eq!(restored.ledger(), job.ledger());
    assert_eq!(
        restored.ledger().entries()[0].property_path,
        FieldPath::new("job_shared_settings.description")
    );
}

#[test]
fn test_config_points_at_presets() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let presets = dir.path().join("presets");
    fs::create_dir(&presets).expect("Failed to create presets dir");
    fs::write(presets.join("studio.yaml"), PRESET_YAML).expect("Failed to write preset");

    let config_path = dir.path().join("farmhand.yaml");
    fs::write(
        &config_path,
        format!("presets_dir: {}\nproject_dir: {}\n", presets.display(), dir.path().display()),
    )
    .expect("Failed to write config");

    let config = FarmhandConfig::load(&config_path).expect("Failed to load config");
    let mut library = PresetLibrary::default();
    library
        .load_from_directory(&config.presets_dir)
        .expect("Failed to load presets");

    assert_eq!(library.names(), vec!["Studio Default"]);
    assert_eq!(config.content_dir(), dir.path().join("Content"));
}
