mod cli;

use anyhow::{Context, Result, anyhow};
use clap::Parser as _;
use cli::{Cli, Commands, Target};
use farmhand_collector::{
    AutoDetectDispatcher, ContentPaths, InMemoryAssetRegistry, RegistryDependencySource,
};
use farmhand_core::{
    AttachmentSummary, FarmhandConfig, JobInstance, PresetLibrary, SavedJob,
};
use farmhand_inspector::InspectorState;
use serde_json::json;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = FarmhandConfig::load_or_default(&cli.config)?;
    if let Some(presets_dir) = cli.presets_dir {
        config.presets_dir = presets_dir;
    }

    let mut library = PresetLibrary::default();
    library.load_from_directory(&config.presets_dir)?;

    match cli.command {
        Commands::Presets => {
            for name in library.names() {
                println!("{}", name);
            }
        }
        Commands::Rows { target } => print_rows(&config, &library, target)?,
        Commands::Resolve { job, registry } => {
            resolve(&config, &library, &job, registry.as_deref()).await?
        }
    }
    Ok(())
}

fn load_job(path: &Path, library: &PresetLibrary) -> Result<JobInstance> {
    let content =
        fs::read_to_string(path).with_context(|| format!("Failed to read job file: {:?}", path))?;
    let saved: SavedJob = match path.extension().and_then(|s| s.to_str()) {
        Some("yaml") | Some("yml") => serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse job file: {:?}", path))?,
        _ => serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse job file: {:?}", path))?,
    };
    Ok(JobInstance::load(saved, library))
}

fn print_rows(config: &FarmhandConfig, library: &PresetLibrary, target: Target) -> Result<()> {
    let options = Arc::new(config.options.clone());

    let rows = match (target.preset, target.job) {
        (Some(name), _) => {
            let preset = library
                .get(&name)
                .ok_or_else(|| anyhow!("Unknown preset '{}'", name))?;
            let mut preset = preset.as_ref().clone();
            let mut inspector = InspectorState::for_preset(&mut preset).with_options(options);
            inspector.rows()
        }
        (None, Some(path)) => {
            let mut job = load_job(&path, library)?;
            let mut inspector = InspectorState::for_job(&mut job).with_options(options);
            inspector.rows()
        }
        (None, None) => return Err(anyhow!("Either --preset or --job is required")),
    };

    println!("{}", serde_json::to_string_pretty(&rows)?);
    Ok(())
}

async fn resolve(
    config: &FarmhandConfig,
    library: &PresetLibrary,
    job_path: &Path,
    registry_path: Option<&Path>,
) -> Result<()> {
    let mut job = load_job(job_path, library)?;

    if let Some(registry_path) = registry_path {
        let registry = InMemoryAssetRegistry::load_from_file(registry_path)?;
        let source = RegistryDependencySource::new(
            Arc::new(registry),
            ContentPaths::new(config.content_dir()),
        );
        let mut dispatcher = AutoDetectDispatcher::on_current_runtime(
            Arc::new(source),
            config.collector.completion_policy,
        )?;

        let action = job.update_attachment_fields();
        dispatcher.handle_action(&job, action);
        let applied = dispatcher.settle(&mut job).await;
        tracing::info!(applied, files = job.auto_detected_files().len(), "Auto-detection finished");
    }

    let bound = job
        .with_preset()
        .ok_or_else(|| anyhow!("Job {} has no preset; nothing to resolve", job.id()))?;
    let resolved = bound.resolve_with_overrides();
    tracing::info!(job = %job.id(), preset = %bound.preset().name, "Resolved job settings");

    // Auto-detected files belong to the job, not to the preset.
    let mut submitted = resolved.clone();
    submitted.job_attachments.input_files.auto_detected = job.auto_detected_files().to_vec();
    let attachments = AttachmentSummary::from_settings(&submitted, &config.project_dir);

    let host_requirements = resolved.host_requirements.to_job_host_requirements();
    let output = json!({
        "job": job.id(),
        "preset": bound.preset().name,
        "settings": resolved,
        "host_requirements": host_requirements,
        "attachments": attachments,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
