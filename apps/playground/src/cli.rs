use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "farmhand-playground",
    about = "Drive the Farmhand preset/override engine from the command line"
)]
pub struct Cli {
    /// Workspace config file (YAML). Defaults are used when it does not exist.
    #[arg(long, env = "FARMHAND_CONFIG", default_value = "farmhand.yaml")]
    pub config: PathBuf,

    /// Overrides `presets_dir` from the config file.
    #[arg(long, env = "FARMHAND_PRESETS_DIR")]
    pub presets_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the presets found in the presets directory
    Presets,
    /// Print the inspector rows of a preset or a saved job
    Rows {
        #[command(flatten)]
        target: Target,
    },
    /// Resolve a saved job against its preset and print what would be submitted
    Resolve {
        /// Saved job (JSON or YAML)
        #[arg(long)]
        job: PathBuf,

        /// Asset registry export (YAML) used to fill auto-detected files
        #[arg(long, env = "FARMHAND_ASSET_REGISTRY")]
        registry: Option<PathBuf>,
    },
}

#[derive(clap::Args, Debug)]
#[group(required = true, multiple = false)]
pub struct Target {
    /// Name of a preset in the presets directory
    #[arg(long)]
    pub preset: Option<String>,

    /// Saved job (JSON or YAML)
    #[arg(long)]
    pub job: Option<PathBuf>,
}
