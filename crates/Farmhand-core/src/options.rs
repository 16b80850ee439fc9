use crate::schema::OptionSource;
use serde::{Deserialize, Serialize};

/// Supplies the valid values of the choice fields.
///
/// Injected into whatever needs the lists; the engine never looks one up on
/// its own.
pub trait JobOptionsProvider: Send + Sync {
    fn cpu_architectures(&self) -> Vec<String>;

    fn operating_systems(&self) -> Vec<String>;

    fn job_initial_state_options(&self) -> Vec<String>;

    fn options(&self, source: OptionSource) -> Vec<String> {
        match source {
            OptionSource::CpuArchitectures => self.cpu_architectures(),
            OptionSource::OperatingSystems => self.operating_systems(),
            OptionSource::JobInitialStates => self.job_initial_state_options(),
        }
    }
}

/// Option lists for `source`, or an empty list when no provider is wired in.
pub fn options_for(provider: Option<&dyn JobOptionsProvider>, source: OptionSource) -> Vec<String> {
    match provider {
        Some(provider) => provider.options(source),
        None => {
            tracing::debug!(?source, "No options provider configured");
            Vec::new()
        }
    }
}

/// Fixed option lists, configurable from the config file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StaticJobOptions {
    pub cpu_architectures: Vec<String>,
    pub operating_systems: Vec<String>,
    pub job_initial_states: Vec<String>,
}

impl Default for StaticJobOptions {
    fn default() -> Self {
        Self {
            cpu_architectures: vec!["x86_64".into(), "arm64".into()],
            operating_systems: vec!["linux".into(), "macos".into(), "windows".into()],
            job_initial_states: vec!["READY".into(), "SUSPENDED".into()],
        }
    }
}

impl JobOptionsProvider for StaticJobOptions {
    fn cpu_architectures(&self) -> Vec<String> {
        self.cpu_architectures.clone()
    }

    fn operating_systems(&self) -> Vec<String> {
        self.operating_systems.clone()
    }

    fn job_initial_state_options(&self) -> Vec<String> {
        self.job_initial_states.clone()
    }
}
