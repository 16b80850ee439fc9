use serde::{Deserialize, Serialize};

/// State a job enters once submitted.
///
/// The farm may add states over time, so unrecognised names are kept
/// verbatim instead of being rejected.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum InitialState {
    #[default]
    Ready,
    Suspended,
    Other(String),
}

impl InitialState {
    pub fn as_str(&self) -> &str {
        match self {
            InitialState::Ready => "READY",
            InitialState::Suspended => "SUSPENDED",
            InitialState::Other(name) => name,
        }
    }
}

impl std::fmt::Display for InitialState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for InitialState {
    fn from(s: String) -> Self {
        match s.as_str() {
            "READY" => InitialState::Ready,
            "SUSPENDED" => InitialState::Suspended,
            _ => InitialState::Other(s),
        }
    }
}

impl From<&str> for InitialState {
    fn from(s: &str) -> Self {
        InitialState::from(s.to_string())
    }
}

impl From<InitialState> for String {
    fn from(state: InitialState) -> Self {
        match state {
            InitialState::Other(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

/// Settings every job carries regardless of what it renders.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobSharedSettings {
    pub name: String,
    pub description: String,
    pub initial_state: InitialState,
    pub maximum_failed_tasks_count: u32,
    pub maximum_retries_per_task: u32,
}

impl Default for JobSharedSettings {
    fn default() -> Self {
        Self {
            name: "Untitled".to_string(),
            description: "No description".to_string(),
            initial_state: InitialState::Ready,
            maximum_failed_tasks_count: 1,
            maximum_retries_per_task: 50,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_state_keeps_unknown_names() {
        assert_eq!(InitialState::from("READY"), InitialState::Ready);
        assert_eq!(InitialState::from("SUSPENDED"), InitialState::Suspended);

        let custom = InitialState::from("PENDING_APPROVAL");
        assert_eq!(custom, InitialState::Other("PENDING_APPROVAL".to_string()));
        assert_eq!(String::from(custom), "PENDING_APPROVAL");
    }

    #[test]
    fn initial_state_serializes_as_plain_string() {
        let json = serde_json::to_string(&InitialState::Suspended).unwrap();
        assert_eq!(json, "\"SUSPENDED\"");

        let parsed: InitialState = serde_json::from_str("\"READY\"").unwrap();
        assert_eq!(parsed, InitialState::Ready);
    }
}
