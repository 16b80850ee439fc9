use farmhand_core::{FieldPath, SettingsError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InspectorError {
    #[error("overrides can only be toggled on a job")]
    NotAJob,

    #[error("field '{0}' is read-only here")]
    ReadOnly(FieldPath),

    #[error("'{value}' is not an offered option for '{path}'")]
    InvalidOption { path: FieldPath, value: String },

    #[error(transparent)]
    Settings(#[from] SettingsError),
}
