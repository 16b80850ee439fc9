use crate::domain::FieldPath;
use thiserror::Error;

/// Errors raised while editing or validating job settings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettingsError {
    #[error("range bound {value} exceeds the maximum of {limit}")]
    RangeOutOfBounds { value: u32, limit: u32 },

    #[error("range minimum {min} is greater than maximum {max}")]
    InvertedRange { min: u32, max: u32 },

    #[error("field '{path}' expects a {expected} value, got {found}")]
    TypeMismatch {
        path: FieldPath,
        expected: &'static str,
        found: &'static str,
    },

    #[error("unknown field '{0}'")]
    UnknownField(FieldPath),
}
