//! # CLI Error Type
//!
//! Everything the `stockroom` binary can fail with. Printed as
//! `CODE: message` on stderr, mirroring the `{ code, message }` shape a
//! request handler returns to the web UI.

use std::path::PathBuf;
use stockroom_core::CoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    /// A calculation rejected its inputs.
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Failed to read config file {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Invalid config file: {0}")]
    InvalidConfig(stockroom_core::ValidationError),

    #[error("Invalid value {value:?} in environment variable {var}")]
    InvalidOverride { var: String, value: String },

    #[error("Unknown category {0:?}")]
    UnknownCategory(String),

    #[error("Failed to encode output: {0}")]
    Output(#[from] serde_json::Error),
}

impl CliError {
    /// Machine-readable error code.
    pub fn code(&self) -> &'static str {
        match self {
            CliError::Core(err) => err.code(),
            CliError::ConfigRead { .. } | CliError::ConfigParse(_) => "CONFIG_ERROR",
            CliError::InvalidConfig(_) | CliError::InvalidOverride { .. } => "CONFIG_ERROR",
            CliError::UnknownCategory(_) => "NOT_FOUND",
            CliError::Output(_) => "INTERNAL",
        }
    }
}

pub type CliResult<T> = Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;
    use stockroom_core::ValidationError;

    #[test]
    fn test_core_errors_keep_their_code_and_message() {
        let err: CliError = CoreError::from(ValidationError::MustBePositive {
            field: "cost".to_string(),
        })
        .into();
        assert_eq!(err.code(), "INVALID_INPUT");
        assert_eq!(err.to_string(), "Invalid input: cost must be positive");
    }

    #[test]
    fn test_unknown_category() {
        let err = CliError::UnknownCategory("Comics".to_string());
        assert_eq!(err.code(), "NOT_FOUND");
        assert_eq!(err.to_string(), "Unknown category \"Comics\"");
    }
}
