//! Error types for configuration loading.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Primary error type for configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration file could not be read.
    #[error("failed to read configuration file")]
    Io {
        /// Path that could not be read.
        path: PathBuf,
        /// Underlying IO error.
        source: io::Error,
    },
    /// Configuration document could not be parsed.
    #[error("failed to parse configuration document")]
    Parse {
        /// Path of the document, when it came from a file.
        path: Option<PathBuf>,
        /// Underlying YAML error.
        source: serde_yaml::Error,
    },
    /// Field contained an invalid value.
    #[error("invalid configuration field '{section}.{field}': {reason}")]
    InvalidField {
        /// Section that failed validation.
        section: &'static str,
        /// Field that failed validation.
        field: &'static str,
        /// Offending value when available.
        value: Option<String>,
        /// Machine-readable reason for the failure.
        reason: &'static str,
    },
    /// A credential required by an enabled service was not configured.
    #[error("missing credential '{name}'")]
    MissingCredential {
        /// Environment variable that should provide the credential.
        name: &'static str,
    },
}

impl ConfigError {
    pub(crate) fn invalid(
        section: &'static str,
        field: &'static str,
        value: impl Into<String>,
        reason: &'static str,
    ) -> Self {
        Self::InvalidField {
            section,
            field,
            value: Some(value.into()),
            reason,
        }
    }
}

/// Convenience alias for configuration results.
pub type ConfigResult<T> = Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_field_renders_location() {
        let err = ConfigError::invalid("resolution", "poll_interval_ms", "0", "must_be_positive");
        assert_eq!(
            err.to_string(),
            "invalid configuration field 'resolution.poll_interval_ms': must_be_positive"
        );
        let missing = ConfigError::MissingCredential {
            name: "CINEDROP_DEBRID_TOKEN",
        };
        assert_eq!(missing.to_string(), "missing credential 'CINEDROP_DEBRID_TOKEN'");
    }
}
