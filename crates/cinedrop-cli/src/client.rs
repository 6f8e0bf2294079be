//! Shared context, error type, and configuration loading for the CLI.

use std::fmt::{self, Display, Formatter};
use std::path::Path;

use anyhow::anyhow;
use cinedrop_config::defaults::ENV_CONFIG_PATH;
use cinedrop_config::{ConfigError, PipelineConfig, load_with};
use cinedrop_core::{ErrorKind, PipelineError};
use cinedrop_pipeline::{BootstrapError, Pipeline};

/// CLI-level error type to distinguish validation from operational failures.
#[derive(Debug)]
pub(crate) enum CliError {
    Validation(String),
    Failure(anyhow::Error),
}

/// Convenience alias for functions returning a `CliError`.
pub(crate) type CliResult<T> = Result<T, CliError>;

impl CliError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub(crate) fn failure(error: impl Into<anyhow::Error>) -> Self {
        Self::Failure(error.into())
    }

    pub(crate) const fn exit_code(&self) -> i32 {
        match self {
            Self::Validation(_) => 2,
            Self::Failure(_) => 3,
        }
    }

    pub(crate) fn display_message(&self) -> String {
        match self {
            Self::Validation(message) => message.clone(),
            Self::Failure(error) => format!("{error:#}"),
        }
    }
}

impl Display for CliError {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str("cli error")
    }
}

impl std::error::Error for CliError {}

impl From<PipelineError> for CliError {
    fn from(err: PipelineError) -> Self {
        match err.kind() {
            ErrorKind::InvalidInput | ErrorKind::NotFound => Self::validation(err.to_string()),
            ErrorKind::Upstream
            | ErrorKind::Transport
            | ErrorKind::Timeout
            | ErrorKind::Resolution => Self::failure(err),
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::InvalidField { .. } | ConfigError::MissingCredential { .. } => {
                Self::validation(err.to_string())
            }
            ConfigError::Io { .. } | ConfigError::Parse { .. } => {
                Self::failure(anyhow::Error::new(err).context("failed to load configuration"))
            }
        }
    }
}

impl From<BootstrapError> for CliError {
    fn from(err: BootstrapError) -> Self {
        match err {
            BootstrapError::Config { source, .. } => Self::from(source),
            BootstrapError::HttpClient { source } => {
                Self::failure(anyhow!("failed to build HTTP client: {source}"))
            }
        }
    }
}

/// Load configuration from the environment, preferring an explicit file path.
pub(crate) fn load_config(config_path: Option<&Path>) -> CliResult<PipelineConfig> {
    let explicit = config_path.map(|path| path.to_string_lossy().into_owned());
    load_with(|name| {
        if name == ENV_CONFIG_PATH && explicit.is_some() {
            return explicit.clone();
        }
        std::env::var(name).ok()
    })
    .map_err(CliError::from)
}

/// Application context passed to command handlers.
#[derive(Clone)]
pub(crate) struct AppContext {
    pub(crate) pipeline: Pipeline,
    pub(crate) image_base_url: String,
}

impl AppContext {
    pub(crate) fn from_config(config: &PipelineConfig) -> CliResult<Self> {
        Ok(Self {
            pipeline: Pipeline::from_config(config)?,
            image_base_url: config.tmdb.image_base_url.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::time::Duration;

    #[test]
    fn pipeline_errors_map_to_exit_codes() {
        let invalid: CliError = PipelineError::invalid("query", "empty").into();
        assert_eq!(invalid.exit_code(), 2);
        assert_eq!(invalid.display_message(), "invalid input for 'query': empty");

        let missing: CliError = PipelineError::NotFound {
            entity: "movie",
            id: "7".to_string(),
        }
        .into();
        assert_eq!(missing.exit_code(), 2);

        let timeout: CliError = PipelineError::Timeout {
            operation: "await_ready",
            waited: Duration::from_secs(300),
        }
        .into();
        assert_eq!(timeout.exit_code(), 3);
        assert!(timeout.display_message().starts_with("await_ready timed out"));
    }

    #[test]
    fn config_errors_split_validation_from_failure() {
        let missing: CliError = ConfigError::MissingCredential {
            name: "CINEDROP_TMDB_API_KEY",
        }
        .into();
        assert_eq!(missing.exit_code(), 2);
        assert_eq!(
            missing.display_message(),
            "missing credential 'CINEDROP_TMDB_API_KEY'"
        );

        let unreadable: CliError = ConfigError::Io {
            path: "/nonexistent/cinedrop.yaml".into(),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        }
        .into();
        assert_eq!(unreadable.exit_code(), 3);
        assert!(
            unreadable
                .display_message()
                .starts_with("failed to load configuration: failed to read configuration file")
        );
    }

    #[test]
    fn bootstrap_errors_unwrap_config_source() {
        let err: CliError = BootstrapError::Config {
            operation: "debrid.token",
            source: ConfigError::MissingCredential {
                name: "CINEDROP_DEBRID_TOKEN",
            },
        }
        .into();
        assert!(matches!(
            err,
            CliError::Validation(ref message) if message.contains("CINEDROP_DEBRID_TOKEN")
        ));
    }

    #[test]
    fn explicit_config_path_is_loaded() -> anyhow::Result<()> {
        let mut file = tempfile::NamedTempFile::new()?;
        writeln!(file, "resolution:\n  poll_interval_ms: 750\n  max_wait_secs: 30")?;

        let config = load_config(Some(file.path())).map_err(|err| anyhow!(err.display_message()))?;
        assert_eq!(config.resolution.poll_interval_ms, 750);
        assert_eq!(config.resolution.max_wait_secs, 30);
        Ok(())
    }

    #[test]
    fn missing_config_file_is_failure() {
        let err = load_config(Some(Path::new("/nonexistent/cinedrop.yaml")))
            .err()
            .expect("missing file");
        assert_eq!(err.exit_code(), 3);
    }
}
