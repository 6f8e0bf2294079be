//! # Design
//!
//! - Errors raised while wiring the pipeline from configuration.
//! - Pipeline operations themselves return `PipelineError` unchanged.
//! - Keep messages constant while carrying the failing operation as a field.

use thiserror::Error;

/// Result alias for pipeline construction.
pub type BootstrapResult<T> = Result<T, BootstrapError>;

/// Failure while building a [`crate::Pipeline`] from configuration.
#[derive(Debug, Error)]
pub enum BootstrapError {
    /// Configuration was missing a value or failed validation.
    #[error("configuration operation failed")]
    Config {
        /// Operation identifier.
        operation: &'static str,
        /// Source configuration error.
        source: cinedrop_config::ConfigError,
    },
    /// The shared HTTP client could not be constructed.
    #[error("http client construction failed")]
    HttpClient {
        /// Source HTTP client error.
        source: reqwest::Error,
    },
}

impl BootstrapError {
    pub(crate) const fn config(
        operation: &'static str,
        source: cinedrop_config::ConfigError,
    ) -> Self {
        Self::Config { operation, source }
    }
}
