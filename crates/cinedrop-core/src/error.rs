//! Error taxonomy shared by every pipeline component.
//!
//! # Design
//! - One variant per caller decision so errors pass through the orchestrator untouched.
//! - Carry operational context in fields; keep the rendered message short.
//! - Poll-transport retries are the only place that converts one kind into another
//!   (exhausted retries become `Timeout`).

use std::error::Error;
use std::fmt::{self, Display, Formatter};
use std::time::Duration;

use thiserror::Error;

/// Primary error type for pipeline operations.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Caller-supplied argument was malformed or empty; fix the call, do not retry.
    #[error("invalid input for '{field}': {reason}")]
    InvalidInput {
        /// Argument or field that failed validation.
        field: &'static str,
        /// Machine-readable reason for the failure.
        reason: &'static str,
    },
    /// Requested entity does not exist upstream.
    #[error("{entity} '{id}' not found")]
    NotFound {
        /// Kind of entity that was requested.
        entity: &'static str,
        /// Identifier supplied by the caller.
        id: String,
    },
    /// Remote service was reachable but answered with a failure.
    #[error("{service} returned status {status}: {message}")]
    Upstream {
        /// Remote service identifier.
        service: &'static str,
        /// HTTP status reported by the remote service.
        status: u16,
        /// Message extracted from the response body.
        message: String,
    },
    /// Remote service could not be reached or its payload could not be read.
    #[error("{service} request failed")]
    Transport {
        /// Remote service identifier.
        service: &'static str,
        /// Underlying transport failure.
        #[source]
        source: Box<dyn Error + Send + Sync>,
    },
    /// Poll budget or transport retries were exhausted.
    #[error("{operation} timed out after {waited:?}")]
    Timeout {
        /// Operation that ran out of budget.
        operation: &'static str,
        /// Time spent before giving up.
        waited: Duration,
    },
    /// The remote job itself reported a terminal failure.
    #[error("remote job {submission_id} failed: {cause}")]
    Resolution {
        /// Submission identifier assigned by the debrid service.
        submission_id: String,
        /// Failure reported by the remote service.
        cause: String,
    },
}

/// Flat classification of [`PipelineError`] for callers that only branch on kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// See [`PipelineError::InvalidInput`].
    InvalidInput,
    /// See [`PipelineError::NotFound`].
    NotFound,
    /// See [`PipelineError::Upstream`].
    Upstream,
    /// See [`PipelineError::Transport`].
    Transport,
    /// See [`PipelineError::Timeout`].
    Timeout,
    /// See [`PipelineError::Resolution`].
    Resolution,
}

impl Display for ErrorKind {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::InvalidInput => "invalid_input",
            Self::NotFound => "not_found",
            Self::Upstream => "upstream",
            Self::Transport => "transport",
            Self::Timeout => "timeout",
            Self::Resolution => "resolution",
        };
        formatter.write_str(label)
    }
}

impl PipelineError {
    /// Build an [`PipelineError::InvalidInput`] error.
    #[must_use]
    pub const fn invalid(field: &'static str, reason: &'static str) -> Self {
        Self::InvalidInput { field, reason }
    }

    /// Build a [`PipelineError::Transport`] error from any boxed-compatible source.
    pub fn transport(
        service: &'static str,
        source: impl Into<Box<dyn Error + Send + Sync>>,
    ) -> Self {
        Self::Transport {
            service,
            source: source.into(),
        }
    }

    /// Classify the error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidInput { .. } => ErrorKind::InvalidInput,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Upstream { .. } => ErrorKind::Upstream,
            Self::Transport { .. } => ErrorKind::Transport,
            Self::Timeout { .. } => ErrorKind::Timeout,
            Self::Resolution { .. } => ErrorKind::Resolution,
        }
    }

    /// Whether a caller may reasonably retry the same call.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Upstream { .. } | Self::Transport { .. } | Self::Timeout { .. }
        )
    }

    /// Whether the failure is a transient transport-level condition: a network
    /// failure, a rate limit, or a server-side error.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        match self {
            Self::Transport { .. } => true,
            Self::Upstream { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

/// Convenience alias for pipeline results.
pub type PipelineResult<T> = Result<T, PipelineError>;
