//! Telemetry primitives shared across the Cinedrop workspace.
//!
//! This crate centralises logging setup and request correlation so every pipeline
//! component tags its logs the same way.

pub mod context;
pub mod error;
pub mod init;

pub use context::{
    GlobalContextGuard, current_operation, current_request_id, new_request_id,
    with_request_context,
};
pub use error::{Result, TelemetryError};
pub use init::{DEFAULT_LOG_LEVEL, LogFormat, LoggingConfig, build_sha, init_logging};
