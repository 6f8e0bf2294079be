#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]

//! Environment and file driven configuration for the Cinedrop pipeline.
//!
//! Layout: `defaults.rs` (endpoints, timings, variable names), `model.rs` (typed
//! sections), `loader.rs` (layered loading), `validate.rs` (post-load checks).

pub mod defaults;
pub mod error;
pub mod loader;
pub mod model;
pub mod validate;

pub use error::{ConfigError, ConfigResult};
pub use loader::{from_yaml_file, from_yaml_str, load, load_with};
pub use model::{
    DebridSettings, HttpSettings, IndexerKind, IndexerSettings, LoggingSettings, PipelineConfig,
    ResolutionSettings, Secret, TmdbSettings,
};
pub use validate::validate;
