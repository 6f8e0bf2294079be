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

//! Resolution pipeline entry point: search a movie, list its sources, resolve one to
//! direct links.
//!
//! Layout: `orchestrator.rs` (operations and spawned resolutions), `bootstrap.rs`
//! (adapter wiring from configuration), `error.rs` (construction failures).

pub mod bootstrap;
pub mod error;
pub mod orchestrator;

pub use bootstrap::build_http_client;
pub use error::{BootstrapError, BootstrapResult};
pub use orchestrator::{CandidateListing, Pipeline, PollPolicy, ResolutionHandle, ResolveOutcome};
