//! Engine-agnostic domain types, errors, and collaborator traits for the resolution pipeline.
//!
//! Layout: `model.rs` (records), `magnet.rs` (info-hash parsing and magnet synthesis),
//! `quality.rs` (precedence table), `error.rs` (taxonomy), `service.rs` (adapter traits),
//! `cancel.rs` (cooperative cancellation).

pub mod cancel;
pub mod error;
pub mod magnet;
pub mod model;
pub mod quality;
pub mod service;

pub use cancel::{CancelHandle, CancelSignal, cancel_pair};
pub use error::{ErrorKind, PipelineError, PipelineResult};
pub use magnet::{InfoHash, MAGNET_PREFIX, build_magnet, extract_info_hash};
pub use model::{
    Genre, IndexerRecord, Movie, MovieId, RecordLocator, RemoteJobStatus, RemotePhase,
    StreamLink, SubmissionId, TorrentCandidate,
};
pub use quality::Quality;
pub use service::{DebridService, MetadataProvider, TorrentIndexer};
