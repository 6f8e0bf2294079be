//! Collaborator traits implemented by the remote-service adapters.

use async_trait::async_trait;

use crate::error::PipelineResult;
use crate::model::{IndexerRecord, Movie, MovieId, RemoteJobStatus, SubmissionId};

/// Movie metadata source (title search and per-title detail).
#[async_trait]
pub trait MetadataProvider: Send + Sync {
    /// Search titles; results keep the provider's relevance order.
    async fn search(&self, query: &str) -> PipelineResult<Vec<Movie>>;

    /// Fetch one movie including its genre list.
    async fn detail(&self, id: MovieId) -> PipelineResult<Movie>;
}

/// Torrent-indexing backend queried by the source aggregator.
#[async_trait]
pub trait TorrentIndexer: Send + Sync {
    /// Stable identifier recorded on produced candidates and in degradation reports.
    fn id(&self) -> &str;

    /// Search the backend for a title.
    async fn search(&self, query: &str) -> PipelineResult<Vec<IndexerRecord>>;
}

/// Remote unrestriction service that turns magnets into direct links.
#[async_trait]
pub trait DebridService: Send + Sync {
    /// Submit a magnet URI, returning the remote job identifier.
    async fn submit_magnet(&self, magnet_uri: &str) -> PipelineResult<SubmissionId>;

    /// Read the current status of a submitted job. Must be an idempotent read.
    async fn job_status(&self, id: &SubmissionId) -> PipelineResult<RemoteJobStatus>;

    /// Select every file of a job that is waiting for file selection.
    ///
    /// Services that start jobs without a selection step keep the default no-op.
    async fn select_files(&self, id: &SubmissionId) -> PipelineResult<()> {
        let _ = id;
        Ok(())
    }

    /// Confirm the configured credential is accepted, returning the account label.
    async fn verify_credential(&self) -> PipelineResult<String>;
}
