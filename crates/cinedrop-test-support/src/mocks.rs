//! Scripted collaborators standing in for the remote services.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;
use cinedrop_core::{
    DebridService, IndexerRecord, MetadataProvider, Movie, MovieId, PipelineError,
    PipelineResult, RemoteJobStatus, RemotePhase, SubmissionId, TorrentIndexer,
};

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner)
}

/// Metadata provider answering from a fixed catalogue.
#[derive(Debug, Default)]
pub struct StubMetadata {
    movies: Vec<Movie>,
    searches: AtomicU32,
}

impl StubMetadata {
    /// Serve the given catalogue in order.
    #[must_use]
    pub const fn new(movies: Vec<Movie>) -> Self {
        Self {
            movies,
            searches: AtomicU32::new(0),
        }
    }

    /// Number of `search` calls that reached the stub.
    #[must_use]
    pub fn searches(&self) -> u32 {
        self.searches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MetadataProvider for StubMetadata {
    async fn search(&self, query: &str) -> PipelineResult<Vec<Movie>> {
        if query.trim().is_empty() {
            return Err(PipelineError::invalid("query", "empty"));
        }
        self.searches.fetch_add(1, Ordering::SeqCst);
        let needle = query.trim().to_lowercase();
        Ok(self
            .movies
            .iter()
            .filter(|movie| movie.title.to_lowercase().contains(&needle))
            .cloned()
            .collect())
    }

    async fn detail(&self, id: MovieId) -> PipelineResult<Movie> {
        self.movies
            .iter()
            .find(|movie| movie.id == id)
            .cloned()
            .ok_or_else(|| PipelineError::NotFound {
                entity: "movie",
                id: id.to_string(),
            })
    }
}

/// Indexer returning canned records, or failing every call.
#[derive(Debug)]
pub struct StubIndexer {
    id: String,
    records: Vec<IndexerRecord>,
    failure_status: Option<u16>,
    calls: AtomicU32,
}

impl StubIndexer {
    /// Indexer that returns `records` for every query.
    #[must_use]
    pub fn new(id: impl Into<String>, records: Vec<IndexerRecord>) -> Self {
        Self {
            id: id.into(),
            records,
            failure_status: None,
            calls: AtomicU32::new(0),
        }
    }

    /// Indexer whose every call fails with an upstream error carrying `status`.
    #[must_use]
    pub fn failing(id: impl Into<String>, status: u16) -> Self {
        Self {
            id: id.into(),
            records: Vec::new(),
            failure_status: Some(status),
            calls: AtomicU32::new(0),
        }
    }

    /// Number of searches received.
    #[must_use]
    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TorrentIndexer for StubIndexer {
    fn id(&self) -> &str {
        &self.id
    }

    async fn search(&self, _query: &str) -> PipelineResult<Vec<IndexerRecord>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.failure_status {
            Some(status) => Err(PipelineError::Upstream {
                service: "stub_indexer",
                status,
                message: "scripted failure".to_string(),
            }),
            None => Ok(self.records.clone()),
        }
    }
}

/// One scripted answer to a `job_status` poll.
#[derive(Debug)]
pub enum PollStep {
    /// Return this status.
    Status(RemoteJobStatus),
    /// Fail with a transport error.
    TransportFailure,
    /// Fail with an upstream error carrying this HTTP status.
    UpstreamFailure(u16),
}

/// Debrid service replaying a poll script and counting calls.
///
/// Once the script is exhausted the last returned status repeats, so a script ending in
/// `Processing` models a job that never finishes.
#[derive(Debug)]
pub struct ScriptedDebrid {
    submission_id: String,
    reject_submission: Option<u16>,
    selection_failures: AtomicU32,
    script: Mutex<VecDeque<PollStep>>,
    last_status: Mutex<RemoteJobStatus>,
    submissions: AtomicU32,
    polls: AtomicU32,
    selections: AtomicU32,
}

impl ScriptedDebrid {
    /// Accept submissions under `submission_id` and replay `steps` on successive polls.
    #[must_use]
    pub fn new(submission_id: impl Into<String>, steps: Vec<PollStep>) -> Self {
        Self {
            submission_id: submission_id.into(),
            reject_submission: None,
            selection_failures: AtomicU32::new(0),
            script: Mutex::new(steps.into()),
            last_status: Mutex::new(RemoteJobStatus::of(RemotePhase::Pending)),
            submissions: AtomicU32::new(0),
            polls: AtomicU32::new(0),
            selections: AtomicU32::new(0),
        }
    }

    /// Convenience for scripts made only of statuses.
    #[must_use]
    pub fn with_statuses(
        submission_id: impl Into<String>,
        statuses: impl IntoIterator<Item = RemoteJobStatus>,
    ) -> Self {
        Self::new(
            submission_id,
            statuses.into_iter().map(PollStep::Status).collect(),
        )
    }

    /// Reject every submission with an upstream error carrying `status`.
    #[must_use]
    pub const fn rejecting(mut self, status: u16) -> Self {
        self.reject_submission = Some(status);
        self
    }

    /// Fail the next `times` file-selection requests with a transport error.
    #[must_use]
    pub fn failing_selections(self, times: u32) -> Self {
        self.selection_failures.store(times, Ordering::SeqCst);
        self
    }

    /// Number of `submit_magnet` calls received.
    #[must_use]
    pub fn submissions(&self) -> u32 {
        self.submissions.load(Ordering::SeqCst)
    }

    /// Number of `job_status` calls received.
    #[must_use]
    pub fn polls(&self) -> u32 {
        self.polls.load(Ordering::SeqCst)
    }

    /// Number of `select_files` calls received.
    #[must_use]
    pub fn selections(&self) -> u32 {
        self.selections.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DebridService for ScriptedDebrid {
    async fn submit_magnet(&self, _magnet_uri: &str) -> PipelineResult<SubmissionId> {
        self.submissions.fetch_add(1, Ordering::SeqCst);
        if let Some(status) = self.reject_submission {
            return Err(PipelineError::Upstream {
                service: "scripted_debrid",
                status,
                message: "magnet rejected".to_string(),
            });
        }
        Ok(SubmissionId::new(self.submission_id.clone()))
    }

    async fn job_status(&self, _id: &SubmissionId) -> PipelineResult<RemoteJobStatus> {
        self.polls.fetch_add(1, Ordering::SeqCst);
        let step = lock(&self.script).pop_front();
        match step {
            Some(PollStep::Status(status)) => {
                *lock(&self.last_status) = status.clone();
                Ok(status)
            }
            Some(PollStep::TransportFailure) => Err(PipelineError::transport(
                "scripted_debrid",
                "connection reset by peer",
            )),
            Some(PollStep::UpstreamFailure(status)) => Err(PipelineError::Upstream {
                service: "scripted_debrid",
                status,
                message: "scripted failure".to_string(),
            }),
            None => Ok(lock(&self.last_status).clone()),
        }
    }

    async fn select_files(&self, _id: &SubmissionId) -> PipelineResult<()> {
        self.selections.fetch_add(1, Ordering::SeqCst);
        let remaining = self.selection_failures.load(Ordering::SeqCst);
        if remaining > 0 {
            self.selection_failures.store(remaining - 1, Ordering::SeqCst);
            return Err(PipelineError::transport(
                "scripted_debrid",
                "connection reset by peer",
            ));
        }
        Ok(())
    }

    async fn verify_credential(&self) -> PipelineResult<String> {
        Ok("scripted-user".to_string())
    }
}
