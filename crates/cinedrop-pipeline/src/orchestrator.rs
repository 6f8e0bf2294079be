//! Pipeline orchestrator composing metadata, source discovery, and resolution.
//!
//! # Design
//! - Every operation runs in its own correlation scope with a fresh request id.
//! - Collaborator errors pass through untouched; the orchestrator never renames them.
//! - Spawned resolutions report completion over a oneshot channel and stop on request.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use cinedrop_config::ResolutionSettings;
use cinedrop_core::{
    CancelHandle, CancelSignal, MetadataProvider, Movie, MovieId, PipelineError,
    PipelineResult, StreamLink, SubmissionId, TorrentCandidate, cancel_pair,
};
use cinedrop_debrid::{AwaitOutcome, ResolutionEngine};
use cinedrop_sources::SourceAggregator;
use cinedrop_telemetry::{new_request_id, with_request_context};
use tokio::sync::oneshot;
use tracing::{Instrument, info, info_span, warn};

/// Service label used when a spawned resolution task vanishes without reporting.
const RESOLUTION_TASK: &str = "resolution_task";

/// Poll cadence applied to every resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    /// Pause between consecutive status polls.
    pub poll_interval: Duration,
    /// Total budget before a resolution times out.
    pub max_wait: Duration,
}

impl From<&ResolutionSettings> for PollPolicy {
    fn from(settings: &ResolutionSettings) -> Self {
        Self {
            poll_interval: settings.poll_interval(),
            max_wait: settings.max_wait(),
        }
    }
}

/// Candidates discovered for one movie.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidateListing {
    /// Deduplicated candidates in first-seen order.
    pub candidates: Vec<TorrentCandidate>,
    /// Whether some backend could not answer.
    pub degraded: bool,
    /// Identifiers of the backends that failed.
    pub unreachable: Vec<String>,
}

/// Result of a resolution that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveOutcome {
    /// Direct links in the order the debrid service returned them.
    Links(Vec<StreamLink>),
    /// The caller cancelled; the remote submission is left in place.
    Cancelled {
        /// Remote job that was being awaited.
        submission_id: SubmissionId,
    },
}

/// Public entry point of the resolution pipeline.
#[derive(Clone)]
pub struct Pipeline {
    metadata: Arc<dyn MetadataProvider>,
    sources: SourceAggregator,
    engine: ResolutionEngine,
    policy: PollPolicy,
}

impl Pipeline {
    /// Assemble a pipeline from already-built collaborators.
    #[must_use]
    pub fn new(
        metadata: Arc<dyn MetadataProvider>,
        sources: SourceAggregator,
        engine: ResolutionEngine,
        policy: PollPolicy,
    ) -> Self {
        Self {
            metadata,
            sources,
            engine,
            policy,
        }
    }

    /// Poll cadence used by [`Pipeline::resolve`].
    #[must_use]
    pub const fn policy(&self) -> PollPolicy {
        self.policy
    }

    /// Identifiers of the configured indexer backends.
    #[must_use]
    pub fn backend_ids(&self) -> Vec<&str> {
        self.sources.backend_ids()
    }

    /// Search movies by title, keeping the provider's relevance order.
    ///
    /// # Errors
    ///
    /// Returns the metadata provider's error unchanged, including `InvalidInput` for an
    /// empty query.
    pub async fn search_movies(&self, query: &str) -> PipelineResult<Vec<Movie>> {
        correlated("search_movies", async {
            let movies = self.metadata.search(query).await?;
            info!(results = movies.len(), "movie search completed");
            Ok(movies)
        })
        .await
    }

    /// Fetch one movie with its genre list.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown id and any other provider error unchanged.
    pub async fn movie_detail(&self, id: MovieId) -> PipelineResult<Movie> {
        correlated("movie_detail", async {
            let movie = self.metadata.detail(id).await?;
            info!(movie_id = %movie.id, genres = movie.genres.len(), "movie detail loaded");
            Ok(movie)
        })
        .await
    }

    /// Discover torrent candidates for `movie` by its title.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` when the movie has a blank title. Backend failures only
    /// mark the listing as degraded.
    pub async fn list_candidates(&self, movie: &Movie) -> PipelineResult<CandidateListing> {
        correlated("list_candidates", async {
            let outcome = self.sources.find_candidates(&movie.title).await?;
            let listing = CandidateListing {
                degraded: outcome.degraded(),
                unreachable: outcome.failed_backends,
                candidates: outcome.candidates,
            };
            if listing.degraded {
                warn!(
                    movie_id = %movie.id,
                    unreachable = ?listing.unreachable,
                    "candidate listing degraded"
                );
            }
            info!(
                movie_id = %movie.id,
                candidates = listing.candidates.len(),
                "candidates listed"
            );
            Ok(listing)
        })
        .await
    }

    /// Submit `candidate` and wait until its links are ready or `cancel` fires.
    ///
    /// # Errors
    ///
    /// - `InvalidInput` when the candidate's magnet has no usable info-hash.
    /// - `Resolution` when the remote job fails or finishes without links.
    /// - `Timeout` when the poll budget or transport retries run out.
    /// - Any other debrid service error unchanged.
    pub async fn resolve(
        &self,
        candidate: &TorrentCandidate,
        cancel: CancelSignal,
    ) -> PipelineResult<ResolveOutcome> {
        correlated("resolve", async {
            info!(
                info_hash = %candidate.info_hash(),
                quality = %candidate.quality(),
                "resolving candidate"
            );
            let submission_id = self.engine.submit(candidate.magnet_uri()).await?;
            let outcome = self
                .engine
                .await_ready(
                    &submission_id,
                    self.policy.poll_interval,
                    self.policy.max_wait,
                    cancel,
                )
                .await?;
            Ok(match outcome {
                AwaitOutcome::Ready(links) => ResolveOutcome::Links(links),
                AwaitOutcome::Cancelled => {
                    info!(%submission_id, "resolution cancelled");
                    ResolveOutcome::Cancelled { submission_id }
                }
            })
        })
        .await
    }

    /// Run [`Pipeline::resolve`] on a background task.
    ///
    /// Dropping the returned handle stops the task at its next await point.
    #[must_use]
    pub fn spawn_resolve(&self, candidate: TorrentCandidate) -> ResolutionHandle {
        let (cancel, signal) = cancel_pair();
        let (mut done_tx, done_rx) = oneshot::channel();
        let pipeline = self.clone();
        tokio::spawn(async move {
            tokio::select! {
                result = pipeline.resolve(&candidate, signal) => {
                    if done_tx.send(result).is_err() {
                        warn!("resolution handle dropped before completion");
                    }
                }
                () = done_tx.closed() => {
                    warn!("resolution handle dropped; abandoning the job");
                }
            }
        });
        ResolutionHandle {
            cancel,
            done: done_rx,
        }
    }

    /// Confirm the debrid credential is accepted, returning the account label.
    ///
    /// # Errors
    ///
    /// Returns the debrid service's error unchanged.
    pub async fn verify_credential(&self) -> PipelineResult<String> {
        correlated("verify_credential", async {
            let account = self.engine.verify_credential().await?;
            info!(%account, "debrid credential accepted");
            Ok(account)
        })
        .await
    }
}

/// Control handle for a resolution started with [`Pipeline::spawn_resolve`].
#[derive(Debug)]
pub struct ResolutionHandle {
    cancel: CancelHandle,
    done: oneshot::Receiver<PipelineResult<ResolveOutcome>>,
}

impl ResolutionHandle {
    /// Ask the task to stop polling. Takes effect at the next poll boundary.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Wait for the task to finish.
    ///
    /// # Errors
    ///
    /// Returns the resolution's own error, or `Transport` when the task ended without
    /// reporting a result.
    pub async fn join(self) -> PipelineResult<ResolveOutcome> {
        self.done
            .await
            .map_err(|err| PipelineError::transport(RESOLUTION_TASK, err))?
    }
}

async fn correlated<T, Fut>(operation: &'static str, fut: Fut) -> T
where
    Fut: Future<Output = T>,
{
    let request_id = new_request_id();
    let span = info_span!("pipeline", operation, request_id = %request_id);
    with_request_context(request_id, operation, fut.instrument(span)).await
}
