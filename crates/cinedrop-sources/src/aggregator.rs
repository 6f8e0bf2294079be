//! Concurrent fan-out over the configured indexers.
//!
//! # Design
//! - Every backend is queried at once; results are merged only after all of them settle.
//! - A failing backend never fails the search; it is reported in the outcome instead.

use std::sync::Arc;

use cinedrop_core::{PipelineError, PipelineResult, TorrentCandidate, TorrentIndexer};
use futures_util::future::join_all;
use tracing::{debug, info, instrument, warn};

use crate::normalize::{candidate_from_record, dedupe_candidates};

/// Merged result of one aggregated search.
#[derive(Debug, Clone, Default)]
pub struct AggregateOutcome {
    /// Deduplicated candidates in first-seen order.
    pub candidates: Vec<TorrentCandidate>,
    /// Identifiers of backends whose query failed.
    pub failed_backends: Vec<String>,
}

impl AggregateOutcome {
    /// Whether at least one backend failed.
    #[must_use]
    pub fn degraded(&self) -> bool {
        !self.failed_backends.is_empty()
    }

    /// Number of backend failures, surfaced to callers as warnings.
    #[must_use]
    pub fn warning_count(&self) -> usize {
        self.failed_backends.len()
    }
}

/// Fans a title query out to every backend and normalises the answers.
#[derive(Clone)]
pub struct SourceAggregator {
    backends: Vec<Arc<dyn TorrentIndexer>>,
    trackers: Vec<String>,
}

impl SourceAggregator {
    /// Aggregate over `backends`, synthesising magnets with `trackers`.
    #[must_use]
    pub fn new(backends: Vec<Arc<dyn TorrentIndexer>>, trackers: Vec<String>) -> Self {
        Self { backends, trackers }
    }

    /// Identifiers of the configured backends, in query order.
    #[must_use]
    pub fn backend_ids(&self) -> Vec<&str> {
        self.backends.iter().map(|backend| backend.id()).collect()
    }

    /// Search every backend for `title_query`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` when the query is empty or blank. Backend failures are
    /// reported through [`AggregateOutcome::failed_backends`].
    #[instrument(
        name = "sources.find_candidates",
        skip(self),
        fields(backends = self.backends.len())
    )]
    pub async fn find_candidates(&self, title_query: &str) -> PipelineResult<AggregateOutcome> {
        let query = title_query.trim();
        if query.is_empty() {
            return Err(PipelineError::invalid("title_query", "empty"));
        }

        let settled = join_all(self.backends.iter().map(|backend| async move {
            (backend.id().to_string(), backend.search(query).await)
        }))
        .await;

        let mut outcome = AggregateOutcome::default();
        let mut mapped = Vec::new();
        for (backend_id, result) in settled {
            match result {
                Ok(records) => {
                    debug!(backend = %backend_id, records = records.len(), "backend answered");
                    for record in records {
                        let source_title = record.source_title.clone();
                        match candidate_from_record(record, &backend_id, &self.trackers) {
                            Ok(candidate) => mapped.push(candidate),
                            Err(err) => debug!(
                                backend = %backend_id,
                                title = %source_title,
                                error = %err,
                                "skipping unusable record"
                            ),
                        }
                    }
                }
                Err(err) => {
                    warn!(
                        backend = %backend_id,
                        error = %err,
                        kind = %err.kind(),
                        "indexer backend failed; continuing with remaining sources"
                    );
                    outcome.failed_backends.push(backend_id);
                }
            }
        }

        outcome.candidates = dedupe_candidates(mapped);
        info!(
            candidates = outcome.candidates.len(),
            failed = outcome.warning_count(),
            "candidate search settled"
        );
        Ok(outcome)
    }
}
