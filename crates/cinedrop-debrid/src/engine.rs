//! Submission and readiness polling against a debrid service.
//!
//! # Design
//! - Polls are strictly sequential; the loop sleeps between them and observes
//!   cancellation only while sleeping, so an in-flight poll always completes.
//! - Transient poll failures (transport, 429, 5xx) are retried with linear backoff up to
//!   a fixed count; exhausting the retries is a timeout, not a resolution failure.
//!   A failed file-selection request counts as a failed poll and is sent again.
//! - Cancellation leaves the remote submission in place.

use std::sync::Arc;
use std::time::Duration;

use cinedrop_core::{
    CancelSignal, DebridService, PipelineError, PipelineResult, RemotePhase, StreamLink,
    SubmissionId, extract_info_hash,
};
use tokio::time::{Instant, sleep};
use tracing::{debug, info, instrument, warn};

use crate::job::{JobState, ResolutionJob};

const AWAIT_OPERATION: &str = "await_ready";

/// Result of waiting for a submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AwaitOutcome {
    /// The remote finished; links keep the remote order.
    Ready(Vec<StreamLink>),
    /// The caller cancelled before the remote finished.
    Cancelled,
}

/// Drives submissions through a [`DebridService`].
#[derive(Clone)]
pub struct ResolutionEngine {
    service: Arc<dyn DebridService>,
    transport_retries: u32,
    retry_backoff: Duration,
}

impl ResolutionEngine {
    /// Build an engine tolerating `transport_retries` consecutive transient poll failures,
    /// waiting `retry_backoff × attempt` before each retry.
    #[must_use]
    pub fn new(
        service: Arc<dyn DebridService>,
        transport_retries: u32,
        retry_backoff: Duration,
    ) -> Self {
        Self {
            service,
            transport_retries,
            retry_backoff,
        }
    }

    /// Submit a magnet URI.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` when the URI has no usable `xt=urn:btih:` hash (checked
    /// before any network call) and the service's error when it rejects the magnet.
    #[instrument(name = "debrid.submit", skip_all)]
    pub async fn submit(&self, magnet_uri: &str) -> PipelineResult<SubmissionId> {
        let info_hash = extract_info_hash(magnet_uri)?;
        let submission_id = self.service.submit_magnet(magnet_uri.trim()).await?;
        info!(%info_hash, %submission_id, "magnet submitted");
        Ok(submission_id)
    }

    /// Poll `submission_id` until it is ready, fails, exhausts `max_wait`, or `cancel`
    /// fires.
    ///
    /// # Errors
    ///
    /// - `Resolution` when the remote reports a failed job or completes without links.
    /// - `Timeout` when `max_wait` elapses or transient poll failures exceed the retry
    ///   budget.
    /// - Any other service error unchanged.
    #[instrument(
        name = "debrid.await_ready",
        skip(self, submission_id, cancel),
        fields(submission_id = %submission_id)
    )]
    pub async fn await_ready(
        &self,
        submission_id: &SubmissionId,
        poll_interval: Duration,
        max_wait: Duration,
        mut cancel: CancelSignal,
    ) -> PipelineResult<AwaitOutcome> {
        let started = Instant::now();
        let mut job = ResolutionJob::new(submission_id.clone());
        let mut consecutive_failures: u32 = 0;
        let mut selection_requested = false;

        loop {
            if cancel.is_cancelled() {
                return Ok(cancelled(&job));
            }

            let polled = match self.service.job_status(submission_id).await {
                Ok(status)
                    if status.phase == RemotePhase::AwaitingFileSelection
                        && !selection_requested =>
                {
                    match self.service.select_files(submission_id).await {
                        Ok(()) => {
                            selection_requested = true;
                            debug!("requested selection of all files");
                            Ok(status)
                        }
                        Err(err) => Err(err),
                    }
                }
                other => other,
            };

            let pause = match polled {
                Ok(status) => {
                    consecutive_failures = 0;
                    match job.observe(&status) {
                        JobState::Ready => {
                            info!(polls = job.polls(), links = job.links().len(), "job ready");
                            return Ok(AwaitOutcome::Ready(job.into_links()));
                        }
                        JobState::Failed => {
                            let cause = job.last_error().unwrap_or_default().to_string();
                            warn!(polls = job.polls(), %cause, "remote job failed");
                            return Err(PipelineError::Resolution {
                                submission_id: submission_id.to_string(),
                                cause,
                            });
                        }
                        JobState::Submitted | JobState::Processing => {
                            debug!(
                                polls = job.polls(),
                                phase = ?status.phase,
                                progress = ?status.progress,
                                "job not ready"
                            );
                            poll_interval
                        }
                    }
                }
                Err(err) if err.is_transient() => {
                    consecutive_failures += 1;
                    if consecutive_failures > self.transport_retries {
                        job.fail("transport retries exhausted");
                        warn!(
                            attempts = consecutive_failures,
                            error = %err,
                            "giving up after repeated poll failures"
                        );
                        return Err(PipelineError::Timeout {
                            operation: AWAIT_OPERATION,
                            waited: started.elapsed(),
                        });
                    }
                    warn!(
                        attempt = consecutive_failures,
                        error = %err,
                        "transient poll failure; retrying"
                    );
                    self.retry_backoff * consecutive_failures
                }
                Err(err) => return Err(err),
            };

            let elapsed = started.elapsed();
            if elapsed >= max_wait {
                job.fail("poll budget exhausted");
                warn!(polls = job.polls(), waited = ?elapsed, "job not ready within budget");
                return Err(PipelineError::Timeout {
                    operation: AWAIT_OPERATION,
                    waited: elapsed,
                });
            }

            tokio::select! {
                biased;
                () = cancel.cancelled() => return Ok(cancelled(&job)),
                () = sleep(pause.min(max_wait - elapsed)) => {}
            }
        }
    }

    /// Confirm the service accepts the configured credential.
    ///
    /// # Errors
    ///
    /// Propagates the service's error.
    pub async fn verify_credential(&self) -> PipelineResult<String> {
        self.service.verify_credential().await
    }
}

fn cancelled(job: &ResolutionJob) -> AwaitOutcome {
    info!(
        submission_id = %job.submission_id(),
        polls = job.polls(),
        "resolution cancelled; remote submission left in place"
    );
    AwaitOutcome::Cancelled
}
