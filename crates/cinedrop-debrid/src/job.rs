//! Local view of one remote debrid job.
//!
//! # Design
//! - The job only moves forward: Submitted, then Processing, then Ready or Failed.
//! - Terminal states absorb every later observation.
//! - `links` is non-empty exactly when the job is Ready.

use cinedrop_core::{RemoteJobStatus, RemotePhase, StreamLink, SubmissionId};
use serde::Serialize;
use tracing::warn;

/// Cause recorded when the remote reports completion without any link.
pub const NO_LINKS_CAUSE: &str = "no links";
const REMOTE_FAILURE_CAUSE: &str = "remote job failed";

/// Lifecycle state of a resolution job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JobState {
    /// Magnet accepted; no poll answered yet.
    Submitted,
    /// Remote is converting, downloading, or uploading.
    Processing,
    /// Links are available.
    Ready,
    /// Permanently failed.
    Failed,
}

impl JobState {
    /// Whether no further transition is possible.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Ready | Self::Failed)
    }
}

/// Tracks one submission through its lifecycle.
#[derive(Debug, Clone, Serialize)]
pub struct ResolutionJob {
    submission_id: SubmissionId,
    state: JobState,
    links: Vec<StreamLink>,
    last_error: Option<String>,
    polls: u32,
}

impl ResolutionJob {
    /// Start tracking a freshly accepted submission.
    #[must_use]
    pub const fn new(submission_id: SubmissionId) -> Self {
        Self {
            submission_id,
            state: JobState::Submitted,
            links: Vec::new(),
            last_error: None,
            polls: 0,
        }
    }

    /// Remote identifier.
    #[must_use]
    pub const fn submission_id(&self) -> &SubmissionId {
        &self.submission_id
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> JobState {
        self.state
    }

    /// Links extracted once Ready; empty otherwise.
    #[must_use]
    pub fn links(&self) -> &[StreamLink] {
        &self.links
    }

    /// Failure cause; set only in Failed.
    #[must_use]
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Number of status polls observed.
    #[must_use]
    pub const fn polls(&self) -> u32 {
        self.polls
    }

    /// Consume the job, yielding its links.
    #[must_use]
    pub fn into_links(self) -> Vec<StreamLink> {
        self.links
    }

    /// Fold one poll answer into the job and return the resulting state.
    pub fn observe(&mut self, status: &RemoteJobStatus) -> JobState {
        if self.state.is_terminal() {
            return self.state;
        }
        self.polls += 1;

        match status.phase {
            RemotePhase::Pending | RemotePhase::AwaitingFileSelection | RemotePhase::Processing => {
                self.state = JobState::Processing;
            }
            RemotePhase::Completed => {
                let links: Vec<StreamLink> = status
                    .links
                    .iter()
                    .filter_map(|raw| match StreamLink::parse(raw) {
                        Ok(link) => Some(link),
                        Err(err) => {
                            warn!(
                                submission_id = %self.submission_id,
                                link = %raw,
                                error = %err,
                                "dropping unparseable link"
                            );
                            None
                        }
                    })
                    .collect();
                if links.is_empty() {
                    self.fail(NO_LINKS_CAUSE);
                } else {
                    self.links = links;
                    self.state = JobState::Ready;
                }
            }
            RemotePhase::Failed => {
                let cause = status
                    .error
                    .clone()
                    .filter(|cause| !cause.trim().is_empty())
                    .unwrap_or_else(|| REMOTE_FAILURE_CAUSE.to_string());
                self.fail(cause);
            }
        }
        self.state
    }

    /// Move to Failed with `cause` unless already terminal.
    pub fn fail(&mut self, cause: impl Into<String>) {
        if self.state.is_terminal() {
            return;
        }
        self.state = JobState::Failed;
        self.links.clear();
        self.last_error = Some(cause.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job() -> ResolutionJob {
        ResolutionJob::new(SubmissionId::new("JOB1"))
    }

    #[test]
    fn progresses_to_ready_with_links() {
        let mut job = job();
        assert_eq!(job.state(), JobState::Submitted);
        assert_eq!(
            job.observe(&RemoteJobStatus::of(RemotePhase::Pending)),
            JobState::Processing
        );
        assert_eq!(
            job.observe(&RemoteJobStatus::of(RemotePhase::Processing)),
            JobState::Processing
        );
        let state = job.observe(&RemoteJobStatus::completed([
            "https://cdn1.example.net/d/abc/movie.mkv",
        ]));
        assert_eq!(state, JobState::Ready);
        assert_eq!(job.polls(), 3);
        assert_eq!(job.links()[0].host_label, "cdn1.example.net");
        assert!(job.last_error().is_none());
    }

    #[test]
    fn completed_without_links_fails() {
        let mut job = job();
        let empty: [&str; 0] = [];
        assert_eq!(job.observe(&RemoteJobStatus::completed(empty)), JobState::Failed);
        assert_eq!(job.last_error(), Some(NO_LINKS_CAUSE));
        assert!(job.links().is_empty());

        let mut garbage = ResolutionJob::new(SubmissionId::new("JOB2"));
        assert_eq!(
            garbage.observe(&RemoteJobStatus::completed(["not a url"])),
            JobState::Failed
        );
    }

    #[test]
    fn terminal_states_absorb_later_polls() {
        let mut job = job();
        job.observe(&RemoteJobStatus::failed("magnet_error"));
        assert_eq!(job.last_error(), Some("magnet_error"));
        assert_eq!(
            job.observe(&RemoteJobStatus::completed(["https://a.example/x"])),
            JobState::Failed
        );
        assert_eq!(job.polls(), 1);

        let mut ready = ResolutionJob::new(SubmissionId::new("JOB3"));
        ready.observe(&RemoteJobStatus::completed(["https://a.example/x"]));
        ready.fail("late");
        assert_eq!(ready.state(), JobState::Ready);
        assert_eq!(
            ready.observe(&RemoteJobStatus::of(RemotePhase::Processing)),
            JobState::Ready
        );
    }

    #[test]
    fn failure_without_cause_gets_default() {
        let mut job = job();
        let mut status = RemoteJobStatus::failed("");
        status.error = None;
        job.observe(&status);
        assert_eq!(job.last_error(), Some("remote job failed"));
    }
}
