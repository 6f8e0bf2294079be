//! Core domain types shared across the pipeline crates.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{PipelineError, PipelineResult};
use crate::magnet::{InfoHash, extract_info_hash};
use crate::quality::Quality;

/// Provider-assigned movie identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MovieId(pub u64);

impl Display for MovieId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

impl FromStr for MovieId {
    type Err = PipelineError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        value
            .trim()
            .parse::<u64>()
            .map(Self)
            .map_err(|_| PipelineError::invalid("movie_id", "not_numeric"))
    }
}

/// Genre tag attached to a movie.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    /// Provider genre identifier.
    pub id: u32,
    /// Human-readable genre name; empty when the provider did not name it.
    pub name: String,
}

/// Normalised movie record produced by the metadata adapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movie {
    /// Stable provider identifier.
    pub id: MovieId,
    /// Display title.
    pub title: String,
    /// Theatrical release date when known.
    pub release_date: Option<NaiveDate>,
    /// Free-text synopsis.
    pub overview: String,
    /// Opaque artwork path relative to the provider's image CDN.
    pub poster_ref: Option<String>,
    /// Ordered genre list.
    pub genres: Vec<Genre>,
}

impl Movie {
    /// Release year, if the release date is known.
    #[must_use]
    pub fn release_year(&self) -> Option<i32> {
        self.release_date.map(|date| date.year())
    }

    /// Absolute poster URL for the given image CDN base and size bucket (e.g. `w500`).
    #[must_use]
    pub fn poster_url(&self, image_base: &str, size: &str) -> Option<String> {
        self.poster_ref.as_ref().map(|path| {
            let base = image_base.trim_end_matches('/');
            let path = path.trim_start_matches('/');
            format!("{base}/{size}/{path}")
        })
    }
}

/// A discovered torrent source for a title, prior to submission.
///
/// Constructed only through [`TorrentCandidate::new`], which guarantees the magnet URI
/// carries a valid info-hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TorrentCandidate {
    title: String,
    magnet_uri: String,
    source_provider_id: Option<String>,
    info_hash: InfoHash,
    quality: Quality,
}

impl TorrentCandidate {
    /// Build a candidate, validating the magnet URI.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::InvalidInput`] when the magnet URI lacks a usable
    /// `xt=urn:btih:` parameter.
    pub fn new(
        title: impl Into<String>,
        magnet_uri: impl Into<String>,
        quality: Quality,
        source_provider_id: Option<String>,
    ) -> PipelineResult<Self> {
        let magnet_uri = magnet_uri.into();
        let info_hash = extract_info_hash(&magnet_uri)?;
        Ok(Self {
            title: title.into(),
            magnet_uri,
            source_provider_id,
            info_hash,
            quality,
        })
    }

    /// Display label combining source title and quality tag.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Magnet URI submitted to the debrid service.
    #[must_use]
    pub fn magnet_uri(&self) -> &str {
        &self.magnet_uri
    }

    /// Identifier of the indexer that produced the candidate.
    #[must_use]
    pub fn source_provider_id(&self) -> Option<&str> {
        self.source_provider_id.as_deref()
    }

    /// Info-hash extracted from the magnet URI; the deduplication key.
    #[must_use]
    pub const fn info_hash(&self) -> &InfoHash {
        &self.info_hash
    }

    /// Quality tier used for tie-breaking.
    #[must_use]
    pub const fn quality(&self) -> Quality {
        self.quality
    }
}

/// Direct playable link produced by a finished debrid job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamLink {
    /// Absolute URL of the stream.
    pub url: String,
    /// Host portion of the URL's network location, used for display.
    pub host_label: String,
}

impl StreamLink {
    /// Parse a URL returned by the debrid service. The URL text is kept as returned.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::InvalidInput`] when the URL cannot be parsed or has no host.
    pub fn parse(raw: &str) -> PipelineResult<Self> {
        let trimmed = raw.trim();
        let url = Url::parse(trimmed).map_err(|_| PipelineError::invalid("url", "malformed"))?;
        let host = url
            .host_str()
            .ok_or_else(|| PipelineError::invalid("url", "missing_host"))?;
        Ok(Self {
            host_label: host.to_string(),
            url: trimmed.to_string(),
        })
    }
}

/// Native record returned by a torrent-indexing backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexerRecord {
    /// Release or movie title as reported by the backend.
    pub source_title: String,
    /// Raw quality label when the backend reports one.
    pub quality: Option<String>,
    /// How the torrent is identified.
    pub locator: RecordLocator,
}

/// Torrent identity as reported by a backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordLocator {
    /// Bare info-hash; the aggregator synthesises a magnet URI.
    InfoHash(String),
    /// Ready-to-use magnet URI.
    Magnet(String),
}

/// Identifier assigned by the debrid service when a magnet is accepted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubmissionId(String);

impl SubmissionId {
    /// Wrap a remote identifier.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Borrow the remote identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for SubmissionId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}

/// Coarse job phase reported by a single status poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemotePhase {
    /// Accepted but not yet started (queued, converting the magnet).
    Pending,
    /// Waiting for the client to choose which files to fetch.
    AwaitingFileSelection,
    /// Downloading, unpacking, or uploading.
    Processing,
    /// Finished; links are available.
    Completed,
    /// Permanently failed.
    Failed,
}

/// Snapshot returned by one status poll.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteJobStatus {
    /// Job phase.
    pub phase: RemotePhase,
    /// Direct-download URLs; populated once completed.
    #[serde(default)]
    pub links: Vec<String>,
    /// Failure description for failed jobs.
    #[serde(default)]
    pub error: Option<String>,
    /// Progress percentage reported by the remote, when available.
    #[serde(default)]
    pub progress: Option<f64>,
}

impl RemoteJobStatus {
    /// Status with only a phase set.
    #[must_use]
    pub const fn of(phase: RemotePhase) -> Self {
        Self {
            phase,
            links: Vec::new(),
            error: None,
            progress: None,
        }
    }

    /// Completed status carrying links.
    #[must_use]
    pub fn completed<I, S>(links: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            phase: RemotePhase::Completed,
            links: links.into_iter().map(Into::into).collect(),
            error: None,
            progress: Some(100.0),
        }
    }

    /// Failed status with a cause.
    #[must_use]
    pub fn failed(cause: impl Into<String>) -> Self {
        Self {
            phase: RemotePhase::Failed,
            links: Vec::new(),
            error: Some(cause.into()),
            progress: None,
        }
    }
}
