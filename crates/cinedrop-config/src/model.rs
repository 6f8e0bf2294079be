//! Typed configuration sections.

use std::fmt::{self, Debug, Formatter};
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::defaults;
use crate::error::{ConfigError, ConfigResult};

/// Opaque credential whose value never appears in `Debug` output.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Secret(String);

impl Secret {
    /// Wrap a credential value.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Reveal the credential for use in an outbound request.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl Debug for Secret {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str("Secret(***)")
    }
}

/// Full pipeline configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Metadata provider settings.
    pub tmdb: TmdbSettings,
    /// Debrid service settings.
    pub debrid: DebridSettings,
    /// Torrent indexer settings.
    pub indexers: IndexerSettings,
    /// Poll loop budget.
    pub resolution: ResolutionSettings,
    /// Shared HTTP client settings.
    pub http: HttpSettings,
    /// Logging settings.
    pub logging: LoggingSettings,
}

impl PipelineConfig {
    /// TMDB API key, required by the metadata adapter.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingCredential`] when no key is configured.
    pub fn tmdb_api_key(&self) -> ConfigResult<&Secret> {
        self.tmdb.api_key.as_ref().ok_or(ConfigError::MissingCredential {
            name: defaults::ENV_TMDB_API_KEY,
        })
    }

    /// Debrid API token, required by the resolution engine and the Real-Debrid indexer.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingCredential`] when no token is configured.
    pub fn debrid_token(&self) -> ConfigResult<&Secret> {
        self.debrid.token.as_ref().ok_or(ConfigError::MissingCredential {
            name: defaults::ENV_DEBRID_TOKEN,
        })
    }
}

/// TMDB settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TmdbSettings {
    /// REST root.
    pub base_url: String,
    /// Image CDN root for poster URLs.
    pub image_base_url: String,
    /// API key.
    pub api_key: Option<Secret>,
}

impl Default for TmdbSettings {
    fn default() -> Self {
        Self {
            base_url: defaults::TMDB_BASE_URL.to_string(),
            image_base_url: defaults::TMDB_IMAGE_BASE_URL.to_string(),
            api_key: None,
        }
    }
}

/// Debrid service settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DebridSettings {
    /// REST root.
    pub base_url: String,
    /// Bearer token.
    pub token: Option<Secret>,
}

impl Default for DebridSettings {
    fn default() -> Self {
        Self {
            base_url: defaults::DEBRID_BASE_URL.to_string(),
            token: None,
        }
    }
}

/// Supported torrent-indexing backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexerKind {
    /// Real-Debrid torrent search.
    RealDebrid,
    /// YTS list API.
    Yts,
}

impl IndexerKind {
    /// Stable identifier recorded on candidates.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::RealDebrid => "real_debrid",
            Self::Yts => "yts",
        }
    }

    /// Whether the backend reports bare info-hashes that need a synthesised magnet.
    #[must_use]
    pub const fn reports_info_hash(self) -> bool {
        matches!(self, Self::Yts)
    }
}

impl FromStr for IndexerKind {
    type Err = ConfigError;

    fn from_str(value: &str) -> ConfigResult<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "real_debrid" | "real-debrid" | "realdebrid" | "rd" => Ok(Self::RealDebrid),
            "yts" => Ok(Self::Yts),
            _ => Err(ConfigError::invalid(
                "indexers",
                "enabled",
                value,
                "unknown_indexer",
            )),
        }
    }
}

/// Indexer settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexerSettings {
    /// Backends queried by the aggregator.
    pub enabled: Vec<IndexerKind>,
    /// YTS REST root.
    pub yts_base_url: String,
    /// Trackers appended to synthesised magnet URIs.
    pub trackers: Vec<String>,
}

impl Default for IndexerSettings {
    fn default() -> Self {
        Self {
            enabled: vec![IndexerKind::RealDebrid, IndexerKind::Yts],
            yts_base_url: defaults::YTS_BASE_URL.to_string(),
            trackers: vec![defaults::DEFAULT_TRACKER.to_string()],
        }
    }
}

/// Poll loop budget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolutionSettings {
    /// Delay between polls in milliseconds.
    pub poll_interval_ms: u64,
    /// Total budget in seconds.
    pub max_wait_secs: u64,
    /// Consecutive poll-transport failures tolerated.
    pub transport_retries: u32,
    /// Linear backoff step between retries in milliseconds.
    pub retry_backoff_ms: u64,
}

impl ResolutionSettings {
    /// Delay between polls.
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Total resolution budget.
    #[must_use]
    pub const fn max_wait(&self) -> Duration {
        Duration::from_secs(self.max_wait_secs)
    }

    /// Backoff step between transport retries.
    #[must_use]
    pub const fn retry_backoff(&self) -> Duration {
        Duration::from_millis(self.retry_backoff_ms)
    }
}

impl Default for ResolutionSettings {
    fn default() -> Self {
        Self {
            poll_interval_ms: defaults::POLL_INTERVAL_MS,
            max_wait_secs: defaults::MAX_WAIT_SECS,
            transport_retries: defaults::TRANSPORT_RETRIES,
            retry_backoff_ms: defaults::RETRY_BACKOFF_MS,
        }
    }
}

/// Shared HTTP client settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpSettings {
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// User agent header.
    pub user_agent: String,
}

impl HttpSettings {
    /// Per-request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout_secs: defaults::HTTP_TIMEOUT_SECS,
            user_agent: defaults::USER_AGENT.to_string(),
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Level or filter directive.
    pub level: String,
    /// Output format (`json` or `pretty`); inferred from the build when unset.
    pub format: Option<String>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: defaults::LOG_LEVEL.to_string(),
            format: None,
        }
    }
}
