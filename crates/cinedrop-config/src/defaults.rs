//! Default endpoints, timings, and environment variable names.
//!
//! # Design
//! - Keep every tunable default in one place so docs and tests agree.
//! - Poll timings mirror what the Real-Debrid API tolerates without throttling.

/// TMDB v3 REST root.
pub const TMDB_BASE_URL: &str = "https://api.themoviedb.org/3";
/// TMDB image CDN root used to build poster URLs.
pub const TMDB_IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p";
/// Real-Debrid REST root.
pub const DEBRID_BASE_URL: &str = "https://api.real-debrid.com/rest/1.0";
/// YTS list API root.
pub const YTS_BASE_URL: &str = "https://yts.mx/api/v2";
/// Tracker appended to synthesised magnet URIs.
pub const DEFAULT_TRACKER: &str = "udp://tracker.opentrackr.org:1337/announce";

/// Delay between job status polls.
pub const POLL_INTERVAL_MS: u64 = 2_000;
/// Total time budget for a resolution before it times out.
pub const MAX_WAIT_SECS: u64 = 300;
/// Consecutive poll-transport failures tolerated before giving up.
pub const TRANSPORT_RETRIES: u32 = 3;
/// Linear backoff step between poll-transport retries.
pub const RETRY_BACKOFF_MS: u64 = 500;
/// Per-request HTTP timeout.
pub const HTTP_TIMEOUT_SECS: u64 = 10;
/// User agent sent with every outbound request.
pub const USER_AGENT: &str = concat!("cinedrop/", env!("CARGO_PKG_VERSION"));
/// Default log level.
pub const LOG_LEVEL: &str = "info";

/// Path to an optional YAML configuration file.
pub const ENV_CONFIG_PATH: &str = "CINEDROP_CONFIG";
/// TMDB API key.
pub const ENV_TMDB_API_KEY: &str = "CINEDROP_TMDB_API_KEY";
/// TMDB base URL override.
pub const ENV_TMDB_BASE_URL: &str = "CINEDROP_TMDB_BASE_URL";
/// Debrid API token.
pub const ENV_DEBRID_TOKEN: &str = "CINEDROP_DEBRID_TOKEN";
/// Legacy debrid token variable, consulted when [`ENV_DEBRID_TOKEN`] is unset.
pub const ENV_DEBRID_TOKEN_LEGACY: &str = "RD_TOKEN";
/// Debrid base URL override.
pub const ENV_DEBRID_BASE_URL: &str = "CINEDROP_DEBRID_BASE_URL";
/// YTS base URL override.
pub const ENV_YTS_BASE_URL: &str = "CINEDROP_YTS_BASE_URL";
/// Comma-separated list of enabled indexers.
pub const ENV_INDEXERS: &str = "CINEDROP_INDEXERS";
/// Comma-separated list of trackers for synthesised magnets.
pub const ENV_TRACKERS: &str = "CINEDROP_TRACKERS";
/// Poll interval override in milliseconds.
pub const ENV_POLL_INTERVAL_MS: &str = "CINEDROP_POLL_INTERVAL_MS";
/// Resolution budget override in seconds.
pub const ENV_MAX_WAIT_SECS: &str = "CINEDROP_MAX_WAIT_SECS";
/// Transport retry count override.
pub const ENV_TRANSPORT_RETRIES: &str = "CINEDROP_TRANSPORT_RETRIES";
/// HTTP timeout override in seconds.
pub const ENV_HTTP_TIMEOUT_SECS: &str = "CINEDROP_HTTP_TIMEOUT_SECS";
/// Log level override.
pub const ENV_LOG_LEVEL: &str = "CINEDROP_LOG_LEVEL";
/// Log format override (`json` or `pretty`).
pub const ENV_LOG_FORMAT: &str = "CINEDROP_LOG_FORMAT";
