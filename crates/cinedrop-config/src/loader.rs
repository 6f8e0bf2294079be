//! Layered configuration loading.
//!
//! # Design
//! - Precedence is defaults, then the optional YAML document named by `CINEDROP_CONFIG`,
//!   then individual environment overrides.
//! - Environment access goes through a lookup closure so callers and tests never mutate
//!   the process environment.

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use tracing::{debug, info};

use crate::defaults;
use crate::error::{ConfigError, ConfigResult};
use crate::model::{IndexerKind, PipelineConfig, Secret};
use crate::validate::validate;

/// Load configuration from the process environment.
///
/// # Errors
///
/// Returns an error when the YAML document cannot be read or parsed, when an override
/// cannot be parsed, or when the assembled configuration fails validation.
pub fn load() -> ConfigResult<PipelineConfig> {
    load_with(|name| std::env::var(name).ok())
}

/// Load configuration using the supplied environment lookup.
///
/// # Errors
///
/// See [`load`].
pub fn load_with<F>(env: F) -> ConfigResult<PipelineConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = match non_empty(&env, defaults::ENV_CONFIG_PATH) {
        Some(path) => from_yaml_file(Path::new(&path))?,
        None => PipelineConfig::default(),
    };
    apply_env_overrides(&mut config, &env)?;
    validate(&config)?;
    info!(
        indexers = ?config.indexers.enabled,
        poll_interval_ms = config.resolution.poll_interval_ms,
        max_wait_secs = config.resolution.max_wait_secs,
        tmdb_key = config.tmdb.api_key.is_some(),
        debrid_token = config.debrid.token.is_some(),
        "configuration loaded"
    );
    Ok(config)
}

/// Parse a YAML document, filling unspecified fields with defaults.
///
/// # Errors
///
/// Returns [`ConfigError::Parse`] when the document is malformed.
pub fn from_yaml_str(document: &str) -> ConfigResult<PipelineConfig> {
    if document.trim().is_empty() {
        return Ok(PipelineConfig::default());
    }
    serde_yaml::from_str(document).map_err(|source| ConfigError::Parse { path: None, source })
}

/// Read and parse a YAML document from disk.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] when the file cannot be read and [`ConfigError::Parse`]
/// when it is malformed.
pub fn from_yaml_file(path: &Path) -> ConfigResult<PipelineConfig> {
    debug!(path = %path.display(), "reading configuration file");
    let document = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    from_yaml_str(&document).map_err(|err| match err {
        ConfigError::Parse { source, .. } => ConfigError::Parse {
            path: Some(PathBuf::from(path)),
            source,
        },
        other => other,
    })
}

fn apply_env_overrides<F>(config: &mut PipelineConfig, env: &F) -> ConfigResult<()>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(key) = non_empty(env, defaults::ENV_TMDB_API_KEY) {
        config.tmdb.api_key = Some(Secret::new(key));
    }
    if let Some(url) = non_empty(env, defaults::ENV_TMDB_BASE_URL) {
        config.tmdb.base_url = url;
    }
    if let Some(token) = non_empty(env, defaults::ENV_DEBRID_TOKEN)
        .or_else(|| non_empty(env, defaults::ENV_DEBRID_TOKEN_LEGACY))
    {
        config.debrid.token = Some(Secret::new(token));
    }
    if let Some(url) = non_empty(env, defaults::ENV_DEBRID_BASE_URL) {
        config.debrid.base_url = url;
    }
    if let Some(url) = non_empty(env, defaults::ENV_YTS_BASE_URL) {
        config.indexers.yts_base_url = url;
    }
    if let Some(list) = non_empty(env, defaults::ENV_INDEXERS) {
        config.indexers.enabled = split_list(&list)
            .map(IndexerKind::from_str)
            .collect::<ConfigResult<Vec<_>>>()?;
    }
    if let Some(list) = non_empty(env, defaults::ENV_TRACKERS) {
        config.indexers.trackers = split_list(&list).map(str::to_string).collect();
    }
    if let Some(value) = non_empty(env, defaults::ENV_POLL_INTERVAL_MS) {
        config.resolution.poll_interval_ms =
            parse_number("resolution", "poll_interval_ms", &value)?;
    }
    if let Some(value) = non_empty(env, defaults::ENV_MAX_WAIT_SECS) {
        config.resolution.max_wait_secs = parse_number("resolution", "max_wait_secs", &value)?;
    }
    if let Some(value) = non_empty(env, defaults::ENV_TRANSPORT_RETRIES) {
        config.resolution.transport_retries =
            parse_number("resolution", "transport_retries", &value)?;
    }
    if let Some(value) = non_empty(env, defaults::ENV_HTTP_TIMEOUT_SECS) {
        config.http.timeout_secs = parse_number("http", "timeout_secs", &value)?;
    }
    if let Some(level) = non_empty(env, defaults::ENV_LOG_LEVEL) {
        config.logging.level = level;
    }
    if let Some(format) = non_empty(env, defaults::ENV_LOG_FORMAT) {
        config.logging.format = Some(format);
    }
    Ok(())
}

fn non_empty<F>(env: &F, name: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    env(name)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn split_list(value: &str) -> impl Iterator<Item = &str> {
    value.split(',').map(str::trim).filter(|item| !item.is_empty())
}

fn parse_number<T: FromStr>(
    section: &'static str,
    field: &'static str,
    value: &str,
) -> ConfigResult<T> {
    value
        .parse()
        .map_err(|_| ConfigError::invalid(section, field, value, "not_a_number"))
}
