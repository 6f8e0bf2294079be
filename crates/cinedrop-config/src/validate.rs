//! Validation helpers applied after the configuration document is assembled.

use std::collections::HashSet;

use url::Url;

use crate::error::{ConfigError, ConfigResult};
use crate::model::PipelineConfig;

/// Validate an assembled configuration.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidField`] for the first field that fails.
pub fn validate(config: &PipelineConfig) -> ConfigResult<()> {
    validate_url("tmdb", "base_url", &config.tmdb.base_url)?;
    validate_url("tmdb", "image_base_url", &config.tmdb.image_base_url)?;
    validate_url("debrid", "base_url", &config.debrid.base_url)?;
    validate_url("indexers", "yts_base_url", &config.indexers.yts_base_url)?;

    let resolution = &config.resolution;
    if resolution.poll_interval_ms == 0 {
        return Err(ConfigError::invalid(
            "resolution",
            "poll_interval_ms",
            "0",
            "must_be_positive",
        ));
    }
    if resolution.max_wait_secs == 0 {
        return Err(ConfigError::invalid(
            "resolution",
            "max_wait_secs",
            "0",
            "must_be_positive",
        ));
    }
    if resolution.max_wait() < resolution.poll_interval() {
        return Err(ConfigError::invalid(
            "resolution",
            "max_wait_secs",
            resolution.max_wait_secs.to_string(),
            "shorter_than_poll_interval",
        ));
    }
    if config.http.timeout_secs == 0 {
        return Err(ConfigError::invalid(
            "http",
            "timeout_secs",
            "0",
            "must_be_positive",
        ));
    }

    let mut seen = HashSet::new();
    for kind in &config.indexers.enabled {
        if !seen.insert(kind) {
            return Err(ConfigError::invalid(
                "indexers",
                "enabled",
                kind.id(),
                "duplicate_indexer",
            ));
        }
    }
    let synthesises_magnets = config
        .indexers
        .enabled
        .iter()
        .any(|kind| kind.reports_info_hash());
    if synthesises_magnets && config.indexers.trackers.is_empty() {
        return Err(ConfigError::InvalidField {
            section: "indexers",
            field: "trackers",
            value: None,
            reason: "no_trackers",
        });
    }
    for tracker in &config.indexers.trackers {
        if tracker.trim().is_empty() {
            return Err(ConfigError::InvalidField {
                section: "indexers",
                field: "trackers",
                value: None,
                reason: "empty_tracker",
            });
        }
    }
    Ok(())
}

fn validate_url(section: &'static str, field: &'static str, value: &str) -> ConfigResult<()> {
    match Url::parse(value) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(()),
        Ok(_) => Err(ConfigError::invalid(section, field, value, "unsupported_scheme")),
        Err(_) => Err(ConfigError::invalid(section, field, value, "malformed_url")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::IndexerKind;

    #[test]
    fn defaults_are_valid() {
        assert!(validate(&PipelineConfig::default()).is_ok());
    }

    #[test]
    fn zero_poll_interval_is_rejected() {
        let mut config = PipelineConfig::default();
        config.resolution.poll_interval_ms = 0;
        let err = validate(&config).expect_err("zero interval");
        assert!(matches!(
            err,
            ConfigError::InvalidField {
                field: "poll_interval_ms",
                reason: "must_be_positive",
                ..
            }
        ));
    }

    #[test]
    fn budget_shorter_than_interval_is_rejected() {
        let mut config = PipelineConfig::default();
        config.resolution.poll_interval_ms = 5_000;
        config.resolution.max_wait_secs = 2;
        assert!(matches!(
            validate(&config),
            Err(ConfigError::InvalidField {
                reason: "shorter_than_poll_interval",
                ..
            })
        ));
    }

    #[test]
    fn malformed_urls_and_duplicates_are_rejected() {
        let mut config = PipelineConfig::default();
        config.debrid.base_url = "not a url".to_string();
        assert!(matches!(
            validate(&config),
            Err(ConfigError::InvalidField {
                section: "debrid",
                reason: "malformed_url",
                ..
            })
        ));

        let mut config = PipelineConfig::default();
        config.tmdb.base_url = "ftp://example.com".to_string();
        assert!(matches!(
            validate(&config),
            Err(ConfigError::InvalidField {
                reason: "unsupported_scheme",
                ..
            })
        ));

        let mut config = PipelineConfig::default();
        config.indexers.enabled = vec![IndexerKind::Yts, IndexerKind::Yts];
        assert!(matches!(
            validate(&config),
            Err(ConfigError::InvalidField {
                reason: "duplicate_indexer",
                ..
            })
        ));
    }

    #[test]
    fn empty_trackers_require_magnet_only_indexers() {
        let mut config = PipelineConfig::default();
        config.indexers.trackers.clear();
        config.indexers.enabled = vec![IndexerKind::RealDebrid, IndexerKind::Yts];
        assert!(matches!(
            validate(&config),
            Err(ConfigError::InvalidField {
                field: "trackers",
                reason: "no_trackers",
                ..
            })
        ));

        config.indexers.enabled = vec![IndexerKind::RealDebrid];
        assert!(validate(&config).is_ok());
    }
}
