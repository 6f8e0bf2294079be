//! Wiring of HTTP adapters from a [`PipelineConfig`].
//!
//! # Design
//! - One shared `reqwest::Client` carries the configured timeout and user agent.
//! - Credentials are checked here, before any request leaves the process.
//! - Indexers are built in the configured order, which is also the merge order.

use std::sync::Arc;

use cinedrop_config::{HttpSettings, IndexerKind, PipelineConfig, validate};
use cinedrop_core::TorrentIndexer;
use cinedrop_debrid::{RealDebridClient, ResolutionEngine};
use cinedrop_metadata::TmdbClient;
use cinedrop_sources::{RealDebridSearch, SourceAggregator, YtsIndexer};
use reqwest::Client;
use tracing::info;

use crate::error::{BootstrapError, BootstrapResult};
use crate::orchestrator::{Pipeline, PollPolicy};

/// Build the outbound HTTP client shared by every adapter.
///
/// # Errors
///
/// Returns [`BootstrapError::HttpClient`] when the TLS backend cannot be initialised.
pub fn build_http_client(settings: &HttpSettings) -> BootstrapResult<Client> {
    Client::builder()
        .timeout(settings.timeout())
        .user_agent(settings.user_agent.as_str())
        .build()
        .map_err(|source| BootstrapError::HttpClient { source })
}

impl Pipeline {
    /// Build a pipeline talking to the services named in `config`.
    ///
    /// # Errors
    ///
    /// Returns [`BootstrapError::Config`] when the configuration is invalid or a
    /// credential required by an enabled service is missing, and
    /// [`BootstrapError::HttpClient`] when the HTTP client cannot be built.
    pub fn from_config(config: &PipelineConfig) -> BootstrapResult<Self> {
        validate(config).map_err(|err| BootstrapError::config("validate", err))?;
        let client = build_http_client(&config.http)?;

        let api_key = config
            .tmdb_api_key()
            .map_err(|err| BootstrapError::config("tmdb.api_key", err))?;
        let token = config
            .debrid_token()
            .map_err(|err| BootstrapError::config("debrid.token", err))?;

        let metadata = TmdbClient::new(client.clone(), &config.tmdb.base_url, api_key.expose());

        let backends: Vec<Arc<dyn TorrentIndexer>> = config
            .indexers
            .enabled
            .iter()
            .map(|kind| -> Arc<dyn TorrentIndexer> {
                match kind {
                    IndexerKind::RealDebrid => Arc::new(RealDebridSearch::new(
                        client.clone(),
                        &config.debrid.base_url,
                        token.expose(),
                    )),
                    IndexerKind::Yts => Arc::new(YtsIndexer::new(
                        client.clone(),
                        &config.indexers.yts_base_url,
                    )),
                }
            })
            .collect();
        let sources = SourceAggregator::new(backends, config.indexers.trackers.clone());

        let debrid = RealDebridClient::new(client, &config.debrid.base_url, token.expose());
        let engine = ResolutionEngine::new(
            Arc::new(debrid),
            config.resolution.transport_retries,
            config.resolution.retry_backoff(),
        );

        let pipeline = Self::new(
            Arc::new(metadata),
            sources,
            engine,
            PollPolicy::from(&config.resolution),
        );
        info!(
            indexers = ?pipeline.backend_ids(),
            poll_interval_ms = config.resolution.poll_interval_ms,
            max_wait_secs = config.resolution.max_wait_secs,
            "pipeline assembled"
        );
        Ok(pipeline)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cinedrop_config::{ConfigError, Secret};

    fn configured() -> PipelineConfig {
        let mut config = PipelineConfig::default();
        config.tmdb.api_key = Some(Secret::new("tmdb-key"));
        config.debrid.token = Some(Secret::new("rd-token"));
        config
    }

    #[test]
    fn builds_indexers_in_configured_order() {
        let mut config = configured();
        config.indexers.enabled = vec![IndexerKind::Yts, IndexerKind::RealDebrid];
        let pipeline = Pipeline::from_config(&config).expect("pipeline");
        assert_eq!(pipeline.backend_ids(), ["yts", "real_debrid"]);
        assert_eq!(
            pipeline.policy(),
            PollPolicy::from(&config.resolution)
        );
    }

    #[test]
    fn missing_tmdb_key_is_reported() {
        let mut config = configured();
        config.tmdb.api_key = None;
        let err = Pipeline::from_config(&config).err().expect("missing key");
        assert!(matches!(
            err,
            BootstrapError::Config {
                operation: "tmdb.api_key",
                source: ConfigError::MissingCredential { .. }
            }
        ));
    }

    #[test]
    fn missing_debrid_token_is_reported() {
        let mut config = configured();
        config.debrid.token = None;
        let err = Pipeline::from_config(&config).err().expect("missing token");
        assert!(matches!(
            err,
            BootstrapError::Config {
                operation: "debrid.token",
                ..
            }
        ));
    }

    #[test]
    fn invalid_configuration_is_rejected_before_wiring() {
        let mut config = configured();
        config.resolution.poll_interval_ms = 0;
        let err = Pipeline::from_config(&config).err().expect("invalid");
        assert!(matches!(
            err,
            BootstrapError::Config {
                operation: "validate",
                source: ConfigError::InvalidField { .. }
            }
        ));
    }

    #[test]
    fn http_client_honours_settings() {
        let settings = HttpSettings::default();
        assert!(build_http_client(&settings).is_ok());
    }
}
