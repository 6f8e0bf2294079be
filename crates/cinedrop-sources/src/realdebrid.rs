//! Real-Debrid torrent search backend.

use async_trait::async_trait;
use cinedrop_core::{IndexerRecord, PipelineError, PipelineResult, RecordLocator, TorrentIndexer};
use reqwest::Client;
use serde::Deserialize;
use tracing::instrument;

use crate::http::read_json;

/// Identifier recorded on candidates from this backend.
pub const ID: &str = "real_debrid";
const SERVICE: &str = "real_debrid_search";

#[derive(Debug, Deserialize)]
struct SearchHit {
    title: String,
    magnet: String,
}

/// Searches torrents through `GET /torrents/search/{query}` with a bearer token.
#[derive(Clone)]
pub struct RealDebridSearch {
    client: Client,
    base_url: String,
    token: String,
}

impl RealDebridSearch {
    /// Create a backend rooted at the Real-Debrid REST base URL.
    #[must_use]
    pub fn new(client: Client, base_url: &str, token: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.into(),
        }
    }
}

#[async_trait]
impl TorrentIndexer for RealDebridSearch {
    fn id(&self) -> &str {
        ID
    }

    #[instrument(name = "real_debrid.search", skip(self))]
    async fn search(&self, query: &str) -> PipelineResult<Vec<IndexerRecord>> {
        let url = format!(
            "{}/torrents/search/{}",
            self.base_url,
            urlencoding::encode(query.trim())
        );
        let response = self
            .client
            .get(url)
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|err| PipelineError::transport(SERVICE, err))?;
        let hits: Vec<SearchHit> = read_json(SERVICE, response).await?;
        Ok(hits
            .into_iter()
            .map(|hit| IndexerRecord {
                source_title: hit.title,
                quality: None,
                locator: RecordLocator::Magnet(hit.magnet),
            })
            .collect())
    }
}
