//! YTS-style list API backend.
//!
//! Reports bare info-hashes with a quality label per torrent; the aggregator
//! synthesises the magnet URIs.

use async_trait::async_trait;
use cinedrop_core::{IndexerRecord, PipelineError, PipelineResult, RecordLocator, TorrentIndexer};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::http::read_json;

/// Identifier recorded on candidates from this backend.
pub const ID: &str = "yts";

#[derive(Debug, Deserialize)]
struct ListResponse {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    status_message: Option<String>,
    #[serde(default)]
    data: Option<ListData>,
}

#[derive(Debug, Deserialize)]
struct ListData {
    #[serde(default)]
    movies: Vec<ListedMovie>,
}

#[derive(Debug, Deserialize)]
struct ListedMovie {
    title: String,
    #[serde(default)]
    year: Option<u16>,
    #[serde(default)]
    torrents: Vec<ListedTorrent>,
}

#[derive(Debug, Deserialize)]
struct ListedTorrent {
    hash: String,
    #[serde(default)]
    quality: Option<String>,
}

/// Queries `GET {base}/list_movies.json?query_term=`.
#[derive(Clone)]
pub struct YtsIndexer {
    client: Client,
    base_url: String,
}

impl YtsIndexer {
    /// Create a backend rooted at the list API base URL.
    #[must_use]
    pub fn new(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl TorrentIndexer for YtsIndexer {
    fn id(&self) -> &str {
        ID
    }

    #[instrument(name = "yts.search", skip(self))]
    async fn search(&self, query: &str) -> PipelineResult<Vec<IndexerRecord>> {
        let response = self
            .client
            .get(format!("{}/list_movies.json", self.base_url))
            .query(&[("query_term", query.trim())])
            .send()
            .await
            .map_err(|err| PipelineError::transport(ID, err))?;
        let status = response.status();
        let listing: ListResponse = read_json(ID, response).await?;

        if listing.status.as_deref().is_some_and(|s| s != "ok") {
            return Err(PipelineError::Upstream {
                service: ID,
                status: status.as_u16(),
                message: listing
                    .status_message
                    .unwrap_or_else(|| "list request failed".to_string()),
            });
        }

        let movies = listing.data.map(|data| data.movies).unwrap_or_default();
        debug!(movies = movies.len(), "yts listing received");
        Ok(movies
            .into_iter()
            .flat_map(|movie| {
                let source_title = match movie.year {
                    Some(year) => format!("{} ({year})", movie.title),
                    None => movie.title,
                };
                movie.torrents.into_iter().map(move |torrent| IndexerRecord {
                    source_title: source_title.clone(),
                    quality: torrent.quality,
                    locator: RecordLocator::InfoHash(torrent.hash),
                })
            })
            .collect())
    }
}
