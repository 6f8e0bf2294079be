//! HTTP client for the TMDB v3 API.
//!
//! # Design
//! - Reuse a caller-built `reqwest::Client` so timeouts and user agent are configured once.
//! - Validate queries before touching the network; never retry.
//! - Map HTTP failures onto the shared pipeline taxonomy (`404` on detail is `NotFound`).

use async_trait::async_trait;
use cinedrop_core::{MetadataProvider, Movie, MovieId, PipelineError, PipelineResult};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use crate::models::{ErrorBody, MovieDetails, SearchPage};

/// Service label attached to errors raised by this adapter.
pub const SERVICE: &str = "tmdb";

/// Metadata provider backed by TMDB.
#[derive(Clone)]
pub struct TmdbClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl TmdbClient {
    /// Create a client rooted at `base_url` (for example `https://api.themoviedb.org/3`).
    #[must_use]
    pub fn new(client: Client, base_url: &str, api_key: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get(&self, path: &str, query: &[(&str, &str)]) -> PipelineResult<Response> {
        self.client
            .get(self.url(path))
            .query(&[("api_key", self.api_key.as_str())])
            .query(query)
            .send()
            .await
            .map_err(|err| PipelineError::transport(SERVICE, err))
    }
}

#[async_trait]
impl MetadataProvider for TmdbClient {
    #[instrument(name = "tmdb.search", skip(self), fields(query = %query))]
    async fn search(&self, query: &str) -> PipelineResult<Vec<Movie>> {
        let query = query.trim();
        if query.is_empty() {
            return Err(PipelineError::invalid("query", "empty"));
        }

        let response = self.get("/search/movie", &[("query", query)]).await?;
        let page: SearchPage = decode(response).await?;
        debug!(results = page.results.len(), "tmdb search completed");
        Ok(page.results.into_iter().map(Movie::from).collect())
    }

    #[instrument(name = "tmdb.detail", skip(self), fields(movie_id = %id))]
    async fn detail(&self, id: MovieId) -> PipelineResult<Movie> {
        let response = self.get(&format!("/movie/{id}"), &[]).await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(PipelineError::NotFound {
                entity: "movie",
                id: id.to_string(),
            });
        }
        let details: MovieDetails = decode(response).await?;
        Ok(Movie::from(details))
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> PipelineResult<T> {
    let status = response.status();
    if !status.is_success() {
        return Err(upstream_error(status, response).await);
    }
    response
        .json::<T>()
        .await
        .map_err(|err| PipelineError::transport(SERVICE, err))
}

async fn upstream_error(status: StatusCode, response: Response) -> PipelineError {
    let bytes = response.bytes().await.unwrap_or_default();
    let body = serde_json::from_slice::<ErrorBody>(&bytes).unwrap_or_default();
    let message = body.status_message.unwrap_or_else(|| {
        let text = String::from_utf8_lossy(&bytes).trim().to_string();
        if text.is_empty() {
            status.canonical_reason().unwrap_or("request failed").to_string()
        } else {
            text
        }
    });
    PipelineError::Upstream {
        service: SERVICE,
        status: status.as_u16(),
        message,
    }
}
