//! Real-Debrid REST 1.0 client.
//!
//! A `downloaded` torrent lists hoster links; each one is unrestricted into a direct
//! download URL before the status is reported, keeping the hoster order.

use async_trait::async_trait;
use cinedrop_core::{
    DebridService, PipelineError, PipelineResult, RemoteJobStatus, RemotePhase, SubmissionId,
};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

/// Service label attached to errors raised by this client.
pub const SERVICE: &str = "real_debrid";

#[derive(Debug, Deserialize)]
struct AddMagnetResponse {
    id: String,
}

#[derive(Debug, Deserialize)]
struct TorrentInfo {
    status: String,
    #[serde(default)]
    links: Vec<String>,
    #[serde(default)]
    progress: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct UnrestrictedLink {
    download: String,
}

#[derive(Debug, Deserialize)]
struct UserInfo {
    username: String,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
}

/// Map a Real-Debrid torrent status string onto a job phase.
#[must_use]
pub fn phase_for_status(status: &str) -> RemotePhase {
    match status {
        "magnet_conversion" | "queued" => RemotePhase::Pending,
        "waiting_files_selection" => RemotePhase::AwaitingFileSelection,
        "downloaded" => RemotePhase::Completed,
        "error" | "magnet_error" | "virus" | "dead" => RemotePhase::Failed,
        // downloading, compressing, uploading, and anything newer
        _ => RemotePhase::Processing,
    }
}

/// [`DebridService`] backed by the Real-Debrid API.
#[derive(Clone)]
pub struct RealDebridClient {
    client: Client,
    base_url: String,
    token: String,
}

impl RealDebridClient {
    /// Create a client rooted at `base_url` (for example `https://api.real-debrid.com/rest/1.0`).
    #[must_use]
    pub fn new(client: Client, base_url: &str, token: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.into(),
        }
    }

    fn get(&self, path: &str) -> RequestBuilder {
        self.client
            .get(format!("{}{path}", self.base_url))
            .bearer_auth(&self.token)
    }

    fn post(&self, path: &str) -> RequestBuilder {
        self.client
            .post(format!("{}{path}", self.base_url))
            .bearer_auth(&self.token)
    }

    #[instrument(name = "real_debrid.unrestrict", skip_all, fields(links = links.len()))]
    async fn unrestrict_all(&self, links: Vec<String>) -> PipelineResult<Vec<String>> {
        let mut direct = Vec::with_capacity(links.len());
        for link in links {
            let request = self.post("/unrestrict/link").form(&[("link", link.as_str())]);
            let unrestricted: UnrestrictedLink = read_json(send(request).await?).await?;
            direct.push(unrestricted.download);
        }
        Ok(direct)
    }
}

#[async_trait]
impl DebridService for RealDebridClient {
    #[instrument(name = "real_debrid.add_magnet", skip_all)]
    async fn submit_magnet(&self, magnet_uri: &str) -> PipelineResult<SubmissionId> {
        let request = self.post("/torrents/addMagnet").form(&[("magnet", magnet_uri)]);
        let response = send(request).await?;
        let added: AddMagnetResponse = read_json(response).await?;
        Ok(SubmissionId::new(added.id))
    }

    #[instrument(name = "real_debrid.info", skip(self), fields(submission_id = %id))]
    async fn job_status(&self, id: &SubmissionId) -> PipelineResult<RemoteJobStatus> {
        let path = format!("/torrents/info/{}", urlencoding::encode(id.as_str()));
        let info: TorrentInfo = read_json(send(self.get(&path)).await?).await?;
        let phase = phase_for_status(&info.status);
        debug!(status = %info.status, ?phase, "torrent info received");
        let links = if phase == RemotePhase::Completed {
            self.unrestrict_all(info.links).await?
        } else {
            info.links
        };
        Ok(RemoteJobStatus {
            phase,
            error: (phase == RemotePhase::Failed).then(|| info.status.clone()),
            links,
            progress: info.progress,
        })
    }

    #[instrument(name = "real_debrid.select_files", skip(self), fields(submission_id = %id))]
    async fn select_files(&self, id: &SubmissionId) -> PipelineResult<()> {
        let path = format!("/torrents/selectFiles/{}", urlencoding::encode(id.as_str()));
        let response = send(self.post(&path).form(&[("files", "all")])).await?;
        ensure_success(response).await.map(|_| ())
    }

    #[instrument(name = "real_debrid.user", skip_all)]
    async fn verify_credential(&self) -> PipelineResult<String> {
        let user: UserInfo = read_json(send(self.get("/user")).await?).await?;
        Ok(user.username)
    }
}

async fn send(request: RequestBuilder) -> PipelineResult<Response> {
    request
        .send()
        .await
        .map_err(|err| PipelineError::transport(SERVICE, err))
}

async fn read_json<T: DeserializeOwned>(response: Response) -> PipelineResult<T> {
    ensure_success(response)
        .await?
        .json::<T>()
        .await
        .map_err(|err| PipelineError::transport(SERVICE, err))
}

async fn ensure_success(response: Response) -> PipelineResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let bytes = response.bytes().await.unwrap_or_default();
    let message = serde_json::from_slice::<ErrorBody>(&bytes)
        .unwrap_or_default()
        .error
        .unwrap_or_else(|| fallback_message(status, &bytes));
    Err(PipelineError::Upstream {
        service: SERVICE,
        status: status.as_u16(),
        message,
    })
}

fn fallback_message(status: StatusCode, bytes: &[u8]) -> String {
    let text = String::from_utf8_lossy(bytes).trim().to_string();
    if text.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string()
    } else {
        text
    }
}
