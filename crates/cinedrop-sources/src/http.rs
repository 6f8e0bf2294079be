//! Response handling shared by the HTTP backends.

use cinedrop_core::{PipelineError, PipelineResult};
use reqwest::{Response, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    status_message: Option<String>,
}

/// Decode a successful JSON body or turn a failure status into `Upstream`.
pub(crate) async fn read_json<T: DeserializeOwned>(
    service: &'static str,
    response: Response,
) -> PipelineResult<T> {
    let status = response.status();
    if !status.is_success() {
        return Err(upstream_error(service, status, response).await);
    }
    response
        .json::<T>()
        .await
        .map_err(|err| PipelineError::transport(service, err))
}

async fn upstream_error(
    service: &'static str,
    status: StatusCode,
    response: Response,
) -> PipelineError {
    let bytes = response.bytes().await.unwrap_or_default();
    let body = serde_json::from_slice::<ErrorBody>(&bytes).unwrap_or_default();
    let message = body
        .error
        .or(body.status_message)
        .unwrap_or_else(|| String::from_utf8_lossy(&bytes).trim().to_string());
    let message = if message.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string()
    } else {
        message
    };
    PipelineError::Upstream {
        service,
        status: status.as_u16(),
        message,
    }
}
