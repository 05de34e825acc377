use crate::chat::ChatRequest;
use axum::http::header::{self, HeaderMap, HeaderName};
use axum::http::StatusCode;
use bytes::Bytes;
use std::time::Duration;

pub const CHAT_COMPLETIONS_PATH: &str = "/v1/chat/completions";

#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    #[error("failed to encode upstream request: {0}")]
    Serialize(#[source] serde_json::Error),
    #[error("upstream request failed: {0}")]
    Network(#[source] reqwest::Error),
    #[error("failed to read upstream response body: {0}")]
    Body(#[source] reqwest::Error),
}

impl UpstreamError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Serialize(_) => "serialize",
            Self::Network(_) => "network",
            Self::Body(_) => "body",
        }
    }
}

/// A fully buffered upstream reply. The body is relayed as-is.
#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

/// Sends `request` to `{base_url}/v1/chat/completions` with the caller's
/// headers and buffers the reply. Exactly one attempt is made.
pub async fn dispatch(
    client: &reqwest::Client,
    base_url: &str,
    request: &ChatRequest,
    inbound_headers: &HeaderMap,
    timeout: Option<Duration>,
) -> Result<UpstreamResponse, UpstreamError> {
    let result = send(client, base_url, request, inbound_headers, timeout).await;
    let outcome = match &result {
        Ok(_) => "ok",
        Err(err) => err.kind(),
    };
    metrics::counter!("model_forward_upstream_requests_total", "outcome" => outcome).increment(1);
    result
}

async fn send(
    client: &reqwest::Client,
    base_url: &str,
    request: &ChatRequest,
    inbound_headers: &HeaderMap,
    timeout: Option<Duration>,
) -> Result<UpstreamResponse, UpstreamError> {
    let body = request.encode().map_err(UpstreamError::Serialize)?;
    let url = chat_completions_url(base_url);
    let mut req = client
        .post(&url)
        .headers(forwarded_request_headers(inbound_headers))
        .body(body);
    if let Some(timeout) = timeout {
        req = req.timeout(timeout);
    }
    let resp = req.send().await.map_err(UpstreamError::Network)?;
    let status = resp.status();
    let headers = resp.headers().clone();
    let body = resp.bytes().await.map_err(UpstreamError::Body)?;
    tracing::debug!(
        url = %url,
        model = %request.model,
        status = status.as_u16(),
        bytes = body.len(),
        "upstream responded"
    );
    Ok(UpstreamResponse {
        status,
        headers,
        body,
    })
}

fn chat_completions_url(base_url: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), CHAT_COMPLETIONS_PATH)
}

/// Headers that describe a single connection rather than the message.
/// Only stripped from upstream replies.
pub(crate) fn is_hop_by_hop_header(name: &HeaderName) -> bool {
    name == header::CONNECTION
        || name.as_str() == "keep-alive"
        || name == header::PROXY_AUTHENTICATE
        || name == header::PROXY_AUTHORIZATION
        || name == header::TE
        || name == header::TRAILER
        || name == header::TRANSFER_ENCODING
        || name == header::UPGRADE
}

/// Headers the client transport writes for the re-encoded body.
fn is_transport_owned_header(name: &HeaderName) -> bool {
    name == header::HOST
        || name == header::CONTENT_LENGTH
        || name == header::TRANSFER_ENCODING
        || name == header::TRAILER
}

/// Every caller header except those the client transport sets itself.
/// Credentials, proxy credentials included, pass through untouched.
fn forwarded_request_headers(inbound: &HeaderMap) -> HeaderMap {
    let mut out = HeaderMap::with_capacity(inbound.len());
    for (name, value) in inbound {
        if is_transport_owned_header(name) {
            continue;
        }
        out.append(name.clone(), value.clone());
    }
    out
}
