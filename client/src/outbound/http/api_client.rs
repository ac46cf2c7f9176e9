//! Shared reqwest plumbing for the Taskforge REST API.
//!
//! Owns the base URL, the per-request timeout, and the helpers that turn a
//! response into `(status, body)` plus a human-readable server message.

use std::time::Duration;

use reqwest::{Client, RequestBuilder, StatusCode, Url};
use serde::Deserialize;
use thiserror::Error;

const USER_AGENT: &str = concat!("taskforge-client/", env!("CARGO_PKG_VERSION"));

/// Errors raised while building the API client.
#[derive(Debug, Error)]
pub enum ApiClientError {
    /// The configured base URL cannot have path segments appended.
    #[error("API base URL '{url}' cannot be used as a base")]
    InvalidBaseUrl {
        /// Offending URL.
        url: String,
    },
    /// reqwest refused the client configuration.
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Base URL plus a configured reqwest client.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base: Url,
}

/// Status and raw body of a completed request.
pub(super) struct RawResponse {
    pub(super) status: StatusCode,
    pub(super) body: Vec<u8>,
}

#[derive(Debug, Deserialize)]
struct ErrorBodyDto {
    #[serde(default)]
    message: Option<String>,
}

impl ApiClient {
    /// Build a client for the API rooted at `base`, e.g.
    /// `http://localhost:5000/api`.
    ///
    /// # Errors
    ///
    /// Returns an error when `base` cannot carry a path or when the reqwest
    /// client cannot be constructed.
    pub fn new(base: Url, timeout: Duration) -> Result<Self, ApiClientError> {
        if base.cannot_be_a_base() {
            return Err(ApiClientError::InvalidBaseUrl {
                url: base.to_string(),
            });
        }
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self { client, base })
    }

    /// Append path segments to the base URL, percent-encoding each one.
    pub(super) fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    pub(super) fn http(&self) -> &Client {
        &self.client
    }
}

/// Send `request` and buffer the response body.
pub(super) async fn execute(request: RequestBuilder) -> Result<RawResponse, reqwest::Error> {
    let response = request.send().await?;
    let status = response.status();
    let body = response.bytes().await?.to_vec();
    Ok(RawResponse { status, body })
}

/// The `message` field of a JSON error body, if present and non-blank.
pub(super) fn server_message(body: &[u8]) -> Option<String> {
    serde_json::from_slice::<ErrorBodyDto>(body)
        .ok()
        .and_then(|dto| dto.message)
        .filter(|message| !message.trim().is_empty())
}

/// Server message when available, otherwise a compact preview of the body.
pub(super) fn describe_failure(status: StatusCode, body: &[u8]) -> String {
    if let Some(message) = server_message(body) {
        return message;
    }
    let preview = body_preview(body);
    if preview.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        format!("status {}: {preview}", status.as_u16())
    }
}

pub(super) fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}
