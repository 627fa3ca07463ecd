//! Async HTTP client wrapping reqwest.
//!
//! Not a browser — just GET requests with a browser-like header set so
//! upstream profile sites do not reject the traffic outright. One attempt
//! per request under a fixed timeout; timeouts are distinguished from
//! other transport failures because the caller reports them differently.

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE};
use std::time::Duration;

/// Response from an HTTP GET request.
#[derive(Debug, Clone)]
pub struct FetchResponse {
    /// Requested URL.
    pub url: String,
    /// HTTP status code.
    pub status: u16,
    /// Response body as text.
    pub body: String,
}

/// Transport-level failure of a single fetch attempt.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("request timed out")]
    Timeout,
    #[error("transport failure: {0}")]
    Transport(String),
}

/// HTTP client for the resolver. Cheap to clone; the inner reqwest client
/// pools connections per upstream host.
#[derive(Clone)]
pub struct HttpClient {
    client: reqwest::Client,
}

impl HttpClient {
    /// Create a new client with a standard Chrome user-agent and a fixed
    /// request timeout.
    pub fn new(timeout_ms: u64) -> Self {
        let ua = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
                  AppleWebKit/537.36 (KHTML, like Gecko) \
                  Chrome/131.0.0.0 Safari/537.36";

        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/json;q=0.9,*/*;q=0.8",
            ),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));

        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .redirect(reqwest::redirect::Policy::limited(5))
            .user_agent(ua)
            .default_headers(headers)
            .build()
            .unwrap_or_default();

        Self { client }
    }

    /// Perform a single GET request. No retry on any failure.
    pub async fn get(&self, url: &str) -> Result<FetchResponse, FetchError> {
        let resp = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout
            } else {
                FetchError::Transport(e.to_string())
            }
        })?;

        let status = resp.status().as_u16();
        // Body read shares the overall request timeout; a stall here is
        // still a timeout from the caller's point of view.
        let body = resp.text().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout
            } else {
                FetchError::Transport(e.to_string())
            }
        })?;

        Ok(FetchResponse {
            url: url.to_string(),
            status,
            body,
        })
    }
}
