//! The rank resolver: fetch → classify → extract.
//!
//! One resolver value is constructed at process start and shared by
//! reference into every request handler. It holds no per-request state;
//! each resolution is a single outbound GET under a fixed timeout followed
//! by a CPU-bound parse. Upstream failures never escape as errors — they
//! are folded into [`RankResult`] variants.

pub mod extract;
pub mod fetch;
pub mod profile;

use crate::config::Config;
use crate::error::GatewayError;
use crate::types::{RankQuery, RankResult};
use fetch::{FetchError, FetchResponse, HttpClient};
use serde::Serialize;
use tracing::{debug, info, warn};
use url::Url;

/// Diagnostic dump for the `/debug` endpoint. Unstable contract.
#[derive(Debug, Serialize)]
pub struct DebugReport {
    pub username: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    pub body_len: usize,
    pub matches: Vec<extract::ElementHit>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Resolves usernames against the configured upstreams.
pub struct Resolver {
    http: HttpClient,
    profile_api: String,
    rank_page: String,
}

impl Resolver {
    pub fn new(config: &Config) -> Self {
        Self {
            http: HttpClient::new(config.timeout_ms),
            profile_api: config.profile_api.clone(),
            rank_page: config.rank_page.clone(),
        }
    }

    /// Existence check against the profile API. Never carries rank data;
    /// on existence the payload is the upstream user id.
    pub async fn check_profile(&self, query: &RankQuery) -> Result<RankResult, GatewayError> {
        let username = validated(&query.username)?;

        let url = match self.profile_url(username, query) {
            Ok(u) => u,
            Err(e) => {
                warn!("invalid profile upstream url: {e}");
                return Ok(RankResult::UpstreamError {
                    detail: format!("invalid upstream url: {e}"),
                });
            }
        };

        let resp = match self.http.get(url.as_str()).await {
            Ok(r) => r,
            Err(e) => return Ok(failure_outcome(e)),
        };
        debug!(status = resp.status, url = %resp.url, "profile upstream answered");

        if let Some(outcome) = classify_status(&resp) {
            return Ok(outcome);
        }

        match profile::existing_user_id(&resp.body) {
            Some(user_id) => {
                info!(username, "profile exists");
                Ok(RankResult::Found { rank: user_id })
            }
            None => Ok(RankResult::NotFound),
        }
    }

    /// Scrape the HTML profile page and extract a rank label.
    pub async fn resolve_rank(&self, username: &str) -> Result<RankResult, GatewayError> {
        let username = validated(username)?;
        let url = match self.rank_url(username) {
            Ok(u) => u,
            Err(e) => {
                warn!("invalid rank upstream url: {e}");
                return Ok(RankResult::UpstreamError {
                    detail: format!("invalid upstream url: {e}"),
                });
            }
        };

        let resp = match self.http.get(url.as_str()).await {
            Ok(r) => r,
            Err(e) => return Ok(failure_outcome(e)),
        };
        debug!(
            status = resp.status,
            url = %resp.url,
            body_len = resp.body.len(),
            "rank upstream answered"
        );

        if let Some(outcome) = classify_status(&resp) {
            return Ok(outcome);
        }

        // scraper types are !Send, so the parse runs on the blocking pool.
        let body = resp.body;
        match tokio::task::spawn_blocking(move || extract::extract_rank(&body)).await {
            Ok(Some(rank)) => {
                info!(username, rank = %rank, "rank extracted");
                Ok(RankResult::Found { rank })
            }
            Ok(None) => {
                info!(username, "no extraction strategy matched");
                Ok(RankResult::Unranked)
            }
            // A panicked parse task is our fault, not the upstream's.
            Err(e) => {
                warn!("extraction task failed: {e}");
                Err(GatewayError::Internal(format!("extraction task failed: {e}")))
            }
        }
    }

    /// Fetch the profile page and report every keyword-bearing element.
    /// The report carries fetch failures inline instead of failing.
    pub async fn debug_scan(&self, username: &str) -> Result<DebugReport, GatewayError> {
        let username = validated(username)?;
        let url = match self.rank_url(username) {
            Ok(u) => u.to_string(),
            Err(e) => {
                return Ok(DebugReport {
                    username: username.to_string(),
                    url: self.rank_page.clone(),
                    status: None,
                    body_len: 0,
                    matches: Vec::new(),
                    error: Some(format!("invalid upstream url: {e}")),
                })
            }
        };

        let resp = match self.http.get(&url).await {
            Ok(r) => r,
            Err(e) => {
                return Ok(DebugReport {
                    username: username.to_string(),
                    url,
                    status: None,
                    body_len: 0,
                    matches: Vec::new(),
                    error: Some(e.to_string()),
                })
            }
        };

        let FetchResponse { status, body, .. } = resp;
        let body_len = body.len();
        let matches = tokio::task::spawn_blocking(move || extract::scan_keyword_elements(&body))
            .await
            .unwrap_or_default();

        Ok(DebugReport {
            username: username.to_string(),
            url,
            status: Some(status),
            body_len,
            matches,
            error: None,
        })
    }

    /// Build the profile-page URL with the username as one encoded path
    /// segment, so a decoded `%20`/`%23` in the route param cannot smuggle
    /// extra segments or a fragment into the upstream request.
    fn rank_url(&self, username: &str) -> Result<Url, url::ParseError> {
        let mut url = Url::parse(&self.rank_page)?;
        url.path_segments_mut()
            .map_err(|_| url::ParseError::SetHostOnCannotBeABaseUrl)?
            .pop_if_empty()
            .push(username);
        Ok(url)
    }

    fn profile_url(&self, username: &str, query: &RankQuery) -> Result<Url, url::ParseError> {
        let mut params: Vec<(&str, &str)> = vec![("username", username)];
        if let Some(platform) = query.platform.as_deref() {
            params.push(("platform", platform));
        }
        if let Some(region) = query.region.as_deref() {
            params.push(("region", region));
        }
        Url::parse_with_params(&self.profile_api, &params)
    }
}

/// Reject empty/whitespace usernames before any outbound call.
fn validated(username: &str) -> Result<&str, GatewayError> {
    let trimmed = username.trim();
    if trimmed.is_empty() {
        return Err(GatewayError::EmptyUsername);
    }
    Ok(trimmed)
}

/// Map a transport failure to its tagged outcome.
fn failure_outcome(err: FetchError) -> RankResult {
    match err {
        FetchError::Timeout => {
            warn!("upstream request timed out");
            RankResult::Timeout
        }
        FetchError::Transport(detail) => {
            warn!("upstream transport failure: {detail}");
            RankResult::UpstreamError { detail }
        }
    }
}

/// Classify a non-success HTTP status; `None` means proceed to extraction.
fn classify_status(resp: &FetchResponse) -> Option<RankResult> {
    match resp.status {
        404 => Some(RankResult::NotFound),
        s if (200..300).contains(&s) => None,
        s => Some(RankResult::UpstreamError {
            detail: format!("upstream returned status {s}"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(status: u16) -> FetchResponse {
        FetchResponse {
            url: "https://upstream.test/profile/x".to_string(),
            status,
            body: String::new(),
        }
    }

    #[test]
    fn test_classify_status_404_is_not_found() {
        assert_eq!(classify_status(&response(404)), Some(RankResult::NotFound));
    }

    #[test]
    fn test_classify_status_2xx_proceeds() {
        assert_eq!(classify_status(&response(200)), None);
        assert_eq!(classify_status(&response(204)), None);
    }

    #[test]
    fn test_classify_status_other_is_upstream_error() {
        match classify_status(&response(503)) {
            Some(RankResult::UpstreamError { detail }) => assert!(detail.contains("503")),
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn test_validated_rejects_blank() {
        assert_eq!(validated(""), Err(GatewayError::EmptyUsername));
        assert_eq!(validated("   "), Err(GatewayError::EmptyUsername));
        assert_eq!(validated(" dedreviil12 "), Ok("dedreviil12"));
    }

    #[test]
    fn test_rank_url_joins_path_segment() {
        let resolver = Resolver::new(&Config {
            rank_page: "https://upstream.test/profile/pc/".to_string(),
            ..Config::default()
        });
        assert_eq!(
            resolver.rank_url("dedreviil12").unwrap().as_str(),
            "https://upstream.test/profile/pc/dedreviil12"
        );
    }

    #[test]
    fn test_rank_url_encodes_the_username_segment() {
        let resolver = Resolver::new(&Config {
            rank_page: "https://upstream.test/profile/pc".to_string(),
            ..Config::default()
        });
        // Spaces, fragments, and slashes stay inside one path segment.
        let url = resolver.rank_url("a b#c").unwrap();
        assert_eq!(url.as_str(), "https://upstream.test/profile/pc/a%20b%23c");
        let url = resolver.rank_url("a/b").unwrap();
        assert_eq!(url.as_str(), "https://upstream.test/profile/pc/a%2Fb");
    }

    #[test]
    fn test_profile_url_encodes_params() {
        let resolver = Resolver::new(&Config {
            profile_api: "https://upstream.test/api/v1/profile".to_string(),
            ..Config::default()
        });
        let query = RankQuery::new("a b").with_platform("uplay").with_region("emea");
        let url = resolver.profile_url("a b", &query).unwrap();
        assert_eq!(
            url.as_str(),
            "https://upstream.test/api/v1/profile?username=a+b&platform=uplay&region=emea"
        );
    }
}
