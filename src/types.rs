//! Domain types: the query going in and the tagged outcome coming out.

/// Legacy sentinel rank rendered when extraction finds nothing.
pub const UNRANKED_SENTINEL: &str = "Unranked";

/// A single rank lookup. Immutable; resolved synchronously and discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankQuery {
    /// Required, non-empty after trimming.
    pub username: String,
    /// Opaque pass-through; the upstream validates it, not us.
    pub platform: Option<String>,
    /// Opaque pass-through, only some upstreams take it.
    pub region: Option<String>,
}

impl RankQuery {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            platform: None,
            region: None,
        }
    }

    pub fn with_platform(mut self, platform: impl Into<String>) -> Self {
        self.platform = Some(platform.into());
        self
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }
}

/// Outcome of one resolution. Exactly one of these per query; upstream
/// failures never escape as panics or raw errors past the resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RankResult {
    /// Rank label extracted, or (profile variant) existence confirmed with
    /// the upstream user id as payload.
    Found { rank: String },
    /// Upstream confirmed the user does not exist (404, or profile JSON
    /// without a usable `userId`).
    NotFound,
    /// Document fetched and parsed but every extraction strategy missed.
    /// Rendered at the HTTP layer as the literal [`UNRANKED_SENTINEL`]
    /// paired with an error — a failure, not a tier.
    Unranked,
    /// Non-2xx/non-404 status or a transport-level failure.
    UpstreamError { detail: String },
    /// The fixed outbound timeout elapsed. Never retried.
    Timeout,
}

impl RankResult {
    /// Human-readable failure description, `None` for [`RankResult::Found`].
    pub fn failure_detail(&self) -> Option<String> {
        match self {
            RankResult::Found { .. } => None,
            RankResult::NotFound => Some("player not found".to_string()),
            RankResult::Unranked => Some("rank not found".to_string()),
            RankResult::UpstreamError { detail } => Some(format!("upstream error: {detail}")),
            RankResult::Timeout => Some("upstream timeout".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_builder() {
        let q = RankQuery::new("dedreviil12")
            .with_platform("uplay")
            .with_region("emea");
        assert_eq!(q.username, "dedreviil12");
        assert_eq!(q.platform.as_deref(), Some("uplay"));
        assert_eq!(q.region.as_deref(), Some("emea"));
    }

    #[test]
    fn test_failure_detail() {
        assert!(RankResult::Found { rank: "Gold".into() }
            .failure_detail()
            .is_none());
        assert_eq!(
            RankResult::Unranked.failure_detail().as_deref(),
            Some("rank not found")
        );
        assert_eq!(
            RankResult::Timeout.failure_detail().as_deref(),
            Some("upstream timeout")
        );
        let detail = RankResult::UpstreamError {
            detail: "status 503".into(),
        }
        .failure_detail()
        .unwrap();
        assert!(detail.contains("503"));
    }
}
