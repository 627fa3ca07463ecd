//! Local errors.
//!
//! Upstream and extraction failures are data, not errors — they live in
//! [`crate::types::RankResult`]. This enum covers requests rejected
//! before any outbound call plus faults in our own process, which must
//! not be blamed on the upstream.

/// Errors raised by the gateway itself rather than the upstream.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum GatewayError {
    /// Client input rejected before any outbound call.
    #[error("username must not be empty")]
    EmptyUsername,
    /// Unexpected local fault (a panicked worker task, for example).
    /// Maps to HTTP 500, never to an upstream-failure outcome.
    #[error("internal error: {0}")]
    Internal(String),
}
