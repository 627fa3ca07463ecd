//! Environment-driven configuration.
//!
//! A single service: one listen port, two upstream URL templates, one
//! outbound timeout. Everything comes from environment variables with
//! working defaults; `main` may override the port from the CLI.

/// Default listen port when `PORT` is unset.
pub const DEFAULT_PORT: u16 = 8080;

/// Default outbound request timeout in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Default profile-existence API (queried with `?username=&platform=`).
pub const DEFAULT_PROFILE_API: &str = "https://r6stats.esportsapp.gg/api/v1/profile";

/// Default HTML profile page base (username appended as a path segment).
pub const DEFAULT_RANK_PAGE: &str = "https://r6.tracker.network/profile/pc";

/// Service configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Port the REST API listens on.
    pub port: u16,
    /// Upstream profile-existence API URL (JSON, `userId` field).
    pub profile_api: String,
    /// Upstream HTML profile page base URL.
    pub rank_page: String,
    /// Outbound request timeout in milliseconds. Single attempt, no retry.
    pub timeout_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            profile_api: DEFAULT_PROFILE_API.to_string(),
            rank_page: DEFAULT_RANK_PAGE.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

impl Config {
    /// Load configuration from environment variables, falling back to
    /// defaults for anything unset or unparsable.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            port: env_parse("PORT", defaults.port),
            profile_api: std::env::var("RANKGATE_PROFILE_API")
                .unwrap_or(defaults.profile_api),
            rank_page: std::env::var("RANKGATE_RANK_PAGE").unwrap_or(defaults.rank_page),
            timeout_ms: env_parse("RANKGATE_TIMEOUT_MS", defaults.timeout_ms),
        }
    }
}

fn env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}
