//! Configuration for the API client.

use std::{env, time::Duration};

/// API base URL - read at compile time, defaults to a local development server.
/// Deployments set NEWSDESK_API_URL when building; the same variable also
/// overrides the value at runtime through `ClientConfig::from_env`.
pub const API_BASE: &str = match option_env!("NEWSDESK_API_URL") {
    Some(url) => url,
    None => "http://localhost:1337",
};

/// Environment variable that overrides the API base URL at runtime.
pub const API_URL_ENV: &str = "NEWSDESK_API_URL";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Where and how the client talks to the content API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// API origin without a trailing slash.
    pub base_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: API_BASE.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ClientConfig {
    /// Build-time defaults, overridden by `NEWSDESK_API_URL` when set and non-empty.
    pub fn from_env() -> Self {
        match env::var(API_URL_ENV) {
            Ok(url) if !url.trim().is_empty() => Self::default().with_base_url(url),
            _ => Self::default(),
        }
    }

    /// Replace the base URL; trailing slashes are dropped.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Replace the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Join an API path (`/api/...`) onto the base URL.
    pub fn endpoint(&self, path: &str) -> String {
        let path = path.strip_prefix('/').unwrap_or(path);
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }
}
