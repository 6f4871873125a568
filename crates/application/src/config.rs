//! Session client configuration.

use serde::{Deserialize, Serialize};
use url::Url;

fn default_auth_scheme() -> String {
    "Bearer".to_string()
}

fn default_refresh_path() -> String {
    "/auth/refresh-token".to_string()
}

fn default_logout_path() -> String {
    "/auth/logout".to_string()
}

const fn default_timeout_ms() -> u64 {
    30_000
}

/// Configuration for a session client instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Base URL of the API, e.g. `https://media.example.com/api`.
    pub base_url: Url,
    /// Authorization scheme prefixed to the access token.
    #[serde(default = "default_auth_scheme")]
    pub auth_scheme: String,
    /// Path of the token refresh endpoint, relative to `base_url`.
    #[serde(default = "default_refresh_path")]
    pub refresh_path: String,
    /// Path of the logout endpoint, relative to `base_url`.
    #[serde(default = "default_logout_path")]
    pub logout_path: String,
    /// Per-request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl SessionConfig {
    /// Creates a configuration with defaults for everything but the base URL.
    #[must_use]
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            auth_scheme: default_auth_scheme(),
            refresh_path: default_refresh_path(),
            logout_path: default_logout_path(),
            timeout_ms: default_timeout_ms(),
        }
    }

    /// Overrides the authorization scheme.
    #[must_use]
    pub fn with_auth_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.auth_scheme = scheme.into();
        self
    }

    /// Overrides the per-request timeout.
    #[must_use]
    pub const fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Resolves a relative path against the base URL.
    ///
    /// Unlike [`Url::join`], this appends to the base path instead of
    /// replacing its last segment, so a base of `.../api` keeps its prefix.
    #[must_use]
    pub fn endpoint_url(&self, path: &str) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty();
            segments.extend(path.split('/').filter(|s| !s.is_empty()));
        }
        url
    }
}
