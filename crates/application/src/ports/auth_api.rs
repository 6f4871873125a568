//! Auth endpoint port
//!
//! The refresh and logout calls go through this port, implemented on a bare
//! transport that never passes through the intercepted client; otherwise a
//! 401 from the refresh endpoint itself would recurse into the refresh
//! protocol.

use async_trait::async_trait;
use lumen_domain::TokenGrant;

/// Errors from the auth endpoints.
///
/// `Clone` because a single refresh outcome settles every queued waiter.
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum AuthApiError {
    /// The endpoint could not be reached.
    #[error("network error: {0}")]
    Network(String),

    /// The endpoint answered with a non-success status.
    #[error("refresh rejected ({status}): {message}")]
    Rejected {
        /// HTTP status code.
        status: u16,
        /// Server-provided message, or the raw body.
        message: String,
    },

    /// The endpoint answered 2xx but the grant could not be decoded.
    #[error("malformed grant response: {0}")]
    MalformedResponse(String),
}

/// Port for the authentication endpoints.
#[async_trait]
pub trait AuthApi: Send + Sync {
    /// Exchanges a refresh token for a new grant.
    ///
    /// # Errors
    ///
    /// Returns an error if the exchange failed for any reason; the caller
    /// treats every failure as terminal for the session.
    async fn refresh(&self, refresh_token: &str) -> Result<TokenGrant, AuthApiError>;

    /// Invalidates the refresh token server-side.
    ///
    /// Best-effort: callers clear local credentials whether or not this
    /// succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error if the server could not be told.
    async fn logout(&self, refresh_token: &str) -> Result<(), AuthApiError>;
}
