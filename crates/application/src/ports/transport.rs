//! HTTP transport port

use async_trait::async_trait;
use lumen_domain::{RequestSpec, ResponseSpec};

/// Errors that can occur while executing a request.
///
/// A completed response, whatever its status, is NOT a
/// transport error; it comes back as a [`ResponseSpec`] for the classifier
/// to judge.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The server could not be reached at all.
    #[error("connection failed: {0}")]
    Unreachable(String),

    /// No response arrived within the configured timeout.
    #[error("request timed out after {timeout_ms}ms")]
    Timeout {
        /// The timeout that elapsed.
        timeout_ms: u64,
    },

    /// The request could not be built (bad path, header, or body).
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Any other transport-level fault.
    #[error("transport error: {0}")]
    Other(String),
}

/// Port for executing HTTP requests against the configured API base URL.
///
/// Implementations resolve the request's relative path, send it, and return
/// the completed response verbatim. They do not attach credentials, retry,
/// or interpret statuses; that is the session core's job.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Executes a request and returns the completed response.
    ///
    /// # Errors
    ///
    /// Returns an error only when no response was received.
    async fn execute(&self, request: &RequestSpec) -> Result<ResponseSpec, TransportError>;
}
