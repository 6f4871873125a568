//! Session error taxonomy.
//!
//! Errors here are what callers of the session client see. They are `Clone`
//! because one refresh outcome settles every request queued behind it.

use thiserror::Error;

/// Errors surfaced by the session client.
///
/// A recoverable unauthorized response never appears here: it is absorbed by
/// the refresh protocol. What does appear is the terminal form,
/// [`SessionError::SessionExpired`], after the refresh failed, was
/// impossible, or a freshly refreshed credential was rejected again.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// No response was received at all. The caller should check
    /// connectivity; this layer does not retry.
    #[error("server unreachable: {message}")]
    Unreachable {
        /// Underlying connectivity failure.
        message: String,
    },

    /// The session could not be kept alive. Credentials have been cleared;
    /// the upstream UI is expected to route to a login screen.
    #[error("session expired: {message}")]
    SessionExpired {
        /// Why the session ended.
        message: String,
    },

    /// The server answered with a non-success status unrelated to auth.
    #[error("{message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Server-provided message, or a generic fallback.
        message: String,
    },

    /// The request could not be issued for a non-connectivity reason.
    #[error("transport error: {message}")]
    Transport {
        /// Underlying transport fault.
        message: String,
    },

    /// The credential store rejected a read or write.
    #[error("credential storage failed: {message}")]
    Storage {
        /// Underlying storage fault.
        message: String,
    },

    /// The request was cancelled while queued behind a refresh.
    #[error("request cancelled before replay")]
    Cancelled,
}

impl SessionError {
    /// Shorthand for a terminal session-expired error.
    #[must_use]
    pub fn expired(message: impl Into<String>) -> Self {
        Self::SessionExpired {
            message: message.into(),
        }
    }

    /// Shorthand for a storage failure.
    #[must_use]
    pub fn storage(error: &impl std::fmt::Display) -> Self {
        Self::Storage {
            message: error.to_string(),
        }
    }
}

/// Result type alias for session operations.
pub type SessionResult<T> = Result<T, SessionError>;
