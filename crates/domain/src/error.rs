//! Domain error types

use thiserror::Error;

/// Domain-level errors that can occur during validation or decoding.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A persisted expiry instant could not be parsed.
    #[error("invalid expiry instant: {0}")]
    InvalidExpiry(String),

    /// A header name or value contains characters that cannot go on the wire.
    #[error("invalid header: {0}")]
    InvalidHeader(String),
}

/// Result type alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
