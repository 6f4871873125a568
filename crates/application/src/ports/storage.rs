//! Credential storage port
//!
//! Defines the interface for durable persistence of named string values.

use async_trait::async_trait;

/// Errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The medium rejected a write (quota exceeded, read-only mount, ...).
    #[error("storage write rejected: {0}")]
    WriteRejected(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A persisted record could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Port for persisting named string values durably.
///
/// The store must survive process restarts; in-memory implementations are
/// for tests and short-lived embedders only. A failed `set` means the value
/// was NOT durably stored and the caller must not behave as if it was.
#[async_trait]
pub trait CredentialStorage: Send + Sync {
    /// Reads a value by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the medium could not be read.
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Writes a value durably.
    ///
    /// # Errors
    ///
    /// Returns an error if the write was rejected; the previous value (or
    /// absence) is then still in effect.
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Removes a value. Removing an absent value is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the medium could not be written.
    async fn delete(&self, key: &str) -> Result<(), StorageError>;
}
