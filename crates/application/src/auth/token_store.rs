//! Durable credential storage with expiry tracking.

use std::sync::Arc;

use lumen_domain::Credentials;

use crate::ports::{Clock, CredentialStorage, StorageError};

/// Logical storage keys for the persisted credential record.
mod keys {
    pub const ACCESS_TOKEN: &str = "session.access_token";
    pub const REFRESH_TOKEN: &str = "session.refresh_token";
    pub const EXPIRES_AT: &str = "session.expires_at";

    pub const ALL: [&str; 3] = [ACCESS_TOKEN, REFRESH_TOKEN, EXPIRES_AT];
}

/// The single owner of persisted session credentials.
///
/// Every other component reads and writes credentials through this store.
/// The record is all-or-nothing: a partially written or unparsable record
/// reads back as absent, never as half a credential pair.
#[derive(Clone)]
pub struct TokenStore {
    storage: Arc<dyn CredentialStorage>,
    clock: Arc<dyn Clock>,
}

impl TokenStore {
    /// Creates a store over the given persistence medium and clock.
    #[must_use]
    pub fn new(storage: Arc<dyn CredentialStorage>, clock: Arc<dyn Clock>) -> Self {
        Self { storage, clock }
    }

    /// Reads the current credentials, or `None` if no complete record exists.
    ///
    /// # Errors
    ///
    /// Returns an error only if the medium itself could not be read; a
    /// damaged record is reported as absent.
    pub async fn get(&self) -> Result<Option<Credentials>, StorageError> {
        let access = self.storage.get(keys::ACCESS_TOKEN).await?;
        let refresh = self.storage.get(keys::REFRESH_TOKEN).await?;
        let expires = self.storage.get(keys::EXPIRES_AT).await?;

        match (access, refresh, expires) {
            (Some(access), Some(refresh), Some(expires)) => {
                match Credentials::from_parts(access, refresh, &expires) {
                    Ok(credentials) => Ok(Some(credentials)),
                    Err(error) => {
                        tracing::warn!(%error, "stored credential record is damaged; treating as absent");
                        Ok(None)
                    }
                }
            }
            (None, None, None) => Ok(None),
            _ => {
                tracing::warn!("stored credential record is incomplete; treating as absent");
                Ok(None)
            }
        }
    }

    /// Replaces the stored credential pair.
    ///
    /// Writes all three values; if any write is rejected the record is
    /// rolled back to cleared, so a token that was never durably stored is
    /// never presented as the current session.
    ///
    /// # Errors
    ///
    /// Returns the write rejection. The store is cleared afterwards and the
    /// caller must treat the session as unauthenticated.
    pub async fn set(&self, credentials: &Credentials) -> Result<(), StorageError> {
        let result = self.write_record(credentials).await;
        if result.is_err() {
            if let Err(error) = self.clear().await {
                tracing::warn!(%error, "rollback after rejected credential write failed");
            }
        }
        result
    }

    async fn write_record(&self, credentials: &Credentials) -> Result<(), StorageError> {
        self.storage
            .set(keys::ACCESS_TOKEN, &credentials.access_token)
            .await?;
        self.storage
            .set(keys::REFRESH_TOKEN, &credentials.refresh_token)
            .await?;
        self.storage
            .set(keys::EXPIRES_AT, &credentials.expires_at_string())
            .await
    }

    /// Removes the stored credential pair.
    ///
    /// All keys are attempted even if one removal fails.
    ///
    /// # Errors
    ///
    /// Returns the first removal failure, if any.
    pub async fn clear(&self) -> Result<(), StorageError> {
        let mut first_error = None;
        for key in keys::ALL {
            if let Err(error) = self.storage.delete(key).await {
                first_error.get_or_insert(error);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    /// True if a complete record exists and has not expired.
    pub async fn is_valid(&self) -> bool {
        match self.get().await {
            Ok(Some(credentials)) => credentials.is_valid_at(self.clock.now()),
            _ => false,
        }
    }
}

impl std::fmt::Debug for TokenStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenStore").finish_non_exhaustive()
    }
}
