//! File-backed credential storage.
//!
//! Persists named values as a single JSON document, the durable analog of
//! the browser storage the original session layer relied on. Writes go to a
//! temporary file first and are renamed into place, so a crash mid-write
//! leaves the previous record intact rather than a torn one.

use std::collections::HashMap;
use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;

use lumen_application::ports::{CredentialStorage, StorageError};

/// Durable credential storage in a JSON file.
pub struct FileCredentialStorage {
    path: PathBuf,
    /// Serializes read-modify-write cycles on the backing file.
    guard: tokio::sync::Mutex<()>,
}

impl FileCredentialStorage {
    /// Creates storage backed by the given file path.
    ///
    /// The file and its parent directories are created on first write.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            guard: tokio::sync::Mutex::new(()),
        }
    }

    async fn load(&self) -> Result<HashMap<String, String>, StorageError> {
        match fs::read(&self.path).await {
            Ok(bytes) => serde_json::from_slice(&bytes)
                .map_err(|e| StorageError::Serialization(e.to_string())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(HashMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    async fn save(&self, records: &HashMap<String, String>) -> Result<(), StorageError> {
        let bytes = serde_json::to_vec_pretty(records)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let staging = self.path.with_extension("tmp");
        fs::write(&staging, &bytes).await?;
        fs::rename(&staging, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl CredentialStorage for FileCredentialStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let _guard = self.guard.lock().await;
        Ok(self.load().await?.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let _guard = self.guard.lock().await;
        let mut records = self.load().await?;
        records.insert(key.to_string(), value.to_string());
        self.save(&records).await
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        let _guard = self.guard.lock().await;
        let mut records = self.load().await?;
        if records.remove(key).is_some() {
            self.save(&records).await?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for FileCredentialStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileCredentialStorage")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}
