//! Snapshot persistence for the world document.
//!
//! The whole [`WorldSnapshot`] lives in one pretty-printed JSON file. Saves
//! go to a sibling `.tmp` file that is then renamed over the target, so a
//! reader never sees a half-written document. A missing or unreadable file
//! is treated as no prior state: a fresh world is synthesized and saved.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use township_types::WorldSnapshot;
use township_world::{WorldError, create_starting_world};

/// Errors that can occur in the world store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Reading or writing the document failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The document could not be encoded or decoded.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A fresh world could not be synthesized.
    #[error("World synthesis error: {0}")]
    Synthesis(#[from] WorldError),
}

/// Reads and writes the world snapshot document.
#[derive(Debug, Clone)]
pub struct WorldStore {
    path: PathBuf,
}

impl WorldStore {
    /// Create a store for the document at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the snapshot document.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = OsString::from(self.path.as_os_str());
        name.push(".tmp");
        PathBuf::from(name)
    }

    /// Read the document, failing if it is missing or malformed.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] or [`StoreError::Serialization`].
    pub async fn read(&self) -> Result<WorldSnapshot, StoreError> {
        let bytes = tokio::fs::read(&self.path).await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Load the snapshot, synthesizing and saving a fresh world when the
    /// document is missing or unreadable.
    ///
    /// A failed save of the fresh world is logged and the world is still
    /// returned.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Synthesis`] if the default world cannot be
    /// built.
    pub async fn load(&self) -> Result<WorldSnapshot, StoreError> {
        match self.read().await {
            Ok(snapshot) => {
                debug!(path = %self.path.display(), epoch = snapshot.epoch, "Snapshot loaded");
                Ok(snapshot)
            }
            Err(e) => {
                warn!(
                    path = %self.path.display(),
                    error = %e,
                    "No usable snapshot, synthesizing a fresh world"
                );
                let snapshot = create_starting_world()?;
                if let Err(save_error) = self.save(&snapshot).await {
                    warn!(error = %save_error, "Failed to persist synthesized world");
                } else {
                    info!(
                        path = %self.path.display(),
                        residents = snapshot.residents.len(),
                        "Fresh world saved"
                    );
                }
                Ok(snapshot)
            }
        }
    }

    /// Overwrite the document with `snapshot`.
    ///
    /// Parent directories are created on demand. The snapshot itself is
    /// not touched.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if encoding or any file operation fails.
    pub async fn save(&self, snapshot: &WorldSnapshot) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await?;
        }
        let bytes = serde_json::to_vec_pretty(snapshot)?;
        let temp = self.temp_path();
        tokio::fs::write(&temp, &bytes).await?;
        tokio::fs::rename(&temp, &self.path).await?;
        debug!(path = %self.path.display(), bytes = bytes.len(), "Snapshot saved");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn scratch(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("township-store-{name}-{}", std::process::id()))
            .join("world.json")
    }

    #[tokio::test]
    async fn missing_document_synthesizes_and_saves() {
        let path = scratch("missing");
        let _ = tokio::fs::remove_file(&path).await;
        let store = WorldStore::new(&path);

        let snapshot = store.load().await.unwrap();

        assert!(!snapshot.residents.is_empty());
        assert!(path.exists());
        assert_eq!(store.read().await.unwrap(), snapshot);
    }

    #[tokio::test]
    async fn corrupt_document_is_replaced() {
        let path = scratch("corrupt");
        tokio::fs::create_dir_all(path.parent().unwrap()).await.unwrap();
        tokio::fs::write(&path, b"{ not json").await.unwrap();
        let store = WorldStore::new(&path);

        let snapshot = store.load().await.unwrap();

        assert_eq!(snapshot.epoch, 0);
        assert!(store.read().await.is_ok());
    }

    #[tokio::test]
    async fn save_leaves_no_temp_file() {
        let path = scratch("temp");
        let store = WorldStore::new(&path);
        store.save(&WorldSnapshot::default()).await.unwrap();

        assert!(path.exists());
        assert!(!store.temp_path().exists());
    }
}
