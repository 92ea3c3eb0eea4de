//! Blob stores holding the persisted snapshot and the user cache.
//!
//! Two real backends exist: [`file::FileStore`] keeps blobs in a local
//! directory, [`gcs::GcsStore`] keeps them in a Cloud Storage bucket.
//! Which one a run uses is a configuration choice; the sync logic only sees
//! [`BlobStore`].
//!
//! # Testing
//!
//! Use [`MemoryStore`] for testing without touching disk or network:
//!
//! ```
//! use roster::store::{BlobStore, MemoryStore};
//!
//! let store = MemoryStore::new();
//! store.write("snapshot.json", b"[]").unwrap();
//! assert!(store.exists("snapshot.json").unwrap());
//! ```

pub mod file;
pub mod gcs;

use crate::error::{Error, Result};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

/// Keyed byte storage.
pub trait BlobStore: Send + Sync {
    /// Whether a blob exists under `key`.
    fn exists(&self, key: &str) -> Result<bool>;

    /// Read the blob under `key`.
    ///
    /// # Errors
    ///
    /// Returns `Error::BlobNotFound` if nothing is stored under `key`.
    fn read(&self, key: &str) -> Result<Vec<u8>>;

    /// Store `bytes` under `key`, replacing any previous blob.
    fn write(&self, key: &str, bytes: &[u8]) -> Result<()>;
}

impl<S: BlobStore + ?Sized> BlobStore for Box<S> {
    fn exists(&self, key: &str) -> Result<bool> {
        (**self).exists(key)
    }

    fn read(&self, key: &str) -> Result<Vec<u8>> {
        (**self).read(key)
    }

    fn write(&self, key: &str, bytes: &[u8]) -> Result<()> {
        (**self).write(key, bytes)
    }
}

impl<S: BlobStore + ?Sized> BlobStore for &S {
    fn exists(&self, key: &str) -> Result<bool> {
        (**self).exists(key)
    }

    fn read(&self, key: &str) -> Result<Vec<u8>> {
        (**self).read(key)
    }

    fn write(&self, key: &str, bytes: &[u8]) -> Result<()> {
        (**self).write(key, bytes)
    }
}

/// In-memory store for tests.
///
/// Clones share the same blobs, so a test can keep a handle and inspect
/// what a run persisted.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    blobs: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    fail_writes: Arc<Mutex<bool>>,
}

impl MemoryStore {
    /// Create a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding one blob.
    #[must_use]
    pub fn with_blob(key: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        let store = Self::new();
        store.insert(key, bytes);
        store
    }

    /// Put a blob directly.
    pub fn insert(&self, key: impl Into<String>, bytes: impl Into<Vec<u8>>) {
        self.blobs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.into(), bytes.into());
    }

    /// Make every subsequent write fail.
    pub fn fail_writes(&self) {
        *self
            .fail_writes
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = true;
    }

    /// Blob under `key` as UTF-8, if any.
    pub fn get_string(&self, key: &str) -> Option<String> {
        self.blobs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .map(|b| String::from_utf8_lossy(b).into_owned())
    }
}

impl BlobStore for MemoryStore {
    fn exists(&self, key: &str) -> Result<bool> {
        let blobs = self.blobs.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(blobs.contains_key(key))
    }

    fn read(&self, key: &str) -> Result<Vec<u8>> {
        let blobs = self.blobs.lock().unwrap_or_else(PoisonError::into_inner);
        blobs
            .get(key)
            .cloned()
            .ok_or_else(|| Error::BlobNotFound(key.to_string()))
    }

    fn write(&self, key: &str, bytes: &[u8]) -> Result<()> {
        if *self
            .fail_writes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
        {
            return Err(Error::Other(format!("write to {key} refused")));
        }
        self.insert(key, bytes);
        Ok(())
    }
}
