//! Local directory backend.

use crate::error::{Error, Result};
use crate::store::BlobStore;
use std::fs;
use std::path::{Path, PathBuf};

/// Blobs stored as files in one directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Store rooted at `root`. A leading `~` is expanded.
    pub fn new(root: impl AsRef<str>) -> Self {
        let expanded = shellexpand::tilde(root.as_ref());
        Self {
            root: PathBuf::from(expanded.as_ref()),
        }
    }

    /// Store rooted at the default state directory (~/.local/state/champion-sync)
    pub fn default_location() -> Result<Self> {
        let home = dirs::home_dir()
            .ok_or_else(|| Error::Other("could not determine home directory".to_string()))?;
        Ok(Self {
            root: home.join(".local").join("state").join("champion-sync"),
        })
    }

    /// Directory holding the blobs.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> Result<PathBuf> {
        if key.is_empty() || key == "." || key == ".." || key.contains(['/', '\\']) {
            return Err(Error::InvalidKey(key.to_string()));
        }
        Ok(self.root.join(key))
    }
}

impl BlobStore for FileStore {
    fn exists(&self, key: &str) -> Result<bool> {
        Ok(self.path_for(key)?.is_file())
    }

    fn read(&self, key: &str) -> Result<Vec<u8>> {
        let path = self.path_for(key)?;
        fs::read(&path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::BlobNotFound(key.to_string())
            } else {
                Error::io(&path, e)
            }
        })
    }

    fn write(&self, key: &str, bytes: &[u8]) -> Result<()> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.root).map_err(|e| Error::io(&self.root, e))?;

        // Rename over the target so a crash never leaves half a snapshot
        let tmp = self.root.join(format!(".{key}.tmp"));
        fs::write(&tmp, bytes).map_err(|e| Error::io(&tmp, e))?;
        fs::rename(&tmp, &path).map_err(|e| Error::io(&path, e))?;

        log::debug!("Wrote {} bytes to {}", bytes.len(), path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_file_store_roundtrip() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path().to_str().unwrap());

        assert!(!store.exists("snapshot.json").unwrap());
        store.write("snapshot.json", b"[]").unwrap();
        assert!(store.exists("snapshot.json").unwrap());
        assert_eq!(store.read("snapshot.json").unwrap(), b"[]");
    }

    #[test]
    fn test_file_store_creates_missing_root() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("a").join("b");
        let store = FileStore::new(nested.to_str().unwrap());

        store.write("k.json", b"{}").unwrap();
        assert!(nested.join("k.json").is_file());
    }

    #[test]
    fn test_file_store_overwrites() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path().to_str().unwrap());

        store.write("k", b"first").unwrap();
        store.write("k", b"second").unwrap();
        assert_eq!(store.read("k").unwrap(), b"second");
        assert!(!dir.path().join(".k.tmp").exists());
    }

    #[test]
    fn test_file_store_read_missing() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path().to_str().unwrap());
        assert!(matches!(store.read("nope"), Err(Error::BlobNotFound(_))));
    }

    #[test]
    fn test_file_store_rejects_path_keys() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path().to_str().unwrap());

        assert!(matches!(store.write("../escape", b""), Err(Error::InvalidKey(_))));
        assert!(matches!(store.exists("a/b"), Err(Error::InvalidKey(_))));
        assert!(matches!(store.read(".."), Err(Error::InvalidKey(_))));
    }

    #[test]
    fn test_file_store_expands_tilde() {
        let store = FileStore::new("~/state");
        if let Some(home) = dirs::home_dir() {
            assert_eq!(store.root(), home.join("state"));
        }
    }
}
