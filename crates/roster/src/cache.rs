//! Cache of the Slack user list.
//!
//! Fetching every Slack user is the slowest part of a run. With a cache the
//! list is fetched once and read from the store afterwards; delete the blob to
//! refresh it.

use crate::backend::ChatPlatform;
use crate::error::{Error, Result};
use crate::store::BlobStore;
use crate::types::ChatUser;

/// Default blob key of the user cache.
pub const DEFAULT_USER_CACHE_KEY: &str = "users.json";

/// Slack users cached in a [`BlobStore`].
#[derive(Debug, Clone)]
pub struct UserCache<S> {
    store: S,
    key: String,
}

impl<S: BlobStore> UserCache<S> {
    /// Cache under [`DEFAULT_USER_CACHE_KEY`].
    pub fn new(store: S) -> Self {
        Self {
            store,
            key: DEFAULT_USER_CACHE_KEY.to_string(),
        }
    }

    /// Cached users, `None` if the cache is empty.
    pub fn load(&self) -> Result<Option<Vec<ChatUser>>> {
        if !self.store.exists(&self.key)? {
            return Ok(None);
        }
        let bytes = self.store.read(&self.key)?;
        let users = serde_json::from_slice(&bytes).map_err(|source| Error::CorruptCache {
            key: self.key.clone(),
            source,
        })?;
        Ok(Some(users))
    }

    /// Cached users, or the live list from `chat`.
    ///
    /// A fetched list is written back unless `dry_run`.
    pub fn load_or_fetch(&self, chat: &dyn ChatPlatform, dry_run: bool) -> Result<Vec<ChatUser>> {
        if let Some(users) = self.load()? {
            log::debug!("Using {} cached Slack users from {}", users.len(), self.key);
            return Ok(users);
        }

        let users = chat.all_users()?;
        if !dry_run {
            let json = serde_json::to_string_pretty(&users)?;
            self.store.write(&self.key, json.as_bytes())?;
            log::debug!("Cached {} Slack users in {}", users.len(), self.key);
        }
        Ok(users)
    }
}
