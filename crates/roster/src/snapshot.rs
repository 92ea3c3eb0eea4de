//! Persisted roster snapshot and reconciliation against it.
//!
//! Exactly one snapshot is kept per key. A run reads it once, diffs the
//! current roster against it and, unless dry-running, overwrites it with the
//! current roster before anything is announced.

use crate::diff::{DiffResult, diff_lists, identity_key};
use crate::error::{Error, Result};
use crate::store::BlobStore;
use crate::types::{RosterEntry, Snapshot};

/// Default blob key of the snapshot.
pub const DEFAULT_SNAPSHOT_KEY: &str = "security-champions.json";

/// Baseline to diff against.
///
/// Without a previous snapshot the current roster is its own baseline, so a
/// first run reports no changes instead of announcing every member.
pub fn first_run_baseline<'a, T>(previous: Option<&'a [T]>, current: &'a [T]) -> &'a [T] {
    previous.unwrap_or(current)
}

/// Snapshot persistence on top of a [`BlobStore`].
#[derive(Debug, Clone)]
pub struct SnapshotStore<S> {
    store: S,
    key: String,
}

impl<S: BlobStore> SnapshotStore<S> {
    /// Snapshot under [`DEFAULT_SNAPSHOT_KEY`].
    pub fn new(store: S) -> Self {
        Self::with_key(store, DEFAULT_SNAPSHOT_KEY)
    }

    /// Snapshot under a custom key.
    pub fn with_key(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    /// Blob key of the snapshot.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Load the previous snapshot, `None` if none was ever saved.
    ///
    /// # Errors
    ///
    /// Unparseable content is `Error::CorruptSnapshot`, never `None`.
    pub fn load_previous(&self) -> Result<Option<Snapshot>> {
        if !self.store.exists(&self.key)? {
            log::debug!("No snapshot at {}", self.key);
            return Ok(None);
        }

        let bytes = self.store.read(&self.key)?;
        let snapshot: Snapshot =
            serde_json::from_slice(&bytes).map_err(|source| Error::CorruptSnapshot {
                key: self.key.clone(),
                source,
            })?;

        log::debug!("Loaded snapshot {} ({} entries)", self.key, snapshot.len());
        Ok(Some(snapshot))
    }

    /// Overwrite the snapshot with `entries`, pretty-printed.
    pub fn save(&self, entries: &[RosterEntry]) -> Result<()> {
        let json = serde_json::to_string_pretty(entries)?;
        self.store.write(&self.key, json.as_bytes())?;
        log::info!("Saved snapshot {} ({} entries)", self.key, entries.len());
        Ok(())
    }

    /// Diff `current` against the stored snapshot and, unless `dry_run`,
    /// store `current` as the new snapshot.
    ///
    /// The snapshot is written even when nothing changed. A failed write is
    /// returned as an error, so the caller never announces an unrecorded
    /// change.
    pub fn reconcile(&self, current: &[RosterEntry], dry_run: bool) -> Result<DiffResult> {
        let previous = self.load_previous()?;
        if previous.is_none() {
            log::info!("First run: using the current roster as baseline");
        }

        let baseline = first_run_baseline(previous.as_deref(), current);
        let diff = diff_lists(baseline, current, identity_key);

        if dry_run {
            log::info!("Dry run: not saving snapshot {}", self.key);
        } else {
            self.save(current)?;
        }
        Ok(diff)
    }
}
