//! Diff computation between two roster snapshots

use crate::types::RosterEntry;
use std::collections::HashSet;
use std::fmt;

/// Stable identity of a membership: team id and person ident.
pub fn identity_key(entry: &RosterEntry) -> String {
    format!("{}/{}", entry.group.id, entry.nav_ident)
}

/// Entries partitioned by what happened to them between two snapshots.
///
/// Each partition keeps the order of the snapshot it was taken from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diff<T> {
    /// In current, not in previous.
    pub added: Vec<T>,
    /// In previous, not in current.
    pub removed: Vec<T>,
    /// In both; holds the current copy.
    pub unchanged: Vec<T>,
}

/// Diff of raw roster entries.
pub type DiffResult = Diff<RosterEntry>;

impl<T> Diff<T> {
    /// Whether anything was added or removed
    pub fn has_changes(&self) -> bool {
        !self.added.is_empty() || !self.removed.is_empty()
    }

    /// Counts per partition
    pub fn summary(&self) -> DiffSummary {
        DiffSummary {
            added: self.added.len(),
            removed: self.removed.len(),
            unchanged: self.unchanged.len(),
        }
    }

    /// Transform every entry, keeping partitions and order
    pub fn map<U>(self, mut f: impl FnMut(T) -> U) -> Diff<U> {
        Diff {
            added: self.added.into_iter().map(&mut f).collect(),
            removed: self.removed.into_iter().map(&mut f).collect(),
            unchanged: self.unchanged.into_iter().map(&mut f).collect(),
        }
    }
}

impl<T> Default for Diff<T> {
    fn default() -> Self {
        Self {
            added: Vec::new(),
            removed: Vec::new(),
            unchanged: Vec::new(),
        }
    }
}

/// Compare two lists by a derived key.
///
/// `added` and `unchanged` come from `current`, `removed` from `previous`.
pub fn diff_lists<T, K>(previous: &[T], current: &[T], key: K) -> Diff<T>
where
    T: Clone,
    K: Fn(&T) -> String,
{
    let previous_keys: HashSet<String> = previous.iter().map(&key).collect();
    let current_keys: HashSet<String> = current.iter().map(&key).collect();

    let mut diff = Diff::default();
    for item in current {
        if previous_keys.contains(&key(item)) {
            diff.unchanged.push(item.clone());
        } else {
            diff.added.push(item.clone());
        }
    }
    diff.removed = previous
        .iter()
        .filter(|item| !current_keys.contains(&key(*item)))
        .cloned()
        .collect();
    diff
}

/// Diff summary statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiffSummary {
    /// Number of entries added
    pub added: usize,
    /// Number of entries removed
    pub removed: usize,
    /// Number of entries present in both snapshots
    pub unchanged: usize,
}

impl DiffSummary {
    /// Number of added plus removed entries
    pub fn total_changes(&self) -> usize {
        self.added + self.removed
    }
}

impl fmt::Display for DiffSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} added, {} removed, {} unchanged",
            self.added, self.removed, self.unchanged
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Group, Person};

    fn entry(group: &str, ident: &str) -> RosterEntry {
        RosterEntry::new(
            Group::new(group, format!("Team {group}"), format!("https://ui/{group}")),
            ident,
            Person::default(),
        )
    }

    fn idents(entries: &[RosterEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.nav_ident.as_str()).collect()
    }

    #[test]
    fn test_identity_key() {
        assert_eq!(identity_key(&entry("A", "u1")), "A/u1");
    }

    #[test]
    fn test_same_person_in_two_teams_has_distinct_keys() {
        assert_ne!(identity_key(&entry("A", "u1")), identity_key(&entry("B", "u1")));
    }

    #[test]
    fn test_diff_added_removed_unchanged() {
        let previous = vec![entry("A", "u1"), entry("A", "u2")];
        let current = vec![entry("A", "u2"), entry("A", "u3")];

        let diff = diff_lists(&previous, &current, identity_key);

        assert_eq!(idents(&diff.added), ["u3"]);
        assert_eq!(idents(&diff.removed), ["u1"]);
        assert_eq!(idents(&diff.unchanged), ["u2"]);
    }

    #[test]
    fn test_diff_of_identical_snapshots_is_unchanged() {
        let snapshot = vec![entry("A", "u1"), entry("B", "u2"), entry("A", "u3")];

        let diff = diff_lists(&snapshot, &snapshot, identity_key);

        assert!(diff.added.is_empty());
        assert!(diff.removed.is_empty());
        assert_eq!(diff.unchanged, snapshot);
        assert!(!diff.has_changes());
    }

    #[test]
    fn test_diff_keeps_current_copy_for_unchanged() {
        let previous = vec![entry("A", "u1")];
        let mut renamed = entry("A", "u1");
        renamed.group.name = "Renamed".to_string();

        let diff = diff_lists(&previous, std::slice::from_ref(&renamed), identity_key);

        assert_eq!(diff.unchanged, vec![renamed]);
    }

    #[test]
    fn test_diff_team_move_is_add_and_remove() {
        let previous = vec![entry("A", "u1")];
        let current = vec![entry("B", "u1")];

        let diff = diff_lists(&previous, &current, identity_key);

        assert_eq!(diff.added[0].group.id, "B");
        assert_eq!(diff.removed[0].group.id, "A");
        assert!(diff.unchanged.is_empty());
    }

    #[test]
    fn test_diff_partitions_cover_both_snapshots() {
        let previous = vec![entry("A", "u1"), entry("A", "u2"), entry("B", "u4")];
        let current = vec![entry("B", "u4"), entry("A", "u3"), entry("A", "u1"), entry("C", "u5")];

        let diff = diff_lists(&previous, &current, identity_key);

        assert_eq!(diff.added.len() + diff.unchanged.len(), current.len());
        assert_eq!(diff.removed.len() + diff.unchanged.len(), previous.len());
        for e in &current {
            let in_added = diff.added.contains(e);
            let in_unchanged = diff.unchanged.contains(e);
            assert!(in_added ^ in_unchanged, "{} must be in exactly one", identity_key(e));
        }
    }

    #[test]
    fn test_diff_preserves_order() {
        let previous = vec![entry("A", "p3"), entry("A", "p1"), entry("A", "p2")];
        let current = vec![entry("A", "c2"), entry("A", "c9"), entry("A", "c1")];

        let diff = diff_lists(&previous, &current, identity_key);

        assert_eq!(idents(&diff.added), ["c2", "c9", "c1"]);
        assert_eq!(idents(&diff.removed), ["p3", "p1", "p2"]);
    }

    #[test]
    fn test_diff_from_empty_previous_adds_everything() {
        let current = vec![entry("A", "u1"), entry("A", "u2")];
        let diff = diff_lists(&[], &current, identity_key);
        assert_eq!(diff.added.len(), 2);
    }

    #[test]
    fn test_summary_display() {
        let diff = diff_lists(&[], &[entry("A", "u1")], identity_key);
        assert_eq!(diff.summary().to_string(), "1 added, 0 removed, 0 unchanged");
        assert_eq!(diff.summary().total_changes(), 1);
    }

    #[test]
    fn test_map_keeps_partitions() {
        let previous = vec![entry("A", "u1"), entry("A", "u2")];
        let current = vec![entry("A", "u2"), entry("A", "u3")];

        let mapped = diff_lists(&previous, &current, identity_key).map(|e| e.nav_ident);

        assert_eq!(mapped.added, ["u3"]);
        assert_eq!(mapped.removed, ["u1"]);
        assert_eq!(mapped.unchanged, ["u2"]);
    }
}
