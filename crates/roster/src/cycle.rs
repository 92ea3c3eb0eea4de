//! One sync run: fetch, reconcile, resolve, announce.

use crate::backend::{ChatPlatform, Directory};
use crate::cache::UserCache;
use crate::diff::DiffSummary;
use crate::error::{Error, Result};
use crate::notify::{self, Channels};
use crate::resolve::IdentityResolver;
use crate::snapshot::SnapshotStore;
use crate::store::BlobStore;

/// Role holders to track when none is configured.
pub const DEFAULT_ROLE: &str = "SECURITY_CHAMPION";

/// Settings for one run.
#[derive(Debug, Clone)]
pub struct SyncOptions {
    /// Directory role to track.
    pub role: String,
    /// Compute and announce, but leave the snapshot and user cache untouched.
    pub dry_run: bool,
    /// Where to announce changes.
    pub channels: Channels,
}

/// What a run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Nobody was added or removed; nothing was sent.
    NoChanges {
        /// Members present in both snapshots.
        unchanged: usize,
    },
    /// Changes were announced.
    Notified {
        /// Diff counts.
        summary: DiffSummary,
        /// Changed entries that had no Slack user.
        unresolved: usize,
    },
}

/// Run one sync.
///
/// The snapshot is saved (unless dry-running) before Slack is contacted, so
/// a failed save never produces an announcement and a failed announcement
/// is not repeated on the next run.
pub fn run_cycle<S, C>(
    options: &SyncOptions,
    directory: &dyn Directory,
    chat: &dyn ChatPlatform,
    snapshots: &SnapshotStore<S>,
    user_cache: Option<&UserCache<C>>,
) -> Result<SyncOutcome>
where
    S: BlobStore,
    C: BlobStore,
{
    let members = directory.members_with_role(&options.role)?;
    if members.is_empty() {
        return Err(Error::EmptyRoster {
            role: options.role.clone(),
        });
    }
    log::info!("Found {} members with role {}", members.len(), options.role);

    let diff = snapshots.reconcile(&members, options.dry_run)?;
    if !diff.has_changes() {
        log::info!("No changes detected ({} unchanged)", diff.unchanged.len());
        return Ok(SyncOutcome::NoChanges {
            unchanged: diff.unchanged.len(),
        });
    }

    let summary = diff.summary();
    log::info!("{}", summary);

    let users = match user_cache {
        Some(cache) => cache.load_or_fetch(chat, options.dry_run)?,
        None => chat.all_users()?,
    };
    let resolver = IdentityResolver::new(&users);
    let resolved = resolver.resolve_diff(diff);

    let unresolved = resolved
        .added
        .iter()
        .chain(&resolved.removed)
        .filter(|r| r.chat_user.is_none())
        .count();

    if let Some(notification) = notify::compose(&resolved) {
        notify::dispatch(chat, &options.channels, &notification)?;
    }

    Ok(SyncOutcome::Notified {
        summary,
        unresolved,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{MockChat, MockDirectory};
    use crate::store::MemoryStore;
    use crate::types::{ChatUser, Group, Person, Profile, RosterEntry};

    fn entry(ident: &str) -> RosterEntry {
        RosterEntry::new(
            Group::new("A", "Team A", "https://tk/team/A"),
            ident,
            Person {
                full_name: format!("Person {ident}"),
                email: format!("{ident}@nav.no"),
            },
        )
    }

    fn user(ident: &str) -> ChatUser {
        ChatUser {
            id: format!("U_{ident}"),
            name: ident.to_string(),
            profile: Profile::default(),
        }
    }

    fn options(dry_run: bool) -> SyncOptions {
        SyncOptions {
            role: DEFAULT_ROLE.to_string(),
            dry_run,
            channels: Channels {
                admin: "admin".to_string(),
                public: "public".to_string(),
            },
        }
    }

    fn run(
        options: &SyncOptions,
        directory: &MockDirectory,
        chat: &MockChat,
        store: &MemoryStore,
    ) -> Result<SyncOutcome> {
        let snapshots = SnapshotStore::new(store.clone());
        run_cycle::<_, MemoryStore>(options, directory, chat, &snapshots, None)
    }

    #[test]
    fn test_first_run_sends_nothing() {
        let store = MemoryStore::new();
        let directory = MockDirectory::with_members(vec![entry("u1"), entry("u2")]);
        let chat = MockChat::with_users(vec![user("u1")]);

        let outcome = run(&options(false), &directory, &chat, &store).unwrap();

        assert_eq!(outcome, SyncOutcome::NoChanges { unchanged: 2 });
        assert!(chat.sent().is_empty());
        assert_eq!(chat.user_fetches(), 0);
    }

    #[test]
    fn test_change_is_announced_once() {
        let store = MemoryStore::new();
        let directory = MockDirectory::with_members(vec![entry("u1"), entry("u2")]);
        let chat = MockChat::with_users(vec![user("u1"), user("u2"), user("u3")]);
        run(&options(false), &directory, &chat, &store).unwrap();

        directory.set_members(vec![entry("u2"), entry("u3")]);
        let outcome = run(&options(false), &directory, &chat, &store).unwrap();

        assert_eq!(
            outcome,
            SyncOutcome::Notified {
                summary: DiffSummary {
                    added: 1,
                    removed: 1,
                    unchanged: 1
                },
                unresolved: 0
            }
        );
        assert_eq!(chat.sent().len(), 2);

        let again = run(&options(false), &directory, &chat, &store).unwrap();
        assert_eq!(again, SyncOutcome::NoChanges { unchanged: 2 });
        assert_eq!(chat.sent().len(), 2);
    }

    #[test]
    fn test_dry_run_repeats_same_announcement() {
        let store = MemoryStore::new();
        let directory = MockDirectory::with_members(vec![entry("u1")]);
        let chat = MockChat::with_users(vec![user("u1"), user("u2")]);
        run(&options(false), &directory, &chat, &store).unwrap();

        directory.set_members(vec![entry("u1"), entry("u2")]);
        let first = run(&options(true), &directory, &chat, &store).unwrap();
        let second = run(&options(true), &directory, &chat, &store).unwrap();

        assert_eq!(first, second);
        assert_eq!(chat.sent().len(), 4);
    }

    #[test]
    fn test_empty_roster_is_fatal() {
        let store = MemoryStore::new();
        let directory = MockDirectory::with_members(vec![]);
        let chat = MockChat::new();

        let err = run(&options(false), &directory, &chat, &store).unwrap_err();

        assert!(matches!(err, Error::EmptyRoster { .. }));
        assert!(!store.exists(crate::snapshot::DEFAULT_SNAPSHOT_KEY).unwrap());
    }

    #[test]
    fn test_directory_failure_propagates() {
        let store = MemoryStore::new();
        let chat = MockChat::new();

        let err = run(&options(false), &MockDirectory::failing(), &chat, &store).unwrap_err();

        assert!(matches!(err, Error::HttpError { .. }));
    }

    #[test]
    fn test_failed_save_sends_nothing() {
        let store = MemoryStore::new();
        let directory = MockDirectory::with_members(vec![entry("u1")]);
        let chat = MockChat::with_users(vec![user("u1"), user("u2")]);
        run(&options(false), &directory, &chat, &store).unwrap();

        store.fail_writes();
        directory.set_members(vec![entry("u2")]);
        assert!(run(&options(false), &directory, &chat, &store).is_err());
        assert!(chat.sent().is_empty());
    }

    #[test]
    fn test_unresolved_members_are_counted() {
        let store = MemoryStore::new();
        let directory = MockDirectory::with_members(vec![entry("u1")]);
        let chat = MockChat::with_users(vec![user("u1")]);
        run(&options(false), &directory, &chat, &store).unwrap();

        directory.set_members(vec![entry("u1"), entry("ghost")]);
        let outcome = run(&options(false), &directory, &chat, &store).unwrap();

        assert!(matches!(outcome, SyncOutcome::Notified { unresolved: 1, .. }));
        // Admin still hears about it; nothing resolvable to welcome publicly
        let sent = chat.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, "admin");
    }

    #[test]
    fn test_user_cache_is_used() {
        let store = MemoryStore::new();
        let cache_store = MemoryStore::new();
        let cache = UserCache::new(cache_store.clone());
        let snapshots = SnapshotStore::new(store);
        let directory = MockDirectory::with_members(vec![entry("u1")]);
        let chat = MockChat::with_users(vec![user("u1"), user("u2")]);
        let opts = options(false);

        run_cycle(&opts, &directory, &chat, &snapshots, Some(&cache)).unwrap();
        directory.set_members(vec![entry("u2")]);
        run_cycle(&opts, &directory, &chat, &snapshots, Some(&cache)).unwrap();
        directory.set_members(vec![entry("u1")]);
        run_cycle(&opts, &directory, &chat, &snapshots, Some(&cache)).unwrap();

        assert_eq!(chat.user_fetches(), 1);
        assert!(cache_store.exists(crate::cache::DEFAULT_USER_CACHE_KEY).unwrap());
    }
}
