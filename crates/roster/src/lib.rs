//! # roster
//!
//! Keeps a team informed about who holds a role.
//!
//! Each run fetches the current role holders from Teamkatalog, diffs them
//! against the snapshot saved by the previous run, looks the changed members
//! up in Slack and posts the additions and removals.
//!
//! ## Core Concepts
//!
//! - **Snapshot**: the roster saved by the previous run; the diff baseline
//! - **Identity key**: `team id / NAV ident`, what makes two entries the same membership
//! - **Resolution**: mapping a directory member onto a Slack user (login name, then email)
//! - **Dry run**: everything except saving state
//!
//! ## Example
//!
//! ```no_run
//! use roster::backend::{slack::SlackClient, teamkatalog::TeamkatalogClient};
//! use roster::store::file::FileStore;
//! use roster::{Channels, SnapshotStore, SyncOptions, run_cycle};
//!
//! let options = SyncOptions {
//!     role: "SECURITY_CHAMPION".to_string(),
//!     dry_run: true,
//!     channels: Channels {
//!         admin: "C0ADMIN".to_string(),
//!         public: "C0PUBLIC".to_string(),
//!     },
//! };
//! let directory = TeamkatalogClient::new("https://teamkatalog-api.intern.nav.no");
//! let slack = SlackClient::new("xoxb-...");
//! let snapshots = SnapshotStore::new(FileStore::new("~/.local/state/champion-sync"));
//!
//! let outcome = run_cycle::<_, FileStore>(&options, &directory, &slack, &snapshots, None)?;
//! println!("{outcome:?}");
//! # Ok::<(), roster::Error>(())
//! ```
//!
//! ## Provider Traits
//!
//! - [`Directory`]: source of role memberships
//! - [`ChatPlatform`]: Slack users and message posting
//! - [`BlobStore`]: where the snapshot and user cache live
//!
//! Each has an in-memory implementation for tests.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod backend;
pub mod cache;
pub mod cycle;
pub mod diff;
pub mod error;
pub mod notify;
pub mod resolve;
pub mod snapshot;
pub mod store;
pub mod types;

pub use backend::{ChatPlatform, Directory, MockChat, MockDirectory};
pub use cache::UserCache;
pub use cycle::{DEFAULT_ROLE, SyncOptions, SyncOutcome, run_cycle};
pub use diff::{Diff, DiffResult, DiffSummary, diff_lists, identity_key};
pub use error::{Error, ErrorCategory, Result};
pub use notify::{Block, Channels, Notification, NotificationPayload, compose, dispatch};
pub use resolve::{IdentityResolver, ResolvedDiff, ResolvedEntry};
pub use snapshot::{DEFAULT_SNAPSHOT_KEY, SnapshotStore, first_run_baseline};
pub use store::{BlobStore, MemoryStore};
pub use types::{ChatUser, Group, Person, Profile, RosterEntry, Snapshot};
