//! Collaborator traits and their implementations.
//!
//! [`Directory`] answers "who holds this role", [`ChatPlatform`] lists chat
//! users and posts messages. The HTTP implementations are
//! [`teamkatalog::TeamkatalogClient`] and [`slack::SlackClient`].
//!
//! # Testing
//!
//! Use [`MockDirectory`] and [`MockChat`] for testing without network access:
//!
//! ```
//! use roster::backend::{ChatPlatform, MockChat};
//!
//! let chat = MockChat::new();
//! assert!(chat.all_users().unwrap().is_empty());
//! assert!(chat.sent().is_empty());
//! ```

pub mod slack;
pub mod teamkatalog;

use crate::error::{Error, Result};
use crate::notify::NotificationPayload;
use crate::types::{ChatUser, RosterEntry};
use std::sync::{Arc, Mutex, PoisonError};

/// Source of role memberships.
pub trait Directory: Send + Sync {
    /// Every membership of `role`, across all teams.
    fn members_with_role(&self, role: &str) -> Result<Vec<RosterEntry>>;
}

/// Chat platform user directory and message sink.
pub trait ChatPlatform: Send + Sync {
    /// Every user in the workspace.
    fn all_users(&self) -> Result<Vec<ChatUser>>;

    /// Post `payload` to `channel`.
    fn send_message(&self, channel: &str, payload: &NotificationPayload) -> Result<()>;
}

/// In-memory directory for tests.
#[derive(Debug, Clone, Default)]
pub struct MockDirectory {
    members: Arc<Mutex<Vec<RosterEntry>>>,
    fail: bool,
}

impl MockDirectory {
    /// Directory returning `members` for any role.
    #[must_use]
    pub fn with_members(members: Vec<RosterEntry>) -> Self {
        Self {
            members: Arc::new(Mutex::new(members)),
            fail: false,
        }
    }

    /// Directory whose every call fails.
    #[must_use]
    pub fn failing() -> Self {
        Self {
            members: Arc::default(),
            fail: true,
        }
    }

    /// Replace the members returned from now on.
    pub fn set_members(&self, members: Vec<RosterEntry>) {
        *self.members.lock().unwrap_or_else(PoisonError::into_inner) = members;
    }
}

impl Directory for MockDirectory {
    fn members_with_role(&self, _role: &str) -> Result<Vec<RosterEntry>> {
        if self.fail {
            return Err(Error::http("connection refused", None));
        }
        Ok(self
            .members
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }
}

/// In-memory chat platform for tests; records every sent message.
#[derive(Debug, Clone, Default)]
pub struct MockChat {
    users: Arc<Vec<ChatUser>>,
    sent: Arc<Mutex<Vec<(String, NotificationPayload)>>>,
    user_fetches: Arc<Mutex<usize>>,
}

impl MockChat {
    /// Create a chat platform without users.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Chat platform with a fixed user list.
    #[must_use]
    pub fn with_users(users: Vec<ChatUser>) -> Self {
        Self {
            users: Arc::new(users),
            ..Self::default()
        }
    }

    /// Messages sent so far, as `(channel, payload)`.
    pub fn sent(&self) -> Vec<(String, NotificationPayload)> {
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// How many times the user list was fetched.
    pub fn user_fetches(&self) -> usize {
        *self
            .user_fetches
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl ChatPlatform for MockChat {
    fn all_users(&self) -> Result<Vec<ChatUser>> {
        *self
            .user_fetches
            .lock()
            .unwrap_or_else(PoisonError::into_inner) += 1;
        Ok(self.users.as_ref().clone())
    }

    fn send_message(&self, channel: &str, payload: &NotificationPayload) -> Result<()> {
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((channel.to_string(), payload.clone()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Group, Person};

    #[test]
    fn test_mock_directory_returns_members() {
        let entry = RosterEntry::new(Group::new("t", "T", ""), "A1", Person::default());
        let directory = MockDirectory::with_members(vec![entry.clone()]);

        assert_eq!(directory.members_with_role("ANY").unwrap(), vec![entry]);

        directory.set_members(Vec::new());
        assert!(directory.members_with_role("ANY").unwrap().is_empty());
    }

    #[test]
    fn test_mock_directory_failing() {
        let directory = MockDirectory::failing();
        let err = directory.members_with_role("ANY").unwrap_err();
        assert!(err.is_retryable());
    }

    #[test]
    fn test_mock_chat_records_messages() {
        let chat = MockChat::new();
        let payload = NotificationPayload {
            text: "hello".to_string(),
            blocks: Vec::new(),
        };

        chat.send_message("#admins", &payload).unwrap();

        let sent = chat.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, "#admins");
        assert_eq!(sent[0].1.text, "hello");
    }
}
