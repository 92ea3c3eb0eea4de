//! Matching directory members to Slack users.
//!
//! A member is looked up by Slack login name first (logins follow the NAV
//! ident convention), then by email. Both lookups ignore case.

use crate::diff::{Diff, DiffResult};
use crate::types::{ChatUser, RosterEntry};
use std::collections::HashMap;

/// A roster entry and the Slack user it resolved to, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedEntry {
    /// The directory membership.
    pub entry: RosterEntry,
    /// Matching Slack user; `None` when neither name nor email matched.
    pub chat_user: Option<ChatUser>,
}

/// Diff with every entry resolved.
pub type ResolvedDiff = Diff<ResolvedEntry>;

/// Case-insensitive name and email indices over the Slack user list.
#[derive(Debug)]
pub struct IdentityResolver<'a> {
    by_name: HashMap<String, &'a ChatUser>,
    by_email: HashMap<String, &'a ChatUser>,
}

impl<'a> IdentityResolver<'a> {
    /// Index `users`. On duplicate names or emails the later user wins.
    pub fn new(users: &'a [ChatUser]) -> Self {
        let mut by_name = HashMap::with_capacity(users.len());
        let mut by_email = HashMap::with_capacity(users.len());

        for user in users {
            if !user.name.is_empty() {
                by_name.insert(user.name.to_lowercase(), user);
            }
            if let Some(email) = user.profile.email.as_deref().filter(|e| !e.is_empty()) {
                by_email.insert(email.to_lowercase(), user);
            }
        }

        Self { by_name, by_email }
    }

    /// Slack user for `entry`: name match, else email match.
    pub fn lookup(&self, entry: &RosterEntry) -> Option<&'a ChatUser> {
        self.by_name
            .get(&entry.nav_ident.to_lowercase())
            .or_else(|| {
                let email = entry.resource.email.to_lowercase();
                if email.is_empty() {
                    None
                } else {
                    self.by_email.get(&email)
                }
            })
            .copied()
    }

    /// Pair `entry` with its Slack user.
    pub fn resolve(&self, entry: RosterEntry) -> ResolvedEntry {
        let chat_user = self.lookup(&entry).cloned();
        if chat_user.is_none() {
            log::debug!(
                "No Slack user for {} ({})",
                entry.nav_ident,
                entry.resource.email
            );
        }
        ResolvedEntry { entry, chat_user }
    }

    /// Resolve every partition of `diff`, keeping order.
    pub fn resolve_diff(&self, diff: DiffResult) -> ResolvedDiff {
        diff.map(|entry| self.resolve(entry))
    }
}
