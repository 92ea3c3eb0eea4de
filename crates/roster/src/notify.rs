//! Slack notifications for roster changes.
//!
//! Two messages go out per change: the admin channel gets a summary and one
//! block per removed and added champion, the public channel gets only the
//! welcome blocks for added champions. Entries without a Slack user cannot
//! be rendered as blocks; they are left out with a warning and listed by
//! name in the admin text instead.

use crate::backend::ChatPlatform;
use crate::error::Result;
use crate::resolve::{ResolvedDiff, ResolvedEntry};
use crate::types::{ChatUser, RosterEntry};
use serde::Serialize;

const HEADING: &str = "Oppdatering av Security Champions";

// =============================================================================
// Block Kit payload
// =============================================================================

/// A `chat.postMessage` payload: fallback text plus Block Kit blocks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotificationPayload {
    /// Plain text shown in notifications and by clients without blocks.
    pub text: String,
    /// Rendered blocks.
    pub blocks: Vec<Block>,
}

/// Block Kit layout block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    /// Horizontal rule.
    Divider,
    /// Markdown text with an optional image on the right.
    Section {
        /// Section body.
        text: Text,
        /// Image shown beside the text.
        #[serde(skip_serializing_if = "Option::is_none")]
        accessory: Option<Accessory>,
    },
}

/// Block Kit text object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Text {
    /// Slack-flavoured markdown.
    Mrkdwn {
        /// Markdown source.
        text: String,
    },
}

/// Block Kit section accessory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Accessory {
    /// Image element.
    Image {
        /// Image URL.
        image_url: String,
        /// Alt text.
        alt_text: String,
    },
}

impl Block {
    /// Section with markdown text and the user's avatar, if they have one.
    pub fn user_section(user: &ChatUser, markdown: impl Into<String>) -> Self {
        let accessory = user.profile.image_192.as_ref().map(|url| Accessory::Image {
            image_url: url.clone(),
            alt_text: user.display_name().to_string(),
        });
        Self::Section {
            text: Text::Mrkdwn {
                text: markdown.into(),
            },
            accessory,
        }
    }
}

// =============================================================================
// Composition
// =============================================================================

/// Destination channels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Channels {
    /// Channel receiving the full diff.
    pub admin: String,
    /// Channel receiving welcomes for new champions.
    pub public: String,
}

/// Messages composed for one change set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Full diff for the admin channel.
    pub admin: NotificationPayload,
    /// Welcomes for the public channel; `None` when nobody resolvable was added.
    pub public: Option<NotificationPayload>,
}

fn team_link(entry: &RosterEntry) -> String {
    format!("<{} | {}>", entry.group.links.ui, entry.group.name)
}

fn added_markdown(entry: &RosterEntry, user: &ChatUser) -> String {
    format!(
        ":tada: *{}* har fått seg en ny Security Champion!\n:security-champion: {} (<@{}>)\n\nVelkommen! :meow_wave: :security-pepperkake:",
        team_link(entry),
        user.display_name(),
        user.id
    )
}

fn removed_markdown(entry: &RosterEntry, user: &ChatUser) -> String {
    format!(
        ":sadpanda: Security Champion fjernet fra *{}*\n<@{}>",
        team_link(entry),
        user.id
    )
}

fn list_line(resolved: &ResolvedEntry) -> String {
    let who = match &resolved.chat_user {
        Some(user) => format!("<@{}>", user.id),
        None if resolved.entry.resource.full_name.is_empty() => resolved.entry.nav_ident.clone(),
        None => format!(
            "{} ({})",
            resolved.entry.resource.full_name, resolved.entry.nav_ident
        ),
    };
    format!("- {} ({})", who, team_link(&resolved.entry))
}

/// Entries with a Slack user, warning about the rest.
fn matched<'a>(
    entries: &'a [ResolvedEntry],
    kind: &str,
) -> Vec<(&'a RosterEntry, &'a ChatUser)> {
    entries
        .iter()
        .filter_map(|r| match &r.chat_user {
            Some(user) => Some((&r.entry, user)),
            None => {
                log::warn!(
                    "Leaving {} champion {} ({}) out of the message: no Slack user",
                    kind,
                    r.entry.nav_ident,
                    r.entry.group.name
                );
                None
            }
        })
        .collect()
}

/// Compose messages for `diff`; `None` when nothing was added or removed.
///
/// Counts in the summary include unresolved entries; blocks do not.
pub fn compose(diff: &ResolvedDiff) -> Option<Notification> {
    if !diff.has_changes() {
        return None;
    }

    let added_blocks: Vec<Block> = matched(&diff.added, "added")
        .into_iter()
        .map(|(entry, user)| Block::user_section(user, added_markdown(entry, user)))
        .collect();
    let removed_blocks: Vec<Block> = matched(&diff.removed, "removed")
        .into_iter()
        .map(|(entry, user)| Block::user_section(user, removed_markdown(entry, user)))
        .collect();

    let mut admin_lines = vec![HEADING.to_string(), diff.summary().to_string()];
    let mut public_lines = vec![HEADING.to_string()];

    let added_resolved: Vec<&ResolvedEntry> =
        diff.added.iter().filter(|r| r.chat_user.is_some()).collect();
    if !added_resolved.is_empty() {
        admin_lines.push("*Lagt til:*".to_string());
        public_lines.push("*Lagt til:*".to_string());
        for resolved in &added_resolved {
            admin_lines.push(list_line(resolved));
            public_lines.push(list_line(resolved));
        }
    }

    let removed_resolved: Vec<&ResolvedEntry> = diff
        .removed
        .iter()
        .filter(|r| r.chat_user.is_some())
        .collect();
    if !removed_resolved.is_empty() {
        admin_lines.push("*Fjernet:*".to_string());
        admin_lines.extend(removed_resolved.iter().map(|r| list_line(r)));
    }

    let unresolved: Vec<&ResolvedEntry> = diff
        .removed
        .iter()
        .chain(&diff.added)
        .filter(|r| r.chat_user.is_none())
        .collect();
    if !unresolved.is_empty() {
        admin_lines.push("*Ikke funnet i Slack:*".to_string());
        admin_lines.extend(unresolved.iter().map(|r| list_line(r)));
    }

    let mut admin_blocks = Vec::with_capacity(1 + removed_blocks.len() + added_blocks.len());
    admin_blocks.push(Block::Divider);
    admin_blocks.extend(removed_blocks);
    admin_blocks.extend(added_blocks.iter().cloned());

    let public = if added_blocks.is_empty() {
        None
    } else {
        Some(NotificationPayload {
            text: public_lines.join("\n"),
            blocks: added_blocks,
        })
    };

    Some(Notification {
        admin: NotificationPayload {
            text: admin_lines.join("\n"),
            blocks: admin_blocks,
        },
        public,
    })
}

/// Send `notification`: admin channel first, then the public channel.
pub fn dispatch(
    chat: &dyn ChatPlatform,
    channels: &Channels,
    notification: &Notification,
) -> Result<()> {
    chat.send_message(&channels.admin, &notification.admin)?;
    match &notification.public {
        Some(public) => chat.send_message(&channels.public, public)?,
        None => log::debug!("No new champions to announce in {}", channels.public),
    }
    Ok(())
}
