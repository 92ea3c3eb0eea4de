//! Core types: directory roster entries and chat platform users.

use serde::{Deserialize, Serialize};

/// An ordered roster of role holders at one point in time.
pub type Snapshot = Vec<RosterEntry>;

/// A role membership as reported by Teamkatalog.
///
/// Identity is `(group.id, nav_ident)`; see [`crate::diff::identity_key`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterEntry {
    /// Team the role is held in.
    pub group: Group,
    /// Person identifier issued by the directory (NAV ident).
    pub nav_ident: String,
    /// Display data for the person.
    #[serde(default)]
    pub resource: Person,
}

/// A team in the directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    /// Stable team identifier.
    pub id: String,
    /// Team display name.
    #[serde(default)]
    pub name: String,
    /// Links to the team.
    #[serde(default)]
    pub links: GroupLinks,
}

/// Links attached to a team.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupLinks {
    /// Link to the team page in the Teamkatalog UI.
    #[serde(default)]
    pub ui: String,
}

/// Person display data from the directory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    /// Full name.
    #[serde(default)]
    pub full_name: String,
    /// Work email; may be empty.
    #[serde(default)]
    pub email: String,
}

/// A Slack user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatUser {
    /// Slack user id (`U...`).
    pub id: String,
    /// Login name.
    #[serde(default)]
    pub name: String,
    /// Profile data.
    #[serde(default)]
    pub profile: Profile,
}

/// Slack profile fields used when composing messages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// Email, absent for bots and some guests.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// 192px avatar URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_192: Option<String>,
    /// Real name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub real_name: Option<String>,
}

impl RosterEntry {
    /// Build an entry from its parts.
    pub fn new(group: Group, nav_ident: impl Into<String>, resource: Person) -> Self {
        Self {
            group,
            nav_ident: nav_ident.into(),
            resource,
        }
    }
}

impl Group {
    /// Build a team with a name and UI link.
    pub fn new(id: impl Into<String>, name: impl Into<String>, ui: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            links: GroupLinks { ui: ui.into() },
        }
    }
}

impl ChatUser {
    /// Real name if Slack has one, otherwise the login name.
    pub fn display_name(&self) -> &str {
        self.profile
            .real_name
            .as_deref()
            .filter(|n| !n.is_empty())
            .unwrap_or(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roster_entry_from_teamkatalog_json() {
        let json = r#"{
            "group": {
                "id": "team-1",
                "name": "Team One",
                "links": { "ui": "https://teamkatalog.example/team/team-1" },
                "description": "ignored"
            },
            "navIdent": "A123456",
            "resource": { "fullName": "Ada Lovelace", "email": "ada@example.no" }
        }"#;

        let entry: RosterEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.group.id, "team-1");
        assert_eq!(entry.nav_ident, "A123456");
        assert_eq!(entry.resource.email, "ada@example.no");
    }

    #[test]
    fn test_roster_entry_missing_resource() {
        let json = r#"{ "group": { "id": "t" }, "navIdent": "X1" }"#;
        let entry: RosterEntry = serde_json::from_str(json).unwrap();
        assert!(entry.resource.email.is_empty());
        assert!(entry.group.links.ui.is_empty());
    }

    #[test]
    fn test_roster_entry_serializes_camel_case() {
        let entry = RosterEntry::new(
            Group::new("t", "Team", "https://ui/t"),
            "A1",
            Person::default(),
        );
        let json = serde_json::to_string(&entry).unwrap();
        assert!(json.contains("\"navIdent\":\"A1\""));
        assert!(json.contains("\"fullName\""));
    }

    #[test]
    fn test_chat_user_from_slack_json() {
        let json = r#"{
            "id": "U01",
            "name": "a123456",
            "deleted": false,
            "profile": {
                "email": "ada@example.no",
                "image_192": "https://img/192.png",
                "real_name": "Ada Lovelace"
            }
        }"#;

        let user: ChatUser = serde_json::from_str(json).unwrap();
        assert_eq!(user.id, "U01");
        assert_eq!(user.display_name(), "Ada Lovelace");
        assert_eq!(user.profile.image_192.as_deref(), Some("https://img/192.png"));
    }

    #[test]
    fn test_chat_user_display_name_falls_back_to_login() {
        let user = ChatUser {
            id: "U02".to_string(),
            name: "bot".to_string(),
            profile: Profile::default(),
        };
        assert_eq!(user.display_name(), "bot");
    }
}
