//! Slack Web API backend.
//!
//! Uses `users.list` (cursor paginated) and `chat.postMessage`. Slack reports
//! most failures with HTTP 200 and `"ok": false`; those become
//! [`Error::Api`] carrying Slack's error code.

use crate::backend::ChatPlatform;
use crate::error::{Error, Result};
use crate::notify::{Block, NotificationPayload};
use crate::types::ChatUser;
use serde::{Deserialize, Serialize};

/// Users requested per `users.list` page.
const PAGE_SIZE: &str = "200";

/// Slack Web API client authenticated with a bot token.
pub struct SlackClient {
    agent: ureq::Agent,
    api_base: String,
    token: String,
}

impl SlackClient {
    /// Client using `token` (`xoxb-...`).
    pub fn new(token: impl Into<String>) -> Self {
        Self::with_api_base("https://slack.com/api", token)
    }

    /// Create a client with a custom API base (for testing).
    pub fn with_api_base(api_base: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            agent: ureq::Agent::new_with_defaults(),
            api_base: api_base.into(),
            token: token.into(),
        }
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/{}", self.api_base.trim_end_matches('/'), method)
    }

    fn bearer(&self) -> String {
        format!("Bearer {}", self.token)
    }

    fn users_page(&self, cursor: Option<&str>) -> Result<UsersListResponse> {
        let mut request = self
            .agent
            .get(&self.method_url("users.list"))
            .header("Authorization", self.bearer())
            .query("limit", PAGE_SIZE);
        if let Some(cursor) = cursor {
            request = request.query("cursor", cursor);
        }

        let response: UsersListResponse = request.call()?.body_mut().read_json()?;
        check_ok(response.ok, response.error.as_deref())?;
        Ok(response)
    }
}

impl ChatPlatform for SlackClient {
    fn all_users(&self) -> Result<Vec<ChatUser>> {
        let mut users = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let page = self.users_page(cursor.as_deref())?;
            users.extend(page.members);

            match page.response_metadata.and_then(|m| m.next_cursor) {
                Some(next) if !next.is_empty() => cursor = Some(next),
                _ => break,
            }
        }

        log::info!("Slack: fetched {} users", users.len());
        Ok(users)
    }

    fn send_message(&self, channel: &str, payload: &NotificationPayload) -> Result<()> {
        let body = PostMessageRequest {
            channel,
            text: &payload.text,
            blocks: &payload.blocks,
        };

        let response: SlackResponse = self
            .agent
            .post(&self.method_url("chat.postMessage"))
            .header("Authorization", self.bearer())
            .send_json(&body)?
            .body_mut()
            .read_json()?;
        check_ok(response.ok, response.error.as_deref())?;

        log::info!("Slack: posted message to {}", channel);
        Ok(())
    }
}

fn check_ok(ok: bool, error: Option<&str>) -> Result<()> {
    if ok {
        Ok(())
    } else {
        Err(Error::Api {
            service: "slack",
            message: error.unwrap_or("unknown_error").to_string(),
        })
    }
}

// =============================================================================
// Slack API request/response types
// =============================================================================

#[derive(Debug, Serialize)]
struct PostMessageRequest<'a> {
    channel: &'a str,
    text: &'a str,
    blocks: &'a [Block],
}

#[derive(Debug, Deserialize)]
struct SlackResponse {
    ok: bool,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UsersListResponse {
    ok: bool,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    members: Vec<ChatUser>,
    #[serde(default)]
    response_metadata: Option<ResponseMetadata>,
}

#[derive(Debug, Deserialize)]
struct ResponseMetadata {
    #[serde(default)]
    next_cursor: Option<String>,
}
