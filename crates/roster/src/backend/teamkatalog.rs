//! Teamkatalog backend.
//!
//! Fetches role memberships from the Teamkatalog REST API. The API answers
//! either with a bare array of memberships or with a `{ "content": [...] }`
//! page holding all of them; both shapes are accepted.

use crate::backend::Directory;
use crate::error::Result;
use crate::types::RosterEntry;
use serde::Deserialize;

/// Teamkatalog API client.
pub struct TeamkatalogClient {
    agent: ureq::Agent,
    api_base: String,
    token: Option<String>,
}

impl TeamkatalogClient {
    /// Client for the API at `api_base`, e.g. `https://teamkatalog-api.intern.nav.no`.
    pub fn new(api_base: impl Into<String>) -> Self {
        Self {
            agent: ureq::Agent::new_with_defaults(),
            api_base: api_base.into(),
            token: None,
        }
    }

    /// Send `token` as a bearer token on every request.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Get the current API base URL.
    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    fn role_url(&self, role: &str) -> String {
        format!("{}/member/role/{}", self.api_base.trim_end_matches('/'), role)
    }
}

impl Directory for TeamkatalogClient {
    fn members_with_role(&self, role: &str) -> Result<Vec<RosterEntry>> {
        let url = self.role_url(role);
        log::debug!("GET {}", url);

        let mut request = self
            .agent
            .get(&url)
            .header("Accept", "application/json")
            .header("User-Agent", "champion-sync");
        if let Some(token) = &self.token {
            request = request.header("Authorization", format!("Bearer {token}"));
        }

        let response: MembersResponse = request.call()?.body_mut().read_json()?;
        let members = response.into_members();
        log::info!("Teamkatalog: {} members with role {}", members.len(), role);
        Ok(members)
    }
}

// =============================================================================
// Teamkatalog API response types
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum MembersResponse {
    List(Vec<RosterEntry>),
    Page { content: Vec<RosterEntry> },
}

impl MembersResponse {
    fn into_members(self) -> Vec<RosterEntry> {
        match self {
            Self::List(members) | Self::Page { content: members } => members,
        }
    }
}
