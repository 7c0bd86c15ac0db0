//! GitHub directory client
//!
//! Talks to the GitHub REST API directly over HTTP.
//!
//! # Authentication
//!
//! Uses an OAuth or personal access token (set via `GITHUB_TOKEN` or passed directly).
//!
//! ```ignore
//! // From environment variable
//! let directory = GitHubDirectory::from_env()?;
//!
//! // With explicit token, against GitHub Enterprise
//! let directory = GitHubDirectory::new("gho_...")?
//!     .with_api_base("https://github.example.com/api/v3");
//! ```

use anyhow::{Context, Result};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::env;

use super::directory::{DirectoryService, MembershipState, Team};

const DEFAULT_API_BASE: &str = "https://api.github.com";
const USER_AGENT: &str = concat!("archive-gate/", env!("CARGO_PKG_VERSION"));

/// GitHub returns at most 100 teams per page; only the first page is read.
const TEAMS_PER_PAGE: u32 = 100;

#[derive(Debug, Deserialize)]
struct MembershipResponse {
    state: String,
}

/// `DirectoryService` backed by the GitHub REST API
pub struct GitHubDirectory {
    client: Client,
    token: String,
    api_base: String,
}

impl GitHubDirectory {
    /// Create a client authenticating with `token`
    pub fn new(token: impl Into<String>) -> Result<Self> {
        let token = token.into();
        if token.is_empty() {
            anyhow::bail!("GitHub token must not be empty");
        }

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            token,
            api_base: DEFAULT_API_BASE.to_string(),
        })
    }

    /// Create a client from the `GITHUB_TOKEN` environment variable
    pub fn from_env() -> Result<Self> {
        tracing::info!("Creating GitHub directory from environment");

        let token = env::var("GITHUB_TOKEN").context("GITHUB_TOKEN is not set")?;
        Self::new(token)
    }

    /// Point the client at another API root (GitHub Enterprise, test servers)
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    fn teams_url(&self, organization: &str) -> String {
        format!(
            "{}/orgs/{}/teams?per_page={}",
            self.api_base, organization, TEAMS_PER_PAGE
        )
    }

    fn membership_url(&self, username: &str, team_id: u64) -> String {
        format!("{}/teams/{}/memberships/{}", self.api_base, team_id, username)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        tracing::debug!("[GitHub] GET {}", url);

        let response = self
            .client
            .get(url)
            .header("Accept", "application/vnd.github+json")
            .bearer_auth(&self.token)
            .send()
            .await
            .context("Failed to send request to GitHub API")?;

        let status = response.status();
        let body = response
            .text()
            .await
            .context("Failed to read GitHub response body")?;

        tracing::debug!("[GitHub] Response status: {}", status);

        if !status.is_success() {
            tracing::warn!("[GitHub] API error: {} - {}", status, body);
            anyhow::bail!("GitHub API error ({}): {}", status, body);
        }

        serde_json::from_str(&body).context("Failed to parse GitHub API response")
    }
}

#[async_trait::async_trait]
impl DirectoryService for GitHubDirectory {
    async fn list_teams(&self, organization: &str) -> Result<Vec<Team>> {
        let url = self.teams_url(organization);
        let teams: Vec<Team> = self.get_json(&url).await?;
        tracing::debug!("[GitHub] {} teams in {}", teams.len(), organization);
        Ok(teams)
    }

    async fn membership_state(&self, username: &str, team_id: u64) -> Result<MembershipState> {
        let url = self.membership_url(username, team_id);
        let membership: MembershipResponse = self.get_json(&url).await?;
        Ok(MembershipState::from(membership.state.as_str()))
    }

    fn directory_name(&self) -> &str {
        "github"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urls() {
        let github = GitHubDirectory::new("token")
            .unwrap()
            .with_api_base("https://github.example.com/api/v3/");

        assert_eq!(
            github.teams_url("acme"),
            "https://github.example.com/api/v3/orgs/acme/teams?per_page=100"
        );
        assert_eq!(
            github.membership_url("octocat", 42),
            "https://github.example.com/api/v3/teams/42/memberships/octocat"
        );
    }

    #[test]
    fn test_empty_token_rejected() {
        assert!(GitHubDirectory::new("").is_err());
    }

    #[test]
    fn test_parse_teams() {
        let body = r#"[
            {"id": 1, "node_id": "MDQ6VGVhbTE=", "name": "Justice League", "slug": "justice-league"},
            {"id": 7, "name": "Builders", "privacy": "closed"}
        ]"#;
        let teams: Vec<Team> = serde_json::from_str(body).unwrap();
        assert_eq!(teams, vec![Team::new("Justice League", 1), Team::new("Builders", 7)]);
    }

    #[test]
    fn test_parse_membership() {
        let body = r#"{"url": "https://api.github.com/teams/1/memberships/octocat", "role": "member", "state": "pending"}"#;
        let membership: MembershipResponse = serde_json::from_str(body).unwrap();
        assert_eq!(
            MembershipState::from(membership.state.as_str()),
            MembershipState::Pending
        );
    }
}
