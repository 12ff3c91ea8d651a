//! Look up public profile information for GitHub users.
//!
//! <https://docs.github.com/en/rest/users/users#get-a-user>

use serde::Deserialize;
use serde_with::{serde_as, DefaultOnNull};
use std::{fmt, time::Duration};

/// The base URL of the GitHub REST API.
pub const API_BASE: &str = "https://api.github.com";

/// GitHub rejects requests without a `User-Agent`.
const USER_AGENT: &str = "grass-slack-bridge";

/// Lookups are meant to be answered while a slash command waits, so they get
/// a tighter bound than other outbound calls.
const TIMEOUT: Duration = Duration::from_secs(5);

/// A newtype wrapper around a GitHub access token.
#[derive(Clone)]
pub struct GitHubToken(pub String);

/// The profile fields we show. GitHub sends `null` for unset names and bios,
/// and we'd rather show something than fail, so every field tolerates being
/// absent or `null`.
#[serde_as]
#[derive(Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct User {
    #[serde_as(as = "DefaultOnNull")]
    pub login: String,
    #[serde_as(as = "DefaultOnNull")]
    pub name: String,
    #[serde_as(as = "DefaultOnNull")]
    pub public_repos: u64,
    #[serde_as(as = "DefaultOnNull")]
    pub followers: u64,
    #[serde_as(as = "DefaultOnNull")]
    pub bio: String,
    #[serde_as(as = "DefaultOnNull")]
    pub html_url: String,
}

impl User {
    /// The user's name, or their login if they haven't set one.
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            &self.login
        } else {
            &self.name
        }
    }

    /// The user's bio, or a placeholder if they haven't written one.
    pub fn bio_or_placeholder(&self) -> &str {
        if self.bio.is_empty() {
            "no bio"
        } else {
            &self.bio
        }
    }
}

/// Sum type representing every possible failed lookup.
#[derive(Debug)]
pub enum GitHubError {
    APIRequestFailed(reqwest::Error),
    /// Anything other than a 200, with the body verbatim.
    APIResponseError { status: u16, body: String },
}

impl From<reqwest::Error> for GitHubError {
    fn from(e: reqwest::Error) -> Self {
        GitHubError::APIRequestFailed(e)
    }
}

impl fmt::Display for GitHubError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GitHubError::APIRequestFailed(e) if e.is_timeout() => write!(f, "GitHub API request timed out"),
            GitHubError::APIRequestFailed(e) => write!(f, "GitHub API request failed: {}", e),
            GitHubError::APIResponseError { status, body } => {
                write!(f, "GitHub API responded {}: {}", status, body)
            }
        }
    }
}

#[derive(Clone)]
pub struct GitHubClient {
    http: reqwest::Client,
    base: String,
    token: Option<GitHubToken>,
    timeout: Duration,
}

impl GitHubClient {
    pub fn new(http: reqwest::Client, base: String, token: Option<GitHubToken>) -> Self {
        GitHubClient {
            http,
            base,
            token,
            timeout: TIMEOUT,
        }
    }

    /// Fetch a user's public profile. `username` is expected to have been
    /// validated already; it's placed into the path as is.
    pub async fn fetch_user(&self, username: &str) -> Result<User, GitHubError> {
        let mut req = self
            .http
            .get(format!("{}/users/{}", self.base, username))
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .header(reqwest::header::ACCEPT, "application/vnd.github+json")
            .timeout(self.timeout);

        if let Some(t) = &self.token {
            req = req.header(reqwest::header::AUTHORIZATION, format!("token {}", t.0));
        }

        let res = req.send().await?;

        let status = res.status().as_u16();
        if status != 200 {
            let body = res.text().await.unwrap_or_default();
            return Err(GitHubError::APIResponseError { status, body });
        }

        Ok(res.json().await?)
    }
}
