//! Process configuration, read once at startup and handed to whatever needs
//! it from there.

use crate::{
    github::GitHubToken,
    slack::auth::{SigningSecret, SlackAccessToken, VerificationToken},
};
use std::{env, fmt, num::ParseIntError};
use tracing::warn;

/// The port we'll listen on in the absence of `$PORT`.
const DEFAULT_PORT: u16 = 8080;

/// Everything read from the environment.
pub struct Config {
    pub port: u16,
    pub verification_token: Option<VerificationToken>,
    pub signing_secret: Option<SigningSecret>,
    pub slack_token: SlackAccessToken,
    pub github_token: Option<GitHubToken>,
    pub github_base: String,
    pub chart_base: String,
    pub slack_base: String,
    pub converter_program: String,
}

/// The only thing we refuse to start without is a sensible port.
pub enum ConfigError {
    BadPort(String, ParseIntError),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::BadPort(raw, e) => write!(f, "Could not parse PORT {:?} to u16: {}", raw, e),
        }
    }
}

impl Config {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Config, ConfigError> {
        Config::from_lookup(|k| env::var(k).ok())
    }

    /// Read configuration from any key-value source. Empty values are
    /// treated as absent.
    pub fn from_lookup<F>(lookup: F) -> Result<Config, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |k: &str| lookup(k).filter(|v| !v.is_empty());

        let port = match get("PORT") {
            Some(raw) => raw.parse().map_err(|e| ConfigError::BadPort(raw, e))?,
            None => DEFAULT_PORT,
        };

        let verification_token = get("SLACK_VERIFICATION_TOKEN").map(VerificationToken);
        if verification_token.is_none() {
            warn!("No $SLACK_VERIFICATION_TOKEN environment variable found, token checks are disabled");
        }

        let slack_token = match get("SLACK_BOT_TOKEN") {
            Some(t) => SlackAccessToken(t),
            None => {
                warn!("No $SLACK_BOT_TOKEN environment variable found");
                SlackAccessToken(String::new())
            }
        };

        Ok(Config {
            port,
            verification_token,
            signing_secret: get("SLACK_SIGNING_SECRET").map(SigningSecret),
            slack_token,
            github_token: get("GITHUB_TOKEN").map(GitHubToken),
            github_base: get("GITHUB_API_BASE").unwrap_or_else(|| crate::github::API_BASE.into()),
            chart_base: get("CHART_BASE").unwrap_or_else(|| crate::chart::fetch::CHART_BASE.into()),
            slack_base: get("SLACK_API_BASE").unwrap_or_else(|| crate::slack::api::API_BASE.into()),
            converter_program: get("RSVG_CONVERT")
                .unwrap_or_else(|| crate::chart::convert::DEFAULT_PROGRAM.into()),
        })
    }
}
