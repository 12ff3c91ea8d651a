//! Slash command requests and the immediate replies we send back.
//!
//! <https://api.slack.com/interactivity/slash-commands#app_command_handling>

use super::channel::ChannelId;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// The subset of the slash command payload we care about. Slack doesn't
/// always send every field, so all of them default to empty.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CommandRequest {
    pub token: String,
    pub text: String,
    pub channel_id: ChannelId,
    pub command: String,
    pub user_id: String,
    pub user_name: String,
}

/// Whether a reply is visible to the whole channel or only to the invoker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseType {
    InChannel,
    Ephemeral,
}

/// <https://api.slack.com/interactivity/slash-commands#responding_immediate_response>
#[derive(Debug, PartialEq, Eq, Serialize)]
pub struct Reply {
    pub response_type: ResponseType,
    pub text: String,
}

impl Reply {
    pub fn in_channel<T: ToString>(text: T) -> Self {
        Reply {
            response_type: ResponseType::InChannel,
            text: text.to_string(),
        }
    }

    pub fn ephemeral<T: ToString>(text: T) -> Self {
        Reply {
            response_type: ResponseType::Ephemeral,
            text: text.to_string(),
        }
    }

    /// A sender-only reply flagged as a failure.
    pub fn failure<T: ToString>(text: T) -> Self {
        Reply::ephemeral(format!("❌ {}", text.to_string()))
    }
}

/// The prompt shown when a command is invoked without a username.
///
/// ```
/// assert_eq!(usage("status"), "❗️ Please provide a GitHub username.\nFor example: `/status octocat`");
/// ```
pub fn usage(command: &str) -> String {
    format!(
        "❗️ Please provide a GitHub username.\nFor example: `/{} octocat`",
        command
    )
}

/// What a slash command's free text boils down to.
#[derive(Debug, PartialEq, Eq)]
pub enum Argument<'a> {
    Blank,
    Username(&'a str),
    Invalid(&'a str),
}

/// GitHub logins are alphanumerics and single hyphens, up to 39 characters,
/// never starting with a hyphen. Anything else isn't worth sending upstream,
/// and mustn't end up in a URL path or file name.
// This unwrap is exercised by the tests below.
static LOGIN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9](?:[A-Za-z0-9]|-[A-Za-z0-9]){0,38}-?$").unwrap());

/// Take the first whitespace-delimited token of the command text as the
/// username; anything after it is ignored.
pub fn parse_argument(text: &str) -> Argument<'_> {
    match text.split_whitespace().next() {
        None => Argument::Blank,
        Some(x) if x.len() <= 39 && LOGIN.is_match(x) => Argument::Username(x),
        Some(x) => Argument::Invalid(x),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck::quickcheck;

    #[test]
    fn test_reply_json() {
        assert_eq!(
            serde_json::to_value(Reply::in_channel("hi")).unwrap(),
            serde_json::json!({"response_type": "in_channel", "text": "hi"})
        );

        assert_eq!(
            serde_json::to_value(Reply::failure("nope")).unwrap(),
            serde_json::json!({"response_type": "ephemeral", "text": "❌ nope"})
        );
    }

    #[test]
    fn test_request_defaults() {
        let req: CommandRequest = serde_urlencoded::from_str("text=octocat").unwrap();

        assert_eq!(req.text, "octocat");
        assert_eq!(req.token, "");
        assert_eq!(req.channel_id, ChannelId(String::new()));
    }

    #[test]
    fn test_parse_argument() {
        assert_eq!(parse_argument(""), Argument::Blank);
        assert_eq!(parse_argument(" \t\n"), Argument::Blank);
        assert_eq!(parse_argument("octocat"), Argument::Username("octocat"));
        assert_eq!(parse_argument("  octocat  extra words"), Argument::Username("octocat"));
        assert_eq!(parse_argument("a-b-c"), Argument::Username("a-b-c"));
        assert_eq!(parse_argument("x"), Argument::Username("x"));

        assert_eq!(parse_argument("-octocat"), Argument::Invalid("-octocat"));
        assert_eq!(parse_argument("octo--cat"), Argument::Invalid("octo--cat"));
        assert_eq!(parse_argument("../etc/passwd"), Argument::Invalid("../etc/passwd"));
        assert_eq!(parse_argument("octo?cat=1"), Argument::Invalid("octo?cat=1"));

        let long = "a".repeat(40);
        assert_eq!(parse_argument(&long), Argument::Invalid(long.as_str()));
        let max = "a".repeat(39);
        assert_eq!(parse_argument(&max), Argument::Username(max.as_str()));
    }

    #[test]
    fn test_usage_names_command() {
        assert!(usage("grass").contains("/grass"));
        assert!(usage("status").contains("/status"));
    }

    quickcheck! {
        fn prop_blank_iff_only_whitespace(x: String) -> bool {
            (parse_argument(&x) == Argument::Blank) == x.trim().is_empty()
        }

        fn prop_username_is_first_token(x: String) -> bool {
            match parse_argument(&x) {
                Argument::Blank => true,
                Argument::Username(u) | Argument::Invalid(u) => x.split_whitespace().next() == Some(u),
            }
        }
    }
}
