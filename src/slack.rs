//! Everything that talks to, or is talked to by, Slack.
//!
//! Inbound we accept slash commands (see [router]). Outbound we only need
//! enough of the Web API to upload a file into a channel and announce it; see
//! [upload] and [message].

pub mod api;
pub mod auth;
pub mod channel;
pub mod command;
pub mod error;
pub mod message;
pub mod router;
pub mod upload;

pub use error::SlackError;
