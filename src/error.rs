use crate::{
    chart::{convert::ConvertError, fetch::ChartError},
    github::GitHubError,
    slack::SlackError,
};
use std::{fmt, io};

/// Sum type representing every possible unexceptional fail state of a
/// command, after the request itself has been accepted.
#[derive(Debug)]
pub enum Failure {
    GitHub(GitHubError),
    Chart(ChartError),
    Convert(ConvertError),
    Slack(SlackError),
    TempFile(io::Error),
}

impl From<GitHubError> for Failure {
    fn from(e: GitHubError) -> Self {
        Failure::GitHub(e)
    }
}

impl From<ChartError> for Failure {
    fn from(e: ChartError) -> Self {
        Failure::Chart(e)
    }
}

impl From<ConvertError> for Failure {
    fn from(e: ConvertError) -> Self {
        Failure::Convert(e)
    }
}

impl From<SlackError> for Failure {
    fn from(e: SlackError) -> Self {
        Failure::Slack(e)
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Failure::GitHub(e) => write!(f, "{}", e),
            Failure::Chart(e) => write!(f, "{}", e),
            Failure::Convert(e) => write!(f, "{}", e),
            Failure::Slack(e) => write!(f, "{}", e),
            Failure::TempFile(e) => write!(f, "Temporary file error: {}", e),
        }
    }
}
