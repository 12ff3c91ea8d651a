use std::fmt;

/// Sum type representing every way talking to Slack can fail.
#[derive(Debug)]
pub enum SlackError {
    /// We couldn't even build the request body.
    RequestBuildFailed(serde_json::Error),
    APIRequestFailed(reqwest::Error),
    /// Slack answered with something we don't understand.
    MalformedResponse(serde_json::Error),
    APIResponseError(String),
    /// `files.getUploadURLExternal` succeeded without granting a slot.
    NoUploadSlot,
    UploadRejected { status: u16, body: String },
    ReadFailed(std::io::Error),
}

impl From<reqwest::Error> for SlackError {
    fn from(e: reqwest::Error) -> Self {
        SlackError::APIRequestFailed(e)
    }
}

impl fmt::Display for SlackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let x = match self {
            SlackError::RequestBuildFailed(e) => format!("Failed to build Slack API request: {}", e),
            SlackError::APIRequestFailed(e) => format!("Slack API request failed: {}", e),
            SlackError::MalformedResponse(e) => format!("Slack API returned malformed response: {}", e),
            SlackError::APIResponseError(e) => format!("Slack API returned error: {}", e),
            SlackError::NoUploadSlot => "Slack API returned no upload URL".into(),
            SlackError::UploadRejected { status, body } => {
                format!("Slack file upload failed with {}: {}", status, body)
            }
            SlackError::ReadFailed(e) => format!("Failed to read file for upload: {}", e),
        };

        write!(f, "{}", x)
    }
}
