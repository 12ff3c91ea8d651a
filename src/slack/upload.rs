//! Upload a local file into a channel via Slack's external upload flow.
//!
//! The flow is three strictly ordered round trips, each consuming the output
//! of the one before:
//!
//! 1. `files.getUploadURLExternal` grants an upload URL and a file ID.
//! 2. The raw bytes are PUT to that URL.
//! 3. `files.completeUploadExternal` finalizes the file.
//!
//! Any failure aborts the rest. There's no retry; a slot that was granted but
//! never completed is simply abandoned on Slack's side.
//!
//! <https://api.slack.com/messaging/files#uploading_files>

use super::{
    api::{Ack, SlackClient},
    auth::SlackAccessToken,
    channel::ChannelId,
    error::SlackError,
};
use serde::{Deserialize, Serialize};
use std::{fmt, path::Path};
use tracing::info;
use url::Url;

/// Identifies an uploaded file from step 1 onwards.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileId(pub String);

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Where and as what a single file may be uploaded. Only valid for one
/// upload.
#[derive(Debug, Deserialize)]
pub struct UploadSlot {
    pub id: FileId,
    pub upload_url: Url,
}

#[derive(Serialize)]
struct FileMeta<'a> {
    filename: &'a str,
    length: usize,
}

#[derive(Serialize)]
struct UploadURLRequest<'a> {
    files: [FileMeta<'a>; 1],
    channels: [&'a ChannelId; 1],
}

#[derive(Deserialize)]
struct UploadURLResponse {
    #[allow(dead_code)]
    #[serde(deserialize_with = "crate::de::only_true")]
    ok: bool,
    #[serde(default)]
    files: Vec<UploadSlot>,
}

#[derive(Serialize)]
struct CompletedFile<'a> {
    id: &'a FileId,
}

/// <https://api.slack.com/methods/files.completeUploadExternal#args>
#[derive(Serialize)]
struct CompleteRequest<'a> {
    files: [CompletedFile<'a>; 1],
}

impl SlackClient {
    /// Run the whole upload flow for the file at `path`, presenting it to
    /// Slack as `filename`. Returns the finalized file's ID, ready to be
    /// referenced in a message.
    pub async fn upload_file(
        &self,
        path: &Path,
        filename: &str,
        channel: &ChannelId,
        token: &SlackAccessToken,
    ) -> Result<FileId, SlackError> {
        let bytes = tokio::fs::read(path).await.map_err(SlackError::ReadFailed)?;

        info!("Requesting upload slot for {} ({} bytes)", filename, bytes.len());
        let slot = self
            .request_upload_slot(filename, bytes.len(), channel, token)
            .await?;

        info!("Uploading {} as file {}", filename, slot.id);
        self.transfer(&slot, bytes).await?;

        self.complete_upload(&slot.id, token).await?;
        info!("Completed upload of file {}", slot.id);

        Ok(slot.id)
    }

    /// Step 1. Ask for somewhere to put exactly one file.
    async fn request_upload_slot(
        &self,
        filename: &str,
        length: usize,
        channel: &ChannelId,
        token: &SlackAccessToken,
    ) -> Result<UploadSlot, SlackError> {
        let res: UploadURLResponse = self
            .call(
                "/files.getUploadURLExternal",
                &UploadURLRequest {
                    files: [FileMeta { filename, length }],
                    channels: [channel],
                },
                token,
            )
            .await?;

        res.files.into_iter().next().ok_or(SlackError::NoUploadSlot)
    }

    /// Step 2. The upload URL is pre-signed, so no token is sent.
    async fn transfer(&self, slot: &UploadSlot, bytes: Vec<u8>) -> Result<(), SlackError> {
        let res = self
            .put(slot.upload_url.clone())
            .header(reqwest::header::CONTENT_TYPE, "application/octet-stream")
            .body(bytes)
            .send()
            .await
            // The upload URL is pre-signed; keep it out of anything we show.
            .map_err(|e| SlackError::APIRequestFailed(e.without_url()))?;

        let status = res.status().as_u16();
        if status >= 300 {
            let body = res.text().await.unwrap_or_default();
            return Err(SlackError::UploadRejected { status, body });
        }

        Ok(())
    }

    /// Step 3.
    async fn complete_upload(&self, id: &FileId, token: &SlackAccessToken) -> Result<(), SlackError> {
        let _: Ack = self
            .call(
                "/files.completeUploadExternal",
                &CompleteRequest {
                    files: [CompletedFile { id }],
                },
                token,
            )
            .await?;

        Ok(())
    }
}
