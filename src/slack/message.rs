//! Post messages to a Slack channel.

use super::{
    api::{Ack, SlackClient},
    auth::SlackAccessToken,
    channel::ChannelId,
    error::SlackError,
    upload::FileId,
};
use serde::Serialize;

/// <https://api.slack.com/methods/chat.postMessage#args>
#[derive(Serialize)]
struct MessageRequest<'a> {
    channel: &'a ChannelId,
    text: &'a str,
    #[serde(skip_serializing_if = "no_files")]
    file_ids: &'a [FileId],
}

fn no_files(ids: &&[FileId]) -> bool {
    ids.is_empty()
}

impl SlackClient {
    /// Post a message in a channel, optionally referencing finalized files.
    pub async fn post_message(
        &self,
        channel: &ChannelId,
        text: &str,
        file_ids: &[FileId],
        token: &SlackAccessToken,
    ) -> Result<(), SlackError> {
        let _: Ack = self
            .call(
                "/chat.postMessage",
                &MessageRequest {
                    channel,
                    text,
                    file_ids,
                },
                token,
            )
            .await?;

        Ok(())
    }
}
