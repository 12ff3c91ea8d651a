//! `/grass <username>`: render a user's contribution chart and upload it to
//! the channel the command came from.
//!
//! Each invocation works in its own temporary directory, named after a fresh
//! request ID, so concurrent requests for the same user never share files.
//! The directory and everything in it is removed when it goes out of scope,
//! whichever way the request ends.

use crate::{
    error::Failure,
    router::Deps,
    slack::{channel::ChannelId, upload::FileId},
};
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

/// Fetch, rasterise, upload, and announce a user's chart. Returns the ID of
/// the announced file.
pub async fn post_chart(
    deps: &Deps,
    username: &str,
    channel: &ChannelId,
) -> Result<FileId, Failure> {
    let request_id = Uuid::new_v4();

    let span = info_span!("grass", %request_id, username, %channel);

    async {
        let dir = tempfile::Builder::new()
            .prefix(&format!("grass-{}-", request_id))
            .tempdir()
            .map_err(Failure::TempFile)?;

        let svg = deps.chart.fetch_chart(username).await?;
        info!("Fetched chart ({} bytes)", svg.len());

        let svg_path = dir.path().join(format!("{}.svg", username));
        tokio::fs::write(&svg_path, &svg)
            .await
            .map_err(Failure::TempFile)?;

        let png_path = deps.converter.convert(&svg_path).await?;

        let filename = format!("{}_contributions.png", username);
        let file_id = deps
            .slack
            .upload_file(&png_path, &filename, channel, &deps.slack_token)
            .await?;

        deps.slack
            .post_message(
                channel,
                &fmt_caption(username),
                std::slice::from_ref(&file_id),
                &deps.slack_token,
            )
            .await?;

        info!("Announced file {}", file_id);
        Ok::<_, Failure>(file_id)
    }
    .instrument(span)
    .await
}

/// The message the chart is posted with.
pub fn fmt_caption(username: &str) -> String {
    format!("🌱 GitHub contributions for *{}*", username)
}

/// What the invoker sees once the chart is up.
pub fn fmt_done(username: &str) -> String {
    format!("🌱 The contribution chart for *{}* has been posted.", username)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        chart::convert::{ConvertError, ImageConverter},
        router::test_deps,
    };
    use async_trait::async_trait;
    use std::{
        path::{Path, PathBuf},
        sync::{Arc, Mutex},
    };

    /// Remembers every SVG it was asked to convert.
    #[derive(Default)]
    struct RecordingConverter {
        seen: Mutex<Vec<PathBuf>>,
    }

    #[async_trait]
    impl ImageConverter for RecordingConverter {
        async fn convert(&self, svg: &Path) -> Result<PathBuf, ConvertError> {
            assert!(svg.exists());
            self.seen.lock().unwrap().push(svg.to_owned());

            let png = svg.with_extension("png");
            tokio::fs::write(&png, "png")
                .await
                .map_err(ConvertError::SpawnFailed)?;

            Ok(png)
        }
    }

    #[tokio::test]
    async fn test_temp_files_are_per_request_and_removed() {
        let mut srv = mockito::Server::new_async().await;

        let chart_mock = srv
            .mock("GET", "/chart/octocat")
            .with_body("<svg></svg>")
            .expect(2)
            .create_async()
            .await;

        let slot_mock = srv
            .mock("POST", "/files.getUploadURLExternal")
            .with_body(r#"{"ok": false, "error": "invalid_auth"}"#)
            .expect(2)
            .create_async()
            .await;

        let converter = Arc::new(RecordingConverter::default());
        let deps = test_deps(&srv.url(), converter.clone());
        let channel = ChannelId("C0123".into());

        let first = post_chart(&deps, "octocat", &channel).await;
        let second = post_chart(&deps, "octocat", &channel).await;

        chart_mock.assert_async().await;
        slot_mock.assert_async().await;

        assert!(first.is_err());
        assert!(second.is_err());

        let seen = converter.seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        assert_ne!(seen[0].parent(), seen[1].parent());

        for svg in seen.iter() {
            assert_eq!(svg.file_name().unwrap(), "octocat.svg");
            assert!(!svg.exists());
            assert!(!svg.parent().unwrap().exists());
        }
    }

    #[test]
    fn test_messages_name_user() {
        assert!(fmt_caption("octocat").contains("*octocat*"));
        assert!(fmt_done("octocat").contains("*octocat*"));
    }
}
