//! Type definitions and helpers for the Slack Web API.

use super::{auth::*, error::SlackError};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::debug;

/// The base URL of the Slack API.
pub const API_BASE: &str = "https://slack.com/api";

/// A client for the Slack Web API. Cloning is cheap; the underlying
/// [reqwest::Client] holds its connection pool behind an `Arc`.
#[derive(Clone)]
pub struct SlackClient {
    http: reqwest::Client,
    base: String,
}

impl SlackClient {
    pub fn new(http: reqwest::Client, base: String) -> Self {
        SlackClient { http, base }
    }

    /// Create a POST request to any Slack API endpoint, handling
    /// authentication.
    pub fn post<T: ToString>(&self, path: T, token: &SlackAccessToken) -> reqwest::RequestBuilder {
        self.http
            .post(self.base.to_owned() + &path.to_string())
            .header(reqwest::header::AUTHORIZATION, to_auth_header_val(token))
    }

    /// POST a JSON body to a Slack API endpoint and decode the response.
    ///
    /// Encoding and decoding are done by hand rather than by [reqwest] so
    /// that each failure keeps its own [SlackError] variant.
    pub async fn call<B, R>(
        &self,
        path: &str,
        body: &B,
        token: &SlackAccessToken,
    ) -> Result<R, SlackError>
    where
        B: Serialize,
        R: DeserializeOwned,
    {
        let body = serde_json::to_vec(body).map_err(SlackError::RequestBuildFailed)?;

        let text = self
            .post(path, token)
            .header(reqwest::header::CONTENT_TYPE, "application/json; charset=utf-8")
            .body(body)
            .send()
            .await?
            .text()
            .await?;

        debug!("Slack API {} responded: {}", path, text);

        let res: APIResult<R> =
            serde_json::from_str(&text).map_err(SlackError::MalformedResponse)?;

        match res {
            APIResult::Ok(x) => Ok(x),
            APIResult::Err(res) => Err(SlackError::APIResponseError(res.error)),
        }
    }

    /// Create an unauthenticated PUT request to an arbitrary URL handed to us
    /// by Slack.
    pub fn put(&self, url: url::Url) -> reqwest::RequestBuilder {
        self.http.put(url)
    }
}

/// Slack's API returns a common "untagged" response, representing whether a
/// request was successful.
///
/// ```json
/// {
///     "ok": true,
///     "files": []
/// }
/// ```
///
/// ```json
/// {
///     "ok": false,
///     "error": "invalid_auth"
/// }
/// ```
#[derive(Deserialize)]
#[serde(untagged)]
pub enum APIResult<T> {
    Ok(T),
    Err(ErrorResponse),
}

/// The universal response in case of an unsuccessful request.
// The `ok` field is checked here, and should be checked on responses too,
// primarily to ensure appropriate deserialization behaviour in case of an
// otherwise empty successful response.
#[derive(Deserialize)]
pub struct ErrorResponse {
    #[allow(dead_code)]
    #[serde(deserialize_with = "crate::de::only_false")]
    ok: bool,
    pub error: String,
}

/// A bare `{"ok": true}` acknowledgement, for endpoints whose success payload
/// we don't otherwise need.
#[derive(Deserialize)]
pub struct Ack {
    #[allow(dead_code)]
    #[serde(deserialize_with = "crate::de::only_true")]
    ok: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_result_sides() {
        let ok: APIResult<Ack> = serde_json::from_str(r#"{"ok": true, "ts": "1.2"}"#).unwrap();
        assert!(matches!(ok, APIResult::Ok(_)));

        let err: APIResult<Ack> =
            serde_json::from_str(r#"{"ok": false, "error": "channel_not_found"}"#).unwrap();
        match err {
            APIResult::Err(e) => assert_eq!(e.error, "channel_not_found"),
            APIResult::Ok(_) => panic!("expected an error response"),
        }

        // Failures without an error string fit neither side.
        assert!(serde_json::from_str::<APIResult<Ack>>(r#"{"ok": false}"#).is_err());
    }
}
