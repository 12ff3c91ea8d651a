//! Slack subrouter definition.
//!
//! The following subroutes are supported, each a slash command endpoint:
//!
//! - POST: `/status`
//! - POST: `/grass`

use super::{
    auth::{is_valid_signature, is_valid_token},
    command::{parse_argument, usage, Argument, CommandRequest, Reply},
};
use crate::{grass, router::Deps, status::status_reply};
use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::post,
    Json, Router,
};
use axum_extra::{headers, TypedHeader};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{error, info, warn};

/// Instantiate a new Slack subrouter.
pub fn slack_router() -> Router<Deps> {
    Router::new()
        .route("/status", post(status_handler))
        .route("/grass", post(grass_handler))
}

type Rejection = (StatusCode, String);

/// Handler for the POST subroute `/status`.
async fn status_handler(
    State(deps): State<Deps>,
    TypedHeader(content_type): TypedHeader<headers::ContentType>,
    header_map: HeaderMap,
    body: Bytes,
) -> Result<Json<Reply>, Rejection> {
    let req = accept(&deps, &content_type, &header_map, &body)?;

    let reply = match username("status", &req.text) {
        Ok(u) => status_reply(&deps, u).await,
        Err(reply) => reply,
    };

    Ok(Json(reply))
}

/// Handler for the POST subroute `/grass`.
///
/// The chart itself is posted to the channel separately; the reply only
/// confirms that to the invoker.
async fn grass_handler(
    State(deps): State<Deps>,
    TypedHeader(content_type): TypedHeader<headers::ContentType>,
    header_map: HeaderMap,
    body: Bytes,
) -> Result<Json<Reply>, Rejection> {
    let req = accept(&deps, &content_type, &header_map, &body)?;

    let u = match username("grass", &req.text) {
        Ok(u) => u,
        Err(reply) => return Ok(Json(reply)),
    };

    let reply = match grass::post_chart(&deps, u, &req.channel_id).await {
        Ok(_) => Reply::ephemeral(grass::fmt_done(u)),
        Err(e) => {
            error!("Failed to post chart for {}: {}", u, e);
            Reply::failure(format!(
                "Could not post the contribution chart for `{}`.\n> {}",
                u, e
            ))
        }
    };

    Ok(Json(reply))
}

/// Everything a slash command request must pass before we act on it. The
/// signature covers the raw body, so the form is only decoded afterwards.
fn accept(
    deps: &Deps,
    content_type: &headers::ContentType,
    header_map: &HeaderMap,
    body: &Bytes,
) -> Result<CommandRequest, Rejection> {
    // Parameters such as `charset` don't matter, only the media type.
    let media = mime::Mime::from(content_type.clone());
    if media.essence_str() != mime::APPLICATION_WWW_FORM_URLENCODED.essence_str() {
        return Err((
            StatusCode::BAD_REQUEST,
            String::from("Requests must have `Content-Type: application/x-www-form-urlencoded`"),
        ));
    }

    if let Some(secret) = &deps.signing_secret {
        let timestamp = header_str(header_map, "x-slack-request-timestamp");
        let sig = header_str(header_map, "x-slack-signature");

        if !is_valid_signature(secret, timestamp, body, sig, unix_now()) {
            warn!("Invalid Slack signature");
            return Err((StatusCode::UNAUTHORIZED, String::new()));
        }
    }

    let req: CommandRequest = serde_urlencoded::from_bytes(body).map_err(|e| {
        let msg = format!("Failed to deserialize form body: {}", e);
        warn!("{}", msg);

        (StatusCode::BAD_REQUEST, msg)
    })?;

    if deps.verification_token.is_none() {
        warn!("No verification token configured, skipping check");
    }

    if !is_valid_token(deps.verification_token.as_ref(), &req.token) {
        warn!("Invalid Slack verification token");
        return Err((StatusCode::UNAUTHORIZED, String::new()));
    }

    info!(
        "Accepted {} from {} ({}) in {}",
        req.command, req.user_name, req.user_id, req.channel_id
    );

    Ok(req)
}

/// Pull the username out of the command text, or produce the reply to send
/// instead.
fn username<'a>(command: &str, text: &'a str) -> Result<&'a str, Reply> {
    match parse_argument(text) {
        Argument::Username(u) => Ok(u),
        Argument::Blank => Err(Reply::ephemeral(usage(command))),
        Argument::Invalid(x) => {
            warn!("Rejected invalid username {:?}", x);
            Err(Reply::failure(format!("`{}` is not a valid GitHub username.", x)))
        }
    }
}

fn header_str<'a>(header_map: &'a HeaderMap, name: &str) -> &'a str {
    header_map
        .get(name)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}
