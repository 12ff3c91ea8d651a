//! Server router definition.
//!
//! The following routes are supported:
//!
//! - GET: `/api/v1/health`
//! - POST: `/api/v1/slack/status`
//! - POST: `/api/v1/slack/grass`

use crate::{
    chart::{
        convert::{ImageConverter, RsvgConvert},
        fetch::ChartClient,
    },
    config::Config,
    github::GitHubClient,
    slack::{
        api::SlackClient,
        auth::{SigningSecret, SlackAccessToken, VerificationToken},
        router::slack_router,
    },
};
use axum::{http::StatusCode, routing::get, Router};
use std::{sync::Arc, time::Duration};
use tower_http::trace::{self, TraceLayer};
use tracing::Level;

/// The upper bound on any single outbound HTTP call.
pub const OUTBOUND_TIMEOUT: Duration = Duration::from_secs(10);

/// Dependencies shared by routes across requests. Everything in here is
/// cheap to clone.
#[derive(Clone)]
pub struct Deps {
    pub github: GitHubClient,
    pub chart: ChartClient,
    pub slack: SlackClient,
    pub converter: Arc<dyn ImageConverter>,
    pub slack_token: SlackAccessToken,
    pub verification_token: Option<VerificationToken>,
    pub signing_secret: Option<SigningSecret>,
}

impl Deps {
    /// Wire up every collaborator from configuration, sharing one connection
    /// pool between them.
    pub fn from_config(cfg: Config) -> Result<Deps, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(OUTBOUND_TIMEOUT)
            .build()?;

        Ok(Deps {
            github: GitHubClient::new(http.clone(), cfg.github_base, cfg.github_token),
            chart: ChartClient::new(http.clone(), cfg.chart_base),
            slack: SlackClient::new(http, cfg.slack_base),
            converter: Arc::new(RsvgConvert::new(cfg.converter_program)),
            slack_token: cfg.slack_token,
            verification_token: cfg.verification_token,
            signing_secret: cfg.signing_secret,
        })
    }
}

/// Instantiate a new router with tracing.
pub fn new(deps: Deps) -> Router {
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(trace::DefaultMakeSpan::new().level(Level::INFO))
        .on_response(trace::DefaultOnResponse::new().level(Level::INFO));

    let v1 = Router::new()
        .nest("/slack", slack_router())
        .layer(trace_layer)
        // Exclude the health check route from tracing.
        .route("/health", get(|| async { StatusCode::OK }));

    let api = Router::new().nest("/v1", v1);

    Router::new().nest("/api", api).with_state(deps)
}

/// Deps with every upstream pointed at `base`, the chart service under
/// `/chart`, and the verification token `foobar`.
#[cfg(test)]
pub fn test_deps(base: &str, converter: Arc<dyn ImageConverter>) -> Deps {
    let http = reqwest::Client::new();

    Deps {
        github: GitHubClient::new(http.clone(), base.to_owned(), None),
        chart: ChartClient::new(http.clone(), format!("{}/chart", base)),
        slack: SlackClient::new(http, base.to_owned()),
        converter,
        slack_token: SlackAccessToken("xoxb-foo".to_owned()),
        verification_token: Some(VerificationToken("foobar".to_owned())),
        signing_secret: None,
    }
}

#[cfg(test)]
mod tests_general {
    use super::*;
    use crate::chart::convert::fake::FakeConverter;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tower::ServiceExt;

    fn router() -> Router {
        super::new(test_deps("any", Arc::new(FakeConverter)))
    }

    #[tokio::test]
    async fn test_health() {
        let req = Request::builder()
            .uri("/api/v1/health")
            .body(Body::empty())
            .unwrap();

        let res = router().oneshot(req).await.unwrap();

        assert_eq!(res.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_not_found() {
        let req = Request::builder()
            .uri("/bad/route")
            .body(Body::empty())
            .unwrap();

        let res = router().oneshot(req).await.unwrap();

        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_from_config() {
        let cfg = Config::from_lookup(|_| None).ok().unwrap();
        let deps = Deps::from_config(cfg).unwrap();

        assert!(deps.verification_token.is_none());
        assert!(deps.signing_secret.is_none());
    }
}
