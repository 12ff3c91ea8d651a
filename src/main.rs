//! A bridge between Slack slash commands and GitHub.
//!
//! - `/status <username>` summarises a GitHub profile in channel.
//! - `/grass <username>` uploads the user's contribution chart to the
//!   channel.
//!
//! Configuration is read from the environment; see [config::Config].

use dotenvy::dotenv;
use router::Deps;
use std::net::SocketAddr;
use tokio::{net::TcpListener, sync::oneshot};
use tracing::{error, info, warn};

mod chart;
mod config;
mod de;
mod error;
mod github;
mod grass;
mod router;
mod slack;
mod status;

/// Application entrypoint. Initialises tracing, reads configuration, binds
/// to 0.0.0.0, and starts the server.
#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_target(false)
        .compact()
        .init();

    let has_dotenv = dotenv().is_ok();
    if !has_dotenv {
        warn!("No .env found");
    }

    let cfg = match config::Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };

    let addr = SocketAddr::from(([0, 0, 0, 0], cfg.port));
    let deps = match Deps::from_config(cfg) {
        Ok(deps) => deps,
        Err(e) => {
            error!("Failed to build HTTP client: {}", e);
            std::process::exit(1);
        }
    };

    let listener = TcpListener::bind(addr)
        .await
        .expect("Failed to bind address");

    server_(listener, deps).await;
}

/// Run a server without graceful shutdown.
async fn server_(listener: TcpListener, deps: Deps) {
    // Giving a receiver that will never resolve.
    let (_tx, rx) = oneshot::channel::<()>();
    server(listener, deps, rx).await;
}

/// Run a server with graceful shutdown via `rx`.
async fn server(listener: TcpListener, deps: Deps, rx: oneshot::Receiver<()>) {
    if let Ok(addr) = listener.local_addr() {
        info!("Listening on {}", addr);
    }

    axum::serve(listener, router::new(deps))
        .with_graceful_shutdown(async {
            rx.await.ok();
        })
        .await
        .expect("Failed to start server");
}
