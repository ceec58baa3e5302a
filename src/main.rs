//! httpgate demo server.
//!
//! Serves a minimal health/echo router through the graceful runner. The
//! process blocks until the listener fails or a termination signal drains
//! the server.

use std::path::Path;

use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use httpgate::config::{load_config, ServerConfig};
use httpgate::server::{GracefulServer, ServeError};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "httpgate=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("httpgate v0.1.0 starting");

    let config = match std::env::var_os("HTTPGATE_CONFIG") {
        Some(path) => load_config(Path::new(&path))?,
        None => ServerConfig::default(),
    };

    tracing::info!(
        bind_address = %config.bind_address(),
        shutdown_timeout_secs = config.shutdown_timeout_secs,
        "Configuration loaded"
    );

    let app = Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/echo", post(|body: String| async move { body }))
        .layer(TraceLayer::new_for_http());

    let server = GracefulServer::from_config(&config);
    match server.run(app).await {
        err @ ServeError::Shutdown { .. } => {
            tracing::info!(reason = %err, "Shutdown complete");
            Ok(())
        }
        err => {
            tracing::error!(error = %err, "Server terminated");
            Err(err.into())
        }
    }
}
