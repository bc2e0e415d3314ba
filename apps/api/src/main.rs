mod config;
mod editor;
mod errors;
mod export;
mod generation;
mod intake;
mod models;
mod routes;
mod session;
mod state;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::generation::{GenerationClient, HttpTransport};
use crate::routes::build_router;
use crate::session::SessionStore;
use crate::state::AppState;

/// How often idle sessions are swept.
const EVICTION_PERIOD: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Tailor API v{}", env!("CARGO_PKG_VERSION"));

    // Generation service
    let transport = HttpTransport::new(config.generation_url.clone(), config.generation_timeout)
        .context("failed to build the generation HTTP client")?;
    let generator = GenerationClient::new(Arc::new(transport));
    info!(
        "Generation client initialized (endpoint: {}, timeout: {:?})",
        config.generation_url, config.generation_timeout
    );

    let sessions = SessionStore::new();
    sessions.spawn_eviction(
        config.session_ttl,
        config.session_ttl.min(EVICTION_PERIOD).max(Duration::from_secs(1)),
    );
    info!("Idle sessions expire after {:?}", config.session_ttl);

    let state = AppState {
        sessions,
        generator,
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
