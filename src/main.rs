//! Plan Guide - guided business plan session
//!
//! Walks one user through sector selection and their business story, then
//! fills the highlighted cells of their spreadsheet: pink cells from an
//! external lookup service, yellow cells by asking the user.

mod api;
mod catalog;
mod classifier;
mod interaction;
mod lookup;
mod message_log;
mod prompts;
mod resolution;
mod runtime;
mod state_machine;

use api::{create_router, AppState};
use lookup::LookupConfig;
use message_log::InMemoryLog;
use runtime::SessionHandle;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "plan_guide=info,tower_http=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    // Configuration
    let port: u16 = std::env::var("PLAN_GUIDE_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8000);

    let lookup_config = LookupConfig::from_env();
    if lookup_config.is_configured() {
        tracing::info!(
            url = ?lookup_config.url,
            timeout_secs = lookup_config.timeout.as_secs(),
            "Lookup service configured"
        );
    } else {
        tracing::warn!("No lookup service configured. Set LOOKUP_URL; pink cells will keep their values.");
    }
    let lookup = lookup_config.build();

    // Start the session
    let session = SessionHandle::start(lookup, Arc::new(InMemoryLog::new()));
    tracing::info!(session_id = %session.session_id, "Session started");
    let state = AppState::new(session);

    // Create router
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let compression = CompressionLayer::new()
        .gzip(true)
        .br(true)
        .deflate(true)
        .zstd(true);

    let app = create_router(state)
        .layer(cors)
        .layer(compression)
        .layer(TraceLayer::new_for_http());

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Plan guide server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
