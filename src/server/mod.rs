//! HTTP server: shared state, router assembly, and the serve loop.

pub mod routes;

use std::sync::Arc;

use anyhow::Result;
use axum::Router;
use axum::http::HeaderValue;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::analyzer::Backend;
use crate::config::Config;

/// Local development origins allowed by CORS.
const ALLOWED_ORIGINS: [&str; 2] = ["http://localhost:5173", "http://localhost:3000"];

/// Application state shared across handlers: immutable config plus the
/// wired backend, if one could be constructed at startup.
pub struct AppState {
    pub config: Config,
    pub backend: Option<Arc<dyn Backend>>,
}

impl AppState {
    pub fn new(config: Config, backend: Option<Arc<dyn Backend>>) -> Self {
        Self { config, backend }
    }
}

/// Build the application router with CORS and request tracing attached.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(ALLOWED_ORIGINS.map(HeaderValue::from_static))
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(routes::root))
        .route("/health", get(routes::health))
        .route("/process_text", post(routes::process_text))
        .with_state(Arc::new(state))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Bind and serve until the process is stopped.
pub async fn run(state: AppState, addr: &str) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on http://{}", addr);

    axum::serve(listener, app(state)).await?;
    Ok(())
}
