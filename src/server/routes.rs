//! Route handlers for the sentiment API.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{error, info};

use crate::analyzer;
use crate::error::ApiError;

use super::AppState;

#[derive(Deserialize)]
pub struct TextRequest {
    #[serde(default)]
    pub text: String,
}

/// `GET /` — liveness and which backend the selector names.
pub async fn root(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({
        "message": "Sentiment Aura API",
        "status": "running",
        "api": state.config.provider.as_str(),
    }))
}

/// `GET /health` — credential presence at startup, independent of any
/// request having been made.
pub async fn health(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "api_configured": state.config.api_configured(),
        "using_api": state.config.provider.as_str(),
    }))
}

/// `POST /process_text` — run the text through the sentiment pipeline.
pub async fn process_text(
    State(state): State<Arc<AppState>>,
    Json(req): Json<TextRequest>,
) -> Result<Json<Value>, ApiError> {
    // Bad input is the client's problem; report it before any
    // configuration problem on our side.
    analyzer::check_input(&req.text)?;

    let backend = state
        .backend
        .as_ref()
        .ok_or_else(|| ApiError::NotConfigured(state.config.provider.key_var()))?;

    match analyzer::process(backend.as_ref(), &req.text).await {
        Ok(result) => {
            info!("processed text ({} chars)", req.text.len());
            Ok(Json(result))
        }
        Err(e) => {
            error!("error processing text: {}", e);
            Err(e)
        }
    }
}
