//! Request-scoped error taxonomy and its HTTP mapping.
//!
//! Every failure mode maps to a single error response on the request that
//! triggered it; nothing here is fatal to the running process.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

/// Everything that can go wrong while serving one request.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Client sent text that is empty or too short after trimming.
    #[error("text is too short: need at least 2 characters after trimming")]
    InvalidInput,

    /// No credential is set for the selected backend. Carries the name of
    /// the environment variable that would fix it.
    #[error("API not configured. Set {0} in the environment")]
    NotConfigured(&'static str),

    /// The backend call itself failed: network, auth, rate limit, non-2xx.
    #[error("upstream call failed: {0}")]
    UpstreamCall(String),

    /// The backend replied, but not with parseable JSON.
    #[error("upstream reply is not valid JSON: {0}")]
    UpstreamFormat(String),
}

impl ApiError {
    /// HTTP status for this error: client errors get 400, everything
    /// upstream-related gets 500.
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidInput => StatusCode::BAD_REQUEST,
            ApiError::NotConfigured(_) | ApiError::UpstreamCall(_) | ApiError::UpstreamFormat(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::UpstreamCall(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "detail": self.to_string() }))).into_response()
    }
}
