use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

use coin_finder_core::errors::CoreError;

/// Unified error type for HTTP responses.
#[derive(Debug, Error)]
pub enum ServerError {
    /// The upstream could not deliver coins and nothing is cached yet.
    #[error("upstream_error: {0}")]
    Upstream(String),

    #[error("bad_request: {0}")]
    BadRequest(String),

    #[error("internal_error: {0}")]
    Internal(String),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, error_str) = match &self {
            Self::Upstream(msg) => (StatusCode::BAD_GATEWAY, format!("upstream_error:{msg}")),
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            Self::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
        };

        let body = json!({ "error": error_str });
        (status, axum::Json(body)).into_response()
    }
}

impl From<CoreError> for ServerError {
    fn from(e: CoreError) -> Self {
        match e {
            CoreError::InvalidSortKey(_) => Self::BadRequest(e.to_string()),
            CoreError::UpstreamFetch { .. }
            | CoreError::EmptyListing { .. }
            | CoreError::RefreshTimedOut(_)
            | CoreError::Api { .. }
            | CoreError::RateLimited { .. }
            | CoreError::Network(_)
            | CoreError::Deserialization(_) => Self::Upstream(e.to_string()),
            CoreError::InvalidSettings(_) => Self::Internal(e.to_string()),
        }
    }
}
