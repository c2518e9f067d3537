use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::store::StoreError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// Enrichment failures (reviewer names) never reach this type: they degrade
/// to a sentinel value where they happen.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Upstream failure: {0}")]
    Upstream(#[from] StoreError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::InvalidArgument(msg) => {
                (StatusCode::BAD_REQUEST, "INVALID_ARGUMENT", msg.clone())
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Upstream(e) => {
                tracing::error!("Upstream failure: {e}");
                (
                    StatusCode::BAD_GATEWAY,
                    "UPSTREAM_FAILURE",
                    "The record store is unavailable, retry later".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
