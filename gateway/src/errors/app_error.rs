use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::capability::CapabilityError;

/// Errors surfaced by request handlers
///
/// Every variant maps to an HTTP 500. The client only sees a generic message;
/// the underlying cause is logged.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Capability(#[from] CapabilityError),

    #[error("Template rendering failed: {0}")]
    Render(#[from] std::fmt::Error),
}

pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "Request failed");

        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"error": "Internal server error"})),
        )
            .into_response()
    }
}
