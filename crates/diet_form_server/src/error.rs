//! Error types for the form server.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use diet_plan_client::{DietError, ValidationErrors};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("Backend error: {0}")]
    Backend(DietError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<DietError> for AppError {
    fn from(err: DietError) -> Self {
        match err {
            DietError::Validation(errors) => AppError::Validation(errors),
            DietError::Config(msg) => AppError::Internal(msg),
            other => AppError::Backend(other),
        }
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Backend(_) => StatusCode::BAD_GATEWAY,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            AppError::Validation(errors) => json!({ "errors": errors }),
            other => {
                tracing::error!(error = %other, "request failed");
                json!({ "error": other.to_string() })
            }
        };
        (status, Json(body)).into_response()
    }
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;
