//! Error handling for the backend API.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// API error types.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response body, matching the success envelope of the API:
/// every failure is `{"success": false, "error": "..."}`.
#[derive(Serialize)]
struct ErrorResponse {
    success: bool,
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // The wire carries the bare message; the Display prefix is for logs.
        let (status, error) = match self {
            ApiError::Unauthorized(m) => (StatusCode::UNAUTHORIZED, m),
            ApiError::Forbidden(m) => (StatusCode::FORBIDDEN, m),
            ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m),
            ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m),
            ApiError::Storage(m) | ApiError::Internal(m) => {
                (StatusCode::INTERNAL_SERVER_ERROR, m)
            }
        };

        let body = Json(ErrorResponse {
            success: false,
            error,
        });

        (status, body).into_response()
    }
}

/// Result type alias for API operations.
pub type Result<T> = std::result::Result<T, ApiError>;
