//! Activity Service error types.
//!
//! All errors map to HTTP status codes via the `IntoResponse` impl. Every
//! failure is a rejected individual request; nothing is retried.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Activity Service error type.
///
/// Maps to HTTP status codes:
/// - InvalidArgument: 400 Bad Request
/// - NotFound: 404 Not Found
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActivityError {
    /// Missing, malformed, duplicate, full or not-signed-up conditions.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Unknown activity.
    #[error("Not found: {0}")]
    NotFound(String),
}

impl ActivityError {
    /// Returns the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ActivityError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            ActivityError::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }

    /// Machine-readable code carried in the error body.
    pub fn code(&self) -> &'static str {
        match self {
            ActivityError::InvalidArgument(_) => "INVALID_ARGUMENT",
            ActivityError::NotFound(_) => "NOT_FOUND",
        }
    }

    /// Bounded label used for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            ActivityError::InvalidArgument(_) => "invalid_argument",
            ActivityError::NotFound(_) => "not_found",
        }
    }

    /// Client-facing message without the variant prefix.
    pub fn message(&self) -> &str {
        match self {
            ActivityError::InvalidArgument(msg) | ActivityError::NotFound(msg) => msg,
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: String,
    message: String,
}

impl IntoResponse for ActivityError {
    fn into_response(self) -> Response {
        let error_response = ErrorResponse {
            error: ErrorDetail {
                code: self.code().to_string(),
                message: self.message().to_string(),
            },
        };

        (self.status_code(), Json(error_response)).into_response()
    }
}
