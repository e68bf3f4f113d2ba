//! API error types and responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use coursebook_store::StoreError;

/// Message for any request field that fails validation.
pub const FIELDS_INVALID: &str = "fields not filled correctly";

/// Message for an id that is malformed or refers to nothing.
pub const ID_ERROR: &str = "ID error";

/// API error type.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Bad request - invalid input or a refused business rule.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Resource not found. Reported as 400 like other client mistakes.
    #[error("not found: {0}")]
    NotFound(String),

    /// Unauthorized - missing, expired or invalid token.
    #[error("unauthorized: {0}")]
    Unauthorized(&'static str),

    /// Forbidden - valid token but insufficient role.
    #[error("forbidden: {0}")]
    Forbidden(&'static str),

    /// Conflict - resource already exists or invalid state transition.
    #[error("conflict: {0}")]
    Conflict(String),

    /// The request did not finish within the configured timeout.
    #[error("request timed out")]
    Timeout,

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// The standard validation failure.
    #[must_use]
    pub fn invalid_fields() -> Self {
        Self::BadRequest(FIELDS_INVALID.into())
    }

    /// The standard bad-id failure.
    #[must_use]
    pub fn id_error() -> Self {
        Self::NotFound(ID_ERROR.into())
    }
}

/// JSON failure envelope.
#[derive(Debug, Serialize)]
struct ErrorResponse {
    status: &'static str,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, envelope, message) = match self {
            Self::BadRequest(msg) | Self::NotFound(msg) => {
                (StatusCode::BAD_REQUEST, "failed", msg)
            }
            Self::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "failed", msg.to_string()),
            Self::Forbidden(msg) => (StatusCode::FORBIDDEN, "failed", msg.to_string()),
            Self::Conflict(msg) => (StatusCode::CONFLICT, "failed", msg),
            Self::Timeout => (
                StatusCode::REQUEST_TIMEOUT,
                "failed",
                "request timed out".to_string(),
            ),
            Self::Internal(msg) => {
                tracing::error!(error = %msg, "Internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "error",
                    "server error".to_string(),
                )
            }
        };

        let body = ErrorResponse {
            status: envelope,
            message,
        };

        (status, Json(body)).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { .. } => Self::id_error(),
            StoreError::Conflict(msg) => Self::Conflict(msg),
            StoreError::AlreadyBooked => Self::BadRequest("course already booked".into()),
            StoreError::Rejected(rejection) => Self::BadRequest(rejection.to_string()),
            StoreError::Database(msg) | StoreError::Serialization(msg) => Self::Internal(msg),
        }
    }
}
