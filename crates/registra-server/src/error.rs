//! Error types for the server.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use registra_core::DomainError;

/// Server error type.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Caller lacks the role or ownership the operation demands.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Uniqueness violation.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Operation attempted from a state that forbids it.
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),

    /// Database/storage error.
    #[error("Storage error: {0}")]
    Storage(String),
}

impl From<DomainError> for ServerError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::NotFound(msg) => ServerError::NotFound(msg),
            DomainError::Unauthorized(msg) => ServerError::Forbidden(msg),
            DomainError::Conflict(msg) => ServerError::Conflict(msg),
            DomainError::InvalidState(msg) => ServerError::InvalidState(msg),
            DomainError::Validation(msg) => ServerError::BadRequest(msg),
            DomainError::Store(e) => ServerError::Storage(e.to_string()),
        }
    }
}

/// Result type for server operations.
pub type Result<T> = std::result::Result<T, ServerError>;

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            ServerError::Forbidden(_) => (StatusCode::FORBIDDEN, "forbidden"),
            ServerError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            ServerError::BadRequest(_) => (StatusCode::BAD_REQUEST, "bad_request"),
            ServerError::Conflict(_) => (StatusCode::CONFLICT, "conflict"),
            ServerError::InvalidState(_) => (StatusCode::CONFLICT, "invalid_state"),
            ServerError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
            ServerError::Storage(_) => (StatusCode::INTERNAL_SERVER_ERROR, "storage_error"),
        };

        let message = self.to_string();

        match &self {
            ServerError::Internal(_) | ServerError::Storage(_) => {
                tracing::error!(status = %status, code, error = %message, "Server error");
            }
            _ => {
                tracing::warn!(status = %status, code, error = %message, "Client error");
            }
        }

        let body = ErrorResponse {
            code: code.to_string(),
            message,
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_error_status_mapping() {
        let cases = [
            (
                ServerError::from(DomainError::NotFound("x".into())),
                StatusCode::NOT_FOUND,
            ),
            (
                ServerError::from(DomainError::Unauthorized("x".into())),
                StatusCode::FORBIDDEN,
            ),
            (
                ServerError::from(DomainError::Conflict("x".into())),
                StatusCode::CONFLICT,
            ),
            (
                ServerError::from(DomainError::InvalidState("x".into())),
                StatusCode::CONFLICT,
            ),
            (
                ServerError::from(DomainError::Validation("x".into())),
                StatusCode::BAD_REQUEST,
            ),
        ];
        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }
}
