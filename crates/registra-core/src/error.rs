//! Domain error taxonomy.
//!
//! Every workflow operation returns one of these; the transport layer maps
//! them to HTTP statuses. Nothing here is retried: store errors other than
//! constraint violations are fatal to the request.

use thiserror::Error;

use registra_store::StoreError;

/// Domain-level errors.
#[derive(Debug, Error)]
pub enum DomainError {
    /// Entity id absent.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Caller lacks the role or ownership the operation demands.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Uniqueness violation: duplicate offering, enrollment, or payment.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Operation attempted from a state that forbids it.
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Malformed input.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Underlying store failure (fatal to the request).
    #[error("Storage error: {0}")]
    Store(StoreError),
}

impl From<StoreError> for DomainError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(msg) => DomainError::NotFound(msg),
            StoreError::Conflict(msg) => DomainError::Conflict(msg),
            other => DomainError::Store(other),
        }
    }
}

/// Result type for domain operations.
pub type Result<T> = std::result::Result<T, DomainError>;
