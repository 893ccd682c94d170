//! Error types for the store crate.

use thiserror::Error;

/// Errors that can occur in the store crate.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database connection or operation failed.
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Serialization/deserialization failed.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Uniqueness constraint violated.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Requested row not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Stored data failed to decode (bad status string, malformed JSON column).
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

impl From<registra_types::status::UnknownStatus> for StoreError {
    fn from(e: registra_types::status::UnknownStatus) -> Self {
        StoreError::InvalidData(e.to_string())
    }
}

/// Result type alias for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Whether the error is a SQLite unique/primary-key constraint violation.
pub fn is_unique_violation(e: &rusqlite::Error) -> bool {
    matches!(
        e,
        rusqlite::Error::SqliteFailure(err, _)
            if err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
                || err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY
    )
}

/// Map a uniqueness violation to `Conflict` with the given message; pass
/// other database errors through.
pub(crate) fn conflict_on_unique(e: rusqlite::Error, msg: &str) -> StoreError {
    if is_unique_violation(&e) {
        StoreError::Conflict(msg.to_string())
    } else {
        StoreError::Database(e)
    }
}
