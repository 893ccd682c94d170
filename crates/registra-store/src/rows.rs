//! Shared row-mapping helpers.

use chrono::{DateTime, Utc};

use crate::error::{Result, StoreError};

/// Parse an RFC 3339 timestamp column, falling back to now on bad data.
pub(crate) fn parse_dt(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

/// Encode a list column as JSON text.
pub(crate) fn to_json<T: serde::Serialize>(value: &T) -> Result<String> {
    serde_json::to_string(value).map_err(StoreError::Serialization)
}

/// Decode a JSON text list column.
pub(crate) fn from_json<T: serde::de::DeserializeOwned>(s: &str) -> Result<T> {
    serde_json::from_str(s)
        .map_err(|e| StoreError::InvalidData(format!("malformed JSON column: {e}")))
}
