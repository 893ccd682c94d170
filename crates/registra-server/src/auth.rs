//! Authentication middleware.
//!
//! Every API request carries a bearer token: either the configured
//! bootstrap admin token or a user's api token. The resolved
//! [`Principal`] is injected into request extensions for handlers.
//!
//! # Security
//!
//! Bootstrap token comparison uses constant-time comparison to prevent
//! timing attacks.

use axum::{
    body::Body,
    extract::{Request, State},
    http::{StatusCode, header::AUTHORIZATION},
    middleware::Next,
    response::{IntoResponse, Response},
};
use subtle::ConstantTimeEq;

use registra_types::Principal;

use crate::state::AppState;

// ─────────────────────────────────────────────────────────────────────────────
// Auth Error
// ─────────────────────────────────────────────────────────────────────────────

/// Authentication error.
#[derive(Debug, Clone)]
pub enum AuthError {
    /// Missing authorization header.
    MissingToken,
    /// Invalid authorization format.
    InvalidFormat,
    /// Token matched no account.
    InvalidToken,
    /// Token lookup failed in the store.
    Lookup(String),
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::MissingToken => write!(f, "Missing authorization token"),
            AuthError::InvalidFormat => write!(f, "Invalid authorization format"),
            AuthError::InvalidToken => write!(f, "Invalid token"),
            AuthError::Lookup(e) => write!(f, "Token lookup failed: {e}"),
        }
    }
}

impl std::error::Error for AuthError {}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AuthError::MissingToken => {
                (StatusCode::UNAUTHORIZED, "Missing authorization token")
            }
            AuthError::InvalidFormat => (StatusCode::BAD_REQUEST, "Invalid authorization format"),
            AuthError::InvalidToken => (StatusCode::UNAUTHORIZED, "Invalid token"),
            AuthError::Lookup(e) => {
                tracing::error!(error = %e, "Token lookup failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "Token lookup failed")
            }
        };

        let body = serde_json::json!({
            "error": message,
            "code": status.as_u16(),
        });

        (status, axum::Json(body)).into_response()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Security Helpers
// ─────────────────────────────────────────────────────────────────────────────

/// Compare two strings in constant time.
///
/// The comparison takes the same amount of time regardless of how many
/// characters match; differing lengths still run a dummy comparison.
fn constant_time_eq(a: &str, b: &str) -> bool {
    let a_bytes = a.as_bytes();
    let b_bytes = b.as_bytes();

    if a_bytes.len() == b_bytes.len() {
        a_bytes.ct_eq(b_bytes).into()
    } else {
        let _ = a_bytes.ct_eq(a_bytes);
        false
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Middleware
// ─────────────────────────────────────────────────────────────────────────────

/// Authentication middleware function.
///
/// Validates the bearer token and injects the resolved `Principal` into
/// request extensions.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AuthError> {
    let principal = resolve_principal(&request, &state)?;
    request.extensions_mut().insert(principal);
    Ok(next.run(request).await)
}

fn resolve_principal(request: &Request<Body>, state: &AppState) -> Result<Principal, AuthError> {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingToken)?;
    let auth_str = auth_header.to_str().map_err(|_| AuthError::InvalidFormat)?;
    let token = auth_str
        .strip_prefix("Bearer ")
        .ok_or(AuthError::InvalidFormat)?;

    if let Some(ref bootstrap) = state.config.bootstrap_token {
        if constant_time_eq(token, bootstrap) {
            return Ok(Principal::Bootstrap);
        }
    }

    let user = state
        .services
        .directory()
        .user_by_token(token)
        .map_err(|e| AuthError::Lookup(e.to_string()))?
        .ok_or(AuthError::InvalidToken)?;

    Ok(Principal::User {
        id: user.id,
        role: user.role,
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
