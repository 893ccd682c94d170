//! HTTP API server for Registra.
//!
//! The transport layer: resolves a [`Principal`] from the bearer token,
//! routes JSON requests to the domain services, and maps [`DomainError`]
//! kinds to HTTP statuses.
//!
//! # Example
//!
//! ```ignore
//! use registra_server::{Server, ServerConfig};
//! use registra_store::RegistryStore;
//! use std::sync::Arc;
//!
//! let store = Arc::new(RegistryStore::open("registra.db")?);
//! let config = ServerConfig::new(Some("secret-token".to_string()))
//!     .with_bind_address("127.0.0.1:8080".parse()?);
//!
//! let server = Server::new(store, config);
//! server.run().await?;
//! ```
//!
//! [`DomainError`]: registra_core::DomainError
//! [`Principal`]: registra_types::Principal

pub mod auth;
pub mod config;
pub mod error;
pub mod logging;
pub mod routes;
pub mod state;

pub use auth::{AuthError, auth_middleware};
pub use config::ServerConfig;
pub use error::{Result, ServerError};
pub use logging::request_logging_middleware;
pub use state::AppState;

use std::sync::Arc;

use axum::{Router, middleware};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use registra_store::RegistryStore;

/// The Registra HTTP server.
pub struct Server {
    /// Application state.
    state: AppState,
}

impl Server {
    /// Create a new server over an open store.
    pub fn new(store: Arc<RegistryStore>, config: ServerConfig) -> Self {
        Self {
            state: AppState::new(store, config),
        }
    }

    /// Create a server from a pre-built application state.
    pub fn from_state(state: AppState) -> Self {
        Self { state }
    }

    /// Build the router with all routes and middleware.
    pub fn router(&self) -> Router {
        let mut router = Router::new()
            // Health routes (no auth required)
            .merge(routes::health_routes())
            .nest("/api/v1", self.api_routes())
            // Request logging
            .layer(middleware::from_fn_with_state(
                self.state.clone(),
                logging::request_logging_middleware,
            ))
            // TraceLayer for detailed HTTP tracing
            .layer(TraceLayer::new_for_http());

        if !self.state.config.cors_origins.is_empty() {
            router = router.layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods(Any)
                    .allow_headers(Any),
            );
        }

        router.with_state(self.state.clone())
    }

    /// API routes (v1).
    ///
    /// All API routes require authentication via the auth middleware.
    fn api_routes(&self) -> Router<AppState> {
        use axum::routing::{get, post};

        Router::new()
            // Catalog
            .route(
                "/courses",
                post(routes::create_course_handler).get(routes::list_courses_handler),
            )
            // Semesters
            .route(
                "/semesters",
                post(routes::create_semester_handler).get(routes::list_semesters_handler),
            )
            // Accounts
            .route(
                "/students",
                post(routes::create_student_handler).get(routes::list_students_handler),
            )
            .route(
                "/faculty",
                post(routes::create_faculty_handler).get(routes::list_faculty_handler),
            )
            .route("/advisors", post(routes::assign_advisor_handler))
            // Offerings
            .route(
                "/offerings",
                post(routes::float_offering_handler).get(routes::list_active_offerings_handler),
            )
            .route("/offerings/approve", post(routes::decide_offering_handler))
            .route(
                "/offerings/complete",
                post(routes::complete_offering_handler),
            )
            .route("/offerings/mine", get(routes::my_offerings_handler))
            .route("/offerings/pending", get(routes::pending_offerings_handler))
            // Enrollments
            .route("/enrollments", post(routes::register_handler))
            .route(
                "/enrollments/instructor-action",
                post(routes::instructor_action_handler),
            )
            .route(
                "/enrollments/advisor-action",
                post(routes::advisor_action_handler),
            )
            .route("/enrollments/grade", post(routes::grade_handler))
            .route("/enrollments/mine", get(routes::my_enrollments_handler))
            .route(
                "/enrollments/instructor-requests",
                get(routes::instructor_requests_handler),
            )
            .route(
                "/enrollments/advisor-requests",
                get(routes::advisor_requests_handler),
            )
            // Fees
            .route("/fees", post(routes::pay_fees_handler))
            .route("/fees/status", get(routes::fee_status_handler))
            // Auth middleware for all API routes
            .layer(middleware::from_fn_with_state(
                self.state.clone(),
                auth::auth_middleware,
            ))
    }

    /// Run the server.
    pub async fn run(self) -> Result<()> {
        let addr = self.state.config.bind_address;
        let router = self.router();

        info!("Starting server on {}", addr);

        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| ServerError::Internal(format!("Failed to bind: {e}")))?;

        axum::serve(listener, router)
            .await
            .map_err(|e| ServerError::Internal(format!("Server error: {e}")))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tower::ServiceExt;

    fn create_test_server() -> Server {
        let store = Arc::new(RegistryStore::open_in_memory().unwrap());
        let config = ServerConfig::new(Some("test-token".to_string()));
        Server::new(store, config)
    }

    #[tokio::test]
    async fn test_health_requires_no_auth() {
        let app = create_test_server().router();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_api_routes_require_auth() {
        let app = create_test_server().router();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/courses")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
