//! Server configuration.

use std::net::SocketAddr;

/// Semester used when `POST /fees` and `GET /fees/status` are called
/// without an explicit semester.
pub const DEFAULT_CURRENT_SEMESTER: &str = "2026-W";

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind the server to.
    pub bind_address: SocketAddr,

    /// Bootstrap admin token. `None` disables the bootstrap principal;
    /// admin operations then require a user with the admin role.
    pub bootstrap_token: Option<String>,

    /// Semester code fee routes default to.
    pub current_semester: String,

    /// Enable request logging.
    pub request_logging: bool,

    /// CORS allowed origins (empty = no CORS).
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:8080".parse().unwrap(),
            bootstrap_token: None,
            current_semester: DEFAULT_CURRENT_SEMESTER.to_string(),
            request_logging: true,
            cors_origins: Vec::new(),
        }
    }
}

impl ServerConfig {
    /// Create a config with an optional bootstrap admin token.
    pub fn new(bootstrap_token: Option<String>) -> Self {
        Self {
            bootstrap_token,
            ..Default::default()
        }
    }

    /// Set the bind address.
    pub fn with_bind_address(mut self, addr: SocketAddr) -> Self {
        self.bind_address = addr;
        self
    }

    /// Set the current semester for fee defaults.
    pub fn with_current_semester(mut self, code: impl Into<String>) -> Self {
        self.current_semester = code.into();
        self
    }

    /// Enable or disable request logging.
    pub fn with_request_logging(mut self, enabled: bool) -> Self {
        self.request_logging = enabled;
        self
    }

    /// Set CORS allowed origins.
    pub fn with_cors_origins(mut self, origins: Vec<String>) -> Self {
        self.cors_origins = origins;
        self
    }
}
