//! Application state shared across handlers.

use std::sync::Arc;

use registra_core::DomainServices;
use registra_store::RegistryStore;

use crate::config::ServerConfig;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Domain services facade.
    pub services: Arc<DomainServices>,

    /// Server configuration.
    pub config: Arc<ServerConfig>,
}

impl AppState {
    /// Create application state over an open store.
    pub fn new(store: Arc<RegistryStore>, config: ServerConfig) -> Self {
        Self {
            services: Arc::new(DomainServices::new(store)),
            config: Arc::new(config),
        }
    }
}
