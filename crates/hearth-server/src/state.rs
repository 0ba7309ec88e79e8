//! Application state shared across handlers.

use std::sync::Arc;

use hearth_session::SessionManager;

use crate::config::ServerConfig;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ServerConfig>,

    /// Session manager. Clones share one store.
    pub sessions: SessionManager,
}

impl AppState {
    /// Create a new application state.
    pub fn new(config: ServerConfig, sessions: SessionManager) -> Self {
        Self {
            config: Arc::new(config),
            sessions,
        }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }
}
