//! Gateway state
//!
//! Application state for the gateway server.

use crate::coordinator::Coordinator;
use parley_common::AppConfig;
use std::sync::Arc;

/// Gateway application state
///
/// Holds the shared dependencies for the gateway server.
#[derive(Clone)]
pub struct GatewayState {
    /// The session coordinator owning all shared chat state
    coordinator: Arc<Coordinator>,
    /// Application configuration
    config: Arc<AppConfig>,
}

impl GatewayState {
    /// Create the gateway state from configuration
    #[must_use]
    pub fn new(config: AppConfig) -> Self {
        Self {
            coordinator: Coordinator::new(&config.limits),
            config: Arc::new(config),
        }
    }

    /// Get the session coordinator
    pub fn coordinator(&self) -> &Coordinator {
        &self.coordinator
    }

    /// Get the application configuration
    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}

impl std::fmt::Debug for GatewayState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayState")
            .field("coordinator", &self.coordinator)
            .finish()
    }
}
