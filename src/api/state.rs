//! Application state for the Outsourcing Cost Engine API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use crate::config::{ConfigLoader, PricingPolicy};

/// Shared application state.
///
/// Holds the pricing policy loaded at startup. It is read-only, so every
/// request computes on its own snapshot without locking.
#[derive(Clone)]
pub struct AppState {
    /// The loaded pricing policy.
    config: Arc<ConfigLoader>,
}

impl AppState {
    /// Creates a new application state with the given configuration loader.
    pub fn new(config: ConfigLoader) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    /// Returns a reference to the configuration loader.
    pub fn config(&self) -> &ConfigLoader {
        &self.config
    }

    /// Returns the loaded pricing policy.
    pub fn policy(&self) -> &PricingPolicy {
        self.config.policy()
    }
}
