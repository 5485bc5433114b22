//! Application state
//!
//! Holds the shared state for the Axum application including
//! the service context, configuration, and the process start time.

use std::sync::Arc;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use auction_common::AppConfig;
use auction_service::ServiceContext;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Service context containing all dependencies
    service_context: Arc<ServiceContext>,
    /// Application configuration
    config: Arc<AppConfig>,
    /// When the process came up, for uptime reporting
    started: Instant,
    /// The same instant as a Unix timestamp
    start_epoch: f64,
}

impl AppState {
    /// Create a new AppState
    pub fn new(service_context: Arc<ServiceContext>, config: AppConfig) -> Self {
        let start_epoch = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs_f64())
            .unwrap_or_default();
        Self {
            service_context,
            config: Arc::new(config),
            started: Instant::now(),
            start_epoch,
        }
    }

    /// Get the service context
    pub fn service_context(&self) -> &ServiceContext {
        &self.service_context
    }

    /// Get the application configuration
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Seconds since the process came up
    pub fn uptime_seconds(&self) -> f64 {
        self.started.elapsed().as_secs_f64()
    }

    /// Process start time as a Unix timestamp
    pub fn start_epoch(&self) -> f64 {
        self.start_epoch
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("service_context", &"ServiceContext")
            .field("config", &"AppConfig")
            .field("start_epoch", &self.start_epoch)
            .finish()
    }
}
