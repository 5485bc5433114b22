//! # auction-common
//!
//! Shared utilities including configuration, error handling, telemetry, and
//! the single-instance lock.

pub mod config;
pub mod error;
pub mod lock;
pub mod telemetry;

// Re-export commonly used types at crate root
pub use config::{
    AppConfig, AppSettings, BotConfig, CleanupConfig, ConfigError, Environment, ServerConfig,
    StorageConfig,
};
pub use error::{AppError, AppResult, ErrorResponse};
pub use lock::{InstanceLock, LockError};
pub use telemetry::{
    init_tracing, init_tracing_with_config, try_init_tracing, try_init_tracing_with_config,
    TracingConfig, TracingError,
};
