//! Configuration structs

mod app_config;

pub use app_config::{
    AppConfig, AppSettings, BotConfig, CleanupConfig, ConfigError, Environment, ServerConfig,
    StorageConfig,
};
