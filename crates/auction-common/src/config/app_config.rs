//! Application configuration structs
//!
//! Loads configuration from environment variables.

use serde::Deserialize;
use std::env;
use std::path::PathBuf;

use auction_core::{ChatId, UserId};

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub app: AppSettings,
    pub bot: BotConfig,
    pub health: ServerConfig,
    pub storage: StorageConfig,
    pub cleanup: CleanupConfig,
}

/// General application settings
#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_app_name")]
    pub name: String,
    #[serde(default = "default_env")]
    pub env: Environment,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }
}

/// Chat bot settings
#[derive(Debug, Clone, Deserialize)]
pub struct BotConfig {
    /// Bot API token for the chat platform
    pub token: String,
    /// Bot username, used to build deep links into the private chat
    #[serde(default = "default_bot_username")]
    pub username: String,
    /// The public channel where auctions are announced
    pub auction_channel: ChatId,
    /// Optional channel receiving admin audit notices
    pub audit_channel: Option<ChatId>,
    /// Admins granted on startup, in addition to the persisted roster
    #[serde(default)]
    pub bootstrap_admins: Vec<UserId>,
}

/// Keep-alive HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl ServerConfig {
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// SQLite storage configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Directory holding the database files, created on startup
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Path of the single-instance lock file
    #[serde(default = "default_lock_path")]
    pub lock_path: PathBuf,
}

/// Background cleanup configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CleanupConfig {
    /// Seconds between cleanup sweeps
    #[serde(default = "default_cleanup_interval")]
    pub interval_secs: u64,
    /// Seconds an unanswered rejection session stays alive
    #[serde(default = "default_rejection_ttl")]
    pub rejection_ttl_secs: u64,
}

// Default value functions
fn default_app_name() -> String {
    "pokemon-auction-bot".to_string()
}

fn default_env() -> Environment {
    Environment::Development
}

fn default_bot_username() -> String {
    "pokeauctionbot".to_string()
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    10000
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

fn default_max_connections() -> u32 {
    5
}

fn default_lock_path() -> PathBuf {
    PathBuf::from("./auction-bot.lock")
}

fn default_cleanup_interval() -> u64 {
    3600
}

fn default_rejection_ttl() -> u64 {
    3600
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if required environment variables are missing
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Ok(Self {
            app: AppSettings {
                name: env::var("APP_NAME").unwrap_or_else(|_| default_app_name()),
                env: env::var("APP_ENV")
                    .ok()
                    .and_then(|s| match s.to_lowercase().as_str() {
                        "production" => Some(Environment::Production),
                        "staging" => Some(Environment::Staging),
                        "development" => Some(Environment::Development),
                        _ => None,
                    })
                    .unwrap_or_default(),
            },
            bot: BotConfig {
                token: env::var("BOT_TOKEN").map_err(|_| ConfigError::MissingVar("BOT_TOKEN"))?,
                username: env::var("BOT_USERNAME").unwrap_or_else(|_| default_bot_username()),
                auction_channel: env::var("AUCTION_CHANNEL_ID")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .map(ChatId::new)
                    .ok_or(ConfigError::MissingVar("AUCTION_CHANNEL_ID"))?,
                audit_channel: env::var("AUDIT_CHANNEL_ID")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .map(ChatId::new),
                bootstrap_admins: env::var("ADMIN_IDS")
                    .ok()
                    .map(|s| parse_id_list(&s))
                    .transpose()?
                    .unwrap_or_default(),
            },
            health: ServerConfig {
                host: env::var("HOST").unwrap_or_else(|_| default_host()),
                port: env::var("PORT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_else(default_port),
            },
            storage: StorageConfig {
                data_dir: env::var("DATA_DIR")
                    .map(PathBuf::from)
                    .unwrap_or_else(|_| default_data_dir()),
                max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_else(default_max_connections),
                lock_path: env::var("LOCK_PATH")
                    .map(PathBuf::from)
                    .unwrap_or_else(|_| default_lock_path()),
            },
            cleanup: CleanupConfig {
                interval_secs: env::var("CLEANUP_INTERVAL_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_else(default_cleanup_interval),
                rejection_ttl_secs: env::var("REJECTION_TTL_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_else(default_rejection_ttl),
            },
        })
    }
}

/// Parse a comma-separated list of user ids
fn parse_id_list(raw: &str) -> Result<Vec<UserId>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<i64>()
                .map(UserId::new)
                .map_err(|_| ConfigError::InvalidValue("ADMIN_IDS", s.to_string()))
        })
        .collect()
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}
