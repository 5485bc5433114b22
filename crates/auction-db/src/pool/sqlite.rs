//! SQLite pool management and schema bootstrap
//!
//! Storage is split over five database files so that heavy bid traffic on
//! auctions never contends with submission drafts or settings lookups. Each
//! file gets its own pool; schema is created on open.

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use std::path::PathBuf;
use std::time::Duration;

/// Store configuration for the pool set
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Directory holding the database files, created if missing
    pub data_dir: PathBuf,
    /// Maximum connections per pool
    pub max_connections: u32,
    /// How long a writer waits on a locked database before giving up
    pub busy_timeout: Duration,
}

impl StoreConfig {
    /// Create a config with defaults for the given data directory
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            max_connections: 5,
            busy_timeout: Duration::from_secs(5),
        }
    }
}

/// Errors opening the store set
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to create data directory {path}: {source}")]
    CreateDir {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("database error: {0}")]
    Db(#[from] sqlx::Error),
}

/// The five database pools backing the marketplace
#[derive(Debug, Clone)]
pub struct Stores {
    /// auctions.db - auctions and their bid history
    pub auctions: SqlitePool,
    /// submissions.db - submissions and in-progress drafts
    pub submissions: SqlitePool,
    /// users.db - verified roster, profiles, leaderboard
    pub users: SqlitePool,
    /// moderation.db - rejection sessions and admin fan-out bookkeeping
    pub moderation: SqlitePool,
    /// settings.db - admin roster, category toggles, global switches
    pub settings: SqlitePool,
}

impl Stores {
    /// Open every pool and bootstrap schema
    pub async fn open(config: &StoreConfig) -> Result<Self, StoreError> {
        std::fs::create_dir_all(&config.data_dir).map_err(|source| StoreError::CreateDir {
            path: config.data_dir.display().to_string(),
            source,
        })?;

        let stores = Self {
            auctions: open_pool(config, "auctions.db").await?,
            submissions: open_pool(config, "submissions.db").await?,
            users: open_pool(config, "users.db").await?,
            moderation: open_pool(config, "moderation.db").await?,
            settings: open_pool(config, "settings.db").await?,
        };
        stores.bootstrap().await?;

        tracing::info!(data_dir = %config.data_dir.display(), "database stores opened");
        Ok(stores)
    }

    // raw_sql runs the multi-statement schema scripts in one go
    async fn bootstrap(&self) -> Result<(), sqlx::Error> {
        sqlx::raw_sql(AUCTIONS_SCHEMA)
            .execute(&self.auctions)
            .await?;
        sqlx::raw_sql(SUBMISSIONS_SCHEMA)
            .execute(&self.submissions)
            .await?;
        sqlx::raw_sql(USERS_SCHEMA).execute(&self.users).await?;
        sqlx::raw_sql(MODERATION_SCHEMA)
            .execute(&self.moderation)
            .await?;
        sqlx::raw_sql(SETTINGS_SCHEMA)
            .execute(&self.settings)
            .await?;
        Ok(())
    }
}

async fn open_pool(config: &StoreConfig, file: &str) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::new()
        .filename(config.data_dir.join(file))
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(config.busy_timeout)
        .foreign_keys(true);

    SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .connect_with(options)
        .await
}

const AUCTIONS_SCHEMA: &str = r"
CREATE TABLE IF NOT EXISTS auctions (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    description TEXT,
    photo TEXT,
    base_price INTEGER NOT NULL,
    current_bid INTEGER,
    current_bidder INTEGER,
    previous_bidder INTEGER,
    status TEXT NOT NULL DEFAULT 'active',
    seller INTEGER NOT NULL,
    channel_chat_id INTEGER,
    channel_message_id INTEGER,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS bids (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    auction_id INTEGER NOT NULL,
    bidder INTEGER NOT NULL,
    amount INTEGER NOT NULL,
    is_active INTEGER NOT NULL DEFAULT 1,
    created_at TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_bids_auction ON bids(auction_id, id);
CREATE INDEX IF NOT EXISTS idx_auctions_status ON auctions(status);
";

const SUBMISSIONS_SCHEMA: &str = r"
CREATE TABLE IF NOT EXISTS submissions (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL,
    form TEXT NOT NULL,
    status TEXT NOT NULL DEFAULT 'pending',
    channel_chat_id INTEGER,
    channel_message_id INTEGER,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_submissions_status ON submissions(status);
CREATE INDEX IF NOT EXISTS idx_submissions_user ON submissions(user_id);
CREATE TABLE IF NOT EXISTS drafts (
    user_id INTEGER PRIMARY KEY,
    draft TEXT NOT NULL,
    updated_at TEXT NOT NULL
);
";

const USERS_SCHEMA: &str = r"
CREATE TABLE IF NOT EXISTS verified_users (
    user_id INTEGER PRIMARY KEY,
    verified_by INTEGER NOT NULL,
    bids_placed INTEGER NOT NULL DEFAULT 0,
    auctions_won INTEGER NOT NULL DEFAULT 0,
    verified_at TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS profiles (
    user_id INTEGER PRIMARY KEY,
    submitted INTEGER NOT NULL DEFAULT 0,
    approved INTEGER NOT NULL DEFAULT 0,
    rejected INTEGER NOT NULL DEFAULT 0,
    pending INTEGER NOT NULL DEFAULT 0,
    revoked INTEGER NOT NULL DEFAULT 0,
    banned INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS leaderboard (
    user_id INTEGER PRIMARY KEY,
    wins INTEGER NOT NULL DEFAULT 0,
    total_spent INTEGER NOT NULL DEFAULT 0
);
";

const MODERATION_SCHEMA: &str = r"
CREATE TABLE IF NOT EXISTS active_rejections (
    submission_id INTEGER PRIMARY KEY,
    admin_id INTEGER NOT NULL,
    origin_chat_id INTEGER NOT NULL,
    origin_message_id INTEGER NOT NULL,
    created_at TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_rejections_admin ON active_rejections(admin_id);
CREATE TABLE IF NOT EXISTS admin_messages (
    kind TEXT NOT NULL,
    subject_id INTEGER NOT NULL,
    admin_chat_id INTEGER NOT NULL,
    message_id INTEGER NOT NULL,
    created_at TEXT NOT NULL,
    PRIMARY KEY (kind, subject_id, admin_chat_id)
);
";

const SETTINGS_SCHEMA: &str = r"
CREATE TABLE IF NOT EXISTS admins (
    user_id INTEGER PRIMARY KEY,
    added_at TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS category_toggles (
    category TEXT PRIMARY KEY,
    enabled INTEGER NOT NULL
);
CREATE TABLE IF NOT EXISTS settings (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
);
";
