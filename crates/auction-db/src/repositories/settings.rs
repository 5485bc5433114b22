//! SQLite implementation of SettingsRepository
//!
//! Global switches live in a key/value table; category toggles get their own
//! table. A missing row means the default: bidding open, category enabled.

use async_trait::async_trait;
use sqlx::SqlitePool;
use tracing::instrument;

use auction_core::traits::{RepoResult, SettingsRepository};
use auction_core::value_objects::Category;

use super::error::map_db_error;

const BIDDING_OPEN_KEY: &str = "bidding_open";

/// SQLite implementation of SettingsRepository
#[derive(Clone)]
pub struct SqliteSettingsRepository {
    pool: SqlitePool,
}

impl SqliteSettingsRepository {
    /// Create a new SqliteSettingsRepository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn set_category(&self, category: Category, enabled: bool) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO category_toggles (category, enabled) VALUES (?, ?)
            ON CONFLICT (category) DO UPDATE SET enabled = excluded.enabled
            ",
        )
        .bind(category.as_str())
        .bind(enabled)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }
}

#[async_trait]
impl SettingsRepository for SqliteSettingsRepository {
    #[instrument(skip(self))]
    async fn bidding_open(&self) -> RepoResult<bool> {
        let value = sqlx::query_scalar::<_, Option<String>>(
            "SELECT value FROM settings WHERE key = ?",
        )
        .bind(BIDDING_OPEN_KEY)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?
        .flatten();

        Ok(value.as_deref() != Some("false"))
    }

    #[instrument(skip(self))]
    async fn set_bidding_open(&self, open: bool) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO settings (key, value) VALUES (?, ?)
            ON CONFLICT (key) DO UPDATE SET value = excluded.value
            ",
        )
        .bind(BIDDING_OPEN_KEY)
        .bind(if open { "true" } else { "false" })
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn category_enabled(&self, category: Category) -> RepoResult<bool> {
        let enabled = sqlx::query_scalar::<_, Option<bool>>(
            "SELECT enabled FROM category_toggles WHERE category = ?",
        )
        .bind(category.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?
        .flatten();

        Ok(enabled.unwrap_or(true))
    }

    #[instrument(skip(self))]
    async fn toggle_category(&self, category: Category) -> RepoResult<bool> {
        let next = !self.category_enabled(category).await?;
        self.set_category(category, next).await?;
        Ok(next)
    }
}
