//! SQLite implementation of AdminRepository

use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;
use tracing::instrument;

use auction_core::traits::{AdminRepository, RepoResult};
use auction_core::value_objects::UserId;

use super::error::map_db_error;

/// SQLite implementation of AdminRepository
#[derive(Clone)]
pub struct SqliteAdminRepository {
    pool: SqlitePool,
}

impl SqliteAdminRepository {
    /// Create a new SqliteAdminRepository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AdminRepository for SqliteAdminRepository {
    #[instrument(skip(self))]
    async fn add(&self, user: UserId) -> RepoResult<bool> {
        let result = sqlx::query(
            r"
            INSERT INTO admins (user_id, added_at) VALUES (?, ?)
            ON CONFLICT (user_id) DO NOTHING
            ",
        )
        .bind(user.into_inner())
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self))]
    async fn remove(&self, user: UserId) -> RepoResult<bool> {
        let result = sqlx::query("DELETE FROM admins WHERE user_id = ?")
            .bind(user.into_inner())
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self))]
    async fn list(&self) -> RepoResult<Vec<UserId>> {
        let ids = sqlx::query_scalar::<_, i64>("SELECT user_id FROM admins ORDER BY user_id")
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(ids.into_iter().map(UserId::new).collect())
    }
}
