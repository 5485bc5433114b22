//! SQLite implementation of RejectionRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::instrument;

use auction_core::entities::ActiveRejection;
use auction_core::traits::{RejectionRepository, RepoResult};
use auction_core::value_objects::UserId;

use crate::models::ActiveRejectionModel;

use super::error::map_db_error;

/// SQLite implementation of RejectionRepository
#[derive(Clone)]
pub struct SqliteRejectionRepository {
    pool: SqlitePool,
}

impl SqliteRejectionRepository {
    /// Create a new SqliteRejectionRepository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RejectionRepository for SqliteRejectionRepository {
    #[instrument(skip(self, rejection), fields(submission_id = rejection.submission_id))]
    async fn open(&self, rejection: &ActiveRejection) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO active_rejections (submission_id, admin_id, origin_chat_id,
                origin_message_id, created_at)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT (submission_id) DO UPDATE SET admin_id = excluded.admin_id,
                origin_chat_id = excluded.origin_chat_id,
                origin_message_id = excluded.origin_message_id,
                created_at = excluded.created_at
            ",
        )
        .bind(rejection.submission_id)
        .bind(rejection.admin.into_inner())
        .bind(rejection.origin.chat_id.into_inner())
        .bind(rejection.origin.message_id)
        .bind(rejection.created_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_by_admin(&self, admin: UserId) -> RepoResult<Option<ActiveRejection>> {
        let model = sqlx::query_as::<_, ActiveRejectionModel>(
            r"
            SELECT submission_id, admin_id, origin_chat_id, origin_message_id, created_at
            FROM active_rejections
            WHERE admin_id = ?
            ORDER BY created_at DESC
            LIMIT 1
            ",
        )
        .bind(admin.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(model.map(ActiveRejection::from))
    }

    #[instrument(skip(self))]
    async fn close(&self, submission_id: i64) -> RepoResult<bool> {
        let result = sqlx::query("DELETE FROM active_rejections WHERE submission_id = ?")
            .bind(submission_id)
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self))]
    async fn purge_older_than(&self, cutoff: DateTime<Utc>) -> RepoResult<u64> {
        let result = sqlx::query("DELETE FROM active_rejections WHERE created_at < ?")
            .bind(cutoff)
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(result.rows_affected())
    }
}
