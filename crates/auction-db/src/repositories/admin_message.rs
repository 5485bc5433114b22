//! SQLite implementation of AdminMessageRepository

use async_trait::async_trait;
use sqlx::SqlitePool;
use tracing::instrument;

use auction_core::entities::{AdminMessage, ReviewKind};
use auction_core::traits::{AdminMessageRepository, RepoResult};

use crate::models::AdminMessageModel;

use super::error::map_db_error;

/// SQLite implementation of AdminMessageRepository
#[derive(Clone)]
pub struct SqliteAdminMessageRepository {
    pool: SqlitePool,
}

impl SqliteAdminMessageRepository {
    /// Create a new SqliteAdminMessageRepository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AdminMessageRepository for SqliteAdminMessageRepository {
    #[instrument(
        skip(self, message),
        fields(kind = %message.kind, subject_id = message.subject_id)
    )]
    async fn record(&self, message: &AdminMessage) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO admin_messages (kind, subject_id, admin_chat_id, message_id, created_at)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT (kind, subject_id, admin_chat_id) DO UPDATE
                SET message_id = excluded.message_id, created_at = excluded.created_at
            ",
        )
        .bind(message.kind.as_str())
        .bind(message.subject_id)
        .bind(message.admin_chat.into_inner())
        .bind(message.message_id)
        .bind(message.created_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn list_for(&self, kind: ReviewKind, subject_id: i64) -> RepoResult<Vec<AdminMessage>> {
        let models = sqlx::query_as::<_, AdminMessageModel>(
            r"
            SELECT kind, subject_id, admin_chat_id, message_id, created_at
            FROM admin_messages
            WHERE kind = ? AND subject_id = ?
            ORDER BY admin_chat_id
            ",
        )
        .bind(kind.as_str())
        .bind(subject_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(models.into_iter().map(AdminMessage::from).collect())
    }

    #[instrument(skip(self))]
    async fn delete_for(&self, kind: ReviewKind, subject_id: i64) -> RepoResult<u64> {
        let result = sqlx::query("DELETE FROM admin_messages WHERE kind = ? AND subject_id = ?")
            .bind(kind.as_str())
            .bind(subject_id)
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(result.rows_affected())
    }
}
