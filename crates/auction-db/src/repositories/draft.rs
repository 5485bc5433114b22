//! SQLite implementation of DraftRepository

use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;
use tracing::instrument;

use auction_core::error::DomainError;
use auction_core::traits::{DraftRepository, RepoResult};
use auction_core::value_objects::UserId;
use auction_core::workflow::Draft;

use crate::models::DraftModel;

use super::error::map_db_error;

/// SQLite implementation of DraftRepository
#[derive(Clone)]
pub struct SqliteDraftRepository {
    pool: SqlitePool,
}

impl SqliteDraftRepository {
    /// Create a new SqliteDraftRepository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DraftRepository for SqliteDraftRepository {
    #[instrument(skip(self, draft), fields(user = %draft.user))]
    async fn upsert(&self, draft: &Draft) -> RepoResult<()> {
        let payload = serde_json::to_string(draft)
            .map_err(|err| DomainError::InternalError(format!("draft serialization: {err}")))?;

        sqlx::query(
            r"
            INSERT INTO drafts (user_id, draft, updated_at)
            VALUES (?, ?, ?)
            ON CONFLICT (user_id) DO UPDATE SET draft = excluded.draft,
                updated_at = excluded.updated_at
            ",
        )
        .bind(draft.user.into_inner())
        .bind(payload)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_by_user(&self, user: UserId) -> RepoResult<Option<Draft>> {
        let model = sqlx::query_as::<_, DraftModel>(
            "SELECT user_id, draft, updated_at FROM drafts WHERE user_id = ?",
        )
        .bind(user.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        model.map(Draft::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn delete(&self, user: UserId) -> RepoResult<bool> {
        let result = sqlx::query("DELETE FROM drafts WHERE user_id = ?")
            .bind(user.into_inner())
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
    }
}
