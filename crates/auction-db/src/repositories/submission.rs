//! SQLite implementation of SubmissionRepository

use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;
use tracing::instrument;

use auction_core::entities::{Submission, SubmissionStatus};
use auction_core::error::DomainError;
use auction_core::traits::{RepoResult, SubmissionRepository};
use auction_core::value_objects::{MessageRef, UserId};

use crate::models::SubmissionModel;
use crate::retry::{retry_busy, TxFailure};

use super::error::{map_db_error, submission_not_found};

const SUBMISSION_COLUMNS: &str = "id, user_id, form, status, channel_chat_id, \
     channel_message_id, created_at, updated_at";

/// SQLite implementation of SubmissionRepository
#[derive(Clone)]
pub struct SqliteSubmissionRepository {
    pool: SqlitePool,
}

impl SqliteSubmissionRepository {
    /// Create a new SqliteSubmissionRepository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn fetch(&self, id: i64) -> RepoResult<Option<Submission>> {
        let model = sqlx::query_as::<_, SubmissionModel>(&format!(
            "SELECT {SUBMISSION_COLUMNS} FROM submissions WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        model.map(Submission::try_from).transpose()
    }

    /// Decide a pending submission inside one transaction, so two admins
    /// cannot both win the race
    async fn set_status_tx(
        &self,
        id: i64,
        status: SubmissionStatus,
    ) -> Result<Submission, TxFailure> {
        let mut tx = self.pool.begin().await?;

        let model = sqlx::query_as::<_, SubmissionModel>(&format!(
            "SELECT {SUBMISSION_COLUMNS} FROM submissions WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        let mut submission = Submission::try_from(model.ok_or(submission_not_found(id))?)?;
        // Pending rows can be decided; an approved row may still fail when the
        // channel post does not go through. Everything else is final.
        let allowed = submission.is_pending()
            || (submission.status == SubmissionStatus::Approved
                && status == SubmissionStatus::Failed);
        if !allowed {
            return Err(DomainError::SubmissionNotPending(id).into());
        }

        submission.status = status;
        submission.updated_at = Utc::now();

        sqlx::query("UPDATE submissions SET status = ?, updated_at = ? WHERE id = ?")
            .bind(status.as_str())
            .bind(submission.updated_at)
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(submission)
    }
}

#[async_trait]
impl SubmissionRepository for SqliteSubmissionRepository {
    #[instrument(skip(self, submission))]
    async fn create(&self, submission: &Submission) -> RepoResult<Submission> {
        let form = serde_json::to_string(&submission.form)
            .map_err(|err| DomainError::InternalError(format!("form serialization: {err}")))?;

        let result = sqlx::query(
            r"
            INSERT INTO submissions (user_id, form, status, channel_chat_id,
                channel_message_id, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            ",
        )
        .bind(submission.user.into_inner())
        .bind(form)
        .bind(submission.status.as_str())
        .bind(submission.channel_message.map(|m| m.chat_id.into_inner()))
        .bind(submission.channel_message.map(|m| m.message_id))
        .bind(submission.created_at)
        .bind(submission.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        let id = result.last_insert_rowid();
        self.fetch(id)
            .await?
            .ok_or_else(|| submission_not_found(id))
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: i64) -> RepoResult<Option<Submission>> {
        self.fetch(id).await
    }

    #[instrument(skip(self))]
    async fn list_pending(&self) -> RepoResult<Vec<Submission>> {
        let models = sqlx::query_as::<_, SubmissionModel>(&format!(
            "SELECT {SUBMISSION_COLUMNS} FROM submissions WHERE status = 'pending' ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        models.into_iter().map(Submission::try_from).collect()
    }

    #[instrument(skip(self))]
    async fn list_by_user(&self, user: UserId) -> RepoResult<Vec<Submission>> {
        let models = sqlx::query_as::<_, SubmissionModel>(&format!(
            "SELECT {SUBMISSION_COLUMNS} FROM submissions WHERE user_id = ? ORDER BY id DESC"
        ))
        .bind(user.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        models.into_iter().map(Submission::try_from).collect()
    }

    #[instrument(skip(self))]
    async fn set_status(&self, id: i64, status: SubmissionStatus) -> RepoResult<Submission> {
        retry_busy("set_submission_status", || self.set_status_tx(id, status)).await
    }

    #[instrument(skip(self))]
    async fn set_channel_message(&self, id: i64, message: MessageRef) -> RepoResult<()> {
        let result = sqlx::query(
            r"
            UPDATE submissions SET channel_chat_id = ?, channel_message_id = ?, updated_at = ?
            WHERE id = ?
            ",
        )
        .bind(message.chat_id.into_inner())
        .bind(message.message_id)
        .bind(Utc::now())
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(submission_not_found(id));
        }
        Ok(())
    }
}
