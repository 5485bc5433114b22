//! SQLite implementation of ProfileRepository

use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;
use tracing::instrument;

use auction_core::entities::UserProfile;
use auction_core::traits::{ProfileEvent, ProfileRepository, RepoResult};
use auction_core::value_objects::UserId;

use crate::models::ProfileModel;

use super::error::{map_db_error, user_not_found};

const PROFILE_COLUMNS: &str = "user_id, submitted, approved, rejected, pending, revoked, \
     banned, created_at, updated_at";

/// SQLite implementation of ProfileRepository
#[derive(Clone)]
pub struct SqliteProfileRepository {
    pool: SqlitePool,
}

impl SqliteProfileRepository {
    /// Create a new SqliteProfileRepository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn fetch(&self, user: UserId) -> RepoResult<Option<UserProfile>> {
        let model = sqlx::query_as::<_, ProfileModel>(&format!(
            "SELECT {PROFILE_COLUMNS} FROM profiles WHERE user_id = ?"
        ))
        .bind(user.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(model.map(UserProfile::from))
    }

    /// SQL fragment applying one event's counter changes
    fn event_update(event: ProfileEvent) -> &'static str {
        match event {
            ProfileEvent::Submitted => "submitted = submitted + 1, pending = pending + 1",
            ProfileEvent::Approved => "approved = approved + 1, pending = MAX(pending - 1, 0)",
            ProfileEvent::Rejected => "rejected = rejected + 1, pending = MAX(pending - 1, 0)",
            ProfileEvent::Revoked => "revoked = revoked + 1, approved = MAX(approved - 1, 0)",
            ProfileEvent::Banned => "banned = 1",
            ProfileEvent::Unbanned => "banned = 0",
        }
    }
}

#[async_trait]
impl ProfileRepository for SqliteProfileRepository {
    #[instrument(skip(self))]
    async fn ensure(&self, user: UserId) -> RepoResult<UserProfile> {
        let now = Utc::now();
        sqlx::query(
            r"
            INSERT INTO profiles (user_id, created_at, updated_at)
            VALUES (?, ?, ?)
            ON CONFLICT (user_id) DO NOTHING
            ",
        )
        .bind(user.into_inner())
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        self.fetch(user).await?.ok_or_else(|| user_not_found(user))
    }

    #[instrument(skip(self))]
    async fn find(&self, user: UserId) -> RepoResult<Option<UserProfile>> {
        self.fetch(user).await
    }

    #[instrument(skip(self))]
    async fn record_event(&self, user: UserId, event: ProfileEvent) -> RepoResult<UserProfile> {
        self.ensure(user).await?;

        sqlx::query(&format!(
            "UPDATE profiles SET {}, updated_at = ? WHERE user_id = ?",
            Self::event_update(event)
        ))
        .bind(Utc::now())
        .bind(user.into_inner())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        self.fetch(user).await?.ok_or_else(|| user_not_found(user))
    }

    #[instrument(skip(self))]
    async fn is_banned(&self, user: UserId) -> RepoResult<bool> {
        let banned = sqlx::query_scalar::<_, bool>(
            "SELECT COALESCE((SELECT banned FROM profiles WHERE user_id = ?), 0)",
        )
        .bind(user.into_inner())
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(banned)
    }
}
