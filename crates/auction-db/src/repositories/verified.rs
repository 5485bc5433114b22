//! SQLite implementation of VerifiedUserRepository

use async_trait::async_trait;
use sqlx::SqlitePool;
use tracing::instrument;

use auction_core::entities::VerifiedUser;
use auction_core::traits::{RepoResult, VerifiedUserRepository};
use auction_core::value_objects::UserId;

use crate::models::VerifiedUserModel;

use super::error::map_db_error;

/// SQLite implementation of VerifiedUserRepository
#[derive(Clone)]
pub struct SqliteVerifiedUserRepository {
    pool: SqlitePool,
}

impl SqliteVerifiedUserRepository {
    /// Create a new SqliteVerifiedUserRepository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Counters only exist for roster members; off-roster bidders (admins
    /// bidding without verification) are silently skipped.
    async fn bump(&self, user: UserId, column: &'static str) -> RepoResult<()> {
        sqlx::query(&format!(
            "UPDATE verified_users SET {column} = {column} + 1 WHERE user_id = ?"
        ))
        .bind(user.into_inner())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }
}

#[async_trait]
impl VerifiedUserRepository for SqliteVerifiedUserRepository {
    #[instrument(skip(self, user), fields(user = %user.user))]
    async fn insert(&self, user: &VerifiedUser) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO verified_users (user_id, verified_by, bids_placed, auctions_won, verified_at)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT (user_id) DO NOTHING
            ",
        )
        .bind(user.user.into_inner())
        .bind(user.verified_by.into_inner())
        .bind(user.bids_placed)
        .bind(user.auctions_won)
        .bind(user.verified_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn find(&self, user: UserId) -> RepoResult<Option<VerifiedUser>> {
        let model = sqlx::query_as::<_, VerifiedUserModel>(
            r"
            SELECT user_id, verified_by, bids_placed, auctions_won, verified_at
            FROM verified_users
            WHERE user_id = ?
            ",
        )
        .bind(user.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(model.map(VerifiedUser::from))
    }

    #[instrument(skip(self))]
    async fn is_verified(&self, user: UserId) -> RepoResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM verified_users WHERE user_id = ?)",
        )
        .bind(user.into_inner())
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(exists)
    }

    #[instrument(skip(self))]
    async fn remove(&self, user: UserId) -> RepoResult<bool> {
        let result = sqlx::query("DELETE FROM verified_users WHERE user_id = ?")
            .bind(user.into_inner())
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self))]
    async fn record_bid(&self, user: UserId) -> RepoResult<()> {
        self.bump(user, "bids_placed").await
    }

    #[instrument(skip(self))]
    async fn record_win(&self, user: UserId) -> RepoResult<()> {
        self.bump(user, "auctions_won").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SqliteVerifiedUserRepository>();
    }
}
