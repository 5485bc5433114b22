//! SQLite implementation of LeaderboardRepository

use async_trait::async_trait;
use sqlx::SqlitePool;
use tracing::instrument;

use auction_core::entities::LeaderboardEntry;
use auction_core::traits::{LeaderboardRepository, RepoResult};
use auction_core::value_objects::UserId;

use crate::models::LeaderboardModel;

use super::error::map_db_error;

/// SQLite implementation of LeaderboardRepository
#[derive(Clone)]
pub struct SqliteLeaderboardRepository {
    pool: SqlitePool,
}

impl SqliteLeaderboardRepository {
    /// Create a new SqliteLeaderboardRepository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LeaderboardRepository for SqliteLeaderboardRepository {
    #[instrument(skip(self))]
    async fn record_win(&self, user: UserId, amount: i64) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO leaderboard (user_id, wins, total_spent)
            VALUES (?, 1, ?)
            ON CONFLICT (user_id) DO UPDATE SET wins = wins + 1,
                total_spent = total_spent + excluded.total_spent
            ",
        )
        .bind(user.into_inner())
        .bind(amount)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn top(&self, limit: i64) -> RepoResult<Vec<LeaderboardEntry>> {
        let models = sqlx::query_as::<_, LeaderboardModel>(
            r"
            SELECT user_id, wins, total_spent
            FROM leaderboard
            ORDER BY wins DESC, total_spent DESC
            LIMIT ?
            ",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(models.into_iter().map(LeaderboardEntry::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SqliteLeaderboardRepository>();
    }
}
