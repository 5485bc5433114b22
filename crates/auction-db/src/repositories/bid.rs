//! SQLite implementation of BidRepository

use async_trait::async_trait;
use sqlx::SqlitePool;
use tracing::instrument;

use auction_core::entities::Bid;
use auction_core::traits::{BidRepository, RepoResult};

use crate::models::BidModel;

use super::error::map_db_error;

/// SQLite implementation of BidRepository
#[derive(Clone)]
pub struct SqliteBidRepository {
    pool: SqlitePool,
}

impl SqliteBidRepository {
    /// Create a new SqliteBidRepository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BidRepository for SqliteBidRepository {
    #[instrument(skip(self))]
    async fn list_for_auction(&self, auction_id: i64) -> RepoResult<Vec<Bid>> {
        let models = sqlx::query_as::<_, BidModel>(
            r"
            SELECT id, auction_id, bidder, amount, is_active, created_at
            FROM bids
            WHERE auction_id = ?
            ORDER BY id DESC
            ",
        )
        .bind(auction_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(models.into_iter().map(Bid::from).collect())
    }

    #[instrument(skip(self))]
    async fn count_active(&self, auction_id: i64) -> RepoResult<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            r"
            SELECT COUNT(*) FROM bids WHERE auction_id = ? AND is_active = 1
            ",
        )
        .bind(auction_id)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(count)
    }
}
