//! SQLite implementation of AuctionRepository

use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;
use tracing::instrument;

use auction_core::entities::{Auction, AuctionStatus, Bid};
use auction_core::error::DomainError;
use auction_core::traits::{AuctionRepository, BidOutcome, RepoResult, RetractOutcome};
use auction_core::value_objects::{MessageRef, UserId};

use crate::models::{AuctionModel, BidModel};
use crate::retry::{retry_busy, TxFailure};

use super::error::{auction_not_found, map_db_error};

const AUCTION_COLUMNS: &str = "id, title, description, photo, base_price, current_bid, \
     current_bidder, previous_bidder, status, seller, channel_chat_id, channel_message_id, \
     created_at, updated_at";

/// SQLite implementation of AuctionRepository
#[derive(Clone)]
pub struct SqliteAuctionRepository {
    pool: SqlitePool,
}

impl SqliteAuctionRepository {
    /// Create a new SqliteAuctionRepository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn fetch(&self, id: i64) -> RepoResult<Option<Auction>> {
        let model = sqlx::query_as::<_, AuctionModel>(&format!(
            "SELECT {AUCTION_COLUMNS} FROM auctions WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(model.map(Auction::from))
    }

    /// Move an active auction to a terminal status
    async fn finish(&self, id: i64, status: AuctionStatus) -> RepoResult<Auction> {
        let result = sqlx::query(
            r"
            UPDATE auctions SET status = ?, updated_at = ?
            WHERE id = ? AND status = 'active'
            ",
        )
        .bind(status.as_str())
        .bind(Utc::now())
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            // Distinguish a missing auction from one already settled
            return match self.fetch(id).await? {
                Some(_) => Err(DomainError::AuctionNotActive(id)),
                None => Err(auction_not_found(id)),
            };
        }

        self.fetch(id).await?.ok_or_else(|| auction_not_found(id))
    }

    async fn place_bid_tx(
        &self,
        id: i64,
        bidder: UserId,
        amount: i64,
    ) -> Result<BidOutcome, TxFailure> {
        let mut tx = self.pool.begin().await?;

        let model = sqlx::query_as::<_, AuctionModel>(&format!(
            "SELECT {AUCTION_COLUMNS} FROM auctions WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        let mut auction = Auction::from(model.ok_or(auction_not_found(id))?);
        if !auction.is_active() {
            return Err(DomainError::AuctionNotActive(id).into());
        }

        let minimum = auction.min_acceptable_bid();
        if amount < minimum {
            return Err(DomainError::BidTooLow { minimum }.into());
        }

        let outbid = auction.current_bidder;
        auction.apply_bid(bidder, amount);

        sqlx::query(
            r"
            UPDATE auctions
            SET current_bid = ?, current_bidder = ?, previous_bidder = ?, updated_at = ?
            WHERE id = ?
            ",
        )
        .bind(amount)
        .bind(bidder.into_inner())
        .bind(auction.previous_bidder.map(UserId::into_inner))
        .bind(auction.updated_at)
        .bind(id)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r"
            INSERT INTO bids (auction_id, bidder, amount, is_active, created_at)
            VALUES (?, ?, ?, 1, ?)
            ",
        )
        .bind(id)
        .bind(bidder.into_inner())
        .bind(amount)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(BidOutcome { auction, outbid })
    }

    async fn retract_last_bid_tx(&self, id: i64) -> Result<RetractOutcome, TxFailure> {
        let mut tx = self.pool.begin().await?;

        let model = sqlx::query_as::<_, AuctionModel>(&format!(
            "SELECT {AUCTION_COLUMNS} FROM auctions WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        let mut auction = Auction::from(model.ok_or(auction_not_found(id))?);
        if !auction.is_active() {
            return Err(DomainError::AuctionNotActive(id).into());
        }

        // Newest two active bids: the head is struck, the second takes over
        let top: Vec<BidModel> = sqlx::query_as(
            r"
            SELECT id, auction_id, bidder, amount, is_active, created_at
            FROM bids
            WHERE auction_id = ? AND is_active = 1
            ORDER BY id DESC
            LIMIT 3
            ",
        )
        .bind(id)
        .fetch_all(&mut *tx)
        .await?;

        let mut top = top.into_iter().map(Bid::from);
        let removed = top.next().ok_or(DomainError::NoActiveBids(id))?;
        let restored = top.next();
        let runner_up = top.next();

        sqlx::query("UPDATE bids SET is_active = 0 WHERE id = ?")
            .bind(removed.id)
            .execute(&mut *tx)
            .await?;

        auction.current_bid = restored.as_ref().map(|b| b.amount);
        auction.current_bidder = restored.as_ref().map(|b| b.bidder);
        auction.previous_bidder = runner_up.as_ref().map(|b| b.bidder);
        auction.updated_at = Utc::now();

        sqlx::query(
            r"
            UPDATE auctions
            SET current_bid = ?, current_bidder = ?, previous_bidder = ?, updated_at = ?
            WHERE id = ?
            ",
        )
        .bind(auction.current_bid)
        .bind(auction.current_bidder.map(UserId::into_inner))
        .bind(auction.previous_bidder.map(UserId::into_inner))
        .bind(auction.updated_at)
        .bind(id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(RetractOutcome {
            auction,
            removed,
            restored,
        })
    }
}

#[async_trait]
impl AuctionRepository for SqliteAuctionRepository {
    #[instrument(skip(self, auction))]
    async fn create(&self, auction: &Auction) -> RepoResult<Auction> {
        let result = sqlx::query(
            r"
            INSERT INTO auctions (title, description, photo, base_price, current_bid,
                current_bidder, previous_bidder, status, seller, channel_chat_id,
                channel_message_id, created_at, updated_at)
            VALUES (?, ?, ?, ?, NULL, NULL, NULL, ?, ?, ?, ?, ?, ?)
            ",
        )
        .bind(&auction.title)
        .bind(&auction.description)
        .bind(&auction.photo)
        .bind(auction.base_price)
        .bind(auction.status.as_str())
        .bind(auction.seller.into_inner())
        .bind(auction.channel_message.map(|m| m.chat_id.into_inner()))
        .bind(auction.channel_message.map(|m| m.message_id))
        .bind(auction.created_at)
        .bind(auction.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        let id = result.last_insert_rowid();
        self.fetch(id).await?.ok_or_else(|| auction_not_found(id))
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: i64) -> RepoResult<Option<Auction>> {
        self.fetch(id).await
    }

    #[instrument(skip(self))]
    async fn list_active(&self) -> RepoResult<Vec<Auction>> {
        let models = sqlx::query_as::<_, AuctionModel>(&format!(
            "SELECT {AUCTION_COLUMNS} FROM auctions WHERE status = 'active' ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(models.into_iter().map(Auction::from).collect())
    }

    #[instrument(skip(self))]
    async fn set_channel_message(&self, id: i64, message: MessageRef) -> RepoResult<()> {
        let result = sqlx::query(
            r"
            UPDATE auctions SET channel_chat_id = ?, channel_message_id = ?, updated_at = ?
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
            return Err(auction_not_found(id));
        }
        Ok(())
    }

    #[instrument(skip(self))]
    async fn place_bid(&self, id: i64, bidder: UserId, amount: i64) -> RepoResult<BidOutcome> {
        retry_busy("place_bid", || self.place_bid_tx(id, bidder, amount)).await
    }

    #[instrument(skip(self))]
    async fn retract_last_bid(&self, id: i64) -> RepoResult<RetractOutcome> {
        retry_busy("retract_last_bid", || self.retract_last_bid_tx(id)).await
    }

    #[instrument(skip(self))]
    async fn close(&self, id: i64) -> RepoResult<Auction> {
        self.finish(id, AuctionStatus::Ended).await
    }

    #[instrument(skip(self))]
    async fn remove(&self, id: i64) -> RepoResult<Auction> {
        self.finish(id, AuctionStatus::Removed).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SqliteAuctionRepository>();
    }
}
