//! Bid database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

use auction_core::entities::Bid;
use auction_core::value_objects::UserId;

/// Database model for the bids table
#[derive(Debug, Clone, FromRow)]
pub struct BidModel {
    pub id: i64,
    pub auction_id: i64,
    pub bidder: i64,
    pub amount: i64,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<BidModel> for Bid {
    fn from(model: BidModel) -> Self {
        Bid {
            id: model.id,
            auction_id: model.auction_id,
            bidder: UserId::new(model.bidder),
            amount: model.amount,
            is_active: model.is_active,
            created_at: model.created_at,
        }
    }
}
