//! Bid entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::UserId;

/// A single bid on an auction.
///
/// Immutable once created except for `is_active`, which is cleared when an
/// admin retracts the most recent bid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bid {
    pub id: i64,
    pub auction_id: i64,
    pub bidder: UserId,
    pub amount: i64,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl Bid {
    /// Create a new active bid
    pub fn new(auction_id: i64, bidder: UserId, amount: i64) -> Self {
        Self {
            id: 0,
            auction_id,
            bidder,
            amount,
            is_active: true,
            created_at: Utc::now(),
        }
    }
}
