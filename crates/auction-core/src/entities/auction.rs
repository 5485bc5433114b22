//! Auction entity - a listed item accepting bids until closed by an admin

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::value_objects::{min_increment, MessageRef, UserId};

/// Auction lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuctionStatus {
    /// Accepting bids
    Active,
    /// Closed by an admin with a winner (or no bids)
    Ended,
    /// Pulled by an admin; no winner
    Removed,
}

impl AuctionStatus {
    /// Stable identifier used in storage
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Ended => "ended",
            Self::Removed => "removed",
        }
    }
}

impl fmt::Display for AuctionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AuctionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "ended" => Ok(Self::Ended),
            "removed" => Ok(Self::Removed),
            other => Err(format!("unknown auction status: {other}")),
        }
    }
}

/// Auction entity
///
/// Created when an admin approves a submission; mutated by each accepted bid
/// and by admin close/removal. Never hard-deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Auction {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    /// Chat-platform file reference for the listing photo
    pub photo: Option<String>,
    pub base_price: i64,
    pub current_bid: Option<i64>,
    pub current_bidder: Option<UserId>,
    pub previous_bidder: Option<UserId>,
    pub status: AuctionStatus,
    pub seller: UserId,
    /// The message in the public channel announcing this auction
    pub channel_message: Option<MessageRef>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Auction {
    /// Create a new active auction with no bids
    pub fn new(title: String, base_price: i64, seller: UserId) -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            title,
            description: None,
            photo: None,
            base_price,
            current_bid: None,
            current_bidder: None,
            previous_bidder: None,
            status: AuctionStatus::Active,
            seller,
            channel_message: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Attach a description
    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }

    /// Attach a photo reference
    pub fn with_photo(mut self, photo: Option<String>) -> Self {
        self.photo = photo;
        self
    }

    /// Check whether the auction accepts bids
    #[inline]
    pub fn is_active(&self) -> bool {
        self.status == AuctionStatus::Active
    }

    /// The smallest amount the next bid must reach.
    ///
    /// With no bids yet the base price itself is acceptable; afterwards the
    /// increment ladder applies on top of the current bid.
    pub fn min_acceptable_bid(&self) -> i64 {
        match self.current_bid {
            Some(current) => current + min_increment(current),
            None => self.base_price,
        }
    }

    /// Record an accepted bid, superseding the previous leader
    pub fn apply_bid(&mut self, bidder: UserId, amount: i64) {
        self.previous_bidder = self.current_bidder;
        self.current_bidder = Some(bidder);
        self.current_bid = Some(amount);
        self.updated_at = Utc::now();
    }
}
