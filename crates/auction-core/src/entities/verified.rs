//! Verified user entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::UserId;

/// A user an admin has approved to submit and bid.
///
/// Presence of the row implies eligibility; the counters track activity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifiedUser {
    pub user: UserId,
    pub verified_by: UserId,
    pub bids_placed: i64,
    pub auctions_won: i64,
    pub verified_at: DateTime<Utc>,
}

impl VerifiedUser {
    /// Create a fresh verification record
    pub fn new(user: UserId, verified_by: UserId) -> Self {
        Self {
            user,
            verified_by,
            bids_placed: 0,
            auctions_won: 0,
            verified_at: Utc::now(),
        }
    }
}
