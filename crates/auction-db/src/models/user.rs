//! User-side database models: verified roster, profiles, leaderboard

use chrono::{DateTime, Utc};
use sqlx::FromRow;

use auction_core::entities::{LeaderboardEntry, UserProfile, VerifiedUser};
use auction_core::value_objects::UserId;

/// Database model for the verified_users table
#[derive(Debug, Clone, FromRow)]
pub struct VerifiedUserModel {
    pub user_id: i64,
    pub verified_by: i64,
    pub bids_placed: i64,
    pub auctions_won: i64,
    pub verified_at: DateTime<Utc>,
}

impl From<VerifiedUserModel> for VerifiedUser {
    fn from(model: VerifiedUserModel) -> Self {
        VerifiedUser {
            user: UserId::new(model.user_id),
            verified_by: UserId::new(model.verified_by),
            bids_placed: model.bids_placed,
            auctions_won: model.auctions_won,
            verified_at: model.verified_at,
        }
    }
}

/// Database model for the profiles table
#[derive(Debug, Clone, FromRow)]
pub struct ProfileModel {
    pub user_id: i64,
    pub submitted: i64,
    pub approved: i64,
    pub rejected: i64,
    pub pending: i64,
    pub revoked: i64,
    pub banned: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ProfileModel> for UserProfile {
    fn from(model: ProfileModel) -> Self {
        UserProfile {
            user: UserId::new(model.user_id),
            submitted: model.submitted,
            approved: model.approved,
            rejected: model.rejected,
            pending: model.pending,
            revoked: model.revoked,
            banned: model.banned,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// Database model for the leaderboard table
#[derive(Debug, Clone, FromRow)]
pub struct LeaderboardModel {
    pub user_id: i64,
    pub wins: i64,
    pub total_spent: i64,
}

impl From<LeaderboardModel> for LeaderboardEntry {
    fn from(model: LeaderboardModel) -> Self {
        LeaderboardEntry {
            user: UserId::new(model.user_id),
            wins: model.wins,
            total_spent: model.total_spent,
        }
    }
}
