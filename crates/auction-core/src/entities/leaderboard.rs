//! Leaderboard entry entity

use serde::{Deserialize, Serialize};

use crate::value_objects::UserId;

/// Aggregate win statistics for one bidder
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub user: UserId,
    pub wins: i64,
    pub total_spent: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serde_round_trip() {
        let entry = LeaderboardEntry {
            user: UserId::new(3),
            wins: 2,
            total_spent: 45_000,
        };
        let json = serde_json::to_string(&entry).unwrap();
        let back: LeaderboardEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(back, entry);
    }
}
