//! User profile entity - aggregate submission counters and ban status

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::UserId;

/// Aggregate per-user counters maintained by the moderation workflow
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub user: UserId,
    pub submitted: i64,
    pub approved: i64,
    pub rejected: i64,
    pub pending: i64,
    pub revoked: i64,
    pub banned: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserProfile {
    /// Create an empty profile for a user
    pub fn new(user: UserId) -> Self {
        let now = Utc::now();
        Self {
            user,
            submitted: 0,
            approved: 0,
            rejected: 0,
            pending: 0,
            revoked: 0,
            banned: false,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_profile() {
        let profile = UserProfile::new(UserId::new(9));
        assert_eq!(profile.submitted, 0);
        assert_eq!(profile.pending, 0);
        assert!(!profile.banned);
    }
}
