//! Active rejection entity - correlates an admin's next message with a submission

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::{MessageRef, UserId};

/// An open rejection session.
///
/// Created when an admin taps Reject on a submission review card; the admin's
/// next free-text message becomes the rejection reason. At most one of these
/// exists per submission at any time (a new one replaces the old).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveRejection {
    pub submission_id: i64,
    pub admin: UserId,
    /// The review-card message the admin acted on, edited once the reason lands
    pub origin: MessageRef,
    pub created_at: DateTime<Utc>,
}

impl ActiveRejection {
    /// Open a rejection session
    pub fn new(submission_id: i64, admin: UserId, origin: MessageRef) -> Self {
        Self {
            submission_id,
            admin,
            origin,
            created_at: Utc::now(),
        }
    }

    /// Check whether this session is older than the given time-to-live
    pub fn is_stale(&self, ttl: Duration) -> bool {
        Utc::now() - self.created_at > ttl
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value_objects::ChatId;

    #[test]
    fn test_fresh_session_is_not_stale() {
        let rejection = ActiveRejection::new(
            1,
            UserId::new(9),
            MessageRef::new(ChatId::new(9), 100),
        );
        assert!(!rejection.is_stale(Duration::hours(1)));
    }

    #[test]
    fn test_old_session_is_stale() {
        let mut rejection = ActiveRejection::new(
            1,
            UserId::new(9),
            MessageRef::new(ChatId::new(9), 100),
        );
        rejection.created_at = Utc::now() - Duration::hours(2);
        assert!(rejection.is_stale(Duration::hours(1)));
    }
}
