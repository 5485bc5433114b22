//! Leaderboard service - top auction winners

use std::sync::Arc;

use auction_core::entities::LeaderboardEntry;

use super::context::ServiceContext;
use super::error::ServiceResult;

const DEFAULT_LIMIT: i64 = 10;

/// Read side of the winners leaderboard
#[derive(Clone)]
pub struct LeaderboardService {
    ctx: Arc<ServiceContext>,
}

impl LeaderboardService {
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self { ctx }
    }

    /// The top winners, ten by default
    pub async fn top(&self, limit: Option<i64>) -> ServiceResult<Vec<LeaderboardEntry>> {
        let limit = limit.unwrap_or(DEFAULT_LIMIT).clamp(1, 50);
        Ok(self.ctx.leaderboard_repo().top(limit).await?)
    }
}
