//! Profile service - per-user marketplace standing

use std::sync::Arc;

use auction_core::value_objects::UserId;

use crate::dto::ProfileView;

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Read side of a user's submission counters and verification status
#[derive(Clone)]
pub struct ProfileService {
    ctx: Arc<ServiceContext>,
}

impl ProfileService {
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self { ctx }
    }

    /// The user's standing, creating a blank profile on first contact
    pub async fn view(&self, user: UserId) -> ServiceResult<ProfileView> {
        let profile = self.ctx.profile_repo().ensure(user).await?;
        let verified = self.ctx.verified_repo().find(user).await?;
        Ok(ProfileView { profile, verified })
    }
}
