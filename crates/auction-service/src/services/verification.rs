//! Verification service - admission to the marketplace
//!
//! New users ask to be verified; the request is fanned out to every admin,
//! and the first verdict settles every copy, same as submission review.

use std::sync::Arc;

use tracing::{info, instrument, warn};

use auction_core::entities::{AdminMessage, ReviewKind, VerifiedUser};
use auction_core::value_objects::{ChatId, MessageRef, UserId};
use auction_core::DomainError;

use crate::port::fan_out;
use crate::render;

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Service for the verification workflow
#[derive(Clone)]
pub struct VerificationService {
    ctx: Arc<ServiceContext>,
}

impl VerificationService {
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self { ctx }
    }

    /// Ask the admins to verify this user
    #[instrument(skip(self))]
    pub async fn request(&self, user: UserId) -> ServiceResult<()> {
        if self.ctx.profile_repo().is_banned(user).await? {
            return Err(DomainError::UserBanned.into());
        }
        if self.ctx.verified_repo().is_verified(user).await? {
            return Err(DomainError::AlreadyVerified.into());
        }
        self.ctx.profile_repo().ensure(user).await?;

        let recipients = self.ctx.admins().admin_chats().await?;
        let card = render::verification_card(user);
        let keyboard = render::verification_keyboard(user);
        let delivered = fan_out(self.ctx.chat(), &recipients, &card, None, Some(&keyboard)).await;

        for (admin_chat, message) in delivered {
            self.ctx
                .admin_message_repo()
                .record(&AdminMessage::new(
                    ReviewKind::Verification,
                    user.into_inner(),
                    admin_chat,
                    message.message_id,
                ))
                .await?;
        }
        info!(user = %user, "verification requested");
        Ok(())
    }

    /// Admit the user to the marketplace
    #[instrument(skip(self))]
    pub async fn approve(&self, admin: UserId, user: UserId) -> ServiceResult<()> {
        self.ctx.admins().require_admin(admin).await?;

        if self.ctx.verified_repo().is_verified(user).await? {
            // Another admin got here first; just tidy up the cards.
            self.settle_review(user, &format!("✅ Verified by admin {admin}"))
                .await?;
            return Err(DomainError::AlreadyVerified.into());
        }

        self.ctx
            .verified_repo()
            .insert(&VerifiedUser::new(user, admin))
            .await?;
        info!(user = %user, admin = %admin, "user verified");

        self.notify(
            user,
            "🎉 You are verified! You can now bid and list items with /sell.",
        )
        .await;
        self.settle_review(user, &format!("✅ Verified by admin {admin}"))
            .await?;
        Ok(())
    }

    /// Turn the user away
    #[instrument(skip(self))]
    pub async fn decline(&self, admin: UserId, user: UserId) -> ServiceResult<()> {
        self.ctx.admins().require_admin(admin).await?;

        info!(user = %user, admin = %admin, "verification declined");
        self.notify(user, "❌ Your verification request was declined.")
            .await;
        self.settle_review(user, &format!("❌ Declined by admin {admin}"))
            .await?;
        Ok(())
    }

    /// Rewrite every admin's copy of the request card with the verdict and
    /// forget the copies
    async fn settle_review(&self, user: UserId, verdict: &str) -> ServiceResult<()> {
        let copies = self
            .ctx
            .admin_message_repo()
            .list_for(ReviewKind::Verification, user.into_inner())
            .await?;

        let card = render::settled_review_card(&render::verification_card(user), verdict);
        for copy in &copies {
            let message = MessageRef::new(copy.admin_chat, copy.message_id);
            if let Err(err) = self.ctx.chat().edit_message(message, &card, None).await {
                warn!(
                    user = %user,
                    admin_chat = %copy.admin_chat,
                    error = %err,
                    "failed to settle verification card"
                );
            }
        }
        self.ctx
            .admin_message_repo()
            .delete_for(ReviewKind::Verification, user.into_inner())
            .await?;
        Ok(())
    }

    /// Best-effort private message
    async fn notify(&self, user: UserId, text: &str) {
        if let Err(err) = self
            .ctx
            .chat()
            .send_message(ChatId::from(user), text, None)
            .await
        {
            warn!(user = %user, error = %err, "failed to notify user");
        }
    }
}
