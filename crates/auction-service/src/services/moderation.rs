//! Moderation service - submission verdicts and user discipline
//!
//! Approval wins the race by moving the submission out of `pending` before
//! anything else happens; the loser of a two-admin race gets
//! [`DomainError::SubmissionNotPending`] instead of a double verdict.
//!
//! Rejection is a two-message flow: the admin taps Reject, which opens a
//! rejection session, and their next free-text message becomes the reason.

use std::sync::Arc;

use chrono::{Duration, Utc};
use tracing::{info, instrument, warn};

use auction_core::entities::{
    ActiveRejection, Auction, ReviewKind, Submission, SubmissionStatus,
};
use auction_core::traits::ProfileEvent;
use auction_core::value_objects::{Category, ChatId, MessageRef, UserId};
use auction_core::DomainError;

use crate::render;

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Service for admin review and discipline
#[derive(Clone)]
pub struct ModerationService {
    ctx: Arc<ServiceContext>,
    /// How long an unanswered rejection session stays usable
    rejection_ttl: Duration,
}

impl ModerationService {
    pub fn new(ctx: Arc<ServiceContext>, rejection_ttl: Duration) -> Self {
        Self { ctx, rejection_ttl }
    }

    /// Submissions still awaiting review, oldest first
    pub async fn pending(&self, admin: UserId) -> ServiceResult<Vec<Submission>> {
        self.ctx.admins().require_admin(admin).await?;
        Ok(self.ctx.submission_repo().list_pending().await?)
    }

    /// Approve a submission and open its auction in the public channel.
    ///
    /// When posting to the channel fails the submission is parked as
    /// `failed` instead of silently staying approved with no auction.
    #[instrument(skip(self))]
    pub async fn approve(&self, admin: UserId, submission_id: i64) -> ServiceResult<Auction> {
        self.ctx.admins().require_admin(admin).await?;

        let submission = self
            .ctx
            .submission_repo()
            .set_status(submission_id, SubmissionStatus::Approved)
            .await?;

        let auction = Auction::new(
            submission.form.title(),
            submission.form.price,
            submission.user,
        )
        .with_description(Some(submission.form.description()))
        .with_photo(submission.form.photo.clone());
        let auction = self.ctx.auction_repo().create(&auction).await?;

        let message = match self.post_channel_card(&auction).await {
            Ok(message) => message,
            Err(err) => {
                self.ctx
                    .submission_repo()
                    .set_status(submission_id, SubmissionStatus::Failed)
                    .await?;
                warn!(
                    submission_id,
                    auction_id = auction.id,
                    error = %err,
                    "channel post failed, submission parked as failed"
                );
                return Err(err);
            }
        };
        self.ctx
            .auction_repo()
            .set_channel_message(auction.id, message)
            .await?;
        self.ctx
            .submission_repo()
            .set_channel_message(submission_id, message)
            .await?;

        self.ctx
            .profile_repo()
            .record_event(submission.user, ProfileEvent::Approved)
            .await?;
        info!(submission_id, auction_id = auction.id, "submission approved");

        self.notify(
            submission.user,
            &format!(
                "✅ Your listing \"{}\" was approved and is now live!",
                submission.form.title()
            ),
        )
        .await;
        self.settle_review(&submission, &format!("✅ Approved by admin {admin}"))
            .await?;

        Ok(auction)
    }

    /// Open a rejection session for a submission.
    ///
    /// The admin's next free-text message, fed to [`Self::reject_reason`],
    /// becomes the rejection reason. A new session for the same submission
    /// replaces any older one.
    #[instrument(skip(self))]
    pub async fn reject_start(
        &self,
        admin: UserId,
        submission_id: i64,
        origin: MessageRef,
    ) -> ServiceResult<()> {
        self.ctx.admins().require_admin(admin).await?;

        let submission = self
            .ctx
            .submission_repo()
            .find_by_id(submission_id)
            .await?
            .ok_or(DomainError::SubmissionNotFound(submission_id))?;
        if !submission.is_pending() {
            return Err(DomainError::SubmissionNotPending(submission_id).into());
        }

        self.ctx
            .rejection_repo()
            .open(&ActiveRejection::new(submission_id, admin, origin))
            .await?;
        info!(submission_id, admin = %admin, "rejection session opened");
        Ok(())
    }

    /// Open a rejection session from a typed `/reject` command.
    ///
    /// With no button press there is no pressed message to anchor to, so the
    /// session anchors to this admin's copy of the review card, falling back
    /// to any admin's copy. The anchor is bookkeeping; the verdict edit
    /// rewrites every copy regardless.
    #[instrument(skip(self))]
    pub async fn reject_start_by_id(
        &self,
        admin: UserId,
        submission_id: i64,
    ) -> ServiceResult<()> {
        self.ctx.admins().require_admin(admin).await?;

        let admin_chat = ChatId::from(admin);
        let copies = self
            .ctx
            .admin_message_repo()
            .list_for(ReviewKind::Submission, submission_id)
            .await?;
        let origin = copies
            .iter()
            .find(|copy| copy.admin_chat == admin_chat)
            .or_else(|| copies.first())
            .map(|copy| MessageRef::new(copy.admin_chat, copy.message_id))
            .unwrap_or_else(|| MessageRef::new(admin_chat, 0));

        self.reject_start(admin, submission_id, origin).await
    }

    /// Try to settle an open rejection session with this admin's message.
    ///
    /// Returns `None` when the admin has no live session, so the caller can
    /// treat the text as ordinary input. Stale sessions are discarded here
    /// even before the cleanup sweep gets to them.
    #[instrument(skip(self, reason))]
    pub async fn reject_reason(
        &self,
        admin: UserId,
        reason: &str,
    ) -> ServiceResult<Option<Submission>> {
        let Some(session) = self.ctx.rejection_repo().find_by_admin(admin).await? else {
            return Ok(None);
        };
        if session.is_stale(self.rejection_ttl) {
            self.ctx.rejection_repo().close(session.submission_id).await?;
            return Ok(None);
        }

        let submission_id = session.submission_id;
        let submission = match self
            .ctx
            .submission_repo()
            .set_status(submission_id, SubmissionStatus::Rejected)
            .await
        {
            Ok(submission) => submission,
            Err(err) => {
                // Another admin decided it while the reason was being typed.
                self.ctx.rejection_repo().close(submission_id).await?;
                return Err(err.into());
            }
        };
        self.ctx.rejection_repo().close(submission_id).await?;
        self.ctx
            .profile_repo()
            .record_event(submission.user, ProfileEvent::Rejected)
            .await?;
        info!(submission_id, admin = %admin, "submission rejected");

        self.notify(
            submission.user,
            &format!(
                "❌ Your listing \"{}\" was rejected.\nReason: {reason}",
                submission.form.title()
            ),
        )
        .await;
        self.settle_review(
            &submission,
            &format!("❌ Rejected by admin {admin}: {reason}"),
        )
        .await?;

        Ok(Some(submission))
    }

    /// Strip a user's verification; returns false when they had none
    #[instrument(skip(self))]
    pub async fn revoke(&self, admin: UserId, user: UserId) -> ServiceResult<bool> {
        self.ctx.admins().require_admin(admin).await?;

        let removed = self.ctx.verified_repo().remove(user).await?;
        if removed {
            self.ctx
                .profile_repo()
                .record_event(user, ProfileEvent::Revoked)
                .await?;
            info!(user = %user, "verification revoked");
            self.notify(
                user,
                "🚫 Your marketplace verification was revoked by an admin.",
            )
            .await;
        }
        Ok(removed)
    }

    /// Ban a user from submitting and bidding.
    ///
    /// A ban also strips verification so the user cannot bid again without
    /// going through review.
    #[instrument(skip(self))]
    pub async fn ban(&self, admin: UserId, user: UserId) -> ServiceResult<()> {
        self.ctx.admins().require_admin(admin).await?;

        self.ctx.verified_repo().remove(user).await?;
        self.ctx
            .profile_repo()
            .record_event(user, ProfileEvent::Banned)
            .await?;
        info!(user = %user, "user banned");

        self.notify(user, "⛔ You have been banned from the marketplace.")
            .await;
        Ok(())
    }

    /// Lift a ban
    #[instrument(skip(self))]
    pub async fn unban(&self, admin: UserId, user: UserId) -> ServiceResult<()> {
        self.ctx.admins().require_admin(admin).await?;

        self.ctx
            .profile_repo()
            .record_event(user, ProfileEvent::Unbanned)
            .await?;
        info!(user = %user, "user unbanned");

        self.notify(user, "✅ Your marketplace ban was lifted.").await;
        Ok(())
    }

    /// Flip a submission-category switch, returning whether it is now enabled
    #[instrument(skip(self))]
    pub async fn toggle_category(
        &self,
        admin: UserId,
        category: Category,
    ) -> ServiceResult<bool> {
        self.ctx.admins().require_admin(admin).await?;
        let enabled = self.ctx.settings_repo().toggle_category(category).await?;
        info!(category = %category, enabled, "category toggled");
        Ok(enabled)
    }

    /// Drop rejection sessions older than the time-to-live
    pub async fn purge_stale_rejections(&self) -> ServiceResult<u64> {
        let cutoff = Utc::now() - self.rejection_ttl;
        let purged = self.ctx.rejection_repo().purge_older_than(cutoff).await?;
        if purged > 0 {
            info!(purged, "stale rejection sessions purged");
        }
        Ok(purged)
    }

    /// Rewrite every admin's copy of the review card with the verdict and
    /// forget the copies
    async fn settle_review(&self, submission: &Submission, verdict: &str) -> ServiceResult<()> {
        let copies = self
            .ctx
            .admin_message_repo()
            .list_for(ReviewKind::Submission, submission.id)
            .await?;

        let card = render::settled_review_card(&render::review_card(submission), verdict);
        for copy in &copies {
            let message = MessageRef::new(copy.admin_chat, copy.message_id);
            if let Err(err) = self.ctx.chat().edit_message(message, &card, None).await {
                warn!(
                    submission_id = submission.id,
                    admin_chat = %copy.admin_chat,
                    error = %err,
                    "failed to settle review card"
                );
            }
        }
        self.ctx
            .admin_message_repo()
            .delete_for(ReviewKind::Submission, submission.id)
            .await?;
        Ok(())
    }

    /// Post the auction card to the public channel
    async fn post_channel_card(&self, auction: &Auction) -> ServiceResult<MessageRef> {
        let card = render::auction_card(auction);
        let keyboard = render::bid_keyboard(auction.id, self.ctx.bot_username());
        let channel = self.ctx.auction_channel();

        let message = match &auction.photo {
            Some(photo) => {
                self.ctx
                    .chat()
                    .send_photo(channel, photo, &card, Some(&keyboard))
                    .await?
            }
            None => {
                self.ctx
                    .chat()
                    .send_message(channel, &card, Some(&keyboard))
                    .await?
            }
        };
        Ok(message)
    }

    /// Best-effort private message; a blocked bot never fails the verdict
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
