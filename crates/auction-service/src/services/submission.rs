//! Submission service - the multi-step listing form
//!
//! Drives the draft state machine, persists the draft after every accepted
//! step, and on confirmation turns the draft into a pending submission fanned
//! out to every admin for review.

use std::sync::Arc;

use tracing::{info, instrument};
use validator::Validate;

use auction_core::entities::{AdminMessage, ReviewKind, Submission};
use auction_core::traits::ProfileEvent;
use auction_core::value_objects::UserId;
use auction_core::workflow::{Draft, DraftEvent, StepPrompt};
use auction_core::DomainError;

use crate::port::fan_out;
use crate::render;

use super::context::ServiceContext;
use super::error::ServiceResult;

/// The outcome of one submission-form input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionStep {
    /// The form advanced; ask the user for this next
    Prompt(StepPrompt),
    /// The form was confirmed and is now pending admin review
    Submitted(Submission),
}

/// Service for the submission workflow
#[derive(Clone)]
pub struct SubmissionService {
    ctx: Arc<ServiceContext>,
}

impl SubmissionService {
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self { ctx }
    }

    /// Start a fresh draft, discarding any in-progress one.
    ///
    /// Sellers must be verified and not banned before they can list.
    #[instrument(skip(self))]
    pub async fn start(&self, user: UserId) -> ServiceResult<StepPrompt> {
        if self.ctx.profile_repo().is_banned(user).await? {
            return Err(DomainError::UserBanned.into());
        }
        if !self.ctx.verified_repo().is_verified(user).await? {
            return Err(DomainError::NotVerified.into());
        }

        let draft = Draft::new(user);
        self.ctx.draft_repo().upsert(&draft).await?;
        info!(user = %user, "draft started");
        Ok(draft.current_prompt())
    }

    /// Feed one input event into the user's draft.
    ///
    /// Rejected events leave the draft untouched so the user can simply try
    /// again. A confirmed draft is finalized into a pending submission.
    #[instrument(skip(self, event))]
    pub async fn advance(&self, user: UserId, event: DraftEvent) -> ServiceResult<SubmissionStep> {
        let mut draft = self
            .ctx
            .draft_repo()
            .find_by_user(user)
            .await?
            .ok_or(DomainError::DraftNotFound)?;

        if let DraftEvent::CategoryChosen(category) = &event {
            if !self.ctx.settings_repo().category_enabled(*category).await? {
                return Err(DomainError::CategoryDisabled(category.to_string()).into());
            }
        }

        let prompt = draft.apply(event)?;
        if prompt == StepPrompt::Completed {
            let submission = self.finalize(draft).await?;
            return Ok(SubmissionStep::Submitted(submission));
        }

        self.ctx.draft_repo().upsert(&draft).await?;
        Ok(SubmissionStep::Prompt(prompt))
    }

    /// Discard the user's draft; returns false when none existed
    #[instrument(skip(self))]
    pub async fn cancel(&self, user: UserId) -> ServiceResult<bool> {
        let removed = self.ctx.draft_repo().delete(user).await?;
        if removed {
            info!(user = %user, "draft cancelled");
        }
        Ok(removed)
    }

    /// The user's in-progress draft, if any
    pub async fn current(&self, user: UserId) -> ServiceResult<Option<Draft>> {
        Ok(self.ctx.draft_repo().find_by_user(user).await?)
    }

    /// Turn a confirmed draft into a pending submission and fan out the
    /// review card to every admin.
    ///
    /// The draft is deleted only after the submission is persisted, so a
    /// crash in between leaves a resumable draft rather than a lost form.
    async fn finalize(&self, draft: Draft) -> ServiceResult<Submission> {
        let user = draft.user;
        let form = draft.into_form()?;
        form.validate()
            .map_err(|e| DomainError::ValidationError(e.to_string()))?;

        let submission = self
            .ctx
            .submission_repo()
            .create(&Submission::new(user, form))
            .await?;
        self.ctx
            .profile_repo()
            .record_event(user, ProfileEvent::Submitted)
            .await?;
        self.ctx.draft_repo().delete(user).await?;

        info!(
            submission_id = submission.id,
            user = %user,
            "submission created"
        );

        let recipients = self.ctx.admins().admin_chats().await?;
        let card = render::review_card(&submission);
        let keyboard = render::review_keyboard(submission.id);
        let delivered = fan_out(
            self.ctx.chat(),
            &recipients,
            &card,
            submission.form.photo.as_deref(),
            Some(&keyboard),
        )
        .await;

        for (admin_chat, message) in delivered {
            self.ctx
                .admin_message_repo()
                .record(&AdminMessage::new(
                    ReviewKind::Submission,
                    submission.id,
                    admin_chat,
                    message.message_id,
                ))
                .await?;
        }

        Ok(submission)
    }
}
