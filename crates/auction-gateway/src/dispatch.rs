//! Command dispatch
//!
//! Routes normalized updates to the services and turns their results into
//! replies. Free text is ambiguous by nature: it is offered to an open
//! rejection session first and falls through to the submission draft, so an
//! admin writing a rejection reason never advances their own draft by
//! accident.

use std::sync::Arc;

use tracing::{error, instrument, warn};

use auction_core::value_objects::{format_amount, Category, ChatId, UserId};
use auction_core::workflow::{DraftEvent, DraftState, StepPrompt};
use auction_core::DomainError;
use auction_service::services::{
    BiddingService, LeaderboardService, ModerationService, ProfileService, ServiceContext,
    ServiceError, ServiceResult, SubmissionService, SubmissionStep, VerificationService,
};
use auction_service::render;

use crate::prompts;
use crate::update::{deep_link_auction, CallbackAction, Update};

/// Routes updates to the marketplace services
pub struct Dispatcher {
    ctx: Arc<ServiceContext>,
    bidding: BiddingService,
    submissions: SubmissionService,
    moderation: ModerationService,
    verification: VerificationService,
    profiles: ProfileService,
    leaderboard: LeaderboardService,
}

impl Dispatcher {
    /// The moderation service is shared with the cleanup scheduler, so the
    /// caller constructs it and hands it in.
    pub fn new(ctx: Arc<ServiceContext>, moderation: ModerationService) -> Self {
        Self {
            bidding: BiddingService::new(ctx.clone()),
            submissions: SubmissionService::new(ctx.clone()),
            verification: VerificationService::new(ctx.clone()),
            profiles: ProfileService::new(ctx.clone()),
            leaderboard: LeaderboardService::new(ctx.clone()),
            moderation,
            ctx,
        }
    }

    /// Handle one update end to end, including the reply.
    ///
    /// Never propagates an error; failures become a reply to the user or a
    /// log line, so one bad update cannot take down the update loop.
    #[instrument(skip(self, update))]
    pub async fn handle(&self, update: Update) {
        let reply_chat = match &update {
            Update::Command { chat, .. } | Update::Text { chat, .. } | Update::Photo { chat, .. } => {
                *chat
            }
            Update::Callback { from, .. } => ChatId::from(*from),
        };

        let reply = match self.dispatch(update).await {
            Ok(reply) => reply,
            Err(err) if err.is_user_facing() => error_reply(&err),
            Err(err) => {
                error!(error = %err, code = err.error_code(), "update handling failed");
                "Something went wrong on our side. Please try again in a moment.".to_string()
            }
        };

        if let Err(err) = self.ctx.chat().send_message(reply_chat, &reply, None).await {
            warn!(chat = %reply_chat, error = %err, "failed to deliver reply");
        }
    }

    async fn dispatch(&self, update: Update) -> ServiceResult<String> {
        match update {
            Update::Command { from, name, args, .. } => self.command(from, &name, &args).await,
            Update::Text { from, text, .. } => self.text(from, &text).await,
            Update::Photo { from, file_ref, .. } => self.photo(from, file_ref).await,
            Update::Callback { from, message, data } => {
                let action: CallbackAction = data
                    .parse()
                    .map_err(|_| ServiceError::validation(format!("unknown action: {data}")))?;
                self.callback(from, message, action).await
            }
        }
    }

    async fn command(&self, from: UserId, name: &str, args: &str) -> ServiceResult<String> {
        match name {
            "start" => match deep_link_auction(args) {
                Some(auction_id) => {
                    let auction = self.bidding.auction(auction_id).await?;
                    Ok(format!(
                        "{}\n\nBid with /bid {} <amount>.",
                        render::auction_card(&auction),
                        auction.id,
                    ))
                }
                None => Ok(prompts::welcome().to_string()),
            },
            "help" => Ok(prompts::welcome().to_string()),
            "verify" => {
                self.verification.request(from).await?;
                Ok("📨 Your verification request was sent to the admins.".to_string())
            }
            "sell" => {
                let prompt = self.submissions.start(from).await?;
                Ok(prompts::step_text(prompt).to_string())
            }
            "cancel" => Ok(if self.submissions.cancel(from).await? {
                "🗑 Draft discarded.".to_string()
            } else {
                "There is nothing to cancel.".to_string()
            }),
            "bid" => {
                let (auction_id, amount) = split_bid_args(args)?;
                let outcome = self.bidding.place_bid(auction_id, from, amount).await?;
                Ok(format!(
                    "✅ Your bid of {} on \"{}\" is in the lead!",
                    format_amount(outcome.auction.current_bid.unwrap_or_default()),
                    outcome.auction.title,
                ))
            }
            "auctions" => {
                let auctions = self.bidding.active_auctions().await?;
                Ok(prompts::auction_list(&auctions))
            }
            "bids" => {
                let auction = self.bidding.auction(parse_id(args)?).await?;
                let bids = self.bidding.bid_history(auction.id).await?;
                Ok(prompts::bid_history(&auction, &bids))
            }
            "profile" => {
                let view = self.profiles.view(from).await?;
                Ok(prompts::profile_card(&view))
            }
            "leaderboard" => {
                let entries = self.leaderboard.top(None).await?;
                Ok(render::leaderboard(&entries))
            }

            // Admin surface. Authorization happens inside the services.
            "pending" => {
                let pending = self.moderation.pending(from).await?;
                if pending.is_empty() {
                    return Ok("Nothing is waiting for review.".to_string());
                }
                let lines: Vec<String> = pending
                    .iter()
                    .map(|s| format!("#{} {} by user {}", s.id, s.form.title(), s.user))
                    .collect();
                Ok(format!("📥 Pending submissions\n\n{}", lines.join("\n")))
            }
            "approve" => {
                let auction = self.moderation.approve(from, parse_id(args)?).await?;
                Ok(format!(
                    "✅ Approved. Auction #{} is live in the channel.",
                    auction.id
                ))
            }
            "reject" => {
                self.moderation
                    .reject_start_by_id(from, parse_id(args)?)
                    .await?;
                Ok("✍️ Send the rejection reason as your next message.".to_string())
            }
            "close" => {
                let auction = self.bidding.close_auction(from, parse_id(args)?).await?;
                Ok(match (auction.current_bidder, auction.current_bid) {
                    (Some(winner), Some(amount)) => format!(
                        "🏁 \"{}\" sold to user {winner} for {}.",
                        auction.title,
                        format_amount(amount),
                    ),
                    _ => format!("🏁 \"{}\" ended without bids.", auction.title),
                })
            }
            "remove" => {
                let auction = self.bidding.remove_auction(from, parse_id(args)?).await?;
                Ok(format!("❌ \"{}\" was removed.", auction.title))
            }
            "retractbid" => {
                let outcome = self
                    .bidding
                    .retract_last_bid(from, parse_id(args)?)
                    .await?;
                Ok(format!(
                    "↩️ Struck the {} bid by user {}.",
                    format_amount(outcome.removed.amount),
                    outcome.removed.bidder,
                ))
            }
            "openbids" => {
                self.bidding.set_bidding_open(from, true).await?;
                Ok("🔓 Bidding is open.".to_string())
            }
            "closebids" => {
                self.bidding.set_bidding_open(from, false).await?;
                Ok("🔒 Bidding is paused.".to_string())
            }
            "togglecategory" => {
                let category: Category = args
                    .parse()
                    .map_err(|_| DomainError::ValidationError(format!(
                        "unknown category: {args}"
                    )))?;
                let enabled = self.moderation.toggle_category(from, category).await?;
                Ok(format!(
                    "{} submissions are now {}.",
                    category,
                    if enabled { "enabled" } else { "disabled" },
                ))
            }
            "ban" => {
                let user = parse_user(args)?;
                self.moderation.ban(from, user).await?;
                Ok(format!("⛔ User {user} is banned."))
            }
            "unban" => {
                let user = parse_user(args)?;
                self.moderation.unban(from, user).await?;
                Ok(format!("✅ User {user} is unbanned."))
            }
            "revoke" => {
                let user = parse_user(args)?;
                Ok(if self.moderation.revoke(from, user).await? {
                    format!("🚫 Verification revoked for user {user}.")
                } else {
                    format!("User {user} was not verified.")
                })
            }
            "addadmin" => {
                self.ctx.admins().require_admin(from).await?;
                let user = parse_user(args)?;
                Ok(if self.ctx.admins().add(user).await? {
                    format!("👮 User {user} is now an admin.")
                } else {
                    format!("User {user} already is an admin.")
                })
            }
            "removeadmin" => {
                self.ctx.admins().require_admin(from).await?;
                let user = parse_user(args)?;
                Ok(if self.ctx.admins().remove(user).await? {
                    format!("User {user} is no longer an admin.")
                } else {
                    format!("User {user} was not an admin.")
                })
            }

            _ => Ok(prompts::lost().to_string()),
        }
    }

    /// Free text goes to an open rejection session first, then to the draft
    async fn text(&self, from: UserId, text: &str) -> ServiceResult<String> {
        if let Some(submission) = self.moderation.reject_reason(from, text).await? {
            return Ok(format!(
                "❌ Rejected \"{}\" and told user {}.",
                submission.form.title(),
                submission.user,
            ));
        }

        let Some(draft) = self.submissions.current(from).await? else {
            return Ok(prompts::lost().to_string());
        };
        let event = draft_event_for(draft.state, text);
        self.advance_draft(from, event).await
    }

    async fn photo(&self, from: UserId, file_ref: String) -> ServiceResult<String> {
        if self.submissions.current(from).await?.is_none() {
            return Ok(prompts::lost().to_string());
        }
        self.advance_draft(from, DraftEvent::Photo(file_ref)).await
    }

    async fn advance_draft(&self, from: UserId, event: DraftEvent) -> ServiceResult<String> {
        match self.submissions.advance(from, event).await? {
            SubmissionStep::Prompt(prompt) => Ok(prompts::step_text(prompt).to_string()),
            SubmissionStep::Submitted(_) => {
                Ok(prompts::step_text(StepPrompt::Completed).to_string())
            }
        }
    }

    async fn callback(
        &self,
        from: UserId,
        message: auction_core::value_objects::MessageRef,
        action: CallbackAction,
    ) -> ServiceResult<String> {
        match action {
            CallbackAction::Approve(submission_id) => {
                let auction = self.moderation.approve(from, submission_id).await?;
                Ok(format!(
                    "✅ Approved. Auction #{} is live in the channel.",
                    auction.id
                ))
            }
            CallbackAction::Reject(submission_id) => {
                self.moderation
                    .reject_start(from, submission_id, message)
                    .await?;
                Ok("✍️ Send the rejection reason as your next message.".to_string())
            }
            CallbackAction::Verify(user) => {
                self.verification.approve(from, user).await?;
                Ok(format!("✅ User {user} is verified."))
            }
            CallbackAction::Decline(user) => {
                self.verification.decline(from, user).await?;
                Ok(format!("User {user} was declined."))
            }
        }
    }
}

/// Map free text onto the event the current draft step expects
fn draft_event_for(state: DraftState, text: &str) -> DraftEvent {
    match state {
        DraftState::ChoosingCategory => match text.parse::<Category>() {
            Ok(category) => DraftEvent::CategoryChosen(category),
            Err(_) => DraftEvent::Text(text.to_string()),
        },
        DraftState::AwaitingPhoto if text.eq_ignore_ascii_case("skip") => DraftEvent::SkipPhoto,
        DraftState::ReadyToSubmit if is_confirmation(text) => DraftEvent::Confirm,
        _ => DraftEvent::Text(text.to_string()),
    }
}

fn is_confirmation(text: &str) -> bool {
    matches!(
        text.trim().to_lowercase().as_str(),
        "confirm" | "yes" | "y" | "ok"
    )
}

/// `/bid <auction> <amount>` arguments
fn split_bid_args(args: &str) -> ServiceResult<(i64, &str)> {
    let (id, amount) = args
        .split_once(char::is_whitespace)
        .ok_or(DomainError::ValidationError(
            "usage: /bid <auction> <amount>".to_string(),
        ))?;
    Ok((parse_id(id)?, amount.trim()))
}

fn parse_id(args: &str) -> ServiceResult<i64> {
    args.trim()
        .trim_start_matches('#')
        .parse()
        .map_err(|_| DomainError::ValidationError(format!("not an id: {args}")).into())
}

fn parse_user(args: &str) -> ServiceResult<UserId> {
    parse_id(args).map(UserId::new)
}

/// Turn a user-facing error into reply text
fn error_reply(err: &ServiceError) -> String {
    match err {
        ServiceError::Domain(DomainError::BidTooLow { minimum }) => format!(
            "📉 That bid is too low. The minimum acceptable bid is {}.",
            format_amount(*minimum),
        ),
        ServiceError::Domain(DomainError::UnexpectedInput { expected }) => {
            format!("I was expecting {expected}. Try again, or /cancel to discard.")
        }
        ServiceError::Domain(DomainError::NotVerified) => {
            "You need to be verified first. Use /verify to request access.".to_string()
        }
        ServiceError::Domain(DomainError::DraftNotFound) => {
            "You have no listing in progress. Start one with /sell.".to_string()
        }
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_bid_args() {
        let (id, amount) = split_bid_args("7 19k").unwrap();
        assert_eq!(id, 7);
        assert_eq!(amount, "19k");
        assert!(split_bid_args("7").is_err());
    }

    #[test]
    fn test_parse_id_accepts_hash_prefix() {
        assert_eq!(parse_id("#12").unwrap(), 12);
        assert!(parse_id("twelve").is_err());
    }

    #[test]
    fn test_draft_event_mapping() {
        assert_eq!(
            draft_event_for(DraftState::ChoosingCategory, "Pokemon"),
            DraftEvent::CategoryChosen(Category::Pokemon)
        );
        assert_eq!(
            draft_event_for(DraftState::AwaitingPhoto, "SKIP"),
            DraftEvent::SkipPhoto
        );
        assert_eq!(
            draft_event_for(DraftState::ReadyToSubmit, "confirm"),
            DraftEvent::Confirm
        );
        assert_eq!(
            draft_event_for(DraftState::AwaitingName, "Gible"),
            DraftEvent::Text("Gible".to_string())
        );
    }

    #[test]
    fn test_bid_too_low_reply_formats_amount() {
        let err = ServiceError::from(DomainError::BidTooLow { minimum: 19_000 });
        assert!(error_reply(&err).contains("19K"));
    }
}
