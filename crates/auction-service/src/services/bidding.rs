//! Bidding service - placing, retracting, and settling bids
//!
//! Guards run in user-blame order so the reply names the first thing the
//! bidder can actually fix. The atomic minimum check lives in the repository;
//! this layer owns the guard chain, the notifications, and keeping the public
//! channel card current.

use std::sync::Arc;

use tracing::{info, instrument, warn};

use auction_core::entities::{Auction, Bid};
use auction_core::traits::{BidOutcome, RetractOutcome};
use auction_core::value_objects::{format_amount, parse_amount, ChatId, UserId};
use auction_core::DomainError;

use crate::render;

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Service for bid placement and auction settlement
#[derive(Clone)]
pub struct BiddingService {
    ctx: Arc<ServiceContext>,
}

impl BiddingService {
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self { ctx }
    }

    /// Place a bid from raw user input.
    ///
    /// The bidder must be verified, not banned, and bidding must be globally
    /// open. The amount is parsed here; the minimum-bid check happens
    /// atomically in storage so two bidders racing for the same rung cannot
    /// both win it.
    #[instrument(skip(self, raw_amount))]
    pub async fn place_bid(
        &self,
        auction_id: i64,
        bidder: UserId,
        raw_amount: &str,
    ) -> ServiceResult<BidOutcome> {
        if self.ctx.profile_repo().is_banned(bidder).await? {
            return Err(DomainError::UserBanned.into());
        }
        // Admins may bid without going through verification.
        if !self.ctx.verified_repo().is_verified(bidder).await?
            && !self.ctx.admins().is_admin(bidder).await?
        {
            return Err(DomainError::NotVerified.into());
        }
        if !self.ctx.settings_repo().bidding_open().await? {
            return Err(DomainError::BiddingClosed.into());
        }

        let amount = parse_amount(raw_amount)
            .map_err(|_| DomainError::InvalidAmount(raw_amount.trim().to_string()))?;

        let outcome = self
            .ctx
            .auction_repo()
            .place_bid(auction_id, bidder, amount)
            .await?;
        self.ctx.verified_repo().record_bid(bidder).await?;

        info!(
            auction_id,
            bidder = %bidder,
            amount,
            "bid accepted"
        );

        if let Some(outbid) = outcome.outbid {
            self.notify(
                outbid,
                &format!(
                    "⚠️ You were outbid on \"{}\". The bid to beat is now {}.",
                    outcome.auction.title,
                    format_amount(amount),
                ),
            )
            .await;
        }
        self.audit(&format!(
            "💰 User {bidder} bid {} on \"{}\" (#{}).",
            format_amount(amount),
            outcome.auction.title,
            outcome.auction.id,
        ))
        .await;
        self.refresh_channel_card(&outcome.auction).await;

        Ok(outcome)
    }

    /// Auctions currently accepting bids, oldest first
    pub async fn active_auctions(&self) -> ServiceResult<Vec<Auction>> {
        Ok(self.ctx.auction_repo().list_active().await?)
    }

    /// Look up one auction
    pub async fn auction(&self, id: i64) -> ServiceResult<Auction> {
        self.ctx
            .auction_repo()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::AuctionNotFound(id).into())
    }

    /// Full bid history for an auction, newest first
    pub async fn bid_history(&self, auction_id: i64) -> ServiceResult<Vec<Bid>> {
        Ok(self.ctx.bid_repo().list_for_auction(auction_id).await?)
    }

    /// Close an auction and settle the winner, if any.
    ///
    /// The winner is credited on the leaderboard and told in private; the
    /// channel card is rewritten as a result card with no bid button.
    #[instrument(skip(self))]
    pub async fn close_auction(&self, admin: UserId, auction_id: i64) -> ServiceResult<Auction> {
        self.ctx.admins().require_admin(admin).await?;

        let auction = self.ctx.auction_repo().close(auction_id).await?;

        if let (Some(winner), Some(amount)) = (auction.current_bidder, auction.current_bid) {
            self.ctx
                .leaderboard_repo()
                .record_win(winner, amount)
                .await?;
            self.ctx.verified_repo().record_win(winner).await?;
            self.notify(
                winner,
                &format!(
                    "🎉 You won \"{}\" for {}! The seller will contact you to trade.",
                    auction.title,
                    format_amount(amount),
                ),
            )
            .await;
            self.notify(
                auction.seller,
                &format!(
                    "🏁 Your auction \"{}\" sold for {} to user {winner}.",
                    auction.title,
                    format_amount(amount),
                ),
            )
            .await;
            info!(auction_id, winner = %winner, amount, "auction closed with winner");
        } else {
            self.notify(
                auction.seller,
                &format!("🏁 Your auction \"{}\" ended without bids.", auction.title),
            )
            .await;
            info!(auction_id, "auction closed without bids");
        }

        self.refresh_channel_card(&auction).await;
        Ok(auction)
    }

    /// Pull an auction from the channel without declaring a winner
    #[instrument(skip(self))]
    pub async fn remove_auction(&self, admin: UserId, auction_id: i64) -> ServiceResult<Auction> {
        self.ctx.admins().require_admin(admin).await?;

        let auction = self.ctx.auction_repo().remove(auction_id).await?;
        info!(auction_id, "auction removed");

        self.notify(
            auction.seller,
            &format!(
                "❌ Your auction \"{}\" was removed by an admin.",
                auction.title
            ),
        )
        .await;
        self.refresh_channel_card(&auction).await;
        Ok(auction)
    }

    /// Strike the most recent bid and restore the previous leader
    #[instrument(skip(self))]
    pub async fn retract_last_bid(
        &self,
        admin: UserId,
        auction_id: i64,
    ) -> ServiceResult<RetractOutcome> {
        self.ctx.admins().require_admin(admin).await?;

        let outcome = self.ctx.auction_repo().retract_last_bid(auction_id).await?;
        info!(
            auction_id,
            struck_bidder = %outcome.removed.bidder,
            "last bid retracted"
        );

        self.notify(
            outcome.removed.bidder,
            &format!(
                "↩️ Your bid of {} on \"{}\" was retracted by an admin.",
                format_amount(outcome.removed.amount),
                outcome.auction.title,
            ),
        )
        .await;
        if let Some(restored) = &outcome.restored {
            self.notify(
                restored.bidder,
                &format!(
                    "🔄 You are back in the lead on \"{}\" at {}.",
                    outcome.auction.title,
                    format_amount(restored.amount),
                ),
            )
            .await;
        }
        self.refresh_channel_card(&outcome.auction).await;

        Ok(outcome)
    }

    /// Whether bidding is globally open
    pub async fn bidding_open(&self) -> ServiceResult<bool> {
        Ok(self.ctx.settings_repo().bidding_open().await?)
    }

    /// Open or pause bidding everywhere
    #[instrument(skip(self))]
    pub async fn set_bidding_open(&self, admin: UserId, open: bool) -> ServiceResult<()> {
        self.ctx.admins().require_admin(admin).await?;
        self.ctx.settings_repo().set_bidding_open(open).await?;
        info!(open, "bidding switch flipped");
        Ok(())
    }

    /// Rewrite the public channel card to match the auction's current state.
    ///
    /// Failures are logged, not propagated; the bid itself already stands.
    async fn refresh_channel_card(&self, auction: &Auction) {
        let Some(message) = auction.channel_message else {
            return;
        };

        let keyboard = auction
            .is_active()
            .then(|| render::bid_keyboard(auction.id, self.ctx.bot_username()));
        if let Err(err) = self
            .ctx
            .chat()
            .edit_message(message, &render::auction_card(auction), keyboard.as_ref())
            .await
        {
            warn!(
                auction_id = auction.id,
                error = %err,
                "failed to refresh channel card"
            );
        }
    }

    /// Best-effort notice to the audit channel, when one is configured
    async fn audit(&self, text: &str) {
        let Some(channel) = self.ctx.audit_channel() else {
            return;
        };
        if let Err(err) = self.ctx.chat().send_message(channel, text, None).await {
            warn!(error = %err, "failed to post audit notice");
        }
    }

    /// Best-effort private message; a blocked bot never fails the operation
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
