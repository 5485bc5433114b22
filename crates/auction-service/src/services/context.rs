//! Service context - dependency container for services
//!
//! Holds the repositories, the outbound chat port, and the marketplace-wide
//! configuration the services need.

use std::sync::Arc;

use auction_core::traits::{
    AdminMessageRepository, AuctionRepository, BidRepository, DraftRepository,
    LeaderboardRepository, ProfileRepository, RejectionRepository, SettingsRepository,
    SubmissionRepository, VerifiedUserRepository,
};
use auction_core::value_objects::ChatId;

use crate::port::ChatPort;

use super::admin::AdminRegistry;
use super::error::{ServiceError, ServiceResult};

/// Service context containing all dependencies
///
/// This is the main dependency container that gets passed to all services.
/// It provides access to:
/// - The storage repositories
/// - The outbound chat port
/// - The admin registry
/// - The public auction channel and bot identity
#[derive(Clone)]
pub struct ServiceContext {
    // Repositories
    auction_repo: Arc<dyn AuctionRepository>,
    bid_repo: Arc<dyn BidRepository>,
    submission_repo: Arc<dyn SubmissionRepository>,
    draft_repo: Arc<dyn DraftRepository>,
    verified_repo: Arc<dyn VerifiedUserRepository>,
    profile_repo: Arc<dyn ProfileRepository>,
    leaderboard_repo: Arc<dyn LeaderboardRepository>,
    rejection_repo: Arc<dyn RejectionRepository>,
    admin_message_repo: Arc<dyn AdminMessageRepository>,
    settings_repo: Arc<dyn SettingsRepository>,

    // Outbound messaging
    chat: Arc<dyn ChatPort>,

    // Admin roster with its reload-on-demand cache
    admins: Arc<AdminRegistry>,

    // Marketplace identity
    auction_channel: ChatId,
    audit_channel: Option<ChatId>,
    bot_username: String,
}

impl ServiceContext {
    /// Start building a context
    pub fn builder() -> ServiceContextBuilder {
        ServiceContextBuilder::new()
    }

    // === Repositories ===

    /// Get the auction repository
    pub fn auction_repo(&self) -> &dyn AuctionRepository {
        self.auction_repo.as_ref()
    }

    /// Get the bid repository
    pub fn bid_repo(&self) -> &dyn BidRepository {
        self.bid_repo.as_ref()
    }

    /// Get the submission repository
    pub fn submission_repo(&self) -> &dyn SubmissionRepository {
        self.submission_repo.as_ref()
    }

    /// Get the draft repository
    pub fn draft_repo(&self) -> &dyn DraftRepository {
        self.draft_repo.as_ref()
    }

    /// Get the verified-user repository
    pub fn verified_repo(&self) -> &dyn VerifiedUserRepository {
        self.verified_repo.as_ref()
    }

    /// Get the profile repository
    pub fn profile_repo(&self) -> &dyn ProfileRepository {
        self.profile_repo.as_ref()
    }

    /// Get the leaderboard repository
    pub fn leaderboard_repo(&self) -> &dyn LeaderboardRepository {
        self.leaderboard_repo.as_ref()
    }

    /// Get the rejection-session repository
    pub fn rejection_repo(&self) -> &dyn RejectionRepository {
        self.rejection_repo.as_ref()
    }

    /// Get the admin fan-out message repository
    pub fn admin_message_repo(&self) -> &dyn AdminMessageRepository {
        self.admin_message_repo.as_ref()
    }

    /// Get the settings repository
    pub fn settings_repo(&self) -> &dyn SettingsRepository {
        self.settings_repo.as_ref()
    }

    // === Messaging and identity ===

    /// Get the outbound chat port
    pub fn chat(&self) -> &dyn ChatPort {
        self.chat.as_ref()
    }

    /// Get the admin registry
    pub fn admins(&self) -> &AdminRegistry {
        self.admins.as_ref()
    }

    /// The public channel auctions are announced in
    pub fn auction_channel(&self) -> ChatId {
        self.auction_channel
    }

    /// Optional channel receiving admin audit notices
    pub fn audit_channel(&self) -> Option<ChatId> {
        self.audit_channel
    }

    /// The bot's username, used for deep links
    pub fn bot_username(&self) -> &str {
        &self.bot_username
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("auction_channel", &self.auction_channel)
            .field("bot_username", &self.bot_username)
            .field("repositories", &"...")
            .finish()
    }
}

/// Builder for creating ServiceContext
#[derive(Default)]
pub struct ServiceContextBuilder {
    auction_repo: Option<Arc<dyn AuctionRepository>>,
    bid_repo: Option<Arc<dyn BidRepository>>,
    submission_repo: Option<Arc<dyn SubmissionRepository>>,
    draft_repo: Option<Arc<dyn DraftRepository>>,
    verified_repo: Option<Arc<dyn VerifiedUserRepository>>,
    profile_repo: Option<Arc<dyn ProfileRepository>>,
    leaderboard_repo: Option<Arc<dyn LeaderboardRepository>>,
    rejection_repo: Option<Arc<dyn RejectionRepository>>,
    admin_message_repo: Option<Arc<dyn AdminMessageRepository>>,
    settings_repo: Option<Arc<dyn SettingsRepository>>,
    chat: Option<Arc<dyn ChatPort>>,
    admins: Option<Arc<AdminRegistry>>,
    auction_channel: Option<ChatId>,
    audit_channel: Option<ChatId>,
    bot_username: Option<String>,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn auction_repo(mut self, repo: Arc<dyn AuctionRepository>) -> Self {
        self.auction_repo = Some(repo);
        self
    }

    pub fn bid_repo(mut self, repo: Arc<dyn BidRepository>) -> Self {
        self.bid_repo = Some(repo);
        self
    }

    pub fn submission_repo(mut self, repo: Arc<dyn SubmissionRepository>) -> Self {
        self.submission_repo = Some(repo);
        self
    }

    pub fn draft_repo(mut self, repo: Arc<dyn DraftRepository>) -> Self {
        self.draft_repo = Some(repo);
        self
    }

    pub fn verified_repo(mut self, repo: Arc<dyn VerifiedUserRepository>) -> Self {
        self.verified_repo = Some(repo);
        self
    }

    pub fn profile_repo(mut self, repo: Arc<dyn ProfileRepository>) -> Self {
        self.profile_repo = Some(repo);
        self
    }

    pub fn leaderboard_repo(mut self, repo: Arc<dyn LeaderboardRepository>) -> Self {
        self.leaderboard_repo = Some(repo);
        self
    }

    pub fn rejection_repo(mut self, repo: Arc<dyn RejectionRepository>) -> Self {
        self.rejection_repo = Some(repo);
        self
    }

    pub fn admin_message_repo(mut self, repo: Arc<dyn AdminMessageRepository>) -> Self {
        self.admin_message_repo = Some(repo);
        self
    }

    pub fn settings_repo(mut self, repo: Arc<dyn SettingsRepository>) -> Self {
        self.settings_repo = Some(repo);
        self
    }

    pub fn chat(mut self, chat: Arc<dyn ChatPort>) -> Self {
        self.chat = Some(chat);
        self
    }

    pub fn admins(mut self, admins: Arc<AdminRegistry>) -> Self {
        self.admins = Some(admins);
        self
    }

    pub fn auction_channel(mut self, channel: ChatId) -> Self {
        self.auction_channel = Some(channel);
        self
    }

    /// The audit channel is optional; without one audit notices are dropped
    pub fn audit_channel(mut self, channel: Option<ChatId>) -> Self {
        self.audit_channel = channel;
        self
    }

    pub fn bot_username(mut self, username: impl Into<String>) -> Self {
        self.bot_username = Some(username.into());
        self
    }

    /// Build the ServiceContext
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` if any required dependency is missing
    pub fn build(self) -> ServiceResult<ServiceContext> {
        fn require<T>(value: Option<T>, name: &str) -> ServiceResult<T> {
            value.ok_or_else(|| ServiceError::validation(format!("{name} is required")))
        }

        Ok(ServiceContext {
            auction_repo: require(self.auction_repo, "auction_repo")?,
            bid_repo: require(self.bid_repo, "bid_repo")?,
            submission_repo: require(self.submission_repo, "submission_repo")?,
            draft_repo: require(self.draft_repo, "draft_repo")?,
            verified_repo: require(self.verified_repo, "verified_repo")?,
            profile_repo: require(self.profile_repo, "profile_repo")?,
            leaderboard_repo: require(self.leaderboard_repo, "leaderboard_repo")?,
            rejection_repo: require(self.rejection_repo, "rejection_repo")?,
            admin_message_repo: require(self.admin_message_repo, "admin_message_repo")?,
            settings_repo: require(self.settings_repo, "settings_repo")?,
            chat: require(self.chat, "chat")?,
            admins: require(self.admins, "admins")?,
            auction_channel: require(self.auction_channel, "auction_channel")?,
            audit_channel: self.audit_channel,
            bot_username: require(self.bot_username, "bot_username")?,
        })
    }
}
