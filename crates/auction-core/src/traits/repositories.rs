//! Repository trait definitions
//!
//! The domain layer depends only on these traits; the sqlite implementations
//! live in the storage crate. Anything that must be atomic under concurrent
//! bidders (placing a bid, retracting one) is a single repository operation so
//! the implementation can wrap it in one transaction.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::entities::{
    ActiveRejection, AdminMessage, Auction, Bid, LeaderboardEntry, ReviewKind, Submission,
    SubmissionStatus, UserProfile, VerifiedUser,
};
use crate::error::DomainError;
use crate::value_objects::{Category, MessageRef, UserId};
use crate::workflow::Draft;

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

/// Result of an accepted bid
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BidOutcome {
    /// The auction after the bid was applied
    pub auction: Auction,
    /// The bidder who just lost the lead, if any
    pub outbid: Option<UserId>,
}

/// Result of retracting the most recent bid
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetractOutcome {
    /// The auction after the retraction
    pub auction: Auction,
    /// The bid that was struck
    pub removed: Bid,
    /// The bid restored as the new leader, if one remains
    pub restored: Option<Bid>,
}

/// A counted event on a seller profile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileEvent {
    /// A new submission entered review
    Submitted,
    /// A pending submission was approved
    Approved,
    /// A pending submission was rejected
    Rejected,
    /// A previously approved submission was revoked
    Revoked,
    /// The user was banned from submitting
    Banned,
    /// The ban was lifted
    Unbanned,
}

/// Auction persistence and atomic bid mutations
#[async_trait]
pub trait AuctionRepository: Send + Sync {
    /// Persist a new auction, returning it with its assigned id
    async fn create(&self, auction: &Auction) -> RepoResult<Auction>;

    /// Find an auction by id
    async fn find_by_id(&self, id: i64) -> RepoResult<Option<Auction>>;

    /// List auctions currently accepting bids, oldest first
    async fn list_active(&self) -> RepoResult<Vec<Auction>>;

    /// Remember where the auction was announced in the public channel
    async fn set_channel_message(&self, id: i64, message: MessageRef) -> RepoResult<()>;

    /// Atomically validate and apply a bid.
    ///
    /// Fails with [`DomainError::BidTooLow`] when the amount is below the
    /// minimum acceptable bid at commit time, and with
    /// [`DomainError::AuctionNotActive`] when the auction no longer accepts
    /// bids.
    async fn place_bid(&self, id: i64, bidder: UserId, amount: i64) -> RepoResult<BidOutcome>;

    /// Atomically strike the most recent active bid and restore the previous
    /// leader, if any
    async fn retract_last_bid(&self, id: i64) -> RepoResult<RetractOutcome>;

    /// End an active auction, returning its final state
    async fn close(&self, id: i64) -> RepoResult<Auction>;

    /// Pull an active auction without declaring a winner
    async fn remove(&self, id: i64) -> RepoResult<Auction>;
}

/// Read access to the bid history
#[async_trait]
pub trait BidRepository: Send + Sync {
    /// All bids on an auction, newest first, including struck ones
    async fn list_for_auction(&self, auction_id: i64) -> RepoResult<Vec<Bid>>;

    /// Number of still-active bids on an auction
    async fn count_active(&self, auction_id: i64) -> RepoResult<i64>;
}

/// Submission persistence
#[async_trait]
pub trait SubmissionRepository: Send + Sync {
    /// Persist a new submission, returning it with its assigned id
    async fn create(&self, submission: &Submission) -> RepoResult<Submission>;

    /// Find a submission by id
    async fn find_by_id(&self, id: i64) -> RepoResult<Option<Submission>>;

    /// Submissions still awaiting review, oldest first
    async fn list_pending(&self) -> RepoResult<Vec<Submission>>;

    /// All submissions by one user, newest first
    async fn list_by_user(&self, user: UserId) -> RepoResult<Vec<Submission>>;

    /// Move a submission to a new status.
    ///
    /// Fails with [`DomainError::SubmissionNotPending`] when the submission
    /// was already decided, so two admins cannot both approve it.
    async fn set_status(&self, id: i64, status: SubmissionStatus) -> RepoResult<Submission>;

    /// Remember where the approved item was announced
    async fn set_channel_message(&self, id: i64, message: MessageRef) -> RepoResult<()>;
}

/// Draft persistence, one draft per user
#[async_trait]
pub trait DraftRepository: Send + Sync {
    /// Insert or replace the user's draft
    async fn upsert(&self, draft: &Draft) -> RepoResult<()>;

    /// The user's in-progress draft, if any
    async fn find_by_user(&self, user: UserId) -> RepoResult<Option<Draft>>;

    /// Discard the user's draft; returns false when none existed
    async fn delete(&self, user: UserId) -> RepoResult<bool>;
}

/// The verified-bidder roster
#[async_trait]
pub trait VerifiedUserRepository: Send + Sync {
    /// Add a user to the roster
    async fn insert(&self, user: &VerifiedUser) -> RepoResult<()>;

    /// Look up a roster entry
    async fn find(&self, user: UserId) -> RepoResult<Option<VerifiedUser>>;

    /// Membership check
    async fn is_verified(&self, user: UserId) -> RepoResult<bool>;

    /// Strip verification; returns false when the user was not on the roster
    async fn remove(&self, user: UserId) -> RepoResult<bool>;

    /// Bump the user's bid counter; a no-op for users not on the roster
    async fn record_bid(&self, user: UserId) -> RepoResult<()>;

    /// Bump the user's auctions-won counter; a no-op for users not on the roster
    async fn record_win(&self, user: UserId) -> RepoResult<()>;
}

/// Seller profile counters and ban state
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Fetch the profile, creating a blank one on first contact
    async fn ensure(&self, user: UserId) -> RepoResult<UserProfile>;

    /// Look up an existing profile
    async fn find(&self, user: UserId) -> RepoResult<Option<UserProfile>>;

    /// Apply one counted event and return the updated profile
    async fn record_event(&self, user: UserId, event: ProfileEvent) -> RepoResult<UserProfile>;

    /// Whether the user is banned from submitting
    async fn is_banned(&self, user: UserId) -> RepoResult<bool>;
}

/// Aggregate winner statistics
#[async_trait]
pub trait LeaderboardRepository: Send + Sync {
    /// Credit a won auction at the given final amount
    async fn record_win(&self, user: UserId, amount: i64) -> RepoResult<()>;

    /// Top winners ordered by wins, then total spent
    async fn top(&self, limit: i64) -> RepoResult<Vec<LeaderboardEntry>>;
}

/// Open rejection sessions awaiting a reason
#[async_trait]
pub trait RejectionRepository: Send + Sync {
    /// Open a session, replacing any prior session for the same submission
    async fn open(&self, rejection: &ActiveRejection) -> RepoResult<()>;

    /// The session this admin most recently opened, if any
    async fn find_by_admin(&self, admin: UserId) -> RepoResult<Option<ActiveRejection>>;

    /// Close the session for a submission; returns false when none was open
    async fn close(&self, submission_id: i64) -> RepoResult<bool>;

    /// Drop sessions opened before the cutoff, returning how many went
    async fn purge_older_than(&self, cutoff: DateTime<Utc>) -> RepoResult<u64>;
}

/// Bookkeeping for review messages fanned out to every admin
#[async_trait]
pub trait AdminMessageRepository: Send + Sync {
    /// Record one delivered admin copy
    async fn record(&self, message: &AdminMessage) -> RepoResult<()>;

    /// Every admin copy for one review subject
    async fn list_for(&self, kind: ReviewKind, subject_id: i64) -> RepoResult<Vec<AdminMessage>>;

    /// Forget the copies once the review is settled, returning how many went
    async fn delete_for(&self, kind: ReviewKind, subject_id: i64) -> RepoResult<u64>;
}

/// The persistent admin roster
#[async_trait]
pub trait AdminRepository: Send + Sync {
    /// Grant admin rights; returns false when already an admin
    async fn add(&self, user: UserId) -> RepoResult<bool>;

    /// Revoke admin rights; returns false when not an admin
    async fn remove(&self, user: UserId) -> RepoResult<bool>;

    /// Everyone currently holding admin rights
    async fn list(&self) -> RepoResult<Vec<UserId>>;
}

/// Marketplace-wide switches
#[async_trait]
pub trait SettingsRepository: Send + Sync {
    /// Whether bidding is globally open
    async fn bidding_open(&self) -> RepoResult<bool>;

    /// Open or pause bidding everywhere
    async fn set_bidding_open(&self, open: bool) -> RepoResult<()>;

    /// Whether submissions in this category are accepted
    async fn category_enabled(&self, category: Category) -> RepoResult<bool>;

    /// Flip a category switch, returning the new state
    async fn toggle_category(&self, category: Category) -> RepoResult<bool>;
}
