//! Domain errors - error types for the domain layer

use thiserror::Error;

use crate::value_objects::UserId;

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("Auction not found: {0}")]
    AuctionNotFound(i64),

    #[error("Submission not found: {0}")]
    SubmissionNotFound(i64),

    #[error("No submission in progress")]
    DraftNotFound,

    #[error("No pending rejection for admin {0}")]
    RejectionNotFound(UserId),

    #[error("User not found: {0}")]
    UserNotFound(UserId),

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Not a valid amount: {0}")]
    InvalidAmount(String),

    #[error("Bid too low: minimum acceptable bid is {minimum}")]
    BidTooLow { minimum: i64 },

    #[error("Unexpected input: expected {expected}")]
    UnexpectedInput { expected: &'static str },

    // =========================================================================
    // Authorization Errors
    // =========================================================================
    #[error("User is not verified")]
    NotVerified,

    #[error("User is banned")]
    UserBanned,

    #[error("Admin privileges required")]
    NotAdmin,

    // =========================================================================
    // Business Rule Violations
    // =========================================================================
    #[error("Bidding is currently closed")]
    BiddingClosed,

    #[error("Auction {0} is not accepting bids")]
    AuctionNotActive(i64),

    #[error("Auction {0} has no active bids")]
    NoActiveBids(i64),

    #[error("Category is disabled: {0}")]
    CategoryDisabled(String),

    #[error("Submission {0} is not pending review")]
    SubmissionNotPending(i64),

    // =========================================================================
    // Conflict Errors
    // =========================================================================
    #[error("User is already verified")]
    AlreadyVerified,

    #[error("A submission is already in progress")]
    DraftInProgress,

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Chat delivery error: {0}")]
    DeliveryError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Get an error code string for logs and API responses
    pub fn code(&self) -> &'static str {
        match self {
            Self::AuctionNotFound(_) => "UNKNOWN_AUCTION",
            Self::SubmissionNotFound(_) => "UNKNOWN_SUBMISSION",
            Self::DraftNotFound => "NO_DRAFT",
            Self::RejectionNotFound(_) => "NO_PENDING_REJECTION",
            Self::UserNotFound(_) => "UNKNOWN_USER",

            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::InvalidAmount(_) => "INVALID_AMOUNT",
            Self::BidTooLow { .. } => "BID_TOO_LOW",
            Self::UnexpectedInput { .. } => "UNEXPECTED_INPUT",

            Self::NotVerified => "NOT_VERIFIED",
            Self::UserBanned => "USER_BANNED",
            Self::NotAdmin => "NOT_ADMIN",

            Self::BiddingClosed => "BIDDING_CLOSED",
            Self::AuctionNotActive(_) => "AUCTION_NOT_ACTIVE",
            Self::NoActiveBids(_) => "NO_ACTIVE_BIDS",
            Self::CategoryDisabled(_) => "CATEGORY_DISABLED",
            Self::SubmissionNotPending(_) => "SUBMISSION_NOT_PENDING",

            Self::AlreadyVerified => "ALREADY_VERIFIED",
            Self::DraftInProgress => "DRAFT_IN_PROGRESS",

            Self::DatabaseError(_) => "DATABASE_ERROR",
            Self::DeliveryError(_) => "DELIVERY_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::AuctionNotFound(_)
                | Self::SubmissionNotFound(_)
                | Self::DraftNotFound
                | Self::RejectionNotFound(_)
                | Self::UserNotFound(_)
        )
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::ValidationError(_)
                | Self::InvalidAmount(_)
                | Self::BidTooLow { .. }
                | Self::UnexpectedInput { .. }
        )
    }

    /// Check if this is an authorization error
    pub fn is_authorization(&self) -> bool {
        matches!(self, Self::NotVerified | Self::UserBanned | Self::NotAdmin)
    }

    /// Check if this is a conflict error
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::AlreadyVerified | Self::DraftInProgress)
    }

    /// Errors a user caused and can fix; everything else is operational
    pub fn is_user_facing(&self) -> bool {
        self.is_not_found() || self.is_validation() || self.is_authorization() || self.is_conflict()
            || matches!(
                self,
                Self::BiddingClosed
                    | Self::AuctionNotActive(_)
                    | Self::NoActiveBids(_)
                    | Self::CategoryDisabled(_)
                    | Self::SubmissionNotPending(_)
            )
    }
}
