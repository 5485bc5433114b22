//! # auction-core
//!
//! Domain layer containing entities, value objects, the submission draft
//! workflow, and repository traits. This crate has zero dependencies on
//! infrastructure (database, web framework, chat transport, etc.).

pub mod entities;
pub mod error;
pub mod traits;
pub mod value_objects;
pub mod workflow;

// Re-export commonly used types at crate root
pub use entities::{
    ActiveRejection, AdminMessage, Auction, AuctionStatus, Bid, ItemDetails, LeaderboardEntry,
    ReviewKind, Submission, SubmissionForm, SubmissionStatus, UserProfile, VerifiedUser,
};
pub use error::DomainError;
pub use traits::{
    AdminMessageRepository, AdminRepository, AuctionRepository, BidOutcome, BidRepository,
    DraftRepository, LeaderboardRepository, ProfileEvent, ProfileRepository, RejectionRepository,
    RepoResult, RetractOutcome, SettingsRepository, SubmissionRepository, VerifiedUserRepository,
};
pub use value_objects::{
    format_amount, min_increment, parse_amount, AmountParseError, Category, CategoryParseError,
    ChatId, MessageRef, UserId,
};
pub use workflow::{Draft, DraftEvent, DraftState, StepPrompt};
