//! Marketplace services

mod admin;
mod bidding;
mod context;
mod error;
mod leaderboard;
mod moderation;
mod profile;
mod submission;
mod verification;

pub use admin::AdminRegistry;
pub use bidding::BiddingService;
pub use context::{ServiceContext, ServiceContextBuilder};
pub use error::{ServiceError, ServiceResult};
pub use leaderboard::LeaderboardService;
pub use moderation::ModerationService;
pub use profile::ProfileService;
pub use submission::{SubmissionService, SubmissionStep};
pub use verification::VerificationService;
