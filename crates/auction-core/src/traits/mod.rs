//! Repository traits implemented by the storage layer

mod repositories;

pub use repositories::{
    AdminMessageRepository, AdminRepository, AuctionRepository, BidOutcome, BidRepository,
    DraftRepository, LeaderboardRepository, ProfileEvent, ProfileRepository, RejectionRepository,
    RepoResult, RetractOutcome, SettingsRepository, SubmissionRepository, VerifiedUserRepository,
};
