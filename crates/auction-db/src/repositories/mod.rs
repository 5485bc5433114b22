//! Repository implementations
//!
//! SQLite implementations of the repository traits defined in auction-core.
//! Each repository handles database operations for a specific domain entity.

mod admin;
mod admin_message;
mod auction;
mod bid;
mod draft;
mod error;
mod leaderboard;
mod profile;
mod rejection;
mod settings;
mod submission;
mod verified;

pub use admin::SqliteAdminRepository;
pub use admin_message::SqliteAdminMessageRepository;
pub use auction::SqliteAuctionRepository;
pub use bid::SqliteBidRepository;
pub use draft::SqliteDraftRepository;
pub use leaderboard::SqliteLeaderboardRepository;
pub use profile::SqliteProfileRepository;
pub use rejection::SqliteRejectionRepository;
pub use settings::SqliteSettingsRepository;
pub use submission::SqliteSubmissionRepository;
pub use verified::SqliteVerifiedUserRepository;
