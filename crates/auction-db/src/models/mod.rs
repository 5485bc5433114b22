//! Database models - SQLx-compatible structs for the SQLite tables

mod auction;
mod bid;
mod moderation;
mod submission;
mod user;

pub use auction::AuctionModel;
pub use bid::BidModel;
pub use moderation::{ActiveRejectionModel, AdminMessageModel};
pub use submission::{DraftModel, SubmissionModel};
pub use user::{LeaderboardModel, ProfileModel, VerifiedUserModel};
