//! Domain entities

mod auction;
mod bid;
mod fanout;
mod leaderboard;
mod profile;
mod rejection;
mod submission;
mod verified;

pub use auction::{Auction, AuctionStatus};
pub use bid::Bid;
pub use fanout::{AdminMessage, ReviewKind};
pub use leaderboard::LeaderboardEntry;
pub use profile::UserProfile;
pub use rejection::ActiveRejection;
pub use submission::{ItemDetails, Submission, SubmissionForm, SubmissionStatus};
pub use verified::VerifiedUser;
