//! # auction-db
//!
//! Storage layer implementing the repository traits with SQLite via SQLx.
//!
//! ## Overview
//!
//! This crate provides SQLite implementations for all repository traits
//! defined in `auction-core`. It handles:
//!
//! - Pool management over the five database files
//! - Schema bootstrap on startup
//! - Database models with SQLx `FromRow` derives
//! - Repository implementations, including the transactional bid path
//!
//! ## Usage
//!
//! ```rust,ignore
//! use auction_db::pool::{Stores, StoreConfig};
//! use auction_db::SqliteAuctionRepository;
//! use auction_core::traits::AuctionRepository;
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let stores = Stores::open(&StoreConfig::new("./data")).await?;
//!     let auctions = SqliteAuctionRepository::new(stores.auctions.clone());
//!
//!     // Use the repository...
//!     Ok(())
//! }
//! ```

pub mod models;
pub mod pool;
pub mod repositories;
pub mod retry;

// Re-export commonly used types
pub use pool::{SqlitePool, StoreConfig, StoreError, Stores};
pub use repositories::{
    SqliteAdminMessageRepository, SqliteAdminRepository, SqliteAuctionRepository,
    SqliteBidRepository, SqliteDraftRepository, SqliteLeaderboardRepository,
    SqliteProfileRepository, SqliteRejectionRepository, SqliteSettingsRepository,
    SqliteSubmissionRepository, SqliteVerifiedUserRepository,
};
