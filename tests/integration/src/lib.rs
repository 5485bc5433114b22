//! Integration test utilities for the auction marketplace
//!
//! Provides a full-stack harness over temporary SQLite stores with a
//! recording chat port, plus helpers for the keep-alive HTTP server.

pub mod fixtures;
pub mod helpers;

pub use fixtures::*;
pub use helpers::*;
