//! Database connection pool management

mod sqlite;

pub use sqlite::{StoreConfig, StoreError, Stores};

// Re-export SqlitePool for convenience
pub use sqlx::sqlite::SqlitePool;
