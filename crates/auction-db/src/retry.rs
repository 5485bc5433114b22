//! Retry handling for SQLite lock contention
//!
//! Concurrent bidders hit SQLITE_BUSY when two writers collide. Only lock
//! contention is retried; domain failures raised inside a transaction (bid too
//! low, auction closed) come back immediately.

use std::future::Future;
use std::time::Duration;

use auction_core::error::DomainError;

/// Why a transactional operation failed
#[derive(Debug)]
pub enum TxFailure {
    /// A database-level failure, possibly retryable lock contention
    Db(sqlx::Error),
    /// A domain rule fired; never retried
    Domain(DomainError),
}

impl From<sqlx::Error> for TxFailure {
    fn from(err: sqlx::Error) -> Self {
        Self::Db(err)
    }
}

impl From<DomainError> for TxFailure {
    fn from(err: DomainError) -> Self {
        Self::Domain(err)
    }
}

const MAX_ATTEMPTS: u32 = 3;
const BACKOFF_STEP: Duration = Duration::from_millis(50);

/// Check whether the error is SQLITE_BUSY or SQLITE_LOCKED
pub fn is_busy(err: &sqlx::Error) -> bool {
    if let Some(db_err) = err.as_database_error() {
        if let Some(code) = db_err.code() {
            // 5 = SQLITE_BUSY, 6 = SQLITE_LOCKED
            return code == "5" || code == "6";
        }
        return db_err.message().contains("database is locked");
    }
    false
}

/// Run a transactional operation, retrying on lock contention.
///
/// The operation is attempted up to three times with linear backoff. Domain
/// failures and non-contention database errors are returned on the first hit.
pub async fn retry_busy<T, F, Fut>(op_name: &'static str, op: F) -> Result<T, DomainError>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T, TxFailure>>,
{
    let mut attempt = 1;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(TxFailure::Domain(err)) => return Err(err),
            Err(TxFailure::Db(err)) if is_busy(&err) && attempt < MAX_ATTEMPTS => {
                tracing::warn!(op = op_name, attempt, "database locked, retrying");
                tokio::time::sleep(BACKOFF_STEP * attempt).await;
                attempt += 1;
            }
            Err(TxFailure::Db(err)) => {
                return Err(DomainError::DatabaseError(err.to_string()));
            }
        }
    }
}
