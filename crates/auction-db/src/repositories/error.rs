//! Error handling utilities for repositories

use auction_core::error::DomainError;
use auction_core::value_objects::UserId;
use sqlx::Error as SqlxError;

/// Convert a SQLx error to DomainError
pub fn map_db_error(e: SqlxError) -> DomainError {
    DomainError::DatabaseError(e.to_string())
}

/// Create an "auction not found" error
pub fn auction_not_found(id: i64) -> DomainError {
    DomainError::AuctionNotFound(id)
}

/// Create a "submission not found" error
pub fn submission_not_found(id: i64) -> DomainError {
    DomainError::SubmissionNotFound(id)
}

/// Create a "user not found" error
pub fn user_not_found(id: UserId) -> DomainError {
    DomainError::UserNotFound(id)
}
