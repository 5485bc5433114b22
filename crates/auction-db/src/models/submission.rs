//! Submission and draft database models

use chrono::{DateTime, Utc};
use sqlx::FromRow;

use auction_core::entities::{Submission, SubmissionStatus};
use auction_core::error::DomainError;
use auction_core::value_objects::{ChatId, MessageRef, UserId};
use auction_core::workflow::Draft;

/// Database model for the submissions table
#[derive(Debug, Clone, FromRow)]
pub struct SubmissionModel {
    pub id: i64,
    pub user_id: i64,
    /// JSON-encoded form payload
    pub form: String,
    pub status: String,
    pub channel_chat_id: Option<i64>,
    pub channel_message_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<SubmissionModel> for Submission {
    type Error = DomainError;

    fn try_from(model: SubmissionModel) -> Result<Self, Self::Error> {
        let form = serde_json::from_str(&model.form).map_err(|err| {
            DomainError::DatabaseError(format!("corrupt form payload for submission {}: {err}", model.id))
        })?;
        let channel_message = match (model.channel_chat_id, model.channel_message_id) {
            (Some(chat), Some(message)) => Some(MessageRef::new(ChatId::new(chat), message)),
            _ => None,
        };
        Ok(Submission {
            id: model.id,
            user: UserId::new(model.user_id),
            form,
            status: model
                .status
                .parse()
                .unwrap_or(SubmissionStatus::Failed),
            channel_message,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

/// Database model for the drafts table
#[derive(Debug, Clone, FromRow)]
pub struct DraftModel {
    pub user_id: i64,
    /// JSON-encoded draft state
    pub draft: String,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<DraftModel> for Draft {
    type Error = DomainError;

    fn try_from(model: DraftModel) -> Result<Self, Self::Error> {
        serde_json::from_str(&model.draft).map_err(|err| {
            DomainError::DatabaseError(format!("corrupt draft for user {}: {err}", model.user_id))
        })
    }
}
