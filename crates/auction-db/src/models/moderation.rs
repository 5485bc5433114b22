//! Moderation database models: rejection sessions and admin fan-out copies

use chrono::{DateTime, Utc};
use sqlx::FromRow;

use auction_core::entities::{ActiveRejection, AdminMessage, ReviewKind};
use auction_core::value_objects::{ChatId, MessageRef, UserId};

/// Database model for the active_rejections table
#[derive(Debug, Clone, FromRow)]
pub struct ActiveRejectionModel {
    pub submission_id: i64,
    pub admin_id: i64,
    pub origin_chat_id: i64,
    pub origin_message_id: i64,
    pub created_at: DateTime<Utc>,
}

impl From<ActiveRejectionModel> for ActiveRejection {
    fn from(model: ActiveRejectionModel) -> Self {
        ActiveRejection {
            submission_id: model.submission_id,
            admin: UserId::new(model.admin_id),
            origin: MessageRef::new(ChatId::new(model.origin_chat_id), model.origin_message_id),
            created_at: model.created_at,
        }
    }
}

/// Database model for the admin_messages table
#[derive(Debug, Clone, FromRow)]
pub struct AdminMessageModel {
    pub kind: String,
    pub subject_id: i64,
    pub admin_chat_id: i64,
    pub message_id: i64,
    pub created_at: DateTime<Utc>,
}

impl From<AdminMessageModel> for AdminMessage {
    fn from(model: AdminMessageModel) -> Self {
        AdminMessage {
            // Unknown kind text means a corrupted row; treat as submission
            kind: model.kind.parse().unwrap_or(ReviewKind::Submission),
            subject_id: model.subject_id,
            admin_chat: ChatId::new(model.admin_chat_id),
            message_id: model.message_id,
            created_at: model.created_at,
        }
    }
}
