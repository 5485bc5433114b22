//! Auction database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

use auction_core::entities::{Auction, AuctionStatus};
use auction_core::value_objects::{ChatId, MessageRef, UserId};

/// Database model for the auctions table
#[derive(Debug, Clone, FromRow)]
pub struct AuctionModel {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub photo: Option<String>,
    pub base_price: i64,
    pub current_bid: Option<i64>,
    pub current_bidder: Option<i64>,
    pub previous_bidder: Option<i64>,
    pub status: String,
    pub seller: i64,
    pub channel_chat_id: Option<i64>,
    pub channel_message_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<AuctionModel> for Auction {
    fn from(model: AuctionModel) -> Self {
        let channel_message = match (model.channel_chat_id, model.channel_message_id) {
            (Some(chat), Some(message)) => Some(MessageRef::new(ChatId::new(chat), message)),
            _ => None,
        };
        Auction {
            id: model.id,
            title: model.title,
            description: model.description,
            photo: model.photo,
            base_price: model.base_price,
            current_bid: model.current_bid,
            current_bidder: model.current_bidder.map(UserId::new),
            previous_bidder: model.previous_bidder.map(UserId::new),
            // Unknown status text means a corrupted row; surface as removed
            status: model.status.parse().unwrap_or(AuctionStatus::Removed),
            seller: UserId::new(model.seller),
            channel_message,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
