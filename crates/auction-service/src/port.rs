//! Outbound chat port
//!
//! Services talk to the chat platform only through this trait, so business
//! logic stays independent of any particular bot API client. The gateway
//! wires in a real transport; tests record deliveries in memory.

use async_trait::async_trait;
use std::sync::atomic::{AtomicI64, Ordering};

use auction_core::value_objects::{ChatId, MessageRef};

/// One inline keyboard button carrying a callback action string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    pub label: String,
    pub action: String,
}

impl Button {
    /// Create a button with a label and callback action
    pub fn new(label: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            action: action.into(),
        }
    }
}

/// An inline keyboard attached to a message
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Keyboard {
    pub rows: Vec<Vec<Button>>,
}

impl Keyboard {
    /// An empty keyboard
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a row of buttons
    pub fn row(mut self, buttons: Vec<Button>) -> Self {
        self.rows.push(buttons);
        self
    }

    /// A keyboard holding a single button
    pub fn single(button: Button) -> Self {
        Self {
            rows: vec![vec![button]],
        }
    }
}

/// Delivery failures reported by the chat platform
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("recipient {0} has blocked the bot")]
    Blocked(ChatId),

    #[error("chat {0} not found")]
    ChatNotFound(ChatId),

    #[error("flood limit hit, retry after {retry_after_secs}s")]
    FloodLimited { retry_after_secs: u64 },

    #[error("chat platform error: {0}")]
    Other(String),
}

/// Outbound messaging operations the services need
#[async_trait]
pub trait ChatPort: Send + Sync {
    /// Send a text message, optionally with an inline keyboard
    async fn send_message(
        &self,
        chat: ChatId,
        text: &str,
        keyboard: Option<&Keyboard>,
    ) -> Result<MessageRef, ChatError>;

    /// Send a photo with a caption, optionally with an inline keyboard
    async fn send_photo(
        &self,
        chat: ChatId,
        photo: &str,
        caption: &str,
        keyboard: Option<&Keyboard>,
    ) -> Result<MessageRef, ChatError>;

    /// Replace the text (or caption) and keyboard of a delivered message
    async fn edit_message(
        &self,
        message: MessageRef,
        text: &str,
        keyboard: Option<&Keyboard>,
    ) -> Result<(), ChatError>;
}

/// Send the same message to many recipients, skipping failures.
///
/// With a photo, each recipient gets it with the text as caption. Failures
/// are logged and counted per recipient but never abort the loop; a review
/// request must reach the admins who can receive it even when one of them
/// has blocked the bot.
pub async fn fan_out(
    chat: &dyn ChatPort,
    recipients: &[ChatId],
    text: &str,
    photo: Option<&str>,
    keyboard: Option<&Keyboard>,
) -> Vec<(ChatId, MessageRef)> {
    let mut delivered = Vec::with_capacity(recipients.len());
    let mut failures = 0_usize;

    for &recipient in recipients {
        let sent = match photo {
            Some(photo) => chat.send_photo(recipient, photo, text, keyboard).await,
            None => chat.send_message(recipient, text, keyboard).await,
        };
        match sent {
            Ok(message) => delivered.push((recipient, message)),
            Err(err) => {
                failures += 1;
                tracing::warn!(recipient = %recipient, error = %err, "fan-out delivery failed");
            }
        }
    }

    if failures > 0 {
        tracing::warn!(
            delivered = delivered.len(),
            failures,
            "fan-out finished with failures"
        );
    }
    delivered
}

/// A chat port that accepts everything and delivers nothing.
///
/// Used when running without a configured transport; message ids still
/// increase so flows that store [`MessageRef`]s keep working.
#[derive(Debug, Default)]
pub struct NullChatPort {
    next_id: AtomicI64,
}

impl NullChatPort {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_ref(&self, chat: ChatId) -> MessageRef {
        MessageRef::new(chat, self.next_id.fetch_add(1, Ordering::Relaxed) + 1)
    }
}

#[async_trait]
impl ChatPort for NullChatPort {
    async fn send_message(
        &self,
        chat: ChatId,
        _text: &str,
        _keyboard: Option<&Keyboard>,
    ) -> Result<MessageRef, ChatError> {
        Ok(self.next_ref(chat))
    }

    async fn send_photo(
        &self,
        chat: ChatId,
        _photo: &str,
        _caption: &str,
        _keyboard: Option<&Keyboard>,
    ) -> Result<MessageRef, ChatError> {
        Ok(self.next_ref(chat))
    }

    async fn edit_message(
        &self,
        _message: MessageRef,
        _text: &str,
        _keyboard: Option<&Keyboard>,
    ) -> Result<(), ChatError> {
        Ok(())
    }
}
