//! Incoming update model
//!
//! The transport layer normalizes raw chat-platform updates into these
//! shapes before they reach the dispatcher, so the dispatcher never sees
//! platform JSON.

use std::str::FromStr;

use auction_core::value_objects::{ChatId, MessageRef, UserId};

/// One normalized incoming update
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Update {
    /// A slash command, e.g. `/bid 7 19k`
    Command {
        from: UserId,
        chat: ChatId,
        name: String,
        args: String,
    },
    /// Free text in a private chat
    Text {
        from: UserId,
        chat: ChatId,
        text: String,
    },
    /// A photo in a private chat, carrying the platform file reference
    Photo {
        from: UserId,
        chat: ChatId,
        file_ref: String,
    },
    /// An inline keyboard button press
    Callback {
        from: UserId,
        message: MessageRef,
        data: String,
    },
}

impl Update {
    /// Split a raw message text into a command update when it starts with `/`
    pub fn from_message(from: UserId, chat: ChatId, text: &str) -> Self {
        let trimmed = text.trim();
        if let Some(rest) = trimmed.strip_prefix('/') {
            let (name, args) = match rest.split_once(char::is_whitespace) {
                Some((name, args)) => (name, args.trim()),
                None => (rest, ""),
            };
            // Commands may arrive as /bid@botname in groups.
            let name = name.split('@').next().unwrap_or(name);
            return Self::Command {
                from,
                chat,
                name: name.to_lowercase(),
                args: args.to_string(),
            };
        }
        Self::Text {
            from,
            chat,
            text: trimmed.to_string(),
        }
    }
}

/// A parsed inline-button action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallbackAction {
    Approve(i64),
    Reject(i64),
    Verify(UserId),
    Decline(UserId),
}

/// Error when parsing callback data
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown callback action: {0}")]
pub struct CallbackParseError(pub String);

impl FromStr for CallbackAction {
    type Err = CallbackParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (verb, id) = s
            .split_once(':')
            .ok_or_else(|| CallbackParseError(s.to_string()))?;
        let id: i64 = id
            .parse()
            .map_err(|_| CallbackParseError(s.to_string()))?;
        match verb {
            "approve" => Ok(Self::Approve(id)),
            "reject" => Ok(Self::Reject(id)),
            "verify" => Ok(Self::Verify(UserId::new(id))),
            "decline" => Ok(Self::Decline(UserId::new(id))),
            _ => Err(CallbackParseError(s.to_string())),
        }
    }
}

/// The auction id carried by a `/start bid_<id>` deep link, if any
pub fn deep_link_auction(args: &str) -> Option<i64> {
    args.trim().strip_prefix("bid_")?.parse().ok()
}
