//! # auction-gateway
//!
//! The chat-facing edge: normalizes incoming updates and dispatches them to
//! the marketplace services. The actual bot-API transport plugs in behind
//! [`auction_service::ChatPort`]; everything here works against the port.

pub mod dispatch;
pub mod prompts;
pub mod update;

pub use dispatch::Dispatcher;
pub use update::{CallbackAction, Update};
