//! Value objects - identifiers, categories, and pricing rules

mod category;
mod ids;
mod pricing;

pub use category::{Category, CategoryParseError};
pub use ids::{ChatId, MessageRef, UserId};
pub use pricing::{format_amount, min_increment, parse_amount, AmountParseError};
