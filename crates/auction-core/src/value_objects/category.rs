//! Item categories accepted by the marketplace
//!
//! Each category drives its own sequence of form steps in the submission
//! workflow, and admins can toggle categories on and off at runtime.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Item category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// A Pokémon listing: name, nature, IVs, moveset, boost flag
    Pokemon,
    /// A Technical Machine listing: name plus free-form details
    TechnicalMachine,
}

impl Category {
    /// All known categories, in display order
    pub const ALL: [Category; 2] = [Category::Pokemon, Category::TechnicalMachine];

    /// Stable identifier used in storage and callback data
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pokemon => "pokemon",
            Self::TechnicalMachine => "tm",
        }
    }

    /// Human-facing label
    pub fn label(&self) -> &'static str {
        match self {
            Self::Pokemon => "Pokémon",
            Self::TechnicalMachine => "Technical Machine",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Error when parsing a category from user input
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown category: {0}")]
pub struct CategoryParseError(pub String);

impl FromStr for Category {
    type Err = CategoryParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pokemon" | "pokémon" => Ok(Self::Pokemon),
            "tm" | "technical_machine" | "technical machine" => Ok(Self::TechnicalMachine),
            other => Err(CategoryParseError(other.to_string())),
        }
    }
}
