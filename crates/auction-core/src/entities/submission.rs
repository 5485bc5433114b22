//! Submission entity - a proposed item pending admin approval

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use validator::Validate;

use crate::value_objects::{Category, MessageRef, UserId};

/// Submission lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStatus {
    /// Waiting for an admin verdict
    Pending,
    /// Approved; an auction was created
    Approved,
    /// Rejected with a reason
    Rejected,
    /// Approved but posting the auction to the channel failed
    Failed,
}

impl SubmissionStatus {
    /// Stable identifier used in storage
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SubmissionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            "failed" => Ok(Self::Failed),
            other => Err(format!("unknown submission status: {other}")),
        }
    }
}

/// Category-specific item fields collected by the submission workflow
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "category", rename_all = "snake_case")]
pub enum ItemDetails {
    Pokemon {
        name: String,
        nature: String,
        ivs: String,
        moveset: String,
        boosted: bool,
    },
    TechnicalMachine {
        name: String,
        details: String,
    },
}

impl ItemDetails {
    /// The item name, regardless of category
    pub fn name(&self) -> &str {
        match self {
            Self::Pokemon { name, .. } | Self::TechnicalMachine { name, .. } => name,
        }
    }

    /// The category these details belong to
    pub fn category(&self) -> Category {
        match self {
            Self::Pokemon { .. } => Category::Pokemon,
            Self::TechnicalMachine { .. } => Category::TechnicalMachine,
        }
    }
}

/// The completed submission form, serialized as the submission's JSON payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct SubmissionForm {
    pub details: ItemDetails,
    /// Chat-platform file reference for the listing photo
    pub photo: Option<String>,
    #[validate(range(min = 1, message = "price must be positive"))]
    pub price: i64,
}

impl SubmissionForm {
    /// A short human-facing title for the listing
    pub fn title(&self) -> String {
        match &self.details {
            ItemDetails::Pokemon { name, boosted, .. } => {
                if *boosted {
                    format!("{name} (boosted)")
                } else {
                    name.clone()
                }
            }
            ItemDetails::TechnicalMachine { name, .. } => format!("TM: {name}"),
        }
    }

    /// Multi-line description of the item fields (everything but the title)
    pub fn description(&self) -> String {
        match &self.details {
            ItemDetails::Pokemon {
                nature,
                ivs,
                moveset,
                ..
            } => format!("Nature: {nature}\nIVs: {ivs}\nMoveset: {moveset}"),
            ItemDetails::TechnicalMachine { details, .. } => details.clone(),
        }
    }
}

/// Submission entity
///
/// One submission maps to at most one auction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    pub id: i64,
    pub user: UserId,
    pub form: SubmissionForm,
    pub status: SubmissionStatus,
    pub channel_message: Option<MessageRef>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Submission {
    /// Create a new pending submission
    pub fn new(user: UserId, form: SubmissionForm) -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            user,
            form,
            status: SubmissionStatus::Pending,
            channel_message: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Check whether the submission still awaits a verdict
    #[inline]
    pub fn is_pending(&self) -> bool {
        self.status == SubmissionStatus::Pending
    }
}
