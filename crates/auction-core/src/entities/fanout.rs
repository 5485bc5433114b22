//! Admin fan-out bookkeeping
//!
//! Review requests (submissions and verifications) are broadcast to every
//! admin. When any one admin acts, every copy has to be found and edited, so
//! we keep the (admin chat, message id) pairs per subject.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::value_objects::ChatId;

/// What kind of review a fan-out message belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewKind {
    /// Subject id is a submission id
    Submission,
    /// Subject id is the user id requesting verification
    Verification,
}

impl ReviewKind {
    /// Stable identifier used in storage
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Submission => "submission",
            Self::Verification => "verification",
        }
    }
}

impl fmt::Display for ReviewKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReviewKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "submission" => Ok(Self::Submission),
            "verification" => Ok(Self::Verification),
            other => Err(format!("unknown review kind: {other}")),
        }
    }
}

/// One admin's copy of a fanned-out review message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminMessage {
    pub kind: ReviewKind,
    pub subject_id: i64,
    pub admin_chat: ChatId,
    pub message_id: i64,
    pub created_at: DateTime<Utc>,
}

impl AdminMessage {
    /// Record one delivered admin copy
    pub fn new(kind: ReviewKind, subject_id: i64, admin_chat: ChatId, message_id: i64) -> Self {
        Self {
            kind,
            subject_id,
            admin_chat,
            message_id,
            created_at: Utc::now(),
        }
    }
}
