// src/models/vote.rs

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

/// Type of a stored vote record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteType {
    Up,
    Down,
}

impl VoteType {
    pub fn as_str(&self) -> &'static str {
        match self {
            VoteType::Up => "up",
            VoteType::Down => "down",
        }
    }
}

impl fmt::Display for VoteType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VoteType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "up" => Ok(VoteType::Up),
            "down" => Ok(VoteType::Down),
            other => Err(format!("unknown vote type '{}'", other)),
        }
    }
}

/// A vote as requested by a client, or a user's effective vote.
/// `None` means "no vote": requesting it retracts any existing vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteAction {
    Up,
    Down,
    None,
}

impl VoteAction {
    /// The record type this action stores, if any
    pub fn vote_type(self) -> Option<VoteType> {
        match self {
            VoteAction::Up => Some(VoteType::Up),
            VoteAction::Down => Some(VoteType::Down),
            VoteAction::None => None,
        }
    }
}

impl From<Option<VoteType>> for VoteAction {
    fn from(vote: Option<VoteType>) -> Self {
        match vote {
            Some(VoteType::Up) => VoteAction::Up,
            Some(VoteType::Down) => VoteAction::Down,
            None => VoteAction::None,
        }
    }
}

/// How repeated votes by the same user on the same photo are treated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VotePolicy {
    /// Votes can be switched or retracted at any time
    #[default]
    Mutable,
    /// The first vote is permanent; later ones are ignored
    Immutable,
}

impl FromStr for VotePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mutable" => Ok(VotePolicy::Mutable),
            "immutable" => Ok(VotePolicy::Immutable),
            other => Err(format!(
                "VOTE_POLICY must be 'mutable' or 'immutable', got '{}'",
                other
            )),
        }
    }
}

/// A row of the `votes` table; unique per (user_id, photo_id)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vote {
    pub user_id: String,
    pub photo_id: Uuid,
    pub vote_type: VoteType,
}

/// Body of POST /vote
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct VoteRequest {
    #[validate(length(min = 1, message = "photo_id is required"))]
    pub photo_id: String,

    #[validate(length(min = 1, max = 255, message = "user_id is required"))]
    pub user_id: String,

    pub vote_type: VoteAction,
}

/// Whether a vote changed anything
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteStatus {
    Success,
    /// Duplicate vote under the immutable policy; nothing was written
    Ignored,
}

/// Result of a reconciliation, returned as the body of POST /vote
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteOutcome {
    pub status: VoteStatus,
    pub photo_id: Uuid,
    pub upvotes: i32,
    pub downvotes: i32,
    /// The user's vote after the operation
    pub user_vote: VoteAction,
}
