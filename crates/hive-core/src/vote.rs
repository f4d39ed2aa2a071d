//! Votes: the ledger that every `vote_count` is projected from.
//!
//! Each `(target_type, target_id, voter_subject)` tuple holds at most one live
//! vote. Casting walks a three-state machine:
//!
//! | current   | cast `+1`  | cast `-1`  |
//! |-----------|------------|------------|
//! | no vote   | upvoted    | downvoted  |
//! | upvoted   | no vote    | downvoted  |
//! | downvoted | upvoted    | no vote    |

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

// ─── Target ──────────────────────────────────────────────────────────────────

/// The kind of entity a vote points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetType {
  Question,
  Answer,
}

impl TargetType {
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Question => "question",
      Self::Answer => "answer",
    }
  }
}

impl fmt::Display for TargetType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

// ─── Value ───────────────────────────────────────────────────────────────────

/// A signed vote. Serialises as the bare integer `1` or `-1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum VoteValue {
  Up,
  Down,
}

impl VoteValue {
  pub fn as_i64(self) -> i64 {
    match self {
      Self::Up => 1,
      Self::Down => -1,
    }
  }
}

impl TryFrom<i64> for VoteValue {
  type Error = Error;

  fn try_from(v: i64) -> Result<Self> {
    match v {
      1 => Ok(Self::Up),
      -1 => Ok(Self::Down),
      other => Err(Error::validation(format!(
        "vote value must be 1 or -1, got {other}"
      ))),
    }
  }
}

impl From<VoteValue> for i64 {
  fn from(v: VoteValue) -> Self { v.as_i64() }
}

// ─── State machine ───────────────────────────────────────────────────────────

/// A voter's standing on one target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VoteState {
  #[default]
  NoVote,
  Upvoted,
  Downvoted,
}

/// The single ledger write that moves a voter between two states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerChange {
  Insert(VoteValue),
  /// Flip an existing vote to the given value.
  Update(VoteValue),
  /// Toggle off.
  Delete,
}

impl VoteState {
  pub fn from_value(value: Option<VoteValue>) -> Self {
    match value {
      None => Self::NoVote,
      Some(VoteValue::Up) => Self::Upvoted,
      Some(VoteValue::Down) => Self::Downvoted,
    }
  }

  pub fn value(self) -> Option<VoteValue> {
    match self {
      Self::NoVote => None,
      Self::Upvoted => Some(VoteValue::Up),
      Self::Downvoted => Some(VoteValue::Down),
    }
  }

  /// Apply a cast, returning the resulting state and the write it needs.
  pub fn cast(self, value: VoteValue) -> (Self, LedgerChange) {
    match (self.value(), value) {
      (None, v) => (Self::from_value(Some(v)), LedgerChange::Insert(v)),
      (Some(cur), v) if cur == v => (Self::NoVote, LedgerChange::Delete),
      (Some(_), v) => (Self::from_value(Some(v)), LedgerChange::Update(v)),
    }
  }
}

// ─── Outcome ─────────────────────────────────────────────────────────────────

/// What a cast leaves behind: the recomputed aggregate and the voter's own
/// vote (`None` after a toggle-off).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteOutcome {
  pub vote_count: i64,
  pub user_vote:  Option<VoteValue>,
}
