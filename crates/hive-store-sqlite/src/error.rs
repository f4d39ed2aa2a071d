//! Error type for `hive-store-sqlite`.

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// A stored value fell outside its domain (e.g. an unknown vote value).
  #[error("corrupt row: {0}")]
  Corrupt(String),

  #[error("question not found: {0}")]
  QuestionNotFound(Uuid),

  #[error("answer not found: {0}")]
  AnswerNotFound(Uuid),

  #[error("{kind} {id} belongs to another author")]
  NotAuthor { kind: &'static str, id: Uuid },

  /// A concurrent insert claimed the `(target, voter)` slot first.
  #[error("vote on {target_id} was recorded concurrently")]
  VoteRace { target_id: Uuid },
}

impl From<Error> for hive_core::Error {
  fn from(e: Error) -> Self {
    match e {
      Error::QuestionNotFound(id) => Self::NotFound(format!("question {id}")),
      Error::AnswerNotFound(id) => Self::NotFound(format!("answer {id}")),
      Error::NotAuthor { kind, .. } => {
        Self::Forbidden(format!("you can only edit your own {kind}s"))
      }
      e @ Error::VoteRace { .. } => Self::Conflict(e.to_string()),
      other => Self::Internal(Box::new(other)),
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
