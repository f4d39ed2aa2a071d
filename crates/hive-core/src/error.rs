//! Error types for `hive-core`.
//!
//! The variants mirror the failure classes exposed over HTTP; the API layer
//! maps each one onto a status code.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// Malformed or out-of-range input, rejected before any store access.
  #[error("validation failed: {0}")]
  Validation(String),

  #[error("authentication required")]
  Unauthorized,

  /// Authenticated, but not allowed to touch the entity.
  #[error("forbidden: {0}")]
  Forbidden(String),

  #[error("{0} not found")]
  NotFound(String),

  /// A uniqueness constraint rejected the write (e.g. a lost vote race).
  #[error("conflict: {0}")]
  Conflict(String),

  #[error("internal error: {0}")]
  Internal(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  pub(crate) fn validation(msg: impl Into<String>) -> Self {
    Self::Validation(msg.into())
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
