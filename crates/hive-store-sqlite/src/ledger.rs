//! Vote ledger statements.
//!
//! These run on the connection thread inside a transaction opened by
//! [`crate::SqliteStore`]; none of them commit.

use hive_core::vote::{LedgerChange, TargetType, VoteOutcome, VoteState, VoteValue};
use rusqlite::{Connection, OptionalExtension as _, params};

use crate::encode::target_table;

/// Result of a cast, decided on the connection thread.
pub enum Cast {
  Done(VoteOutcome),
  /// The target does not exist.
  Missing,
  /// The insert lost a uniqueness race; the transaction must be dropped.
  Race,
}

/// Whether a unique or primary-key constraint rejected the statement.
pub fn is_unique_violation(e: &rusqlite::Error) -> bool {
  matches!(
    e,
    rusqlite::Error::SqliteFailure(f, _)
      if f.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
        || f.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY
  )
}

pub fn target_exists(
  conn: &Connection,
  target_type: TargetType,
  target_id: &str,
) -> rusqlite::Result<bool> {
  let (table, id_col) = target_table(target_type);
  Ok(
    conn
      .query_row(
        &format!("SELECT 1 FROM {table} WHERE {id_col} = ?1"),
        params![target_id],
        |_| Ok(true),
      )
      .optional()?
      .unwrap_or(false),
  )
}

/// `(vote_id, value)` of the voter's live vote, if any.
fn current_vote(
  conn: &Connection,
  target_type: TargetType,
  target_id: &str,
  voter: &str,
) -> rusqlite::Result<Option<(String, i64)>> {
  conn
    .query_row(
      "SELECT vote_id, value FROM votes
       WHERE target_type = ?1 AND target_id = ?2 AND voter_subject = ?3",
      params![target_type.as_str(), target_id, voter],
      |r| Ok((r.get(0)?, r.get(1)?)),
    )
    .optional()
}

/// Signed sum of the target's live votes.
fn live_sum(
  conn: &Connection,
  target_type: TargetType,
  target_id: &str,
) -> rusqlite::Result<i64> {
  conn.query_row(
    "SELECT COALESCE(SUM(value), 0) FROM votes
     WHERE target_type = ?1 AND target_id = ?2",
    params![target_type.as_str(), target_id],
    |r| r.get(0),
  )
}

fn decode_value(v: i64) -> Result<VoteValue, tokio_rusqlite::Error> {
  VoteValue::try_from(v).map_err(|e| tokio_rusqlite::Error::Other(Box::new(e)))
}

/// Apply one cast and re-project the target's `vote_count` from the ledger.
pub fn cast(
  conn: &Connection,
  target_type: TargetType,
  target_id: &str,
  voter: &str,
  value: VoteValue,
  new_vote_id: &str,
  now: &str,
) -> Result<Cast, tokio_rusqlite::Error> {
  if !target_exists(conn, target_type, target_id)? {
    return Ok(Cast::Missing);
  }

  let existing = current_vote(conn, target_type, target_id, voter)?;
  let current = existing.as_ref().map(|(_, v)| decode_value(*v)).transpose()?;
  let (next, change) = VoteState::from_value(current).cast(value);

  match (existing, change) {
    (None, _) => {
      let inserted = conn.execute(
        "INSERT INTO votes (
           vote_id, target_type, target_id, voter_subject, value,
           created_at, updated_at
         ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)",
        params![
          new_vote_id,
          target_type.as_str(),
          target_id,
          voter,
          value.as_i64(),
          now
        ],
      );
      match inserted {
        Ok(_) => {}
        Err(e) if is_unique_violation(&e) => return Ok(Cast::Race),
        Err(e) => return Err(e.into()),
      }
    }
    (Some((vote_id, _)), LedgerChange::Delete) => {
      conn.execute("DELETE FROM votes WHERE vote_id = ?1", params![vote_id])?;
    }
    (Some((vote_id, _)), _) => {
      conn.execute(
        "UPDATE votes SET value = ?2, updated_at = ?3 WHERE vote_id = ?1",
        params![vote_id, value.as_i64(), now],
      )?;
    }
  }

  let vote_count = project(conn, target_type, target_id)?;
  Ok(Cast::Done(VoteOutcome { vote_count, user_vote: next.value() }))
}

/// Recompute the aggregate from the ledger and store it on the target row.
fn project(
  conn: &Connection,
  target_type: TargetType,
  target_id: &str,
) -> rusqlite::Result<i64> {
  let sum = live_sum(conn, target_type, target_id)?;
  let (table, id_col) = target_table(target_type);
  conn.execute(
    &format!("UPDATE {table} SET vote_count = ?2 WHERE {id_col} = ?1"),
    params![target_id, sum],
  )?;
  Ok(sum)
}

/// The target's live aggregate and the voter's vote; `None` if the target is
/// missing.
pub fn tally(
  conn: &Connection,
  target_type: TargetType,
  target_id: &str,
  voter: &str,
) -> Result<Option<VoteOutcome>, tokio_rusqlite::Error> {
  if !target_exists(conn, target_type, target_id)? {
    return Ok(None);
  }
  let vote_count = live_sum(conn, target_type, target_id)?;
  let user_vote = current_vote(conn, target_type, target_id, voter)?
    .map(|(_, v)| decode_value(v))
    .transpose()?;
  Ok(Some(VoteOutcome { vote_count, user_vote }))
}
