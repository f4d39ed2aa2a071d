//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as fixed-width RFC 3339 strings (microseconds, `Z`
//! suffix) so that lexical order equals chronological order. Tags are stored
//! as compact JSON. UUIDs are stored as hyphenated lowercase strings.

use chrono::{DateTime, SecondsFormat, Utc};
use hive_core::{
  answer::Answer,
  question::Question,
  user::User,
  vote::{TargetType, VoteValue},
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Tags ────────────────────────────────────────────────────────────────────

pub fn encode_tags(tags: &[String]) -> Result<String> {
  Ok(serde_json::to_string(tags)?)
}

pub fn decode_tags(s: &str) -> Result<Vec<String>> {
  Ok(serde_json::from_str(s)?)
}

// ─── Votes ───────────────────────────────────────────────────────────────────

/// `(table, id column)` holding the projection for a target type.
pub fn target_table(t: TargetType) -> (&'static str, &'static str) {
  match t {
    TargetType::Question => ("questions", "question_id"),
    TargetType::Answer => ("answers", "answer_id"),
  }
}

pub fn decode_vote_value(v: i64) -> Result<VoteValue> {
  VoteValue::try_from(v)
    .map_err(|_| Error::Corrupt(format!("vote value {v} out of range")))
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read directly from a `users` row.
pub struct RawUser {
  pub user_id:      String,
  pub subject:      String,
  pub email:        Option<String>,
  pub display_name: String,
  pub created_at:   String,
  pub updated_at:   String,
}

pub const USER_COLUMNS: &str =
  "user_id, subject, email, display_name, created_at, updated_at";

impl RawUser {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      user_id:      row.get(0)?,
      subject:      row.get(1)?,
      email:        row.get(2)?,
      display_name: row.get(3)?,
      created_at:   row.get(4)?,
      updated_at:   row.get(5)?,
    })
  }

  pub fn into_user(self) -> Result<User> {
    Ok(User {
      user_id:      decode_uuid(&self.user_id)?,
      subject:      self.subject,
      email:        self.email,
      display_name: self.display_name,
      created_at:   decode_dt(&self.created_at)?,
      updated_at:   decode_dt(&self.updated_at)?,
    })
  }
}

/// Raw values read from a `questions` row aliased as `q`.
pub struct RawQuestion {
  pub question_id:     String,
  pub title:           String,
  pub body:            String,
  pub tags:            String,
  pub author_id:       String,
  pub author_subject:  String,
  pub author_name:     String,
  pub vote_count:      i64,
  pub answer_count:    i64,
  pub ai_draft_answer: Option<String>,
  pub created_at:      String,
  pub updated_at:      String,
}

pub const QUESTION_COLUMNS: &str = "q.question_id, q.title, q.body, q.tags, \
   q.author_id, q.author_subject, q.author_name, q.vote_count, \
   q.answer_count, q.ai_draft_answer, q.created_at, q.updated_at";

impl RawQuestion {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      question_id:     row.get(0)?,
      title:           row.get(1)?,
      body:            row.get(2)?,
      tags:            row.get(3)?,
      author_id:       row.get(4)?,
      author_subject:  row.get(5)?,
      author_name:     row.get(6)?,
      vote_count:      row.get(7)?,
      answer_count:    row.get(8)?,
      ai_draft_answer: row.get(9)?,
      created_at:      row.get(10)?,
      updated_at:      row.get(11)?,
    })
  }

  pub fn into_question(self) -> Result<Question> {
    Ok(Question {
      question_id:         decode_uuid(&self.question_id)?,
      title:               self.title,
      body:                self.body,
      tags:                decode_tags(&self.tags)?,
      author_id:           decode_uuid(&self.author_id)?,
      author_subject:      self.author_subject,
      author_display_name: self.author_name,
      vote_count:          self.vote_count,
      answer_count:        self.answer_count,
      ai_draft_answer:     self.ai_draft_answer,
      created_at:          decode_dt(&self.created_at)?,
      updated_at:          decode_dt(&self.updated_at)?,
    })
  }
}

/// Raw values read from an `answers` row aliased as `a`.
pub struct RawAnswer {
  pub answer_id:      String,
  pub question_id:    String,
  pub body:           String,
  pub author_id:      String,
  pub author_subject: String,
  pub author_name:    String,
  pub vote_count:     i64,
  pub created_at:     String,
  pub updated_at:     String,
}

pub const ANSWER_COLUMNS: &str = "a.answer_id, a.question_id, a.body, \
   a.author_id, a.author_subject, a.author_name, a.vote_count, \
   a.created_at, a.updated_at";

impl RawAnswer {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      answer_id:      row.get(0)?,
      question_id:    row.get(1)?,
      body:           row.get(2)?,
      author_id:      row.get(3)?,
      author_subject: row.get(4)?,
      author_name:    row.get(5)?,
      vote_count:     row.get(6)?,
      created_at:     row.get(7)?,
      updated_at:     row.get(8)?,
    })
  }

  pub fn into_answer(self) -> Result<Answer> {
    Ok(Answer {
      answer_id:           decode_uuid(&self.answer_id)?,
      question_id:         decode_uuid(&self.question_id)?,
      body:                self.body,
      author_id:           decode_uuid(&self.author_id)?,
      author_subject:      self.author_subject,
      author_display_name: self.author_name,
      vote_count:          self.vote_count,
      created_at:          decode_dt(&self.created_at)?,
      updated_at:          decode_dt(&self.updated_at)?,
    })
  }
}
