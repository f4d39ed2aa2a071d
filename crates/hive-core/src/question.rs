//! Questions and the validated inputs that create or edit them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

pub const TITLE_MIN_CHARS: usize = 10;
pub const TITLE_MAX_CHARS: usize = 160;
pub const BODY_MIN_CHARS: usize = 20;
pub const MAX_TAGS: usize = 5;

/// A question as persisted.
///
/// `vote_count` is a projection of the vote ledger and `answer_count` of the
/// answers table; neither is ever written from request input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
  pub question_id:         Uuid,
  pub title:               String,
  /// Sanitised markdown.
  pub body:                String,
  pub tags:                Vec<String>,
  pub author_id:           Uuid,
  pub author_subject:      String,
  /// Snapshot of the author's display name at creation time.
  pub author_display_name: String,
  pub vote_count:          i64,
  pub answer_count:        i64,
  pub ai_draft_answer:     Option<String>,
  pub created_at:          DateTime<Utc>,
  pub updated_at:          DateTime<Utc>,
}

// ─── Inputs ──────────────────────────────────────────────────────────────────

/// Input to [`crate::forum::Forum::create_question`]. Construct with
/// [`NewQuestion::new`], which enforces the field constraints.
#[derive(Debug, Clone)]
pub struct NewQuestion {
  pub title: String,
  pub body:  String,
  pub tags:  Vec<String>,
}

impl NewQuestion {
  pub fn new(title: &str, body: &str, tags: Vec<String>) -> Result<Self> {
    Ok(Self {
      title: validate_title(title)?,
      body:  validate_body(body)?,
      tags:  validate_tags(tags)?,
    })
  }
}

/// A partial edit. Absent fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct QuestionPatch {
  pub title: Option<String>,
  pub body:  Option<String>,
  pub tags:  Option<Vec<String>>,
}

impl QuestionPatch {
  pub fn new(
    title: Option<&str>,
    body: Option<&str>,
    tags: Option<Vec<String>>,
  ) -> Result<Self> {
    Ok(Self {
      title: title.map(validate_title).transpose()?,
      body:  body.map(validate_body).transpose()?,
      tags:  tags.map(validate_tags).transpose()?,
    })
  }

  pub fn is_empty(&self) -> bool {
    self.title.is_none() && self.body.is_none() && self.tags.is_none()
  }
}

// ─── Field validation ────────────────────────────────────────────────────────

/// Titles are trimmed before their length is checked.
pub fn validate_title(title: &str) -> Result<String> {
  let title = title.trim();
  let len = title.chars().count();
  if !(TITLE_MIN_CHARS..=TITLE_MAX_CHARS).contains(&len) {
    return Err(Error::validation(format!(
      "title must be between {TITLE_MIN_CHARS} and {TITLE_MAX_CHARS} characters"
    )));
  }
  Ok(title.to_owned())
}

/// Shared by questions and answers.
pub fn validate_body(body: &str) -> Result<String> {
  if body.chars().count() < BODY_MIN_CHARS {
    return Err(Error::validation(format!(
      "body must be at least {BODY_MIN_CHARS} characters"
    )));
  }
  Ok(body.to_owned())
}

/// Tags are trimmed and de-duplicated (first occurrence wins) before the
/// count is checked, so `["rust", "rust"]` is one tag.
pub fn validate_tags(tags: Vec<String>) -> Result<Vec<String>> {
  let mut out: Vec<String> = Vec::with_capacity(tags.len());
  for tag in tags {
    let tag = tag.trim();
    if tag.is_empty() {
      return Err(Error::validation("tags must not be empty"));
    }
    if !out.iter().any(|t| t == tag) {
      out.push(tag.to_owned());
    }
  }
  if out.is_empty() || out.len() > MAX_TAGS {
    return Err(Error::validation(format!(
      "questions must have between 1 and {MAX_TAGS} tags"
    )));
  }
  Ok(out)
}

#[cfg(test)]
mod tests {
  use super::*;

  fn tags(ts: &[&str]) -> Vec<String> {
    ts.iter().map(|t| t.to_string()).collect()
  }

  const BODY: &str = "This body is comfortably long enough.";

  #[test]
  fn accepts_valid_question() {
    let q = NewQuestion::new("  How do lifetimes work?  ", BODY, tags(&["rust"]))
      .unwrap();
    assert_eq!(q.title, "How do lifetimes work?");
    assert_eq!(q.tags, ["rust"]);
  }

  #[test]
  fn title_bounds() {
    assert!(validate_title("too short").is_err());
    assert!(validate_title("exactly10!").is_ok());
    assert!(validate_title(&"x".repeat(160)).is_ok());
    assert!(validate_title(&"x".repeat(161)).is_err());
  }

  #[test]
  fn title_length_counts_characters_not_bytes() {
    // 10 characters, 20 bytes.
    assert!(validate_title("éééééééééé").is_ok());
  }

  #[test]
  fn body_minimum() {
    assert!(validate_body("nineteen characters").is_err());
    assert!(validate_body("twenty characters!!!").is_ok());
  }

  #[test]
  fn tag_count_and_emptiness() {
    assert!(validate_tags(vec![]).is_err());
    assert!(validate_tags(tags(&["a", "b", "c", "d", "e"])).is_ok());
    assert!(validate_tags(tags(&["a", "b", "c", "d", "e", "f"])).is_err());
    assert!(validate_tags(tags(&["a", " "])).is_err());
  }

  #[test]
  fn duplicate_tags_collapse() {
    let out = validate_tags(tags(&["js", " js", "react", "js"])).unwrap();
    assert_eq!(out, ["js", "react"]);
  }

  #[test]
  fn patch_validates_present_fields_only() {
    let p = QuestionPatch::new(None, Some(BODY), None).unwrap();
    assert!(p.title.is_none());
    assert!(!p.is_empty());
    assert!(QuestionPatch::new(Some("short"), None, None).is_err());
    assert!(QuestionPatch::default().is_empty());
  }
}
