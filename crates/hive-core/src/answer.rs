//! Answers posted against a question.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Result, question::validate_body};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Answer {
  pub answer_id:           Uuid,
  pub question_id:         Uuid,
  /// Sanitised markdown.
  pub body:                String,
  pub author_id:           Uuid,
  pub author_subject:      String,
  pub author_display_name: String,
  pub vote_count:          i64,
  pub created_at:          DateTime<Utc>,
  pub updated_at:          DateTime<Utc>,
}

/// A validated answer body, used for both creation and edits.
#[derive(Debug, Clone)]
pub struct AnswerBody(String);

impl AnswerBody {
  pub fn new(body: &str) -> Result<Self> { Ok(Self(validate_body(body)?)) }

  pub fn as_str(&self) -> &str { &self.0 }
}
