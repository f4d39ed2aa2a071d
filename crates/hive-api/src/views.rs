//! Wire shapes for questions, answers and users.

use chrono::{DateTime, Utc};
use hive_core::{
  forum::{AnswerView, QuestionView},
  user::User,
  vote::VoteValue,
};
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Serialize)]
pub struct AuthorJson {
  pub sub:  String,
  pub name: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionJson {
  #[serde(rename = "_id")]
  pub id:              Uuid,
  pub title:           String,
  pub body:            String,
  pub tags:            Vec<String>,
  pub author:          AuthorJson,
  pub vote_count:      i64,
  pub answer_count:    i64,
  pub user_vote:       Option<VoteValue>,
  /// Present (possibly `null`) on detail responses only.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub ai_draft_answer: Option<Option<String>>,
  pub created_at:      DateTime<Utc>,
  pub updated_at:      DateTime<Utc>,
}

impl QuestionJson {
  /// Listing shape, without the draft answer.
  pub fn summary(view: QuestionView) -> Self {
    let mut json = Self::detail(view);
    json.ai_draft_answer = None;
    json
  }

  pub fn detail(view: QuestionView) -> Self {
    let q = view.question;
    Self {
      id:              q.question_id,
      title:           q.title,
      body:            q.body,
      tags:            q.tags,
      author:          AuthorJson { sub: q.author_subject, name: q.author_display_name },
      vote_count:      q.vote_count,
      answer_count:    q.answer_count,
      user_vote:       view.user_vote,
      ai_draft_answer: Some(q.ai_draft_answer),
      created_at:      q.created_at,
      updated_at:      q.updated_at,
    }
  }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerJson {
  #[serde(rename = "_id")]
  pub id:          Uuid,
  pub question_id: Uuid,
  pub body:        String,
  pub author:      AuthorJson,
  pub vote_count:  i64,
  pub user_vote:   Option<VoteValue>,
  pub created_at:  DateTime<Utc>,
  pub updated_at:  DateTime<Utc>,
}

impl From<AnswerView> for AnswerJson {
  fn from(view: AnswerView) -> Self {
    let a = view.answer;
    Self {
      id:          a.answer_id,
      question_id: a.question_id,
      body:        a.body,
      author:      AuthorJson { sub: a.author_subject, name: a.author_display_name },
      vote_count:  a.vote_count,
      user_vote:   view.user_vote,
      created_at:  a.created_at,
      updated_at:  a.updated_at,
    }
  }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserJson {
  #[serde(rename = "_id")]
  pub id:           Uuid,
  pub sub:          String,
  pub email:        Option<String>,
  pub display_name: String,
  pub created_at:   DateTime<Utc>,
  pub updated_at:   DateTime<Utc>,
}

impl From<User> for UserJson {
  fn from(u: User) -> Self {
    Self {
      id:           u.user_id,
      sub:          u.subject,
      email:        u.email,
      display_name: u.display_name,
      created_at:   u.created_at,
      updated_at:   u.updated_at,
    }
  }
}
