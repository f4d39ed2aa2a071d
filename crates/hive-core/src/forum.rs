//! [`Forum`]: the write paths and the annotated read paths of the service.
//!
//! Handlers talk to a `Forum`, never to the store directly. The forum resolves
//! the caller's user record on every write, runs bodies through the sanitiser,
//! asks the draft generator for a draft on new questions, and annotates every
//! user-facing read with the caller's own vote in one batched lookup.

use std::{collections::HashMap, sync::Arc};

use serde::Serialize;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::{
  Error, Result,
  answer::{Answer, AnswerBody},
  draft::{DraftGenerator, DraftRequest},
  page::Page,
  query::{AnswerQuery, QuestionQuery, SearchQuery, TagCount, TagLimit},
  question::{NewQuestion, Question, QuestionPatch},
  store::ForumStore,
  user::{Identity, User},
  vote::{TargetType, VoteOutcome, VoteValue},
};

/// Markdown sanitiser: raw text in, safe text out.
pub type Sanitize = fn(&str) -> String;

/// A question together with the caller's vote on it.
#[derive(Debug, Clone, Serialize)]
pub struct QuestionView {
  pub question:  Question,
  pub user_vote: Option<VoteValue>,
}

/// An answer together with the caller's vote on it.
#[derive(Debug, Clone, Serialize)]
pub struct AnswerView {
  pub answer:    Answer,
  pub user_vote: Option<VoteValue>,
}

pub struct Forum<S, D> {
  store:    Arc<S>,
  drafts:   D,
  sanitize: Sanitize,
}

impl<S, D> Forum<S, D>
where
  S: ForumStore,
  D: DraftGenerator,
  Error: From<S::Error>,
{
  pub fn new(store: Arc<S>, drafts: D, sanitize: Sanitize) -> Self {
    Self { store, drafts, sanitize }
  }

  pub async fn health_check(&self) -> Result<()> {
    Ok(self.store.health_check().await?)
  }

  // ── Identity ──────────────────────────────────────────────────────────

  pub async fn resolve_user(&self, identity: &Identity) -> Result<User> {
    Ok(self.store.resolve_user(identity.clone()).await?)
  }

  // ── Questions ─────────────────────────────────────────────────────────

  pub async fn create_question(
    &self,
    author: &Identity,
    mut input: NewQuestion,
  ) -> Result<QuestionView> {
    let user = self.resolve_user(author).await?;
    input.body = (self.sanitize)(&input.body);

    let draft = self
      .drafts
      .generate(DraftRequest {
        title: input.title.clone(),
        body:  input.body.clone(),
      })
      .await;

    let question = self.store.add_question(user, input, Some(draft)).await?;
    debug!(question_id = %question.question_id, "question created");
    Ok(QuestionView { question, user_vote: None })
  }

  /// Edits never regenerate the draft answer.
  pub async fn update_question(
    &self,
    id: Uuid,
    editor: &Identity,
    mut patch: QuestionPatch,
  ) -> Result<QuestionView> {
    let user = self.resolve_user(editor).await?;
    patch.body = patch.body.map(|b| (self.sanitize)(&b));

    let question = self
      .store
      .update_question(id, user.subject.clone(), patch)
      .await?;
    let user_vote = self
      .vote_of(TargetType::Question, id, &user.subject)
      .await?;
    Ok(QuestionView { question, user_vote })
  }

  pub async fn get_question(
    &self,
    id: Uuid,
    viewer: Option<&Identity>,
  ) -> Result<QuestionView> {
    let question = self
      .store
      .get_question(id)
      .await?
      .ok_or_else(|| Error::NotFound(format!("question {id}")))?;
    let user_vote = match viewer {
      Some(v) => self.vote_of(TargetType::Question, id, &v.subject).await?,
      None => None,
    };
    Ok(QuestionView { question, user_vote })
  }

  pub async fn list_questions(
    &self,
    query: &QuestionQuery,
    viewer: Option<&Identity>,
  ) -> Result<Page<QuestionView>> {
    let page = self.store.list_questions(query).await?;
    self.annotate_questions(page, viewer).await
  }

  pub async fn search_questions(
    &self,
    query: &SearchQuery,
    viewer: Option<&Identity>,
  ) -> Result<Page<QuestionView>> {
    let page = self.store.search_questions(query).await?;
    self.annotate_questions(page, viewer).await
  }

  pub async fn top_tags(&self, limit: TagLimit) -> Result<Vec<TagCount>> {
    Ok(self.store.top_tags(limit).await?)
  }

  // ── Answers ───────────────────────────────────────────────────────────

  pub async fn create_answer(
    &self,
    question_id: Uuid,
    author: &Identity,
    body: AnswerBody,
  ) -> Result<AnswerView> {
    let user = self.resolve_user(author).await?;
    let body = (self.sanitize)(body.as_str());
    let answer = self.store.add_answer(question_id, user, body).await?;
    debug!(answer_id = %answer.answer_id, %question_id, "answer created");
    Ok(AnswerView { answer, user_vote: None })
  }

  pub async fn update_answer(
    &self,
    id: Uuid,
    editor: &Identity,
    body: AnswerBody,
  ) -> Result<AnswerView> {
    let user = self.resolve_user(editor).await?;
    let body = (self.sanitize)(body.as_str());
    let answer = self
      .store
      .update_answer(id, user.subject.clone(), body)
      .await?;
    let user_vote = self.vote_of(TargetType::Answer, id, &user.subject).await?;
    Ok(AnswerView { answer, user_vote })
  }

  pub async fn list_answers(
    &self,
    question_id: Uuid,
    query: &AnswerQuery,
    viewer: Option<&Identity>,
  ) -> Result<Page<AnswerView>> {
    let page = self.store.list_answers(question_id, query).await?;
    let ids = page.items.iter().map(|a| a.answer_id).collect();
    let votes = self.votes_for(TargetType::Answer, ids, viewer).await?;
    Ok(page.map(|answer| AnswerView {
      user_vote: votes.get(&answer.answer_id).copied(),
      answer,
    }))
  }

  // ── Votes ─────────────────────────────────────────────────────────────

  /// Cast, flip or retract the caller's vote on a target.
  ///
  /// If a concurrent request from the same voter won the insert race, the
  /// ledger already holds their vote; the current standing is re-read and
  /// returned instead of an error.
  pub async fn cast_vote(
    &self,
    target_type: TargetType,
    target_id: Uuid,
    voter: &Identity,
    value: VoteValue,
  ) -> Result<VoteOutcome> {
    let user = self.resolve_user(voter).await?;
    let cast = self
      .store
      .cast_vote(target_type, target_id, user.subject.clone(), value)
      .await
      .map_err(Error::from);

    match cast {
      Err(Error::Conflict(reason)) => {
        warn!(%target_type, %target_id, %reason, "lost vote race; re-reading");
        Ok(self.store.tally(target_type, target_id, user.subject).await?)
      }
      other => other,
    }
  }

  /// One voter's votes over many targets.
  pub async fn user_votes(
    &self,
    target_type: TargetType,
    target_ids: Vec<Uuid>,
    voter_subject: &str,
  ) -> Result<HashMap<Uuid, VoteValue>> {
    if target_ids.is_empty() {
      return Ok(HashMap::new());
    }
    Ok(
      self
        .store
        .user_votes(target_type, target_ids, voter_subject.to_owned())
        .await?,
    )
  }

  // ── Helpers ───────────────────────────────────────────────────────────

  async fn vote_of(
    &self,
    target_type: TargetType,
    id: Uuid,
    subject: &str,
  ) -> Result<Option<VoteValue>> {
    let votes = self.user_votes(target_type, vec![id], subject).await?;
    Ok(votes.get(&id).copied())
  }

  async fn votes_for(
    &self,
    target_type: TargetType,
    ids: Vec<Uuid>,
    viewer: Option<&Identity>,
  ) -> Result<HashMap<Uuid, VoteValue>> {
    match viewer {
      Some(v) => self.user_votes(target_type, ids, &v.subject).await,
      None => Ok(HashMap::new()),
    }
  }

  async fn annotate_questions(
    &self,
    page: Page<Question>,
    viewer: Option<&Identity>,
  ) -> Result<Page<QuestionView>> {
    let ids = page.items.iter().map(|q| q.question_id).collect();
    let votes = self.votes_for(TargetType::Question, ids, viewer).await?;
    Ok(page.map(|question| QuestionView {
      user_vote: votes.get(&question.question_id).copied(),
      question,
    }))
  }
}
