//! The `ForumStore` trait: everything the service needs from persistence.
//!
//! The trait is implemented by storage backends (e.g. `hive-store-sqlite`).
//! Cross-entity invariants (one vote per voter and target, `vote_count` as the
//! ledger sum, `answer_count` as the number of answers) are the backend's to
//! keep, using its own atomicity primitives rather than in-process locks.

use std::{collections::HashMap, future::Future};

use uuid::Uuid;

use crate::{
  answer::Answer,
  page::Page,
  query::{AnswerQuery, QuestionQuery, SearchQuery, TagCount, TagLimit},
  question::{NewQuestion, Question, QuestionPatch},
  user::{Identity, User},
  vote::{TargetType, VoteOutcome, VoteValue},
};

/// Abstraction over a Hive storage backend.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait ForumStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Lifecycle ─────────────────────────────────────────────────────────

  /// Round-trip to the backend; `Ok` means it is accepting queries.
  fn health_check(
    &self,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Identity ──────────────────────────────────────────────────────────

  /// Return the user for `identity.subject`, creating it on first sight.
  ///
  /// Concurrent calls for the same subject must converge on one record: a
  /// duplicate-key failure on insert means another caller won, and the
  /// existing row is returned instead.
  fn resolve_user(
    &self,
    identity: Identity,
  ) -> impl Future<Output = Result<User, Self::Error>> + Send + '_;

  // ── Content ───────────────────────────────────────────────────────────

  /// Persist a question with zero votes and zero answers. `input.body` must
  /// already be sanitised.
  fn add_question(
    &self,
    author: User,
    input: NewQuestion,
    ai_draft_answer: Option<String>,
  ) -> impl Future<Output = Result<Question, Self::Error>> + Send + '_;

  fn get_question(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Question>, Self::Error>> + Send + '_;

  /// Apply `patch` if `editor_subject` authored the question.
  ///
  /// Fails with not-found or forbidden; a forbidden edit leaves the row
  /// untouched.
  fn update_question(
    &self,
    id: Uuid,
    editor_subject: String,
    patch: QuestionPatch,
  ) -> impl Future<Output = Result<Question, Self::Error>> + Send + '_;

  /// Persist an answer and bump the parent's `answer_count` in the same
  /// atomic step. Fails with not-found if the question is missing.
  fn add_answer(
    &self,
    question_id: Uuid,
    author: User,
    body: String,
  ) -> impl Future<Output = Result<Answer, Self::Error>> + Send + '_;

  /// Replace an answer's body if `editor_subject` authored it.
  fn update_answer(
    &self,
    id: Uuid,
    editor_subject: String,
    body: String,
  ) -> impl Future<Output = Result<Answer, Self::Error>> + Send + '_;

  // ── Votes ─────────────────────────────────────────────────────────────

  /// Walk the voter's state machine for one target and re-project the
  /// target's `vote_count` as the signed sum of its live votes.
  ///
  /// The lookup, ledger write, recompute and projection update are one
  /// atomic unit per target. Fails with not-found if the target is missing
  /// and with conflict if a concurrent insert won the uniqueness race.
  fn cast_vote(
    &self,
    target_type: TargetType,
    target_id: Uuid,
    voter_subject: String,
    value: VoteValue,
  ) -> impl Future<Output = Result<VoteOutcome, Self::Error>> + Send + '_;

  /// Read a target's live aggregate and one voter's vote without writing.
  /// Fails with not-found if the target is missing.
  fn tally(
    &self,
    target_type: TargetType,
    target_id: Uuid,
    voter_subject: String,
  ) -> impl Future<Output = Result<VoteOutcome, Self::Error>> + Send + '_;

  /// Batch lookup of one voter's votes over many targets. Targets without a
  /// vote are absent from the map.
  fn user_votes(
    &self,
    target_type: TargetType,
    target_ids: Vec<Uuid>,
    voter_subject: String,
  ) -> impl Future<Output = Result<HashMap<Uuid, VoteValue>, Self::Error>>
  + Send
  + '_;

  // ── Queries ───────────────────────────────────────────────────────────

  fn list_questions<'a>(
    &'a self,
    query: &'a QuestionQuery,
  ) -> impl Future<Output = Result<Page<Question>, Self::Error>> + Send + 'a;

  fn search_questions<'a>(
    &'a self,
    query: &'a SearchQuery,
  ) -> impl Future<Output = Result<Page<Question>, Self::Error>> + Send + 'a;

  /// Fails with not-found if the question is missing.
  fn list_answers<'a>(
    &'a self,
    question_id: Uuid,
    query: &'a AnswerQuery,
  ) -> impl Future<Output = Result<Page<Answer>, Self::Error>> + Send + 'a;

  /// Tags by number of questions carrying them, most used first, ties in
  /// lexicographic order.
  fn top_tags(
    &self,
    limit: TagLimit,
  ) -> impl Future<Output = Result<Vec<TagCount>, Self::Error>> + Send + '_;
}
