//! Integration tests for `SqliteStore`, mostly against an in-memory
//! database.

use hive_core::{
  page::PageRequest,
  query::{
    AnswerQuery, AnswerSort, QuestionQuery, QuestionSort, SearchQuery,
    SearchSort, SearchText, TagCount, TagLimit,
  },
  question::{NewQuestion, QuestionPatch},
  store::ForumStore,
  user::{Identity, User},
  vote::{TargetType, VoteValue},
};
use uuid::Uuid;

use crate::{
  Error, SqliteStore, encode::encode_uuid, ledger::is_unique_violation,
};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

async fn user(s: &SqliteStore, subject: &str) -> User {
  s.resolve_user(Identity::new(subject)).await.unwrap()
}

fn tags(ts: &[&str]) -> Vec<String> { ts.iter().map(|t| (*t).to_owned()).collect() }

async fn ask(s: &SqliteStore, author: &User, title: &str, body: &str, ts: &[&str]) -> Uuid {
  let input = NewQuestion::new(title, body, tags(ts)).unwrap();
  s.add_question(author.clone(), input, None)
    .await
    .unwrap()
    .question_id
}

const BODY: &str = "Some body text that is long enough to pass.";

// ─── Users ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn resolve_user_is_idempotent() {
  let s = store().await;
  let mut id = Identity::new("auth0|ada");
  id.name = Some("Ada".into());
  id.email = Some("ada@example.com".into());

  let first = s.resolve_user(id.clone()).await.unwrap();
  let second = s.resolve_user(id).await.unwrap();
  assert_eq!(first.user_id, second.user_id);
  assert_eq!(first.display_name, "Ada");
  assert_eq!(first.email.as_deref(), Some("ada@example.com"));
}

#[tokio::test]
async fn resolve_user_with_taken_email_drops_the_email() {
  let s = store().await;
  let mut a = Identity::new("auth0|a");
  a.email = Some("shared@example.com".into());
  let mut b = Identity::new("auth0|b");
  b.email = Some("shared@example.com".into());

  let ua = s.resolve_user(a).await.unwrap();
  let ub = s.resolve_user(b).await.unwrap();
  assert_ne!(ua.user_id, ub.user_id);
  assert_eq!(ub.email, None);
}

#[tokio::test]
async fn concurrent_resolves_converge() {
  let s = store().await;
  let (a, b) = tokio::join!(
    s.resolve_user(Identity::new("auth0|same")),
    s.resolve_user(Identity::new("auth0|same")),
  );
  assert_eq!(a.unwrap().user_id, b.unwrap().user_id);
}

// ─── Questions ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn add_and_get_question() {
  let s = store().await;
  let ada = user(&s, "ada").await;
  let input =
    NewQuestion::new("How do lifetimes work?", BODY, tags(&["rust", "lifetimes"]))
      .unwrap();
  let q = s
    .add_question(ada.clone(), input, Some("draft".into()))
    .await
    .unwrap();
  assert_eq!(q.vote_count, 0);
  assert_eq!(q.answer_count, 0);

  let fetched = s.get_question(q.question_id).await.unwrap().unwrap();
  assert_eq!(fetched.title, "How do lifetimes work?");
  assert_eq!(fetched.tags, vec!["rust", "lifetimes"]);
  assert_eq!(fetched.author_subject, "ada");
  assert_eq!(fetched.ai_draft_answer.as_deref(), Some("draft"));
  assert_eq!(fetched.created_at, q.created_at);
}

#[tokio::test]
async fn get_question_missing_returns_none() {
  let s = store().await;
  assert!(s.get_question(Uuid::new_v4()).await.unwrap().is_none());
}

#[tokio::test]
async fn author_can_patch_question() {
  let s = store().await;
  let ada = user(&s, "ada").await;
  let id = ask(&s, &ada, "Original title here", BODY, &["old"]).await;

  let patch = QuestionPatch::new(None, None, Some(tags(&["new", "tags"]))).unwrap();
  let q = s.update_question(id, "ada".into(), patch).await.unwrap();
  assert_eq!(q.title, "Original title here");
  assert_eq!(q.tags, vec!["new", "tags"]);
  assert!(q.updated_at >= q.created_at);

  let top = s.top_tags(TagLimit::default()).await.unwrap();
  assert!(top.iter().all(|t| t.tag != "old"));
}

#[tokio::test]
async fn non_author_cannot_patch_question() {
  let s = store().await;
  let ada = user(&s, "ada").await;
  let id = ask(&s, &ada, "Original title here", BODY, &["rust"]).await;

  let patch = QuestionPatch::new(Some("Hijacked title text"), None, None).unwrap();
  let err = s.update_question(id, "bob".into(), patch).await.unwrap_err();
  assert!(matches!(err, Error::NotAuthor { kind: "question", .. }));

  let q = s.get_question(id).await.unwrap().unwrap();
  assert_eq!(q.title, "Original title here");
}

#[tokio::test]
async fn patch_missing_question_is_not_found() {
  let s = store().await;
  let err = s
    .update_question(Uuid::new_v4(), "ada".into(), QuestionPatch::default())
    .await
    .unwrap_err();
  assert!(matches!(err, Error::QuestionNotFound(_)));
}

// ─── Answers ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn answers_bump_answer_count() {
  let s = store().await;
  let ada = user(&s, "ada").await;
  let bob = user(&s, "bob").await;
  let id = ask(&s, &ada, "A question title", BODY, &["rust"]).await;

  for _ in 0..3 {
    s.add_answer(id, bob.clone(), BODY.into()).await.unwrap();
  }
  let q = s.get_question(id).await.unwrap().unwrap();
  assert_eq!(q.answer_count, 3);

  let page = s.list_answers(id, &AnswerQuery::default()).await.unwrap();
  assert_eq!(page.page_info.total_items, 3);
}

#[tokio::test]
async fn answer_on_missing_question_is_not_found() {
  let s = store().await;
  let bob = user(&s, "bob").await;
  let err = s
    .add_answer(Uuid::new_v4(), bob, BODY.into())
    .await
    .unwrap_err();
  assert!(matches!(err, Error::QuestionNotFound(_)));
}

#[tokio::test]
async fn only_author_can_edit_answer() {
  let s = store().await;
  let ada = user(&s, "ada").await;
  let bob = user(&s, "bob").await;
  let qid = ask(&s, &ada, "A question title", BODY, &["rust"]).await;
  let answer = s.add_answer(qid, bob, BODY.into()).await.unwrap();

  let err = s
    .update_answer(answer.answer_id, "ada".into(), "x".repeat(30))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::NotAuthor { kind: "answer", .. }));

  let edited = s
    .update_answer(answer.answer_id, "bob".into(), "y".repeat(30))
    .await
    .unwrap();
  assert_eq!(edited.body, "y".repeat(30));
}

#[tokio::test]
async fn list_answers_sorts_by_votes_then_newest() {
  let s = store().await;
  let ada = user(&s, "ada").await;
  let qid = ask(&s, &ada, "A question title", BODY, &["rust"]).await;
  let first = s.add_answer(qid, ada.clone(), BODY.into()).await.unwrap();
  let second = s.add_answer(qid, ada.clone(), BODY.into()).await.unwrap();
  let third = s.add_answer(qid, ada.clone(), BODY.into()).await.unwrap();
  s.cast_vote(TargetType::Answer, first.answer_id, "v".into(), VoteValue::Up)
    .await
    .unwrap();

  let by_votes = s.list_answers(qid, &AnswerQuery::default()).await.unwrap();
  let ids: Vec<_> = by_votes.items.iter().map(|a| a.answer_id).collect();
  assert_eq!(ids, vec![first.answer_id, third.answer_id, second.answer_id]);

  let newest = AnswerQuery { sort: AnswerSort::New, ..Default::default() };
  let by_new = s.list_answers(qid, &newest).await.unwrap();
  assert_eq!(by_new.items[0].answer_id, third.answer_id);
}

#[tokio::test]
async fn list_answers_on_missing_question_is_not_found() {
  let s = store().await;
  let err = s
    .list_answers(Uuid::new_v4(), &AnswerQuery::default())
    .await
    .unwrap_err();
  assert!(matches!(err, Error::QuestionNotFound(_)));
}

// ─── Votes ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn vote_state_machine() {
  let s = store().await;
  let ada = user(&s, "ada").await;
  let id = ask(&s, &ada, "A question title", BODY, &["rust"]).await;
  let cast = |v| s.cast_vote(TargetType::Question, id, "bob".into(), v);

  let up = cast(VoteValue::Up).await.unwrap();
  assert_eq!((up.vote_count, up.user_vote), (1, Some(VoteValue::Up)));

  let down = cast(VoteValue::Down).await.unwrap();
  assert_eq!((down.vote_count, down.user_vote), (-1, Some(VoteValue::Down)));

  let cleared = cast(VoteValue::Down).await.unwrap();
  assert_eq!((cleared.vote_count, cleared.user_vote), (0, None));

  let q = s.get_question(id).await.unwrap().unwrap();
  assert_eq!(q.vote_count, 0);
}

#[tokio::test]
async fn vote_count_is_sum_of_live_votes() {
  let s = store().await;
  let ada = user(&s, "ada").await;
  let id = ask(&s, &ada, "A question title", BODY, &["rust"]).await;

  for voter in ["a", "b", "c"] {
    s.cast_vote(TargetType::Question, id, voter.into(), VoteValue::Up)
      .await
      .unwrap();
  }
  let out = s
    .cast_vote(TargetType::Question, id, "d".into(), VoteValue::Down)
    .await
    .unwrap();
  assert_eq!(out.vote_count, 2);

  let tally = s.tally(TargetType::Question, id, "a".into()).await.unwrap();
  assert_eq!((tally.vote_count, tally.user_vote), (2, Some(VoteValue::Up)));

  let q = s.get_question(id).await.unwrap().unwrap();
  assert_eq!(q.vote_count, 2);
}

#[tokio::test]
async fn vote_on_missing_target_is_not_found() {
  let s = store().await;
  let err = s
    .cast_vote(TargetType::Answer, Uuid::new_v4(), "bob".into(), VoteValue::Up)
    .await
    .unwrap_err();
  assert!(matches!(err, Error::AnswerNotFound(_)));
}

#[tokio::test]
async fn question_and_answer_votes_are_separate() {
  let s = store().await;
  let ada = user(&s, "ada").await;
  let qid = ask(&s, &ada, "A question title", BODY, &["rust"]).await;
  let answer = s.add_answer(qid, ada, BODY.into()).await.unwrap();

  s.cast_vote(TargetType::Answer, answer.answer_id, "bob".into(), VoteValue::Up)
    .await
    .unwrap();

  let q = s.get_question(qid).await.unwrap().unwrap();
  assert_eq!(q.vote_count, 0);
  let page = s.list_answers(qid, &AnswerQuery::default()).await.unwrap();
  assert_eq!(page.items[0].vote_count, 1);
}

#[tokio::test]
async fn user_votes_returns_only_voted_targets() {
  let s = store().await;
  let ada = user(&s, "ada").await;
  let q1 = ask(&s, &ada, "First question title", BODY, &["a"]).await;
  let q2 = ask(&s, &ada, "Second question title", BODY, &["a"]).await;
  let q3 = ask(&s, &ada, "Third question title", BODY, &["a"]).await;

  s.cast_vote(TargetType::Question, q1, "bob".into(), VoteValue::Up)
    .await
    .unwrap();
  s.cast_vote(TargetType::Question, q3, "bob".into(), VoteValue::Down)
    .await
    .unwrap();
  s.cast_vote(TargetType::Question, q2, "carol".into(), VoteValue::Up)
    .await
    .unwrap();

  let votes = s
    .user_votes(TargetType::Question, vec![q1, q2, q3], "bob".into())
    .await
    .unwrap();
  assert_eq!(votes.len(), 2);
  assert_eq!(votes[&q1], VoteValue::Up);
  assert_eq!(votes[&q3], VoteValue::Down);

  let none = s
    .user_votes(TargetType::Answer, vec![q1], "bob".into())
    .await
    .unwrap();
  assert!(none.is_empty());
}

// ─── Listing ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn list_questions_sorts_and_pages() {
  let s = store().await;
  let ada = user(&s, "ada").await;
  let mut ids = Vec::new();
  for i in 0..5 {
    ids.push(ask(&s, &ada, &format!("Question number {i}"), BODY, &["x"]).await);
  }
  s.cast_vote(TargetType::Question, ids[1], "bob".into(), VoteValue::Up)
    .await
    .unwrap();
  s.add_answer(ids[2], ada.clone(), BODY.into()).await.unwrap();

  let newest = s.list_questions(&QuestionQuery::default()).await.unwrap();
  assert_eq!(newest.items[0].question_id, ids[4]);
  assert_eq!(newest.page_info.total_items, 5);

  let votes = QuestionQuery { sort: QuestionSort::Votes, ..Default::default() };
  let by_votes = s.list_questions(&votes).await.unwrap();
  assert_eq!(by_votes.items[0].question_id, ids[1]);
  assert_eq!(by_votes.items[1].question_id, ids[4]);

  let answers = QuestionQuery { sort: QuestionSort::Answers, ..Default::default() };
  let by_answers = s.list_questions(&answers).await.unwrap();
  assert_eq!(by_answers.items[0].question_id, ids[2]);

  let second_page = QuestionQuery {
    page: PageRequest::new(2, 2).unwrap(),
    ..Default::default()
  };
  let page = s.list_questions(&second_page).await.unwrap();
  let got: Vec<_> = page.items.iter().map(|q| q.question_id).collect();
  assert_eq!(got, vec![ids[2], ids[1]]);
  assert_eq!(page.page_info.total_pages, 3);
  assert!(page.page_info.has_next_page);
  assert!(page.page_info.has_previous_page);
}

#[tokio::test]
async fn list_questions_filters_by_tag_and_text() {
  let s = store().await;
  let ada = user(&s, "ada").await;
  let rust = ask(&s, &ada, "Borrowing in closures", BODY, &["rust"]).await;
  ask(&s, &ada, "Closures in JavaScript", BODY, &["js"]).await;

  let by_tag = QuestionQuery { tag: Some("rust".into()), ..Default::default() };
  let page = s.list_questions(&by_tag).await.unwrap();
  assert_eq!(page.items.len(), 1);
  assert_eq!(page.items[0].question_id, rust);

  let by_text = QuestionQuery {
    text: Some(SearchText::new("CLOSURES")),
    ..Default::default()
  };
  assert_eq!(s.list_questions(&by_text).await.unwrap().items.len(), 2);

  let both = QuestionQuery {
    text: Some(SearchText::new("closures")),
    tag: Some("js".into()),
    ..Default::default()
  };
  let page = s.list_questions(&both).await.unwrap();
  assert_eq!(page.page_info.total_items, 1);
  assert_ne!(page.items[0].question_id, rust);
}

#[tokio::test]
async fn page_past_the_end_is_empty() {
  let s = store().await;
  let ada = user(&s, "ada").await;
  ask(&s, &ada, "Only question here", BODY, &["x"]).await;

  let q = QuestionQuery {
    page: PageRequest::new(5, 10).unwrap(),
    ..Default::default()
  };
  let page = s.list_questions(&q).await.unwrap();
  assert!(page.items.is_empty());
  assert_eq!(page.page_info.total_items, 1);
  assert!(!page.page_info.has_next_page);
}

// ─── Search ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn search_ranks_title_hits_and_density() {
  let s = store().await;
  let ada = user(&s, "ada").await;
  let body_once = ask(
    &s,
    &ada,
    "Generic typing question",
    "How do I configure typescript for a monorepo?",
    &["config"],
  )
  .await;
  let title = ask(
    &s,
    &ada,
    "TypeScript generics explained",
    "Looking for a clear explanation of the basics.",
    &["ts"],
  )
  .await;
  let dense = ask(
    &s,
    &ada,
    "TypeScript and TypeScript tooling",
    "TypeScript compiler flags in typescript projects.",
    &["ts"],
  )
  .await;
  ask(&s, &ada, "Unrelated rust question", BODY, &["rust"]).await;

  let q = SearchQuery::new("typescript", SearchSort::Relevance, PageRequest::default())
    .unwrap();
  let page = s.search_questions(&q).await.unwrap();
  let ids: Vec<_> = page.items.iter().map(|q| q.question_id).collect();
  assert_eq!(ids, vec![dense, title, body_once]);
  assert_eq!(page.page_info.total_items, 3);
}

#[tokio::test]
async fn search_relevance_ties_break_by_votes() {
  let s = store().await;
  let ada = user(&s, "ada").await;
  let a = ask(&s, &ada, "Async traits today", BODY, &["x"]).await;
  let b = ask(&s, &ada, "Async traits again", BODY, &["x"]).await;
  s.cast_vote(TargetType::Question, a, "bob".into(), VoteValue::Up)
    .await
    .unwrap();

  let q = SearchQuery::new("async", SearchSort::Relevance, PageRequest::default())
    .unwrap();
  let page = s.search_questions(&q).await.unwrap();
  let ids: Vec<_> = page.items.iter().map(|q| q.question_id).collect();
  assert_eq!(ids, vec![a, b]);

  let q = SearchQuery::new("async", SearchSort::New, PageRequest::default()).unwrap();
  let page = s.search_questions(&q).await.unwrap();
  assert_eq!(page.items[0].question_id, b);
}

#[tokio::test]
async fn search_without_matches_is_empty() {
  let s = store().await;
  let ada = user(&s, "ada").await;
  ask(&s, &ada, "Something else entirely", BODY, &["x"]).await;

  let q = SearchQuery::new("haskell", SearchSort::Relevance, PageRequest::default())
    .unwrap();
  let page = s.search_questions(&q).await.unwrap();
  assert!(page.items.is_empty());
  assert_eq!(page.page_info.total_items, 0);
}

// ─── Tags ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn top_tags_counts_and_orders() {
  let s = store().await;
  let ada = user(&s, "ada").await;
  ask(&s, &ada, "First question title", BODY, &["js", "react"]).await;
  ask(&s, &ada, "Second question title", BODY, &["js", "ts"]).await;
  ask(&s, &ada, "Third question title", BODY, &["js", "react", "ts"]).await;

  let top = s.top_tags(TagLimit::default()).await.unwrap();
  let expect = |tag: &str, count| TagCount { tag: tag.into(), count };
  assert_eq!(top, vec![expect("js", 3), expect("react", 2), expect("ts", 2)]);

  let one = s.top_tags(TagLimit::new(1).unwrap()).await.unwrap();
  assert_eq!(one, vec![expect("js", 3)]);
}

#[tokio::test]
async fn health_check_and_close() {
  let s = store().await;
  s.health_check().await.unwrap();
  s.close().await.unwrap();
}

// ─── Multiple handles ────────────────────────────────────────────────────────
//
// Each `SqliteStore` owns its own connection thread, so two handles on one
// file contend through SQLite locking exactly as two server processes would.

const DB_FILE: &str = "hive.sqlite3";

async fn two_handles() -> (tempfile::TempDir, SqliteStore, SqliteStore) {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join(DB_FILE);
  let a = SqliteStore::open(&path).await.unwrap();
  let b = SqliteStore::open(&path).await.unwrap();
  (dir, a, b)
}

/// Live `(voter, value)` rows for a question, read straight from the file.
fn live_votes(dir: &tempfile::TempDir, question_id: Uuid) -> Vec<(String, i64)> {
  let conn = rusqlite::Connection::open(dir.path().join(DB_FILE)).unwrap();
  let mut stmt = conn
    .prepare(
      "SELECT voter_subject, value FROM votes
       WHERE target_type = 'question' AND target_id = ?1
       ORDER BY voter_subject",
    )
    .unwrap();
  stmt
    .query_map([encode_uuid(question_id)], |r| Ok((r.get(0)?, r.get(1)?)))
    .unwrap()
    .collect::<rusqlite::Result<Vec<_>>>()
    .unwrap()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn votes_from_two_handles_stay_consistent() {
  let (dir, a, b) = two_handles().await;
  let ada = user(&a, "ada").await;
  let id = ask(&a, &ada, "A question title", BODY, &["rust"]).await;

  let mut tasks = Vec::new();
  // 24 distinct voters; every fourth votes down.
  for i in 0..24 {
    let s = if i % 2 == 0 { a.clone() } else { b.clone() };
    let value = if i % 4 == 0 { VoteValue::Down } else { VoteValue::Up };
    tasks.push(tokio::spawn(async move {
      s.cast_vote(TargetType::Question, id, format!("voter-{i:02}"), value)
        .await
    }));
  }
  // Repeat voters cast the same value three times across both handles:
  // on, off, on.
  for i in 0..6 {
    for n in 0..3 {
      let s = if n % 2 == 0 { a.clone() } else { b.clone() };
      tasks.push(tokio::spawn(async move {
        s.cast_vote(TargetType::Question, id, format!("repeat-{i}"), VoteValue::Up)
          .await
      }));
    }
  }
  for task in tasks {
    task.await.unwrap().unwrap();
  }

  let live = live_votes(&dir, id);
  assert_eq!(live.len(), 30);
  let mut voters: Vec<_> = live.iter().map(|(v, _)| v.as_str()).collect();
  voters.dedup();
  assert_eq!(voters.len(), live.len(), "one live vote per voter");

  let sum: i64 = live.iter().map(|(_, v)| v).sum();
  assert_eq!(sum, 18 - 6 + 6);
  for s in [&a, &b] {
    let q = s.get_question(id).await.unwrap().unwrap();
    assert_eq!(q.vote_count, sum);
  }

  for i in 0..6 {
    let t = b
      .tally(TargetType::Question, id, format!("repeat-{i}"))
      .await
      .unwrap();
    assert_eq!(t.user_vote, Some(VoteValue::Up));
  }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn answers_from_two_handles_are_all_counted() {
  let (_dir, a, b) = two_handles().await;
  let ada = user(&a, "ada").await;
  let bob = user(&b, "bob").await;
  let id = ask(&a, &ada, "A question title", BODY, &["rust"]).await;

  let tasks: Vec<_> = (0..20)
    .map(|i| {
      let s = if i % 2 == 0 { a.clone() } else { b.clone() };
      let author = bob.clone();
      tokio::spawn(async move { s.add_answer(id, author, BODY.into()).await })
    })
    .collect();
  for task in tasks {
    task.await.unwrap().unwrap();
  }

  let q = a.get_question(id).await.unwrap().unwrap();
  assert_eq!(q.answer_count, 20);
  let page = b.list_answers(id, &AnswerQuery::default()).await.unwrap();
  assert_eq!(page.page_info.total_items, 20);
}

#[tokio::test]
async fn ledger_rejects_a_second_row_for_the_same_voter() {
  let (dir, _a, _b) = two_handles().await;
  let conn = rusqlite::Connection::open(dir.path().join(DB_FILE)).unwrap();
  let target = encode_uuid(Uuid::new_v4());
  let insert = |vote_id: &str| {
    conn.execute(
      "INSERT INTO votes (
         vote_id, target_type, target_id, voter_subject, value,
         created_at, updated_at
       ) VALUES (?1, 'question', ?2, 'bob', 1, '', '')",
      rusqlite::params![vote_id, target],
    )
  };

  insert("v1").unwrap();
  let err = insert("v2").unwrap_err();
  assert!(is_unique_violation(&err), "{err}");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn listing_total_matches_items_while_another_handle_writes() {
  let (_dir, a, b) = two_handles().await;
  let ada = user(&b, "ada").await;

  let writer = tokio::spawn(async move {
    for i in 0..30 {
      ask(&b, &ada, &format!("Question number {i}"), BODY, &["x"]).await;
    }
  });

  let query = QuestionQuery {
    page: PageRequest::new(1, 50).unwrap(),
    ..Default::default()
  };
  while !writer.is_finished() {
    let page = a.list_questions(&query).await.unwrap();
    assert_eq!(page.items.len() as u64, page.page_info.total_items);
  }
  writer.await.unwrap();

  let page = a.list_questions(&query).await.unwrap();
  assert_eq!(page.page_info.total_items, 30);
  assert_eq!(page.items.len(), 30);
}
