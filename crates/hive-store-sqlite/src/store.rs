//! [`SqliteStore`] — the SQLite implementation of [`ForumStore`].

use std::{collections::HashMap, path::Path, time::Duration};

use chrono::Utc;
use rusqlite::{
  Connection, OptionalExtension as _, TransactionBehavior, params,
  params_from_iter, types::Value,
};
use tracing::debug;
use uuid::Uuid;

use hive_core::{
  answer::Answer,
  page::{Page, PageRequest},
  query::{AnswerQuery, QuestionQuery, SearchQuery, TagCount, TagLimit},
  question::{NewQuestion, Question, QuestionPatch},
  store::ForumStore,
  user::{Identity, User},
  vote::{TargetType, VoteOutcome, VoteValue},
};

use crate::{
  Error, Result,
  encode::{
    ANSWER_COLUMNS, QUESTION_COLUMNS, RawAnswer, RawQuestion, RawUser,
    USER_COLUMNS, decode_uuid, decode_vote_value, encode_dt, encode_tags,
    encode_uuid,
  },
  ledger::{self, Cast, is_unique_violation},
  query::{self, PagedSelect},
  schema::SCHEMA,
};

/// How long a writer waits on another process's lock before failing.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Outcome of an ownership-checked edit, decided on the connection thread.
enum Edit<T> {
  Done(T),
  Missing,
  Forbidden,
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Hive forum store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Flush and close the underlying connection.
  pub async fn close(self) -> Result<()> {
    self.conn.close().await?;
    Ok(())
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.busy_timeout(BUSY_TIMEOUT)?;
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Run a paged select and its count in one read transaction, so the total
  /// and the items come from the same snapshot.
  async fn paged<R, T>(
    &self,
    select: PagedSelect,
    page: PageRequest,
    from_row: fn(&rusqlite::Row<'_>) -> rusqlite::Result<R>,
    decode: fn(R) -> Result<T>,
  ) -> Result<Page<T>>
  where
    R: Send + 'static,
  {
    let (raws, total) = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Deferred)?;
        let out = run_paged(&tx, &select, from_row)?;
        tx.commit()?;
        Ok(out)
      })
      .await?;
    let items = raws.into_iter().map(decode).collect::<Result<Vec<_>>>()?;
    Ok(Page::new(items, page, total))
  }
}

fn run_paged<R>(
  conn: &Connection,
  select: &PagedSelect,
  from_row: fn(&rusqlite::Row<'_>) -> rusqlite::Result<R>,
) -> rusqlite::Result<(Vec<R>, u64)> {
  let mut stmt = conn.prepare(&select.items_sql)?;
  let rows = stmt
    .query_map(params_from_iter(select.params.iter()), from_row)?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  let total: i64 = conn.query_row(
    &select.count_sql,
    params_from_iter(select.params.iter()),
    |r| r.get(0),
  )?;
  Ok((rows, u64::try_from(total).unwrap_or(0)))
}

fn find_user(conn: &Connection, subject: &str) -> rusqlite::Result<Option<RawUser>> {
  conn
    .query_row(
      &format!("SELECT {USER_COLUMNS} FROM users WHERE subject = ?1"),
      params![subject],
      RawUser::from_row,
    )
    .optional()
}

fn insert_user(
  conn: &Connection,
  user_id: &str,
  identity: &Identity,
  email: Option<&str>,
  now: &str,
) -> rusqlite::Result<usize> {
  conn.execute(
    "INSERT INTO users (
       user_id, subject, email, display_name, created_at, updated_at
     ) VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
    params![user_id, identity.subject, email, identity.display_name(), now],
  )
}

fn find_question(conn: &Connection, id: &str) -> rusqlite::Result<Option<RawQuestion>> {
  conn
    .query_row(
      &format!("SELECT {QUESTION_COLUMNS} FROM questions q WHERE q.question_id = ?1"),
      params![id],
      RawQuestion::from_row,
    )
    .optional()
}

fn find_answer(conn: &Connection, id: &str) -> rusqlite::Result<Option<RawAnswer>> {
  conn
    .query_row(
      &format!("SELECT {ANSWER_COLUMNS} FROM answers a WHERE a.answer_id = ?1"),
      params![id],
      RawAnswer::from_row,
    )
    .optional()
}

fn insert_tags(conn: &Connection, question_id: &str, tags: &[String]) -> rusqlite::Result<()> {
  let mut stmt =
    conn.prepare("INSERT OR IGNORE INTO question_tags (question_id, tag) VALUES (?1, ?2)")?;
  for tag in tags {
    stmt.execute(params![question_id, tag])?;
  }
  Ok(())
}

/// `author_subject` of a row, or `None` if the row is missing.
fn author_of(
  conn: &Connection,
  table: &str,
  id_col: &str,
  id: &str,
) -> rusqlite::Result<Option<String>> {
  conn
    .query_row(
      &format!("SELECT author_subject FROM {table} WHERE {id_col} = ?1"),
      params![id],
      |r| r.get(0),
    )
    .optional()
}

fn not_found(target_type: TargetType, id: Uuid) -> Error {
  match target_type {
    TargetType::Question => Error::QuestionNotFound(id),
    TargetType::Answer => Error::AnswerNotFound(id),
  }
}

// ─── ForumStore impl ─────────────────────────────────────────────────────────

impl ForumStore for SqliteStore {
  type Error = Error;

  async fn health_check(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.query_row("SELECT 1", [], |_| Ok(()))?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  // ── Identity ──────────────────────────────────────────────────────────────

  async fn resolve_user(&self, identity: Identity) -> Result<User> {
    let new_id = encode_uuid(Uuid::new_v4());
    let now = encode_dt(Utc::now());

    let (raw, created) = self
      .conn
      .call(move |conn| {
        if let Some(existing) = find_user(conn, &identity.subject)? {
          return Ok((Some(existing), false));
        }

        let email = identity.email.as_deref().filter(|e| !e.trim().is_empty());
        match insert_user(conn, &new_id, &identity, email, &now) {
          Ok(_) => {}
          Err(e) if is_unique_violation(&e) => {
            // Another request created this subject first.
            if let Some(existing) = find_user(conn, &identity.subject)? {
              return Ok((Some(existing), false));
            }
            // Otherwise the email belongs to a different subject.
            insert_user(conn, &new_id, &identity, None, &now)?;
          }
          Err(e) => return Err(e.into()),
        }
        Ok((find_user(conn, &identity.subject)?, true))
      })
      .await?;

    let user = raw
      .ok_or_else(|| Error::Corrupt("user vanished after insert".into()))?
      .into_user()?;
    if created {
      debug!(user_id = %user.user_id, subject = %user.subject, "user created");
    }
    Ok(user)
  }

  // ── Questions ─────────────────────────────────────────────────────────────

  async fn add_question(
    &self,
    author: User,
    input: NewQuestion,
    ai_draft_answer: Option<String>,
  ) -> Result<Question> {
    let now = Utc::now();
    let question = Question {
      question_id: Uuid::new_v4(),
      title: input.title,
      body: input.body,
      tags: input.tags,
      author_id: author.user_id,
      author_subject: author.subject,
      author_display_name: author.display_name,
      vote_count: 0,
      answer_count: 0,
      ai_draft_answer,
      created_at: now,
      updated_at: now,
    };

    let id_str = encode_uuid(question.question_id);
    let tags_json = encode_tags(&question.tags)?;
    let author_id = encode_uuid(question.author_id);
    let at = encode_dt(now);
    let row = question.clone();

    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        tx.execute(
          "INSERT INTO questions (
             question_id, title, body, tags, author_id, author_subject,
             author_name, vote_count, answer_count, ai_draft_answer,
             created_at, updated_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, 0, 0, ?8, ?9, ?9)",
          params![
            id_str,
            row.title,
            row.body,
            tags_json,
            author_id,
            row.author_subject,
            row.author_display_name,
            row.ai_draft_answer,
            at,
          ],
        )?;
        insert_tags(&tx, &id_str, &row.tags)?;
        tx.commit()?;
        Ok(())
      })
      .await?;

    Ok(question)
  }

  async fn get_question(&self, id: Uuid) -> Result<Option<Question>> {
    let id_str = encode_uuid(id);
    let raw = self
      .conn
      .call(move |conn| Ok(find_question(conn, &id_str)?))
      .await?;
    raw.map(RawQuestion::into_question).transpose()
  }

  async fn update_question(
    &self,
    id: Uuid,
    editor_subject: String,
    patch: QuestionPatch,
  ) -> Result<Question> {
    let id_str = encode_uuid(id);
    let tags_json = patch.tags.as_deref().map(encode_tags).transpose()?;
    let at = encode_dt(Utc::now());

    let edit = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        match author_of(&tx, "questions", "question_id", &id_str)? {
          None => return Ok(Edit::Missing),
          Some(author) if author != editor_subject => return Ok(Edit::Forbidden),
          Some(_) => {}
        }

        tx.execute(
          "UPDATE questions SET
             title      = COALESCE(?2, title),
             body       = COALESCE(?3, body),
             tags       = COALESCE(?4, tags),
             updated_at = ?5
           WHERE question_id = ?1",
          params![id_str, patch.title, patch.body, tags_json, at],
        )?;
        if let Some(tags) = &patch.tags {
          tx.execute(
            "DELETE FROM question_tags WHERE question_id = ?1",
            params![id_str],
          )?;
          insert_tags(&tx, &id_str, tags)?;
        }

        let row = find_question(&tx, &id_str)?;
        tx.commit()?;
        Ok(row.map_or(Edit::Missing, Edit::Done))
      })
      .await?;

    match edit {
      Edit::Done(raw) => raw.into_question(),
      Edit::Missing => Err(Error::QuestionNotFound(id)),
      Edit::Forbidden => Err(Error::NotAuthor { kind: "question", id }),
    }
  }

  // ── Answers ───────────────────────────────────────────────────────────────

  async fn add_answer(
    &self,
    question_id: Uuid,
    author: User,
    body: String,
  ) -> Result<Answer> {
    let now = Utc::now();
    let answer = Answer {
      answer_id: Uuid::new_v4(),
      question_id,
      body,
      author_id: author.user_id,
      author_subject: author.subject,
      author_display_name: author.display_name,
      vote_count: 0,
      created_at: now,
      updated_at: now,
    };

    let id_str = encode_uuid(answer.answer_id);
    let question_str = encode_uuid(question_id);
    let author_id = encode_uuid(answer.author_id);
    let at = encode_dt(now);
    let row = answer.clone();

    let inserted = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let bumped = tx.execute(
          "UPDATE questions SET answer_count = answer_count + 1
           WHERE question_id = ?1",
          params![question_str],
        )?;
        if bumped == 0 {
          return Ok(false);
        }
        tx.execute(
          "INSERT INTO answers (
             answer_id, question_id, body, author_id, author_subject,
             author_name, vote_count, created_at, updated_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, 0, ?7, ?7)",
          params![
            id_str,
            question_str,
            row.body,
            author_id,
            row.author_subject,
            row.author_display_name,
            at,
          ],
        )?;
        tx.commit()?;
        Ok(true)
      })
      .await?;

    if !inserted {
      return Err(Error::QuestionNotFound(question_id));
    }
    Ok(answer)
  }

  async fn update_answer(
    &self,
    id: Uuid,
    editor_subject: String,
    body: String,
  ) -> Result<Answer> {
    let id_str = encode_uuid(id);
    let at = encode_dt(Utc::now());

    let edit = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        match author_of(&tx, "answers", "answer_id", &id_str)? {
          None => return Ok(Edit::Missing),
          Some(author) if author != editor_subject => return Ok(Edit::Forbidden),
          Some(_) => {}
        }
        tx.execute(
          "UPDATE answers SET body = ?2, updated_at = ?3 WHERE answer_id = ?1",
          params![id_str, body, at],
        )?;
        let row = find_answer(&tx, &id_str)?;
        tx.commit()?;
        Ok(row.map_or(Edit::Missing, Edit::Done))
      })
      .await?;

    match edit {
      Edit::Done(raw) => raw.into_answer(),
      Edit::Missing => Err(Error::AnswerNotFound(id)),
      Edit::Forbidden => Err(Error::NotAuthor { kind: "answer", id }),
    }
  }

  // ── Votes ─────────────────────────────────────────────────────────────────

  async fn cast_vote(
    &self,
    target_type: TargetType,
    target_id: Uuid,
    voter_subject: String,
    value: VoteValue,
  ) -> Result<VoteOutcome> {
    let id_str = encode_uuid(target_id);
    let vote_id = encode_uuid(Uuid::new_v4());
    let at = encode_dt(Utc::now());

    let cast = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let cast = ledger::cast(
          &tx,
          target_type,
          &id_str,
          &voter_subject,
          value,
          &vote_id,
          &at,
        )?;
        // Anything but a completed cast rolls back on drop.
        if matches!(cast, Cast::Done(_)) {
          tx.commit()?;
        }
        Ok(cast)
      })
      .await?;

    match cast {
      Cast::Done(outcome) => {
        debug!(
          %target_type, %target_id,
          vote_count = outcome.vote_count,
          "vote cast"
        );
        Ok(outcome)
      }
      Cast::Missing => Err(not_found(target_type, target_id)),
      Cast::Race => Err(Error::VoteRace { target_id }),
    }
  }

  async fn tally(
    &self,
    target_type: TargetType,
    target_id: Uuid,
    voter_subject: String,
  ) -> Result<VoteOutcome> {
    let id_str = encode_uuid(target_id);
    self
      .conn
      .call(move |conn| ledger::tally(conn, target_type, &id_str, &voter_subject))
      .await?
      .ok_or_else(|| not_found(target_type, target_id))
  }

  async fn user_votes(
    &self,
    target_type: TargetType,
    target_ids: Vec<Uuid>,
    voter_subject: String,
  ) -> Result<HashMap<Uuid, VoteValue>> {
    if target_ids.is_empty() {
      return Ok(HashMap::new());
    }

    let mut params: Vec<Value> = vec![
      Value::Text(target_type.as_str().to_owned()),
      Value::Text(voter_subject),
    ];
    params.extend(target_ids.iter().map(|id| Value::Text(encode_uuid(*id))));
    let slots = (3..=params.len())
      .map(|i| format!("?{i}"))
      .collect::<Vec<_>>()
      .join(", ");
    let sql = format!(
      "SELECT target_id, value FROM votes
       WHERE target_type = ?1 AND voter_subject = ?2 AND target_id IN ({slots})"
    );

    let rows: Vec<(String, i64)> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(params_from_iter(params.iter()), |r| {
            Ok((r.get(0)?, r.get(1)?))
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    rows
      .into_iter()
      .map(|(id, v)| Ok((decode_uuid(&id)?, decode_vote_value(v)?)))
      .collect()
  }

  // ── Queries ───────────────────────────────────────────────────────────────

  async fn list_questions<'a>(&'a self, query: &'a QuestionQuery) -> Result<Page<Question>> {
    self
      .paged(
        query::list_questions(query),
        query.page,
        RawQuestion::from_row,
        RawQuestion::into_question,
      )
      .await
  }

  async fn search_questions<'a>(&'a self, query: &'a SearchQuery) -> Result<Page<Question>> {
    self
      .paged(
        query::search_questions(query),
        query.page,
        RawQuestion::from_row,
        RawQuestion::into_question,
      )
      .await
  }

  async fn list_answers<'a>(
    &'a self,
    question_id: Uuid,
    query: &'a AnswerQuery,
  ) -> Result<Page<Answer>> {
    let question_str = encode_uuid(question_id);
    let select = query::list_answers(&question_str, query);

    let found = self
      .conn
      .call(move |conn| {
        if !ledger::target_exists(conn, TargetType::Question, &question_str)? {
          return Ok(None);
        }
        Ok(Some(run_paged(conn, &select, RawAnswer::from_row)?))
      })
      .await?;

    let (raws, total) = found.ok_or(Error::QuestionNotFound(question_id))?;
    let items = raws
      .into_iter()
      .map(RawAnswer::into_answer)
      .collect::<Result<Vec<_>>>()?;
    Ok(Page::new(items, query.page, total))
  }

  async fn top_tags(&self, limit: TagLimit) -> Result<Vec<TagCount>> {
    let limit = i64::from(limit.get());
    let rows: Vec<(String, i64)> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT tag, COUNT(*) AS n FROM question_tags
           GROUP BY tag
           ORDER BY n DESC, tag ASC
           LIMIT ?1",
        )?;
        let rows = stmt
          .query_map(params![limit], |r| Ok((r.get(0)?, r.get(1)?)))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(
      rows
        .into_iter()
        .map(|(tag, n)| TagCount { tag, count: u64::try_from(n).unwrap_or(0) })
        .collect(),
    )
  }
}
