//! SQL builders for the read side.
//!
//! Text matching is a case-insensitive substring test per term (`instr` over
//! `lower(...)`); a question matches if any term hits its title or body.
//! Relevance is term frequency, counted in SQL as
//! `(length(h) - length(replace(h, term, ''))) / length(term)`, with title
//! hits weighted by [`TITLE_WEIGHT`].

use hive_core::{
  page::PageRequest,
  query::{
    AnswerQuery, AnswerSort, QuestionQuery, QuestionSort, SearchQuery,
    SearchSort, SearchText, TITLE_WEIGHT,
  },
};
use rusqlite::types::Value;

use crate::encode::{ANSWER_COLUMNS, QUESTION_COLUMNS};

/// A paged select and its matching count, sharing one parameter list.
pub struct PagedSelect {
  pub items_sql: String,
  pub count_sql: String,
  pub params:    Vec<Value>,
}

#[derive(Default)]
struct Filter {
  conds:  Vec<String>,
  params: Vec<Value>,
}

impl Filter {
  fn bind(&mut self, v: String) -> String {
    self.params.push(Value::Text(v));
    format!("?{}", self.params.len())
  }

  /// Adds the any-term match condition; returns one placeholder per term.
  fn text(&mut self, text: &SearchText) -> Vec<String> {
    let slots: Vec<String> =
      text.terms().iter().map(|t| self.bind(t.clone())).collect();
    if !slots.is_empty() {
      let any = slots
        .iter()
        .map(|p| {
          format!("instr(lower(q.title), {p}) > 0 OR instr(lower(q.body), {p}) > 0")
        })
        .collect::<Vec<_>>()
        .join(" OR ");
      self.conds.push(format!("({any})"));
    }
    slots
  }

  fn tag(&mut self, tag: &str) {
    let p = self.bind(tag.to_owned());
    self.conds.push(format!(
      "EXISTS (SELECT 1 FROM question_tags t
               WHERE t.question_id = q.question_id AND t.tag = {p})"
    ));
  }

  fn eq(&mut self, column: &str, v: String) {
    let p = self.bind(v);
    self.conds.push(format!("{column} = {p}"));
  }

  fn where_clause(&self) -> String {
    if self.conds.is_empty() {
      String::new()
    } else {
      format!("WHERE {}", self.conds.join(" AND "))
    }
  }
}

fn occurrences(haystack: &str, slot: &str) -> String {
  format!(
    "((length(lower({haystack})) - length(replace(lower({haystack}), {slot}, ''))) / length({slot}))"
  )
}

fn relevance(slots: &[String]) -> String {
  if slots.is_empty() {
    return "0".to_owned();
  }
  slots
    .iter()
    .map(|s| {
      format!(
        "{} * {TITLE_WEIGHT} + {}",
        occurrences("q.title", s),
        occurrences("q.body", s)
      )
    })
    .collect::<Vec<_>>()
    .join(" + ")
}

fn limit_offset(page: PageRequest) -> String {
  format!("LIMIT {} OFFSET {}", page.page_size(), page.offset())
}

const NEWEST: &str = "q.created_at DESC, q.rowid DESC";

fn questions(
  filter: Filter,
  extra_column: Option<String>,
  order: String,
  page: PageRequest,
) -> PagedSelect {
  let where_clause = filter.where_clause();
  let extra = extra_column.map(|c| format!(", {c}")).unwrap_or_default();
  PagedSelect {
    items_sql: format!(
      "SELECT {QUESTION_COLUMNS}{extra} FROM questions q {where_clause}
       ORDER BY {order} {}",
      limit_offset(page)
    ),
    count_sql: format!("SELECT COUNT(*) FROM questions q {where_clause}"),
    params:    filter.params,
  }
}

pub fn list_questions(query: &QuestionQuery) -> PagedSelect {
  let mut filter = Filter::default();
  if let Some(text) = &query.text {
    filter.text(text);
  }
  if let Some(tag) = &query.tag {
    filter.tag(tag);
  }
  let order = match query.sort {
    QuestionSort::New => NEWEST.to_owned(),
    QuestionSort::Votes => format!("q.vote_count DESC, {NEWEST}"),
    QuestionSort::Answers => format!("q.answer_count DESC, {NEWEST}"),
  };
  questions(filter, None, order, query.page)
}

pub fn search_questions(query: &SearchQuery) -> PagedSelect {
  let mut filter = Filter::default();
  let slots = filter.text(&query.text);
  match query.sort {
    SearchSort::Relevance => questions(
      filter,
      Some(format!("{} AS score", relevance(&slots))),
      format!("score DESC, q.vote_count DESC, {NEWEST}"),
      query.page,
    ),
    SearchSort::New => questions(filter, None, NEWEST.to_owned(), query.page),
    SearchSort::Votes => questions(
      filter,
      None,
      format!("q.vote_count DESC, {NEWEST}"),
      query.page,
    ),
  }
}

pub fn list_answers(question_id: &str, query: &AnswerQuery) -> PagedSelect {
  let mut filter = Filter::default();
  filter.eq("a.question_id", question_id.to_owned());
  let where_clause = filter.where_clause();
  let order = match query.sort {
    AnswerSort::New => "a.created_at DESC, a.rowid DESC",
    AnswerSort::Votes => "a.vote_count DESC, a.created_at DESC, a.rowid DESC",
  };
  PagedSelect {
    items_sql: format!(
      "SELECT {ANSWER_COLUMNS} FROM answers a {where_clause}
       ORDER BY {order} {}",
      limit_offset(query.page)
    ),
    count_sql: format!("SELECT COUNT(*) FROM answers a {where_clause}"),
    params:    filter.params,
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn list_without_filters_has_no_where() {
    let s = list_questions(&QuestionQuery::default());
    assert!(!s.items_sql.contains("WHERE"));
    assert!(s.items_sql.contains("LIMIT 20 OFFSET 0"));
    assert!(s.params.is_empty());
  }

  #[test]
  fn text_and_tag_bind_in_order() {
    let q = QuestionQuery {
      text: Some(SearchText::new("borrow checker")),
      tag: Some("rust".into()),
      ..Default::default()
    };
    let s = list_questions(&q);
    assert_eq!(s.params.len(), 3);
    assert!(s.count_sql.contains("?3"));
    assert_eq!(s.params[2], Value::Text("rust".into()));
  }

  #[test]
  fn relevance_reuses_term_slots() {
    let q = SearchQuery::new("pin", SearchSort::Relevance, PageRequest::default())
      .unwrap();
    let s = search_questions(&q);
    assert_eq!(s.params.len(), 1);
    assert!(s.items_sql.contains("AS score"));
    assert!(s.items_sql.contains("ORDER BY score DESC, q.vote_count DESC"));
    assert!(!s.count_sql.contains("score"));
  }
}
