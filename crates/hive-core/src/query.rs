//! Read-side query types: listing, full-text search, answer listing and tag
//! statistics.

use serde::{Deserialize, Serialize};

use crate::{Error, Result, page::PageRequest};

pub const SEARCH_MIN_CHARS: usize = 1;
pub const SEARCH_MAX_CHARS: usize = 100;
pub const DEFAULT_TAG_LIMIT: u32 = 20;
pub const MAX_TAG_LIMIT: u32 = 50;
/// A term hit in the title counts this many times a hit in the body.
pub const TITLE_WEIGHT: i64 = 2;
/// Terms beyond this many are ignored.
pub const MAX_SEARCH_TERMS: usize = 16;

// ─── Sort keys ───────────────────────────────────────────────────────────────

/// Every key except `New` breaks ties by creation time, newest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionSort {
  #[default]
  New,
  Votes,
  Answers,
}

/// `Relevance` breaks ties by vote count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchSort {
  #[default]
  Relevance,
  New,
  Votes,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnswerSort {
  New,
  #[default]
  Votes,
}

// ─── Queries ─────────────────────────────────────────────────────────────────

/// Parameters for [`crate::store::ForumStore::list_questions`].
#[derive(Debug, Clone, Default)]
pub struct QuestionQuery {
  /// Free-text filter over title and body.
  pub text: Option<SearchText>,
  /// Exact tag match.
  pub tag:  Option<String>,
  pub sort: QuestionSort,
  pub page: PageRequest,
}

/// Parameters for [`crate::store::ForumStore::search_questions`].
#[derive(Debug, Clone)]
pub struct SearchQuery {
  pub text: SearchText,
  pub sort: SearchSort,
  pub page: PageRequest,
}

impl SearchQuery {
  /// Search text must be 1–100 characters once trimmed.
  pub fn new(text: &str, sort: SearchSort, page: PageRequest) -> Result<Self> {
    let len = text.trim().chars().count();
    if !(SEARCH_MIN_CHARS..=SEARCH_MAX_CHARS).contains(&len) {
      return Err(Error::validation(format!(
        "search query must be between {SEARCH_MIN_CHARS} and {SEARCH_MAX_CHARS} characters"
      )));
    }
    Ok(Self { text: SearchText::new(text), sort, page })
  }
}

/// Parameters for [`crate::store::ForumStore::list_answers`].
#[derive(Debug, Clone, Copy, Default)]
pub struct AnswerQuery {
  pub sort: AnswerSort,
  pub page: PageRequest,
}

/// Validated `limit` for the top-tags aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagLimit(u32);

impl TagLimit {
  pub fn new(limit: u32) -> Result<Self> {
    if !(1..=MAX_TAG_LIMIT).contains(&limit) {
      return Err(Error::validation(format!(
        "limit must be between 1 and {MAX_TAG_LIMIT}"
      )));
    }
    Ok(Self(limit))
  }

  pub fn get(self) -> u32 { self.0 }
}

impl Default for TagLimit {
  fn default() -> Self { Self(DEFAULT_TAG_LIMIT) }
}

/// A tag and the number of questions carrying it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagCount {
  pub tag:   String,
  pub count: u64,
}

// ─── Search text ─────────────────────────────────────────────────────────────

/// Query text broken into lowercase match terms.
///
/// A question matches when any term occurs as a case-insensitive substring of
/// its title or body, so text that appears verbatim always matches. Casing is
/// folded for ASCII only, matching SQLite's `lower()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchText {
  terms: Vec<String>,
}

impl SearchText {
  pub fn new(raw: &str) -> Self {
    let mut terms: Vec<String> = Vec::new();
    for word in raw.split(|c: char| !c.is_alphanumeric()) {
      let word = word.to_ascii_lowercase();
      if !word.is_empty() && !terms.contains(&word) {
        terms.push(word);
      }
    }
    // Punctuation-only queries such as "++" still have to match themselves.
    if terms.is_empty() {
      let whole = raw.trim().to_ascii_lowercase();
      if !whole.is_empty() {
        terms.push(whole);
      }
    }
    terms.truncate(MAX_SEARCH_TERMS);
    Self { terms }
  }

  pub fn terms(&self) -> &[String] { &self.terms }

  pub fn is_empty(&self) -> bool { self.terms.is_empty() }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn terms_are_lowercased_and_deduplicated() {
    let t = SearchText::new("TypeScript generics, typescript GENERICS!");
    assert_eq!(t.terms(), ["typescript", "generics"]);
  }

  #[test]
  fn punctuation_splits_words() {
    let t = SearchText::new("node.js async/await");
    assert_eq!(t.terms(), ["node", "js", "async", "await"]);
  }

  #[test]
  fn punctuation_only_query_keeps_whole_text() {
    let t = SearchText::new(" ++ ");
    assert_eq!(t.terms(), ["++"]);
    assert!(SearchText::new("   ").is_empty());
  }

  #[test]
  fn term_count_is_capped() {
    let raw = (0..40).map(|i| format!("w{i}")).collect::<Vec<_>>().join(" ");
    assert_eq!(SearchText::new(&raw).terms().len(), MAX_SEARCH_TERMS);
  }

  #[test]
  fn search_length_bounds() {
    let page = PageRequest::default();
    assert!(SearchQuery::new("", SearchSort::Relevance, page).is_err());
    assert!(SearchQuery::new("   ", SearchSort::Relevance, page).is_err());
    assert!(SearchQuery::new("x", SearchSort::Relevance, page).is_ok());
    assert!(SearchQuery::new(&"x".repeat(100), SearchSort::New, page).is_ok());
    assert!(SearchQuery::new(&"x".repeat(101), SearchSort::New, page).is_err());
  }

  #[test]
  fn tag_limit_bounds() {
    assert!(TagLimit::new(0).is_err());
    assert!(TagLimit::new(51).is_err());
    assert_eq!(TagLimit::new(50).unwrap().get(), 50);
    assert_eq!(TagLimit::default().get(), DEFAULT_TAG_LIMIT);
  }

  #[test]
  fn sort_keys_parse_lowercase() {
    let s: QuestionSort = serde_json::from_str("\"answers\"").unwrap();
    assert_eq!(s, QuestionSort::Answers);
    assert_eq!(AnswerSort::default(), AnswerSort::Votes);
    assert_eq!(SearchSort::default(), SearchSort::Relevance);
  }
}
