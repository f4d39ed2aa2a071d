//! Offset pagination.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const MAX_PAGE_SIZE: u32 = 50;

/// A validated `(page, page_size)` pair. Pages are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
  page:      u32,
  page_size: u32,
}

impl PageRequest {
  pub fn new(page: u32, page_size: u32) -> Result<Self> {
    if page < 1 {
      return Err(Error::validation("page must be at least 1"));
    }
    if !(1..=MAX_PAGE_SIZE).contains(&page_size) {
      return Err(Error::validation(format!(
        "limit must be between 1 and {MAX_PAGE_SIZE}"
      )));
    }
    Ok(Self { page, page_size })
  }

  pub fn page(&self) -> u32 { self.page }

  pub fn page_size(&self) -> u32 { self.page_size }

  /// Rows to skip: `(page - 1) * page_size`.
  pub fn offset(&self) -> u64 {
    u64::from(self.page - 1) * u64::from(self.page_size)
  }
}

impl Default for PageRequest {
  fn default() -> Self { Self { page: 1, page_size: DEFAULT_PAGE_SIZE } }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
  pub current_page:      u32,
  pub page_size:         u32,
  pub total_items:       u64,
  pub total_pages:       u64,
  pub has_next_page:     bool,
  pub has_previous_page: bool,
}

impl PageInfo {
  pub fn new(request: PageRequest, total_items: u64) -> Self {
    let size = u64::from(request.page_size);
    Self {
      current_page: request.page,
      page_size: request.page_size,
      total_items,
      total_pages: total_items.div_ceil(size),
      has_next_page: u64::from(request.page) * size < total_items,
      has_previous_page: request.page > 1,
    }
  }
}

/// One page of results plus the bookkeeping to fetch the next.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
  pub items:     Vec<T>,
  pub page_info: PageInfo,
}

impl<T> Page<T> {
  pub fn new(items: Vec<T>, request: PageRequest, total_items: u64) -> Self {
    Self { items, page_info: PageInfo::new(request, total_items) }
  }

  pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
    Page {
      items:     self.items.into_iter().map(f).collect(),
      page_info: self.page_info,
    }
  }
}
