//! `GET /search?q=&sort=relevance|new|votes&page=&limit=`
//!
//! Response: `{"questions", "total", "page", "limit", "totalPages"}`.

use axum::{Json, extract::State};
use hive_core::{
  query::{SearchQuery, SearchSort},
  store::ForumStore,
};
use serde::{Deserialize, Serialize};

use crate::{
  AppState, page_request,
  auth::MaybeAuthenticated,
  error::{ApiError, QueryParams},
  views::QuestionJson,
};

#[derive(Debug, Deserialize)]
pub struct SearchParams {
  pub q:     Option<String>,
  pub sort:  Option<SearchSort>,
  pub page:  Option<u32>,
  pub limit: Option<u32>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
  pub questions:   Vec<QuestionJson>,
  pub total:       u64,
  pub page:        u32,
  pub limit:       u32,
  pub total_pages: u64,
}

pub async fn handler<S>(
  State(state): State<AppState<S>>,
  MaybeAuthenticated(viewer): MaybeAuthenticated,
  QueryParams(params): QueryParams<SearchParams>,
) -> Result<Json<SearchResponse>, ApiError>
where
  S: ForumStore + 'static,
  hive_core::Error: From<S::Error>,
{
  let query = SearchQuery::new(
    params.q.as_deref().unwrap_or_default(),
    params.sort.unwrap_or_default(),
    page_request(params.page, params.limit)?,
  )?;
  let page = state.forum.search_questions(&query, viewer.as_ref()).await?;
  let info = page.page_info;
  Ok(Json(SearchResponse {
    questions:   page.items.into_iter().map(QuestionJson::summary).collect(),
    total:       info.total_items,
    page:        info.current_page,
    limit:       info.page_size,
    total_pages: info.total_pages,
  }))
}
