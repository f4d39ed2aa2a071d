//! `GET /tags/top?limit=` → `{"tags": [{"tag", "count"}]}`

use axum::{Json, extract::State};
use hive_core::{
  query::{TagCount, TagLimit},
  store::ForumStore,
};
use serde::{Deserialize, Serialize};

use crate::{
  AppState,
  error::{ApiError, QueryParams},
};

#[derive(Debug, Deserialize)]
pub struct TopParams {
  pub limit: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct TopTags {
  pub tags: Vec<TagCount>,
}

pub async fn top<S>(
  State(state): State<AppState<S>>,
  QueryParams(params): QueryParams<TopParams>,
) -> Result<Json<TopTags>, ApiError>
where
  S: ForumStore + 'static,
  hive_core::Error: From<S::Error>,
{
  let limit = params.limit.map(TagLimit::new).transpose()?.unwrap_or_default();
  let tags = state.forum.top_tags(limit).await?;
  Ok(Json(TopTags { tags }))
}
