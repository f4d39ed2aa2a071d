//! Handlers for `/questions` endpoints.
//!
//! | Method  | Path | Notes |
//! |---------|------|-------|
//! | `GET`   | `/questions` | `?q=&tag=&sort=new\|votes\|answers&page=&limit=` |
//! | `POST`  | `/questions` | Auth. Body: `{"title","body","tags":[]}`; 201 |
//! | `GET`   | `/questions/:id` | 400 on a malformed id, 404 if missing |
//! | `PATCH` | `/questions/:id` | Auth, author only; any of `title`, `body`, `tags` |

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use hive_core::{
  page::Page,
  query::{QuestionQuery, QuestionSort, SEARCH_MAX_CHARS, SearchText},
  question::{NewQuestion, QuestionPatch},
  store::ForumStore,
};
use serde::Deserialize;

use crate::{
  AppState, page_request,
  auth::{Authenticated, MaybeAuthenticated},
  error::{ApiError, JsonBody, QueryParams, parse_id},
  views::QuestionJson,
};

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub q:     Option<String>,
  pub tag:   Option<String>,
  pub sort:  Option<QuestionSort>,
  pub page:  Option<u32>,
  pub limit: Option<u32>,
}

fn non_blank(s: Option<String>) -> Option<String> {
  s.map(|s| s.trim().to_owned()).filter(|s| !s.is_empty())
}

impl ListParams {
  fn into_query(self) -> Result<QuestionQuery, ApiError> {
    let text = non_blank(self.q);
    if text.as_ref().is_some_and(|t| t.chars().count() > SEARCH_MAX_CHARS) {
      return Err(ApiError::BadRequest(format!(
        "q must be at most {SEARCH_MAX_CHARS} characters"
      )));
    }
    Ok(QuestionQuery {
      text: text.as_deref().map(SearchText::new),
      tag:  non_blank(self.tag),
      sort: self.sort.unwrap_or_default(),
      page: page_request(self.page, self.limit)?,
    })
  }
}

/// `GET /questions`
pub async fn list<S>(
  State(state): State<AppState<S>>,
  MaybeAuthenticated(viewer): MaybeAuthenticated,
  QueryParams(params): QueryParams<ListParams>,
) -> Result<Json<Page<QuestionJson>>, ApiError>
where
  S: ForumStore + 'static,
  hive_core::Error: From<S::Error>,
{
  let query = params.into_query()?;
  let page = state.forum.list_questions(&query, viewer.as_ref()).await?;
  Ok(Json(page.map(QuestionJson::summary)))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /questions/:id`
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  MaybeAuthenticated(viewer): MaybeAuthenticated,
  Path(id): Path<String>,
) -> Result<Json<QuestionJson>, ApiError>
where
  S: ForumStore + 'static,
  hive_core::Error: From<S::Error>,
{
  let id = parse_id(&id)?;
  let view = state.forum.get_question(id, viewer.as_ref()).await?;
  Ok(Json(QuestionJson::detail(view)))
}

// ─── Create ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub title: String,
  pub body:  String,
  pub tags:  Vec<String>,
}

/// `POST /questions`
pub async fn create<S>(
  State(state): State<AppState<S>>,
  Authenticated(author): Authenticated,
  JsonBody(body): JsonBody<CreateBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: ForumStore + 'static,
  hive_core::Error: From<S::Error>,
{
  let input = NewQuestion::new(&body.title, &body.body, body.tags)?;
  let view = state.forum.create_question(&author, input).await?;
  Ok((StatusCode::CREATED, Json(QuestionJson::detail(view))))
}

// ─── Update ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct PatchBody {
  pub title: Option<String>,
  pub body:  Option<String>,
  pub tags:  Option<Vec<String>>,
}

/// `PATCH /questions/:id`
pub async fn update<S>(
  State(state): State<AppState<S>>,
  Authenticated(editor): Authenticated,
  Path(id): Path<String>,
  JsonBody(body): JsonBody<PatchBody>,
) -> Result<Json<QuestionJson>, ApiError>
where
  S: ForumStore + 'static,
  hive_core::Error: From<S::Error>,
{
  let id = parse_id(&id)?;
  let patch = QuestionPatch::new(body.title.as_deref(), body.body.as_deref(), body.tags)?;
  if patch.is_empty() {
    return Err(ApiError::BadRequest("nothing to update".into()));
  }
  let view = state.forum.update_question(id, &editor, patch).await?;
  Ok(Json(QuestionJson::detail(view)))
}
