//! Handlers for answer endpoints.
//!
//! | Method  | Path | Notes |
//! |---------|------|-------|
//! | `GET`   | `/questions/:id/answers` | `?sort=new\|votes&page=&limit=`; 404 if the question is missing |
//! | `POST`  | `/questions/:id/answers` | Auth. Body: `{"body"}`; 201 |
//! | `PATCH` | `/answers/:id` | Auth, author only. Body: `{"body"}` |

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use hive_core::{
  answer::AnswerBody,
  page::Page,
  query::{AnswerQuery, AnswerSort},
  store::ForumStore,
};
use serde::Deserialize;

use crate::{
  AppState, page_request,
  auth::{Authenticated, MaybeAuthenticated},
  error::{ApiError, JsonBody, QueryParams, parse_id},
  views::AnswerJson,
};

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub sort:  Option<AnswerSort>,
  pub page:  Option<u32>,
  pub limit: Option<u32>,
}

/// `GET /questions/:id/answers`
pub async fn list<S>(
  State(state): State<AppState<S>>,
  MaybeAuthenticated(viewer): MaybeAuthenticated,
  Path(question_id): Path<String>,
  QueryParams(params): QueryParams<ListParams>,
) -> Result<Json<Page<AnswerJson>>, ApiError>
where
  S: ForumStore + 'static,
  hive_core::Error: From<S::Error>,
{
  let question_id = parse_id(&question_id)?;
  let query = AnswerQuery {
    sort: params.sort.unwrap_or_default(),
    page: page_request(params.page, params.limit)?,
  };
  let page = state
    .forum
    .list_answers(question_id, &query, viewer.as_ref())
    .await?;
  Ok(Json(page.map(AnswerJson::from)))
}

#[derive(Debug, Deserialize)]
pub struct AnswerBodyJson {
  pub body: String,
}

/// `POST /questions/:id/answers`
pub async fn create<S>(
  State(state): State<AppState<S>>,
  Authenticated(author): Authenticated,
  Path(question_id): Path<String>,
  JsonBody(body): JsonBody<AnswerBodyJson>,
) -> Result<impl IntoResponse, ApiError>
where
  S: ForumStore + 'static,
  hive_core::Error: From<S::Error>,
{
  let question_id = parse_id(&question_id)?;
  let body = AnswerBody::new(&body.body)?;
  let view = state.forum.create_answer(question_id, &author, body).await?;
  Ok((StatusCode::CREATED, Json(AnswerJson::from(view))))
}

/// `PATCH /answers/:id`
pub async fn update<S>(
  State(state): State<AppState<S>>,
  Authenticated(editor): Authenticated,
  Path(id): Path<String>,
  JsonBody(body): JsonBody<AnswerBodyJson>,
) -> Result<Json<AnswerJson>, ApiError>
where
  S: ForumStore + 'static,
  hive_core::Error: From<S::Error>,
{
  let id = parse_id(&id)?;
  let body = AnswerBody::new(&body.body)?;
  let view = state.forum.update_answer(id, &editor, body).await?;
  Ok(Json(AnswerJson::from(view)))
}
