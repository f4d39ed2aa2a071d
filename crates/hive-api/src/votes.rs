//! Vote endpoints. The target type is fixed by the route, never inferred.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/questions/:id/vote` | Auth. Body: `{"value": 1\|-1}` |
//! | `POST` | `/answers/:id/vote`   | Auth. Body: `{"value": 1\|-1}` |

use axum::{
  Json,
  extract::{Path, State},
};
use hive_core::{
  store::ForumStore,
  vote::{TargetType, VoteOutcome, VoteValue},
};
use serde::Deserialize;

use crate::{
  AppState,
  auth::Authenticated,
  error::{ApiError, JsonBody, parse_id},
};

#[derive(Debug, Deserialize)]
pub struct VoteBody {
  pub value: VoteValue,
}

async fn cast<S>(
  state: AppState<S>,
  target_type: TargetType,
  id: &str,
  voter: Authenticated,
  body: VoteBody,
) -> Result<Json<VoteOutcome>, ApiError>
where
  S: ForumStore + 'static,
  hive_core::Error: From<S::Error>,
{
  let id = parse_id(id)?;
  let outcome = state
    .forum
    .cast_vote(target_type, id, &voter.0, body.value)
    .await?;
  Ok(Json(outcome))
}

/// `POST /questions/:id/vote`
pub async fn question<S>(
  State(state): State<AppState<S>>,
  voter: Authenticated,
  Path(id): Path<String>,
  JsonBody(body): JsonBody<VoteBody>,
) -> Result<Json<VoteOutcome>, ApiError>
where
  S: ForumStore + 'static,
  hive_core::Error: From<S::Error>,
{
  cast(state, TargetType::Question, &id, voter, body).await
}

/// `POST /answers/:id/vote`
pub async fn answer<S>(
  State(state): State<AppState<S>>,
  voter: Authenticated,
  Path(id): Path<String>,
  JsonBody(body): JsonBody<VoteBody>,
) -> Result<Json<VoteOutcome>, ApiError>
where
  S: ForumStore + 'static,
  hive_core::Error: From<S::Error>,
{
  cast(state, TargetType::Answer, &id, voter, body).await
}
