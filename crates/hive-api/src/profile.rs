//! `GET /profile`: the caller's user record, created on first call.

use axum::{Json, extract::State};
use hive_core::store::ForumStore;

use crate::{AppState, auth::Authenticated, error::ApiError, views::UserJson};

pub async fn get_own<S>(
  State(state): State<AppState<S>>,
  Authenticated(identity): Authenticated,
) -> Result<Json<UserJson>, ApiError>
where
  S: ForumStore + 'static,
  hive_core::Error: From<S::Error>,
{
  let user = state.forum.resolve_user(&identity).await?;
  Ok(Json(user.into()))
}
