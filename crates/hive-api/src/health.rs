//! `GET /health`: 200 when the store answers, 503 otherwise.

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use hive_core::store::ForumStore;
use serde_json::json;
use tracing::warn;

use crate::AppState;

pub async fn handler<S>(State(state): State<AppState<S>>) -> impl IntoResponse
where
  S: ForumStore + 'static,
  hive_core::Error: From<S::Error>,
{
  let connected = match state.forum.health_check().await {
    Ok(()) => true,
    Err(e) => {
      warn!(error = %e, "store health check failed");
      false
    }
  };
  let status = if connected { StatusCode::OK } else { StatusCode::SERVICE_UNAVAILABLE };
  let body = json!({
    "status": if connected { "ok" } else { "degraded" },
    "database": { "connected": connected },
    "uptime": state.started.elapsed().as_secs_f64(),
    "version": env!("CARGO_PKG_VERSION"),
  });
  (status, Json(body))
}
