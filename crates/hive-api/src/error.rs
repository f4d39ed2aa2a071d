//! API error type and [`axum::response::IntoResponse`] implementation.
//!
//! Every failure leaves the service as `{"error": <name>, "message": <text>}`.
//! Internal failures are logged in full and answered with a generic message;
//! the detail rides along as a response extension so [`expose_internal`] can
//! put it back when the deployment allows it.

use std::sync::Arc;

use axum::{
  Json,
  extract::{
    FromRequest, FromRequestParts, State,
    rejection::{JsonRejection, QueryRejection},
  },
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::config::ServerConfig;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("{0}")]
  BadRequest(String),

  #[error("authentication required")]
  Unauthorized,

  #[error("{0}")]
  Forbidden(String),

  #[error("{0}")]
  NotFound(String),

  #[error("{0}")]
  Conflict(String),

  #[error("internal error: {0}")]
  Internal(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  fn name(&self) -> &'static str {
    match self {
      ApiError::BadRequest(_) => "ValidationError",
      ApiError::Unauthorized => "Unauthorized",
      ApiError::Forbidden(_) => "Forbidden",
      ApiError::NotFound(_) => "NotFound",
      ApiError::Conflict(_) => "Conflict",
      ApiError::Internal(_) => "InternalError",
    }
  }

  fn status(&self) -> StatusCode {
    match self {
      ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
      ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
      ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
      ApiError::NotFound(_) => StatusCode::NOT_FOUND,
      ApiError::Conflict(_) => StatusCode::CONFLICT,
      ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }
}

impl From<hive_core::Error> for ApiError {
  fn from(e: hive_core::Error) -> Self {
    use hive_core::Error as E;
    match e {
      E::Validation(m) => ApiError::BadRequest(m),
      E::Unauthorized => ApiError::Unauthorized,
      E::Forbidden(m) => ApiError::Forbidden(m),
      E::NotFound(m) => ApiError::NotFound(format!("{m} not found")),
      E::Conflict(m) => ApiError::Conflict(m),
      E::Internal(source) => ApiError::Internal(source),
    }
  }
}

impl From<JsonRejection> for ApiError {
  fn from(r: JsonRejection) -> Self { ApiError::BadRequest(r.body_text()) }
}

impl From<QueryRejection> for ApiError {
  fn from(r: QueryRejection) -> Self { ApiError::BadRequest(r.body_text()) }
}

/// Full text of an internal failure, attached to the redacted response.
#[derive(Debug, Clone)]
pub struct InternalDetail(pub String);

fn body(status: StatusCode, name: &str, message: &str) -> Response {
  (status, Json(json!({ "error": name, "message": message }))).into_response()
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = self.status();
    match &self {
      ApiError::Internal(e) => {
        error!(error = %e, "request failed");
        let mut res = body(status, self.name(), "Internal Server Error");
        res.extensions_mut().insert(InternalDetail(self.to_string()));
        res
      }
      _ => body(status, self.name(), &self.to_string()),
    }
  }
}

/// Response mapper restoring internal error text when configured to.
pub async fn expose_internal(
  State(config): State<Arc<ServerConfig>>,
  mut res: Response,
) -> Response {
  match res.extensions_mut().remove::<InternalDetail>() {
    Some(InternalDetail(detail)) if config.expose_internal_errors => {
      body(res.status(), "InternalError", &detail)
    }
    _ => res,
  }
}

// ─── Extractors with JSON rejections ─────────────────────────────────────────

/// `axum::Json` whose rejection is an [`ApiError`].
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct JsonBody<T>(pub T);

/// `axum::extract::Query` whose rejection is an [`ApiError`].
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct QueryParams<T>(pub T);

/// Parse a path identifier; malformed ids are a 400, not a 404.
pub fn parse_id(raw: &str) -> Result<uuid::Uuid, ApiError> {
  uuid::Uuid::parse_str(raw)
    .map_err(|_| ApiError::BadRequest(format!("invalid id: {raw}")))
}
