//! HTTP surface for Hive.
//!
//! Exposes an axum [`Router`] serving the JSON API under `/api/v1` plus
//! `/health`, backed by any [`hive_core::store::ForumStore`].

pub mod answers;
pub mod auth;
pub mod config;
pub mod draft;
pub mod error;
pub mod health;
pub mod profile;
pub mod questions;
pub mod sanitize;
pub mod search;
pub mod tags;
pub mod views;
pub mod votes;

pub use config::ServerConfig;
pub use error::ApiError;

use std::{sync::Arc, time::Instant};

use axum::{
  Router, middleware,
  routing::{get, patch, post},
};
use hive_core::{
  forum::Forum,
  page::{DEFAULT_PAGE_SIZE, PageRequest},
  store::ForumStore,
};
use tower_http::trace::TraceLayer;

use auth::TokenVerifier;
use draft::Drafter;

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
pub struct AppState<S> {
  pub forum:   Arc<Forum<S, Drafter>>,
  pub tokens:  Arc<TokenVerifier>,
  pub config:  Arc<ServerConfig>,
  pub started: Instant,
}

impl<S> Clone for AppState<S> {
  fn clone(&self) -> Self {
    Self {
      forum:   self.forum.clone(),
      tokens:  self.tokens.clone(),
      config:  self.config.clone(),
      started: self.started,
    }
  }
}

impl<S> AppState<S>
where
  S: ForumStore,
  hive_core::Error: From<S::Error>,
{
  pub fn new(
    store: Arc<S>,
    drafts: Drafter,
    tokens: TokenVerifier,
    config: ServerConfig,
  ) -> Self {
    Self {
      forum:   Arc::new(Forum::new(store, drafts, sanitize::sanitize_markdown)),
      tokens:  Arc::new(tokens),
      config:  Arc::new(config),
      started: Instant::now(),
    }
  }
}

/// `page` and `limit` query parameters, defaulting to page 1 of 20.
pub(crate) fn page_request(
  page: Option<u32>,
  limit: Option<u32>,
) -> Result<PageRequest, ApiError> {
  Ok(PageRequest::new(
    page.unwrap_or(1),
    limit.unwrap_or(DEFAULT_PAGE_SIZE),
  )?)
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the full application router.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: ForumStore + 'static,
  hive_core::Error: From<S::Error>,
{
  let api = Router::new()
    // Questions
    .route("/questions", get(questions::list::<S>).post(questions::create::<S>))
    .route(
      "/questions/{id}",
      get(questions::get_one::<S>).patch(questions::update::<S>),
    )
    .route("/questions/{id}/vote", post(votes::question::<S>))
    // Answers
    .route(
      "/questions/{id}/answers",
      get(answers::list::<S>).post(answers::create::<S>),
    )
    .route("/answers/{id}", patch(answers::update::<S>))
    .route("/answers/{id}/vote", post(votes::answer::<S>))
    // Discovery
    .route("/tags/top", get(tags::top::<S>))
    .route("/search", get(search::handler::<S>))
    // Users
    .route("/profile", get(profile::get_own::<S>));

  Router::new()
    .nest("/api/v1", api)
    .route("/health", get(health::handler::<S>))
    .layer(middleware::map_response_with_state(
      state.config.clone(),
      error::expose_internal,
    ))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}
