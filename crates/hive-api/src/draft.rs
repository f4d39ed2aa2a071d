//! Draft generation for new questions.
//!
//! [`Drafter::Remote`] calls a `generateContent`-style model endpoint with a
//! bounded timeout; any failure, including the timeout, falls back to the
//! deterministic template.

use std::time::Duration;

use hive_core::draft::{DraftGenerator, DraftRequest, TemplateDrafter, template_draft};
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::ServerConfig;

#[derive(Debug, Error)]
pub enum DraftError {
  #[error("draft request failed: {0}")]
  Http(#[from] reqwest::Error),
  #[error("draft request timed out after {0:?}")]
  Timeout(Duration),
  #[error("draft response had no text")]
  Empty,
}

/// The generator the server runs with.
#[derive(Clone)]
pub enum Drafter {
  Template(TemplateDrafter),
  Remote(RemoteDrafter),
}

impl Drafter {
  /// Remote when a draft endpoint is configured, template otherwise.
  pub fn from_config(config: &ServerConfig) -> Result<Self, DraftError> {
    match &config.draft_api_url {
      Some(url) => Ok(Drafter::Remote(RemoteDrafter::new(
        url.clone(),
        config.draft_api_key.clone(),
        config.draft_model.clone(),
        config.draft_timeout(),
      )?)),
      None => Ok(Drafter::Template(TemplateDrafter)),
    }
  }
}

impl DraftGenerator for Drafter {
  async fn generate(&self, request: DraftRequest) -> String {
    match self {
      Drafter::Template(t) => t.generate(request).await,
      Drafter::Remote(r) => match r.draft(&request).await {
        Ok(text) => {
          debug!("remote draft generated");
          text
        }
        Err(e) => {
          warn!(error = %e, "draft generation failed; using template");
          template_draft(&request)
        }
      },
    }
  }
}

/// Async client for a `models/{model}:generateContent` endpoint.
///
/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct RemoteDrafter {
  client:   Client,
  base_url: String,
  api_key:  Option<String>,
  model:    String,
  timeout:  Duration,
}

#[derive(Deserialize)]
struct GenerateResponse {
  #[serde(default)]
  candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
  content: Content,
}

#[derive(Deserialize)]
struct Content {
  #[serde(default)]
  parts: Vec<Part>,
}

#[derive(Deserialize)]
struct Part {
  #[serde(default)]
  text: String,
}

fn prompt(request: &DraftRequest) -> String {
  format!(
    "You are answering a question on a community Q&A site.\n\n\
     Question title: {}\n\nQuestion body:\n{}\n\n\
     Give a clear, concise and technically accurate answer that addresses \
     the question directly, with code examples where they help. Keep it \
     between 100 and 300 words.",
    request.title, request.body
  )
}

impl RemoteDrafter {
  pub fn new(
    base_url: String,
    api_key: Option<String>,
    model: String,
    timeout: Duration,
  ) -> Result<Self, DraftError> {
    let client = Client::builder().timeout(timeout).build()?;
    Ok(Self { client, base_url, api_key, model, timeout })
  }

  fn url(&self) -> String {
    format!(
      "{}/v1beta/models/{}:generateContent",
      self.base_url.trim_end_matches('/'),
      self.model
    )
  }

  /// One attempt, bounded by the configured timeout end to end.
  pub async fn draft(&self, request: &DraftRequest) -> Result<String, DraftError> {
    tokio::time::timeout(self.timeout, self.call(request))
      .await
      .map_err(|_| DraftError::Timeout(self.timeout))?
  }

  async fn call(&self, request: &DraftRequest) -> Result<String, DraftError> {
    let mut req = self.client.post(self.url()).json(&json!({
      "contents": [{ "parts": [{ "text": prompt(request) }] }]
    }));
    if let Some(key) = &self.api_key {
      req = req.header("x-goog-api-key", key);
    }

    let body: GenerateResponse =
      req.send().await?.error_for_status()?.json().await?;

    let text = body
      .candidates
      .into_iter()
      .flat_map(|c| c.content.parts)
      .map(|p| p.text)
      .collect::<String>();
    if text.trim().is_empty() {
      return Err(DraftError::Empty);
    }
    Ok(text)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn request() -> DraftRequest {
    DraftRequest {
      title: "How do I pin a future?".into(),
      body:  "I keep getting `Unpin` errors from the compiler.".into(),
    }
  }

  #[tokio::test]
  async fn template_drafter_is_deterministic() {
    let d = Drafter::Template(TemplateDrafter);
    assert_eq!(d.generate(request()).await, template_draft(&request()));
  }

  #[tokio::test]
  async fn unreachable_remote_falls_back_to_template() {
    // Nothing listens on port 9 locally; the call fails fast.
    let remote = RemoteDrafter::new(
      "http://127.0.0.1:9".into(),
      None,
      "test-model".into(),
      Duration::from_millis(500),
    )
    .unwrap();
    let draft = Drafter::Remote(remote).generate(request()).await;
    assert_eq!(draft, template_draft(&request()));
  }

  #[test]
  fn url_joins_base_and_model() {
    let remote = RemoteDrafter::new(
      "https://models.example/".into(),
      None,
      "gemini-2.0-flash".into(),
      Duration::from_secs(1),
    )
    .unwrap();
    assert_eq!(
      remote.url(),
      "https://models.example/v1beta/models/gemini-2.0-flash:generateContent"
    );
  }

  #[test]
  fn config_without_url_uses_template() {
    let cfg = ServerConfig::with_secret("s");
    assert!(matches!(Drafter::from_config(&cfg), Ok(Drafter::Template(_))));
  }
}
