//! Runtime server configuration, deserialised from `config.toml` and
//! `HIVE_*` environment variables.

use std::{path::PathBuf, time::Duration};

use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:                   String,
  #[serde(default = "default_port")]
  pub port:                   u16,
  #[serde(default = "default_store_path")]
  pub store_path:             PathBuf,
  /// HMAC key for bearer tokens.
  pub token_secret:           String,
  /// Base URL of the draft-generation service. Unset means template drafts
  /// only.
  #[serde(default)]
  pub draft_api_url:          Option<String>,
  #[serde(default)]
  pub draft_api_key:          Option<String>,
  #[serde(default = "default_draft_model")]
  pub draft_model:            String,
  #[serde(default = "default_draft_timeout_ms")]
  pub draft_timeout_ms:       u64,
  #[serde(default)]
  pub expose_internal_errors: bool,
  #[serde(default = "default_log_level")]
  pub log_level:              String,
}

impl ServerConfig {
  pub fn draft_timeout(&self) -> Duration {
    Duration::from_millis(self.draft_timeout_ms)
  }

  /// Defaults everywhere except the secret; for tests and tooling.
  pub fn with_secret(token_secret: impl Into<String>) -> Self {
    Self {
      host:                   default_host(),
      port:                   default_port(),
      store_path:             default_store_path(),
      token_secret:           token_secret.into(),
      draft_api_url:          None,
      draft_api_key:          None,
      draft_model:            default_draft_model(),
      draft_timeout_ms:       default_draft_timeout_ms(),
      expose_internal_errors: false,
      log_level:              default_log_level(),
    }
  }
}

fn default_host() -> String { "127.0.0.1".to_owned() }
fn default_port() -> u16 { 3001 }
fn default_store_path() -> PathBuf { PathBuf::from("hive.sqlite3") }
fn default_draft_model() -> String { "gemini-2.0-flash".to_owned() }
fn default_draft_timeout_ms() -> u64 { 8000 }
fn default_log_level() -> String { "info".to_owned() }
