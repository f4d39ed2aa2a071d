//! hive server binary.
//!
//! Reads `config.toml` (or the path given with `--config`) overlaid with
//! `HIVE_*` environment variables, opens the SQLite store, and serves the
//! JSON API over HTTP until Ctrl-C or SIGTERM.
//!
//! # Issuing a development token
//!
//! ```
//! cargo run -p hive-api --bin server -- --issue-token 'dev|ada' --name Ada
//! ```

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::Context as _;
use clap::Parser;
use hive_api::{AppState, ServerConfig, auth::TokenVerifier, draft::Drafter};
use hive_core::user::Identity;
use hive_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Hive Q&A server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Print a signed bearer token for SUBJECT and exit.
  #[arg(long, value_name = "SUBJECT")]
  issue_token: Option<String>,

  /// Email claim for `--issue-token`.
  #[arg(long, requires = "issue_token")]
  email: Option<String>,

  /// Name claim for `--issue-token`.
  #[arg(long, requires = "issue_token")]
  name: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  let cli = Cli::parse();

  // Load configuration.
  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config.clone()).required(false))
    .add_source(config::Environment::with_prefix("HIVE").try_parsing(true))
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  // Initialise tracing; RUST_LOG wins over the configured level.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(
          server_cfg
            .log_level
            .parse()
            .context("invalid log_level")?,
        )
        .from_env_lossy(),
    )
    .init();

  let tokens = TokenVerifier::new(server_cfg.token_secret.as_bytes())
    .map_err(|e| anyhow::anyhow!("invalid token_secret: {e}"))?;

  // Helper mode: issue a token and exit.
  if let Some(subject) = cli.issue_token {
    let identity = Identity { subject, email: cli.email, name: cli.name };
    println!("{}", tokens.issue(&identity).context("failed to issue token")?);
    return Ok(());
  }

  // Expand `~` in store path.
  let store_path = expand_tilde(&server_cfg.store_path);

  // Open SQLite store.
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  let drafts = Drafter::from_config(&server_cfg)
    .context("failed to build draft client")?;
  if matches!(drafts, Drafter::Template(_)) {
    tracing::info!("no draft_api_url configured; using template drafts");
  }

  let address = format!("{}:{}", server_cfg.host, server_cfg.port);
  let state =
    AppState::new(Arc::new(store.clone()), drafts, tokens, server_cfg);
  let app = hive_api::router(state);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app)
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("server error")?;

  tracing::info!("shutting down");
  store.close().await.context("failed to close store")?;
  Ok(())
}

/// Resolves on Ctrl-C, or SIGTERM on Unix.
async fn shutdown_signal() {
  let ctrl_c = async {
    if let Err(e) = tokio::signal::ctrl_c().await {
      tracing::error!(error = %e, "failed to listen for Ctrl-C");
      std::future::pending::<()>().await;
    }
  };

  #[cfg(unix)]
  let terminate = async {
    match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
      Ok(mut sig) => {
        sig.recv().await;
      }
      Err(e) => {
        tracing::error!(error = %e, "failed to listen for SIGTERM");
        std::future::pending::<()>().await;
      }
    }
  };

  #[cfg(not(unix))]
  let terminate = std::future::pending::<()>();

  tokio::select! {
    () = ctrl_c => {},
    () = terminate => {},
  }
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
