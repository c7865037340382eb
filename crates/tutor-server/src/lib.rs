//! HTTP server wiring for the tutoring scheduler.
//!
//! Loads [`ServerConfig`], builds the application [`Router`] with request
//! tracing, and mounts the REST API under `/api/v1`.

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use axum::{Router, http::Request};
use serde::Deserialize;
use tower_http::trace::TraceLayer;
use tutor_core::{lifecycle::LifecycleManager, store::SchedulingStore};
use uuid::Uuid;

/// Environment variables with this prefix override file settings
/// (`TUTOR_PORT=9000`).
pub const ENV_PREFIX: &str = "TUTOR";

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml`.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ServerConfig {
  pub host:       String,
  pub port:       u16,
  pub store_path: PathBuf,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:       "127.0.0.1".to_string(),
      port:       8080,
      store_path: PathBuf::from("tutor.db"),
    }
  }
}

impl ServerConfig {
  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

/// Read `path` (if it exists) layered under `TUTOR_*` environment variables.
pub fn load_config(path: &Path) -> Result<ServerConfig, config::ConfigError> {
  let mut cfg: ServerConfig = config::Config::builder()
    .add_source(config::File::from(path).required(false))
    .add_source(config::Environment::with_prefix(ENV_PREFIX))
    .build()?
    .try_deserialize()?;
  cfg.store_path = expand_tilde(&cfg.store_path);
  Ok(cfg)
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// The full application: the API under `/api/v1`, one tracing span per
/// request tagged with a fresh `request_id`.
pub fn app<S>(manager: Arc<LifecycleManager<S>>) -> Router
where
  S: SchedulingStore + 'static,
{
  Router::new()
    .nest("/api/v1", tutor_api::api_router(manager))
    .layer(
      TraceLayer::new_for_http().make_span_with(|req: &Request<_>| {
        tracing::info_span!(
          "request",
          request_id = %Uuid::new_v4(),
          method = %req.method(),
          uri = %req.uri(),
        )
      }),
    )
}
