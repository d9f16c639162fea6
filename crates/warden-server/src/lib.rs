//! HTTP server assembly for Warden.
//!
//! Mounts the JSON API under `/api` and serves the embedded index page and
//! an unauthenticated health probe at the root.

use std::path::PathBuf;

use axum::{
  Json, Router,
  response::Html,
  routing::get,
};
use serde::Deserialize;
use serde_json::{Value, json};
use tower_http::trace::TraceLayer;
use warden_api::AppState;
use warden_core::store::EhsStore;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` layered
/// with `WARDEN_`-prefixed environment variables.
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:                String,
  #[serde(default = "default_port")]
  pub port:                u16,
  #[serde(default = "default_db_path")]
  pub db_path:             PathBuf,
  /// Username of the bootstrap admin account.
  #[serde(default = "default_admin_username")]
  pub admin_username:      String,
  /// Argon2 PHC string for the bootstrap admin. When unset, no admin is
  /// created at startup (generate one with `server --hash-password`).
  #[serde(default)]
  pub admin_password_hash: Option<String>,
}

fn default_host() -> String {
  "127.0.0.1".to_string()
}
fn default_port() -> u16 {
  8080
}
fn default_db_path() -> PathBuf {
  PathBuf::from("warden.db")
}
fn default_admin_username() -> String {
  "admin".to_string()
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the full application router: `/`, `/health`, and the nested
/// authenticated API.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: EhsStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  Router::new()
    .route("/", get(index))
    .route("/health", get(health))
    .nest("/api", warden_api::api_router(state))
    .layer(TraceLayer::new_for_http())
}

async fn index() -> Html<&'static str> {
  Html(include_str!("../index.html"))
}

async fn health() -> Json<Value> {
  Json(json!({
    "status":    "healthy",
    "version":   env!("CARGO_PKG_VERSION"),
    "timestamp": chrono::Utc::now().to_rfc3339(),
  }))
}

// ─── Tests ────────────────────────────────────────────────────────────────────
