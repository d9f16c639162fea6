//! JSON REST API for Warden.
//!
//! Exposes an axum [`Router`] backed by any [`warden_core::store::EhsStore`].
//! Every route requires HTTP Basic auth against the user store; TLS and
//! transport concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", warden_api::api_router(state.clone()))
//! ```

pub mod auth;
pub mod chat;
pub mod dashboard;
pub mod error;
pub mod incidents;
pub mod sds;
pub mod users;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use warden_core::store::EhsStore;

pub use error::ApiError;

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
#[derive(Clone)]
pub struct AppState<S: EhsStore> {
  pub store: Arc<S>,
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build a fully-materialised API router for `state`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(state: AppState<S>) -> Router<()>
where
  S: EhsStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  Router::new()
    // Chat assistant
    .route("/chat", post(chat::handler::<S>))
    .route("/chat/history", get(chat::history::<S>))
    // Incidents
    .route(
      "/incidents",
      get(incidents::list::<S>).post(incidents::create::<S>),
    )
    .route("/incidents/{id}", get(incidents::get_one::<S>))
    .route("/incidents/{id}/status", post(incidents::set_status::<S>))
    // SDS documents
    .route("/sds", get(sds::search::<S>).post(sds::create::<S>))
    .route("/sds/{id}", get(sds::get_one::<S>))
    // Dashboard
    .route("/dashboard", get(dashboard::handler::<S>))
    // Users (admin only)
    .route("/users", get(users::list::<S>).post(users::create::<S>))
    .with_state(state)
}

// ─── Integration tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  use argon2::{Argon2, PasswordHasher, password_hash::SaltString};
  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
  };
  use base64::Engine as _;
  use base64::engine::general_purpose::STANDARD as B64;
  use rand_core::OsRng;
  use serde_json::{Value, json};
  use tower::ServiceExt as _;
  use uuid::Uuid;
  use warden_core::user::{NewUser, Role};
  use warden_store_sqlite::SqliteStore;

  async fn make_state() -> AppState<SqliteStore> {
    let store = SqliteStore::open_in_memory().await.unwrap();
    AppState { store: Arc::new(store) }
  }

  fn hash(password: &str) -> String {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
      .hash_password(password.as_bytes(), &salt)
      .unwrap()
      .to_string()
  }

  async fn seed_user(
    state: &AppState<SqliteStore>,
    username: &str,
    password: &str,
    role: Role,
  ) -> warden_core::user::User {
    use warden_core::store::EhsStore as _;
    state
      .store
      .create_user(NewUser {
        username:      username.to_string(),
        password_hash: hash(password),
        role,
      })
      .await
      .unwrap()
  }

  fn basic(user: &str, pass: &str) -> String {
    format!("Basic {}", B64.encode(format!("{user}:{pass}")))
  }

  async fn send(
    state:  AppState<SqliteStore>,
    method: &str,
    uri:    &str,
    auth:   Option<(&str, &str)>,
    body:   Option<Value>,
  ) -> axum::response::Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some((user, pass)) = auth {
      builder = builder.header(header::AUTHORIZATION, basic(user, pass));
    }
    let req = match body {
      Some(v) => builder
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(v.to_string()))
        .unwrap(),
      None => builder.body(Body::empty()).unwrap(),
    };
    api_router(state).oneshot(req).await.unwrap()
  }

  async fn json_body(resp: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
      .await
      .unwrap();
    serde_json::from_slice(&bytes).unwrap()
  }

  fn spill_body() -> Value {
    json!({
      "kind": "environmental",
      "title": "Solvent spill",
      "description": "Acetone spilled near the fume hood",
      "location": "Laboratory A",
      "severity": { "environment": 4 },
      "likelihood": 6
    })
  }

  // ── Auth ─────────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn unauthenticated_request_returns_401_with_challenge() {
    let state = make_state().await;
    let resp = send(state, "GET", "/dashboard", None, None).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert!(resp.headers().contains_key(header::WWW_AUTHENTICATE));
  }

  #[tokio::test]
  async fn wrong_password_returns_401() {
    let state = make_state().await;
    seed_user(&state, "alice", "secret", Role::Contributor).await;

    let resp =
      send(state, "GET", "/dashboard", Some(("alice", "wrong")), None).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
  }

  // ── Chat ─────────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn chat_classifies_and_persists() {
    let state = make_state().await;
    seed_user(&state, "alice", "secret", Role::Contributor).await;

    let resp = send(
      state.clone(),
      "POST",
      "/chat",
      Some(("alice", "secret")),
      Some(json!({ "message": "I need to report an incident" })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = json_body(resp).await;
    assert_eq!(body["intent"], "report_incident");
    assert_eq!(body["confidence"], 1.0);

    let resp = send(
      state,
      "GET",
      "/chat/history",
      Some(("alice", "secret")),
      None,
    )
    .await;
    let history = json_body(resp).await;
    assert_eq!(history.as_array().unwrap().len(), 1);
    assert_eq!(history[0]["message"], "I need to report an incident");
  }

  #[tokio::test]
  async fn chat_empty_message_is_rejected() {
    let state = make_state().await;
    seed_user(&state, "alice", "secret", Role::Contributor).await;

    let resp = send(
      state,
      "POST",
      "/chat",
      Some(("alice", "secret")),
      Some(json!({ "message": "   " })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  }

  // ── Incidents ────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn incident_create_and_get_roundtrip() {
    let state = make_state().await;
    let alice = seed_user(&state, "alice", "secret", Role::Contributor).await;

    let resp = send(
      state.clone(),
      "POST",
      "/incidents",
      Some(("alice", "secret")),
      Some(spill_body()),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created = json_body(resp).await;
    assert_eq!(created["risk_score"], 24);
    assert_eq!(created["status"], "open");
    assert_eq!(created["reported_by"], alice.user_id.to_string());

    let id = created["incident_id"].as_str().unwrap().to_string();
    let resp = send(
      state,
      "GET",
      &format!("/incidents/{id}"),
      Some(("alice", "secret")),
      None,
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let fetched = json_body(resp).await;
    assert_eq!(fetched["title"], "Solvent spill");
  }

  #[tokio::test]
  async fn incident_out_of_range_severity_returns_400() {
    let state = make_state().await;
    seed_user(&state, "alice", "secret", Role::Contributor).await;

    let mut body = spill_body();
    body["severity"]["environment"] = json!(11);

    let resp = send(
      state,
      "POST",
      "/incidents",
      Some(("alice", "secret")),
      Some(body),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  }

  #[tokio::test]
  async fn incident_out_of_range_likelihood_returns_400_json() {
    let state = make_state().await;
    seed_user(&state, "alice", "secret", Role::Contributor).await;

    let mut body = spill_body();
    body["likelihood"] = json!(11);

    let resp = send(
      state,
      "POST",
      "/incidents",
      Some(("alice", "secret")),
      Some(body),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    // Same error envelope as every other validation failure.
    let error = json_body(resp).await;
    assert!(error["error"].as_str().unwrap().contains("likelihood"));
  }

  #[tokio::test]
  async fn incident_list_paging() {
    let state = make_state().await;
    seed_user(&state, "alice", "secret", Role::Contributor).await;

    for title in ["first", "second", "third"] {
      let mut body = spill_body();
      body["title"] = json!(title);
      send(
        state.clone(),
        "POST",
        "/incidents",
        Some(("alice", "secret")),
        Some(body),
      )
      .await;
    }

    let resp = send(
      state.clone(),
      "GET",
      "/incidents?limit=2",
      Some(("alice", "secret")),
      None,
    )
    .await;
    let page = json_body(resp).await;
    assert_eq!(page.as_array().unwrap().len(), 2);
    // Newest first.
    assert_eq!(page[0]["title"], "third");
    assert_eq!(page[1]["title"], "second");

    let resp = send(
      state,
      "GET",
      "/incidents?limit=2&offset=2",
      Some(("alice", "secret")),
      None,
    )
    .await;
    let rest = json_body(resp).await;
    assert_eq!(rest.as_array().unwrap().len(), 1);
    assert_eq!(rest[0]["title"], "first");
  }

  #[tokio::test]
  async fn incident_get_missing_returns_404() {
    let state = make_state().await;
    seed_user(&state, "alice", "secret", Role::Contributor).await;

    let resp = send(
      state,
      "GET",
      &format!("/incidents/{}", Uuid::new_v4()),
      Some(("alice", "secret")),
      None,
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn incident_status_transition() {
    let state = make_state().await;
    seed_user(&state, "alice", "secret", Role::Contributor).await;

    let resp = send(
      state.clone(),
      "POST",
      "/incidents",
      Some(("alice", "secret")),
      Some(spill_body()),
    )
    .await;
    let created = json_body(resp).await;
    let id = created["incident_id"].as_str().unwrap().to_string();

    let resp = send(
      state.clone(),
      "POST",
      &format!("/incidents/{id}/status"),
      Some(("alice", "secret")),
      Some(json!({ "status": "closed" })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let updated = json_body(resp).await;
    assert_eq!(updated["status"], "closed");

    let resp = send(
      state,
      "GET",
      "/incidents?status=open",
      Some(("alice", "secret")),
      None,
    )
    .await;
    let open = json_body(resp).await;
    assert!(open.as_array().unwrap().is_empty());
  }

  // ── SDS ──────────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn sds_create_and_search() {
    let state = make_state().await;
    seed_user(&state, "alice", "secret", Role::Contributor).await;

    let resp = send(
      state.clone(),
      "POST",
      "/sds",
      Some(("alice", "secret")),
      Some(json!({
        "product_name": "Acetone",
        "manufacturer": "Example Chemical Co.",
        "full_text": "Highly flammable liquid and vapour.",
        "ghs": { "signal_word": "Danger", "hazard_statements": ["H225"] },
        "nfpa": { "health": 1, "flammability": 3, "instability": 0 }
      })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = send(
      state,
      "GET",
      "/sds?search=acetone",
      Some(("alice", "secret")),
      None,
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let found = json_body(resp).await;
    assert_eq!(found.as_array().unwrap().len(), 1);
    assert_eq!(found[0]["product_name"], "Acetone");
  }

  #[tokio::test]
  async fn sds_invalid_nfpa_returns_400() {
    let state = make_state().await;
    seed_user(&state, "alice", "secret", Role::Contributor).await;

    let resp = send(
      state,
      "POST",
      "/sds",
      Some(("alice", "secret")),
      Some(json!({
        "product_name": "Mystery solvent",
        "nfpa": { "health": 9, "flammability": 0, "instability": 0 }
      })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  }

  // ── Users ────────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn user_creation_requires_admin() {
    let state = make_state().await;
    seed_user(&state, "alice", "secret", Role::Contributor).await;
    seed_user(&state, "root", "hunter2", Role::Admin).await;

    let body = json!({ "username": "bob", "password": "pw" });

    let resp = send(
      state.clone(),
      "POST",
      "/users",
      Some(("alice", "secret")),
      Some(body.clone()),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let resp = send(
      state.clone(),
      "POST",
      "/users",
      Some(("root", "hunter2")),
      Some(body.clone()),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created = json_body(resp).await;
    assert_eq!(created["username"], "bob");
    assert!(created.get("password_hash").is_none(), "hash must not leak");

    // Duplicate username conflicts.
    let resp = send(
      state,
      "POST",
      "/users",
      Some(("root", "hunter2")),
      Some(body),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
  }

  #[tokio::test]
  async fn user_listing_requires_admin() {
    let state = make_state().await;
    seed_user(&state, "alice", "secret", Role::Contributor).await;
    seed_user(&state, "root", "hunter2", Role::Admin).await;

    let resp = send(
      state.clone(),
      "GET",
      "/users",
      Some(("alice", "secret")),
      None,
    )
    .await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let resp = send(state, "GET", "/users", Some(("root", "hunter2")), None)
      .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let users = json_body(resp).await;
    assert_eq!(users.as_array().unwrap().len(), 2);
    assert!(users[0].get("password_hash").is_none());
  }

  #[test]
  fn store_duplicate_username_maps_to_conflict() {
    let err = warden_store_sqlite::Error::Core(
      warden_core::Error::DuplicateUsername("bob".to_string()),
    );
    assert!(matches!(ApiError::from_store(err), ApiError::Conflict(_)));
  }

  // ── Dashboard ────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn dashboard_reflects_created_records() {
    let state = make_state().await;
    seed_user(&state, "alice", "secret", Role::Contributor).await;

    send(
      state.clone(),
      "POST",
      "/incidents",
      Some(("alice", "secret")),
      Some(spill_body()),
    )
    .await;

    let resp = send(
      state,
      "GET",
      "/dashboard",
      Some(("alice", "secret")),
      None,
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let stats = json_body(resp).await;
    assert_eq!(stats["total_incidents"], 1);
    assert_eq!(stats["open_incidents"], 1);
    assert_eq!(stats["recent_incidents"].as_array().unwrap().len(), 1);
  }
}
