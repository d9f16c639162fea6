//! Handlers for `/users` endpoints — admin only.
//!
//! Passwords arrive in plaintext over the (externally terminated) transport
//! and are hashed with argon2 before they reach the store. Stored hashes are
//! never serialised back out.

use argon2::{Argon2, PasswordHasher, password_hash::SaltString};
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use rand_core::OsRng;
use serde::Deserialize;
use warden_core::{
  store::EhsStore,
  user::{NewUser, Role, User},
};

use crate::{AppState, auth::AdminOnly, error::ApiError};

// ─── Create ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct NewUserBody {
  pub username: String,
  pub password: String,
  #[serde(default)]
  pub role:     Role,
}

/// `POST /users` — body: `{"username":"...","password":"...","role":"admin"}`.
/// Returns 201 + the stored user, or 409 if the username is taken.
pub async fn create<S>(
  State(state): State<AppState<S>>,
  _admin: AdminOnly,
  Json(body): Json<NewUserBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: EhsStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  if body.username.trim().is_empty() {
    return Err(ApiError::BadRequest("username must not be empty".to_string()));
  }
  if body.password.is_empty() {
    return Err(ApiError::BadRequest("password must not be empty".to_string()));
  }

  let salt = SaltString::generate(&mut OsRng);
  let hash = Argon2::default()
    .hash_password(body.password.as_bytes(), &salt)
    .map_err(|e| ApiError::BadRequest(format!("unusable password: {e}")))?
    .to_string();

  let user = state
    .store
    .create_user(NewUser {
      username:      body.username,
      password_hash: hash,
      role:          body.role,
    })
    .await
    .map_err(ApiError::from_store)?;

  Ok((StatusCode::CREATED, Json(user)))
}

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /users`
pub async fn list<S>(
  State(state): State<AppState<S>>,
  _admin: AdminOnly,
) -> Result<Json<Vec<User>>, ApiError>
where
  S: EhsStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let users = state
    .store
    .list_users()
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(users))
}
