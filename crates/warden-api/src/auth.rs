//! HTTP Basic-auth extractors verified against the user store.
//!
//! Credentials are `username:password`; the password is checked against the
//! argon2 PHC hash stored on the user row. [`Authenticated`] carries the
//! resolved [`User`] into the handler; [`AdminOnly`] additionally requires
//! the admin role.

use argon2::{Argon2, PasswordHash, PasswordVerifier};
use axum::extract::FromRequestParts;
use axum::http::{HeaderMap, request::Parts};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as B64;
use warden_core::{store::EhsStore, user::User};

use crate::{AppState, error::ApiError};

/// Present in a handler's arguments means the request carried valid
/// credentials for the wrapped user.
pub struct Authenticated(pub User);

/// Like [`Authenticated`], but rejects non-admin users with 403.
pub struct AdminOnly(pub User);

/// Verify credentials directly from headers against the store.
pub async fn verify_auth<S>(
  headers: &HeaderMap,
  store: &S,
) -> Result<User, ApiError>
where
  S: EhsStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let header_val = headers
    .get(axum::http::header::AUTHORIZATION)
    .and_then(|v| v.to_str().ok())
    .ok_or(ApiError::Unauthorized)?;

  let encoded = header_val
    .strip_prefix("Basic ")
    .ok_or(ApiError::Unauthorized)?;

  let decoded = B64.decode(encoded).map_err(|_| ApiError::Unauthorized)?;
  let creds   = std::str::from_utf8(&decoded).map_err(|_| ApiError::Unauthorized)?;

  let (username, password) = creds.split_once(':').ok_or(ApiError::Unauthorized)?;

  let user = store
    .get_user_by_username(username)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or(ApiError::Unauthorized)?;

  let parsed_hash = PasswordHash::new(&user.password_hash)
    .map_err(|_| ApiError::Unauthorized)?;

  Argon2::default()
    .verify_password(password.as_bytes(), &parsed_hash)
    .map_err(|_| ApiError::Unauthorized)?;

  Ok(user)
}

impl<S> FromRequestParts<AppState<S>> for Authenticated
where
  S: EhsStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    let user = verify_auth(&parts.headers, state.store.as_ref()).await?;
    Ok(Authenticated(user))
  }
}

impl<S> FromRequestParts<AppState<S>> for AdminOnly
where
  S: EhsStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    let user = verify_auth(&parts.headers, state.store.as_ref()).await?;
    if !user.role.is_admin() {
      return Err(ApiError::Forbidden("admin role required".to_string()));
    }
    Ok(AdminOnly(user))
  }
}
