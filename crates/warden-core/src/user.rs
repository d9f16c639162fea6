//! User accounts.
//!
//! Passwords are stored as argon2 PHC strings; hashing happens at the HTTP
//! layer so this crate stays free of crypto dependencies. The hash is never
//! serialised back out in API responses.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Authorisation role for a user account.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Role {
  Admin,
  #[default]
  Contributor,
}

impl Role {
  pub fn is_admin(self) -> bool { matches!(self, Self::Admin) }
}

/// A persisted user account.
#[derive(Debug, Clone, Serialize)]
pub struct User {
  pub user_id:       Uuid,
  pub username:      String,
  /// PHC string produced by argon2, e.g. `$argon2id$v=19$…`.
  /// Never leaves the server.
  #[serde(skip_serializing)]
  pub password_hash: String,
  pub role:          Role,
  pub created_at:    DateTime<Utc>,
}

/// Input to [`crate::store::EhsStore::create_user`].
/// `user_id` and `created_at` are always assigned by the store.
#[derive(Debug, Clone)]
pub struct NewUser {
  pub username:      String,
  pub password_hash: String,
  pub role:          Role,
}
