//! Error types for `warden-core`.

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum Error {
  #[error("user not found: {0}")]
  UserNotFound(Uuid),

  #[error("username already taken: {0:?}")]
  DuplicateUsername(String),

  #[error("incident not found: {0}")]
  IncidentNotFound(Uuid),

  #[error("SDS document not found: {0}")]
  SdsNotFound(Uuid),

  #[error("{field} score {value} is out of range (0..={max})")]
  ScoreOutOfRange {
    field: &'static str,
    value: u8,
    max:   u8,
  },

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
