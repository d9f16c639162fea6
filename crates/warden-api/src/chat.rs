//! Handlers for the chat assistant.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/chat` | Body: `{"message":"..."}`; classifies, replies, persists |
//! | `GET`  | `/chat/history` | Optional `?limit=` (default 50) |

use axum::{
  Json,
  extract::{Query, State},
};
use serde::{Deserialize, Serialize};
use warden_core::{
  chat::{ChatEntry, NewChatEntry, reply_for},
  intent::{Intent, classify},
  store::EhsStore,
};

use crate::{AppState, auth::Authenticated, error::ApiError};

// ─── Chat ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ChatBody {
  pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ChatReply {
  pub response:   String,
  pub intent:     Intent,
  pub confidence: f32,
}

/// `POST /chat` — route the message to an intent and return the canned reply.
pub async fn handler<S>(
  State(state): State<AppState<S>>,
  _auth: Authenticated,
  Json(body): Json<ChatBody>,
) -> Result<Json<ChatReply>, ApiError>
where
  S: EhsStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  if body.message.trim().is_empty() {
    return Err(ApiError::BadRequest("message must not be empty".to_string()));
  }

  let classification = classify(&body.message);
  let response = reply_for(classification.intent);

  let entry = state
    .store
    .record_chat(NewChatEntry {
      message:    body.message,
      response:   response.to_owned(),
      intent:     classification.intent,
      confidence: classification.confidence,
    })
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;

  Ok(Json(ChatReply {
    response:   entry.response,
    intent:     entry.intent,
    confidence: entry.confidence,
  }))
}

// ─── History ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct HistoryParams {
  pub limit: Option<usize>,
}

/// `GET /chat/history[?limit=...]` — most recent exchanges, newest first.
pub async fn history<S>(
  State(state): State<AppState<S>>,
  _auth: Authenticated,
  Query(params): Query<HistoryParams>,
) -> Result<Json<Vec<ChatEntry>>, ApiError>
where
  S: EhsStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let entries = state
    .store
    .recent_chat(params.limit.unwrap_or(50))
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(entries))
}
