//! Handlers for `/sds` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/sds?search=...` | Substring search; optional `limit` (default 25) |
//! | `GET`  | `/sds/:id` | 404 if not found |
//! | `POST` | `/sds` | Body: [`NewSdsBody`]; returns 201 + stored document |

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use serde::Deserialize;
use uuid::Uuid;
use warden_core::{
  sds::{GhsInfo, NewSdsDocument, NfpaRating, SdsDocument},
  store::EhsStore,
};

use crate::{AppState, auth::Authenticated, error::ApiError};

// ─── Search ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct SearchParams {
  /// Matched case-insensitively against product name, manufacturer, and
  /// full text.
  pub search: String,
  pub limit:  Option<usize>,
}

/// `GET /sds?search=<text>[&limit=...]`
pub async fn search<S>(
  State(state): State<AppState<S>>,
  _auth: Authenticated,
  Query(params): Query<SearchParams>,
) -> Result<Json<Vec<SdsDocument>>, ApiError>
where
  S: EhsStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let documents = state
    .store
    .search_sds(&params.search, params.limit.unwrap_or(25))
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(documents))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /sds/:id`
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  _auth: Authenticated,
  Path(id): Path<Uuid>,
) -> Result<Json<SdsDocument>, ApiError>
where
  S: EhsStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let document = state
    .store
    .get_sds(id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| ApiError::NotFound(format!("SDS document {id} not found")))?;
  Ok(Json(document))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// JSON body accepted by `POST /sds`.
#[derive(Debug, Deserialize)]
pub struct NewSdsBody {
  pub product_name: String,
  pub manufacturer: Option<String>,
  pub file_path:    Option<String>,
  pub full_text:    Option<String>,
  pub ghs:          Option<GhsInfo>,
  pub nfpa:         Option<NfpaRating>,
}

/// `POST /sds` — returns 201 + the stored [`SdsDocument`].
pub async fn create<S>(
  State(state): State<AppState<S>>,
  _auth: Authenticated,
  Json(body): Json<NewSdsBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: EhsStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  if body.product_name.trim().is_empty() {
    return Err(ApiError::BadRequest(
      "product_name must not be empty".to_string(),
    ));
  }
  if let Some(nfpa) = &body.nfpa {
    nfpa
      .validate()
      .map_err(|e| ApiError::BadRequest(e.to_string()))?;
  }

  let document = state
    .store
    .add_sds(NewSdsDocument {
      product_name: body.product_name,
      manufacturer: body.manufacturer,
      file_path:    body.file_path,
      full_text:    body.full_text,
      ghs:          body.ghs,
      nfpa:         body.nfpa,
    })
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;

  Ok((StatusCode::CREATED, Json(document)))
}
