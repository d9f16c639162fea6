//! Handlers for `/incidents` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/incidents` | Optional `status`, `kind`, `limit`, `offset` |
//! | `GET`  | `/incidents/:id` | 404 if not found |
//! | `POST` | `/incidents` | Body: [`NewIncidentBody`]; returns 201 + stored incident |
//! | `POST` | `/incidents/:id/status` | Body: `{"status":"closed"}` |
//!
//! The risk score is computed server-side from the submitted severity and
//! likelihood; any client-supplied score is rejected as an unknown field.

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use serde::Deserialize;
use uuid::Uuid;
use warden_core::{
  incident::{Incident, IncidentKind, IncidentStatus, NewIncident},
  risk::{Likelihood, SeverityScores},
  store::{EhsStore, IncidentQuery},
};

use crate::{AppState, auth::Authenticated, error::ApiError};

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub status: Option<IncidentStatus>,
  pub kind:   Option<IncidentKind>,
  pub limit:  Option<usize>,
  pub offset: Option<usize>,
}

/// `GET /incidents[?status=...][&kind=...][&limit=...][&offset=...]`
pub async fn list<S>(
  State(state): State<AppState<S>>,
  _auth: Authenticated,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<Incident>>, ApiError>
where
  S: EhsStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let query = IncidentQuery {
    status: params.status,
    kind:   params.kind,
    limit:  params.limit,
    offset: params.offset,
  };

  let incidents = state
    .store
    .list_incidents(&query)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(incidents))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /incidents/:id`
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  _auth: Authenticated,
  Path(id): Path<Uuid>,
) -> Result<Json<Incident>, ApiError>
where
  S: EhsStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let incident = state
    .store
    .get_incident(id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| ApiError::NotFound(format!("incident {id} not found")))?;
  Ok(Json(incident))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// JSON body accepted by `POST /incidents`. The reporter is the
/// authenticated user, never part of the body.
///
/// `likelihood` is taken as a raw `u8` and bounds-checked in the handler,
/// so an out-of-range value gets the same 400 JSON shape as a bad severity
/// instead of a deserialization rejection.
#[derive(Debug, Deserialize)]
pub struct NewIncidentBody {
  pub kind:        IncidentKind,
  pub title:       String,
  pub description: String,
  pub location:    Option<String>,
  #[serde(default)]
  pub severity:    SeverityScores,
  pub likelihood:  u8,
}

/// `POST /incidents` — returns 201 + the stored [`Incident`].
pub async fn create<S>(
  State(state): State<AppState<S>>,
  Authenticated(user): Authenticated,
  Json(body): Json<NewIncidentBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: EhsStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  if body.title.trim().is_empty() {
    return Err(ApiError::BadRequest("title must not be empty".to_string()));
  }
  body
    .severity
    .validate()
    .map_err(|e| ApiError::BadRequest(e.to_string()))?;
  let likelihood = Likelihood::new(body.likelihood)
    .map_err(|e| ApiError::BadRequest(e.to_string()))?;

  let incident = state
    .store
    .create_incident(NewIncident {
      kind:        body.kind,
      title:       body.title,
      description: body.description,
      location:    body.location,
      severity:    body.severity,
      likelihood,
      reported_by: user.user_id,
    })
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;

  Ok((StatusCode::CREATED, Json(incident)))
}

// ─── Status transition ────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct StatusBody {
  pub status: IncidentStatus,
}

/// `POST /incidents/:id/status` — body: `{"status":"under_review"}`.
pub async fn set_status<S>(
  State(state): State<AppState<S>>,
  _auth: Authenticated,
  Path(id): Path<Uuid>,
  Json(body): Json<StatusBody>,
) -> Result<Json<Incident>, ApiError>
where
  S: EhsStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  state
    .store
    .get_incident(id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| ApiError::NotFound(format!("incident {id} not found")))?;

  let updated = state
    .store
    .set_incident_status(id, body.status)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(updated))
}
