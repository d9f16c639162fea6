//! Handler for `GET /dashboard` — aggregate counts plus the five most
//! recent incidents.

use axum::{Json, extract::State};
use warden_core::store::{DashboardStats, EhsStore};

use crate::{AppState, auth::Authenticated, error::ApiError};

/// `GET /dashboard`
pub async fn handler<S>(
  State(state): State<AppState<S>>,
  _auth: Authenticated,
) -> Result<Json<DashboardStats>, ApiError>
where
  S: EhsStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let stats = state
    .store
    .dashboard_stats()
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(stats))
}
