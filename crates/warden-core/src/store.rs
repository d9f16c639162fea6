//! The `EhsStore` trait and supporting query/read-model types.
//!
//! The trait is implemented by storage backends (e.g. `warden-store-sqlite`).
//! Higher layers (`warden-api`, `warden-server`) depend on this abstraction,
//! not on any concrete backend.

use std::future::Future;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::{
  chat::{ChatEntry, NewChatEntry},
  incident::{Incident, IncidentKind, IncidentStatus, NewIncident},
  sds::{NewSdsDocument, SdsDocument},
  user::{NewUser, User},
};

// ─── Query type ──────────────────────────────────────────────────────────────

/// Parameters for [`EhsStore::list_incidents`].
#[derive(Debug, Clone, Default)]
pub struct IncidentQuery {
  pub status: Option<IncidentStatus>,
  pub kind:   Option<IncidentKind>,
  pub limit:  Option<usize>,
  pub offset: Option<usize>,
}

// ─── Dashboard read model ────────────────────────────────────────────────────

/// One row in the dashboard's recent-incident list.
#[derive(Debug, Clone, Serialize)]
pub struct IncidentSummary {
  pub incident_id: Uuid,
  pub kind:        IncidentKind,
  pub title:       String,
  pub risk_score:  u8,
  pub created_at:  DateTime<Utc>,
}

/// Aggregate counts for the dashboard — never stored, always computed.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardStats {
  pub total_incidents:     u64,
  pub open_incidents:      u64,
  /// Incidents at or above [`crate::risk::RiskLevel::HIGH_THRESHOLD`].
  pub high_risk_incidents: u64,
  pub total_sds_documents: u64,
  /// The five most recently reported incidents, newest first.
  pub recent_incidents:    Vec<IncidentSummary>,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a Warden storage backend.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait EhsStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Users ─────────────────────────────────────────────────────────────

  /// Create and persist a user. Fails if the username is taken.
  fn create_user(
    &self,
    input: NewUser,
  ) -> impl Future<Output = Result<User, Self::Error>> + Send + '_;

  /// Retrieve a user by UUID. Returns `None` if not found.
  fn get_user(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;

  /// Retrieve a user by username — the auth lookup path.
  fn get_user_by_username<'a>(
    &'a self,
    username: &'a str,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + 'a;

  fn list_users(
    &self,
  ) -> impl Future<Output = Result<Vec<User>, Self::Error>> + Send + '_;

  // ── Incidents ─────────────────────────────────────────────────────────

  /// Validate the inputs, compute the risk score, and persist the incident.
  /// Fails if `reported_by` does not reference an existing user.
  fn create_incident(
    &self,
    input: NewIncident,
  ) -> impl Future<Output = Result<Incident, Self::Error>> + Send + '_;

  fn get_incident(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Incident>, Self::Error>> + Send + '_;

  /// List incidents, newest first, filtered by `query`.
  fn list_incidents<'a>(
    &'a self,
    query: &'a IncidentQuery,
  ) -> impl Future<Output = Result<Vec<Incident>, Self::Error>> + Send + 'a;

  /// Transition an incident's workflow status and return the updated row.
  fn set_incident_status(
    &self,
    id: Uuid,
    status: IncidentStatus,
  ) -> impl Future<Output = Result<Incident, Self::Error>> + Send + '_;

  // ── SDS documents ─────────────────────────────────────────────────────

  fn add_sds(
    &self,
    input: NewSdsDocument,
  ) -> impl Future<Output = Result<SdsDocument, Self::Error>> + Send + '_;

  fn get_sds(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<SdsDocument>, Self::Error>> + Send + '_;

  /// Case-insensitive substring search over product name, manufacturer, and
  /// full text.
  fn search_sds<'a>(
    &'a self,
    text: &'a str,
    limit: usize,
  ) -> impl Future<Output = Result<Vec<SdsDocument>, Self::Error>> + Send + 'a;

  // ── Chat history ──────────────────────────────────────────────────────

  fn record_chat(
    &self,
    input: NewChatEntry,
  ) -> impl Future<Output = Result<ChatEntry, Self::Error>> + Send + '_;

  /// The most recent chat entries, newest first.
  fn recent_chat(
    &self,
    limit: usize,
  ) -> impl Future<Output = Result<Vec<ChatEntry>, Self::Error>> + Send + '_;

  // ── Dashboard ─────────────────────────────────────────────────────────

  fn dashboard_stats(
    &self,
  ) -> impl Future<Output = Result<DashboardStats, Self::Error>> + Send + '_;
}
