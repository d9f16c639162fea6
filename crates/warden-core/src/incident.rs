//! Incident records — the central EHS artefact.
//!
//! Incidents are ordinary CRUD rows: created on submit, read on query, and
//! edited only through status transitions. The risk score is derived from
//! the severity/likelihood inputs at creation time (see [`crate::risk`]).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  Result,
  risk::{Likelihood, SeverityScores, risk_score},
};

/// The category of a reported incident.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncidentKind {
  InjuryIllness,
  NearMiss,
  PropertyDamage,
  Environmental,
  Security,
  General,
}

/// Workflow state of an incident.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum IncidentStatus {
  #[default]
  Open,
  UnderReview,
  Closed,
}

/// A persisted incident report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Incident {
  pub incident_id: Uuid,
  pub kind:        IncidentKind,
  pub title:       String,
  pub description: String,
  pub location:    Option<String>,
  pub severity:    SeverityScores,
  pub likelihood:  Likelihood,
  /// Always `severity.overall() * likelihood`; assigned by the store.
  pub risk_score:  u8,
  pub status:      IncidentStatus,
  /// The user who filed the report. Must reference an existing user.
  pub reported_by: Uuid,
  pub created_at:  DateTime<Utc>,
}

/// Input to [`crate::store::EhsStore::create_incident`].
/// Id, timestamp, status, and risk score are assigned by the store.
#[derive(Debug, Clone)]
pub struct NewIncident {
  pub kind:        IncidentKind,
  pub title:       String,
  pub description: String,
  pub location:    Option<String>,
  pub severity:    SeverityScores,
  pub likelihood:  Likelihood,
  pub reported_by: Uuid,
}

impl NewIncident {
  /// Validate the bounded inputs and return the matrix score.
  pub fn validated_risk_score(&self) -> Result<u8> {
    self.severity.validate()?;
    Ok(risk_score(&self.severity, self.likelihood))
  }
}
