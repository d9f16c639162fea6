//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! All timestamps are stored as RFC 3339 strings. Structured fields (GHS and
//! NFPA info) are stored as compact JSON. UUIDs are stored as hyphenated
//! lowercase strings. Enums are stored as their serde discriminant strings.

use chrono::{DateTime, Utc};
use uuid::Uuid;
use warden_core::{
  chat::ChatEntry,
  incident::{Incident, IncidentKind, IncidentStatus},
  intent::Intent,
  risk::{Likelihood, SeverityScores},
  sds::{GhsInfo, NfpaRating, SdsDocument},
  user::{Role, User},
};

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::Decode(e.to_string()))
}

// ─── Role ────────────────────────────────────────────────────────────────────

pub fn encode_role(r: Role) -> &'static str {
  match r {
    Role::Admin => "admin",
    Role::Contributor => "contributor",
  }
}

pub fn decode_role(s: &str) -> Result<Role> {
  match s {
    "admin" => Ok(Role::Admin),
    "contributor" => Ok(Role::Contributor),
    other => Err(Error::Decode(format!("unknown role: {other:?}"))),
  }
}

// ─── IncidentKind ────────────────────────────────────────────────────────────

pub fn encode_incident_kind(k: IncidentKind) -> &'static str {
  match k {
    IncidentKind::InjuryIllness => "injury_illness",
    IncidentKind::NearMiss => "near_miss",
    IncidentKind::PropertyDamage => "property_damage",
    IncidentKind::Environmental => "environmental",
    IncidentKind::Security => "security",
    IncidentKind::General => "general",
  }
}

pub fn decode_incident_kind(s: &str) -> Result<IncidentKind> {
  match s {
    "injury_illness" => Ok(IncidentKind::InjuryIllness),
    "near_miss" => Ok(IncidentKind::NearMiss),
    "property_damage" => Ok(IncidentKind::PropertyDamage),
    "environmental" => Ok(IncidentKind::Environmental),
    "security" => Ok(IncidentKind::Security),
    "general" => Ok(IncidentKind::General),
    other => Err(Error::Decode(format!("unknown incident kind: {other:?}"))),
  }
}

// ─── IncidentStatus ──────────────────────────────────────────────────────────

pub fn encode_incident_status(s: IncidentStatus) -> &'static str {
  match s {
    IncidentStatus::Open => "open",
    IncidentStatus::UnderReview => "under_review",
    IncidentStatus::Closed => "closed",
  }
}

pub fn decode_incident_status(s: &str) -> Result<IncidentStatus> {
  match s {
    "open" => Ok(IncidentStatus::Open),
    "under_review" => Ok(IncidentStatus::UnderReview),
    "closed" => Ok(IncidentStatus::Closed),
    other => Err(Error::Decode(format!("unknown incident status: {other:?}"))),
  }
}

// ─── Intent ──────────────────────────────────────────────────────────────────

pub fn decode_intent(s: &str) -> Result<Intent> {
  match s {
    "report_incident" => Ok(Intent::ReportIncident),
    "sds_query" => Ok(Intent::SdsQuery),
    "safety_concern" => Ok(Intent::SafetyConcern),
    "help" => Ok(Intent::Help),
    "general" => Ok(Intent::General),
    other => Err(Error::Decode(format!("unknown intent: {other:?}"))),
  }
}

// ─── GHS / NFPA ──────────────────────────────────────────────────────────────

pub fn encode_ghs(g: &GhsInfo) -> Result<String> {
  Ok(serde_json::to_string(g)?)
}

pub fn decode_ghs(s: &str) -> Result<GhsInfo> { Ok(serde_json::from_str(s)?) }

pub fn encode_nfpa(n: &NfpaRating) -> Result<String> {
  Ok(serde_json::to_string(n)?)
}

pub fn decode_nfpa(s: &str) -> Result<NfpaRating> {
  Ok(serde_json::from_str(s)?)
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read directly from a `users` row.
pub struct RawUser {
  pub user_id:       String,
  pub username:      String,
  pub password_hash: String,
  pub role:          String,
  pub created_at:    String,
}

impl RawUser {
  pub fn into_user(self) -> Result<User> {
    Ok(User {
      user_id:       decode_uuid(&self.user_id)?,
      username:      self.username,
      password_hash: self.password_hash,
      role:          decode_role(&self.role)?,
      created_at:    decode_dt(&self.created_at)?,
    })
  }
}

/// Raw values read directly from an `incidents` row.
pub struct RawIncident {
  pub incident_id:          String,
  pub kind:                 String,
  pub title:                String,
  pub description:          String,
  pub location:             Option<String>,
  pub severity_people:      u8,
  pub severity_environment: u8,
  pub severity_cost:        u8,
  pub severity_reputation:  u8,
  pub severity_legal:       u8,
  pub likelihood:           u8,
  pub risk_score:           u8,
  pub status:               String,
  pub reported_by:          String,
  pub created_at:           String,
}

impl RawIncident {
  pub fn into_incident(self) -> Result<Incident> {
    let severity = SeverityScores {
      people:      self.severity_people,
      environment: self.severity_environment,
      cost:        self.severity_cost,
      reputation:  self.severity_reputation,
      legal:       self.severity_legal,
    };
    Ok(Incident {
      incident_id: decode_uuid(&self.incident_id)?,
      kind:        decode_incident_kind(&self.kind)?,
      title:       self.title,
      description: self.description,
      location:    self.location,
      severity,
      likelihood:  Likelihood::new(self.likelihood).map_err(Error::Core)?,
      risk_score:  self.risk_score,
      status:      decode_incident_status(&self.status)?,
      reported_by: decode_uuid(&self.reported_by)?,
      created_at:  decode_dt(&self.created_at)?,
    })
  }
}

/// Raw values read directly from an `sds_documents` row.
pub struct RawSdsDocument {
  pub sds_id:       String,
  pub product_name: String,
  pub manufacturer: Option<String>,
  pub file_path:    Option<String>,
  pub full_text:    Option<String>,
  pub ghs_json:     Option<String>,
  pub nfpa_json:    Option<String>,
  pub created_at:   String,
}

impl RawSdsDocument {
  pub fn into_document(self) -> Result<SdsDocument> {
    Ok(SdsDocument {
      sds_id:       decode_uuid(&self.sds_id)?,
      product_name: self.product_name,
      manufacturer: self.manufacturer,
      file_path:    self.file_path,
      full_text:    self.full_text,
      ghs:          self.ghs_json.as_deref().map(decode_ghs).transpose()?,
      nfpa:         self.nfpa_json.as_deref().map(decode_nfpa).transpose()?,
      created_at:   decode_dt(&self.created_at)?,
    })
  }
}

/// Raw values read directly from a `chat_history` row.
pub struct RawChatEntry {
  pub chat_id:    String,
  pub message:    String,
  pub response:   String,
  pub intent:     String,
  pub confidence: f64,
  pub created_at: String,
}

impl RawChatEntry {
  pub fn into_entry(self) -> Result<ChatEntry> {
    Ok(ChatEntry {
      chat_id:    decode_uuid(&self.chat_id)?,
      message:    self.message,
      response:   self.response,
      intent:     decode_intent(&self.intent)?,
      confidence: self.confidence as f32,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}
