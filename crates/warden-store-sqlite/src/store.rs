//! [`SqliteStore`] — the SQLite implementation of [`EhsStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use warden_core::{
  chat::{ChatEntry, NewChatEntry},
  incident::{Incident, IncidentStatus, NewIncident},
  risk::RiskLevel,
  sds::{NewSdsDocument, SdsDocument},
  store::{DashboardStats, EhsStore, IncidentQuery, IncidentSummary},
  user::{NewUser, User},
};

use crate::{
  Error, Result,
  encode::{
    RawChatEntry, RawIncident, RawSdsDocument, RawUser, encode_dt,
    encode_ghs, encode_incident_kind, encode_incident_status, encode_nfpa,
    encode_role, encode_uuid,
  },
  schema::SCHEMA,
};

// ─── Row mapping helpers ─────────────────────────────────────────────────────

const INCIDENT_COLUMNS: &str = "incident_id, kind, title, description, \
   location, severity_people, severity_environment, severity_cost, \
   severity_reputation, severity_legal, likelihood, risk_score, status, \
   reported_by, created_at";

fn raw_incident(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawIncident> {
  Ok(RawIncident {
    incident_id:          row.get(0)?,
    kind:                 row.get(1)?,
    title:                row.get(2)?,
    description:          row.get(3)?,
    location:             row.get(4)?,
    severity_people:      row.get(5)?,
    severity_environment: row.get(6)?,
    severity_cost:        row.get(7)?,
    severity_reputation:  row.get(8)?,
    severity_legal:       row.get(9)?,
    likelihood:           row.get(10)?,
    risk_score:           row.get(11)?,
    status:               row.get(12)?,
    reported_by:          row.get(13)?,
    created_at:           row.get(14)?,
  })
}

fn raw_user(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawUser> {
  Ok(RawUser {
    user_id:       row.get(0)?,
    username:      row.get(1)?,
    password_hash: row.get(2)?,
    role:          row.get(3)?,
    created_at:    row.get(4)?,
  })
}

fn raw_sds(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawSdsDocument> {
  Ok(RawSdsDocument {
    sds_id:       row.get(0)?,
    product_name: row.get(1)?,
    manufacturer: row.get(2)?,
    file_path:    row.get(3)?,
    full_text:    row.get(4)?,
    ghs_json:     row.get(5)?,
    nfpa_json:    row.get(6)?,
    created_at:   row.get(7)?,
  })
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Warden EHS store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Insert a fully-built [`Incident`] into the `incidents` table.
  async fn insert_incident(&self, incident: &Incident) -> Result<()> {
    let id_str       = encode_uuid(incident.incident_id);
    let kind_str     = encode_incident_kind(incident.kind).to_owned();
    let title        = incident.title.clone();
    let description  = incident.description.clone();
    let location     = incident.location.clone();
    let severity     = incident.severity;
    let likelihood   = incident.likelihood.value();
    let risk_score   = incident.risk_score;
    let status_str   = encode_incident_status(incident.status).to_owned();
    let reporter_str = encode_uuid(incident.reported_by);
    let at_str       = encode_dt(incident.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO incidents (
             incident_id, kind, title, description, location,
             severity_people, severity_environment, severity_cost,
             severity_reputation, severity_legal, likelihood, risk_score,
             status, reported_by, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)",
          rusqlite::params![
            id_str,
            kind_str,
            title,
            description,
            location,
            severity.people,
            severity.environment,
            severity.cost,
            severity.reputation,
            severity.legal,
            likelihood,
            risk_score,
            status_str,
            reporter_str,
            at_str,
          ],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── EhsStore impl ───────────────────────────────────────────────────────────

impl EhsStore for SqliteStore {
  type Error = Error;

  // ── Users ──────────────────────────────────────────────────────────────────

  async fn create_user(&self, input: NewUser) -> Result<User> {
    if self.get_user_by_username(&input.username).await?.is_some() {
      return Err(Error::Core(warden_core::Error::DuplicateUsername(
        input.username,
      )));
    }

    let user = User {
      user_id:       Uuid::new_v4(),
      username:      input.username,
      password_hash: input.password_hash,
      role:          input.role,
      created_at:    Utc::now(),
    };

    let id_str   = encode_uuid(user.user_id);
    let username = user.username.clone();
    let hash     = user.password_hash.clone();
    let role_str = encode_role(user.role).to_owned();
    let at_str   = encode_dt(user.created_at);

    let inserted = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO users (user_id, username, password_hash, role, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![id_str, username, hash, role_str, at_str],
        )?;
        Ok(())
      })
      .await;

    // A concurrent create can slip past the pre-check; the UNIQUE
    // constraint on username is the backstop.
    if let Err(tokio_rusqlite::Error::Rusqlite(
      rusqlite::Error::SqliteFailure(e, _),
    )) = &inserted
      && e.code == rusqlite::ErrorCode::ConstraintViolation
    {
      return Err(Error::Core(warden_core::Error::DuplicateUsername(
        user.username,
      )));
    }
    inserted?;

    Ok(user)
  }

  async fn get_user(&self, id: Uuid) -> Result<Option<User>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "SELECT user_id, username, password_hash, role, created_at
             FROM users WHERE user_id = ?1",
            rusqlite::params![id_str],
            raw_user,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawUser::into_user).transpose()
  }

  async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
    let username = username.to_owned();

    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "SELECT user_id, username, password_hash, role, created_at
             FROM users WHERE username = ?1",
            rusqlite::params![username],
            raw_user,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawUser::into_user).transpose()
  }

  async fn list_users(&self) -> Result<Vec<User>> {
    let raws: Vec<RawUser> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT user_id, username, password_hash, role, created_at
           FROM users ORDER BY created_at",
        )?;
        let rows = stmt
          .query_map([], raw_user)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawUser::into_user).collect()
  }

  // ── Incidents ──────────────────────────────────────────────────────────────

  async fn create_incident(&self, input: NewIncident) -> Result<Incident> {
    let risk_score = input.validated_risk_score().map_err(Error::Core)?;

    if self.get_user(input.reported_by).await?.is_none() {
      return Err(Error::Core(warden_core::Error::UserNotFound(
        input.reported_by,
      )));
    }

    let incident = Incident {
      incident_id: Uuid::new_v4(),
      kind:        input.kind,
      title:       input.title,
      description: input.description,
      location:    input.location,
      severity:    input.severity,
      likelihood:  input.likelihood,
      risk_score,
      status:      IncidentStatus::default(),
      reported_by: input.reported_by,
      created_at:  Utc::now(),
    };

    self.insert_incident(&incident).await?;
    Ok(incident)
  }

  async fn get_incident(&self, id: Uuid) -> Result<Option<Incident>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawIncident> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!(
              "SELECT {INCIDENT_COLUMNS} FROM incidents WHERE incident_id = ?1"
            ),
            rusqlite::params![id_str],
            raw_incident,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawIncident::into_incident).transpose()
  }

  async fn list_incidents(&self, query: &IncidentQuery) -> Result<Vec<Incident>> {
    let status_str = query.status.map(encode_incident_status).map(str::to_owned);
    let kind_str   = query.kind.map(encode_incident_kind).map(str::to_owned);
    let limit_val  = query.limit.unwrap_or(100) as i64;
    let offset_val = query.offset.unwrap_or(0) as i64;

    let raws: Vec<RawIncident> = self
      .conn
      .call(move |conn| {
        // Build WHERE clause dynamically.
        let mut conds: Vec<&'static str> = vec![];
        if status_str.is_some() {
          conds.push("status = ?1");
        }
        if kind_str.is_some() {
          conds.push("kind = ?2");
        }

        let where_clause = if conds.is_empty() {
          String::new()
        } else {
          format!("WHERE {}", conds.join(" AND "))
        };

        let sql = format!(
          "SELECT {INCIDENT_COLUMNS} FROM incidents
           {where_clause}
           ORDER BY created_at DESC
           LIMIT ?3 OFFSET ?4"
        );

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(
            rusqlite::params![
              status_str.as_deref(),
              kind_str.as_deref(),
              limit_val,
              offset_val,
            ],
            raw_incident,
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawIncident::into_incident).collect()
  }

  async fn set_incident_status(
    &self,
    id:     Uuid,
    status: IncidentStatus,
  ) -> Result<Incident> {
    let id_str     = encode_uuid(id);
    let status_str = encode_incident_status(status).to_owned();

    let updated: usize = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE incidents SET status = ?1 WHERE incident_id = ?2",
          rusqlite::params![status_str, id_str],
        )?)
      })
      .await?;

    if updated == 0 {
      return Err(Error::Core(warden_core::Error::IncidentNotFound(id)));
    }

    self
      .get_incident(id)
      .await?
      .ok_or(Error::Core(warden_core::Error::IncidentNotFound(id)))
  }

  // ── SDS documents ──────────────────────────────────────────────────────────

  async fn add_sds(&self, input: NewSdsDocument) -> Result<SdsDocument> {
    if let Some(nfpa) = &input.nfpa {
      nfpa.validate().map_err(Error::Core)?;
    }

    let document = SdsDocument {
      sds_id:       Uuid::new_v4(),
      product_name: input.product_name,
      manufacturer: input.manufacturer,
      file_path:    input.file_path,
      full_text:    input.full_text,
      ghs:          input.ghs,
      nfpa:         input.nfpa,
      created_at:   Utc::now(),
    };

    let id_str       = encode_uuid(document.sds_id);
    let product_name = document.product_name.clone();
    let manufacturer = document.manufacturer.clone();
    let file_path    = document.file_path.clone();
    let full_text    = document.full_text.clone();
    let ghs_json     = document.ghs.as_ref().map(encode_ghs).transpose()?;
    let nfpa_json    = document.nfpa.as_ref().map(encode_nfpa).transpose()?;
    let at_str       = encode_dt(document.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO sds_documents (
             sds_id, product_name, manufacturer, file_path, full_text,
             ghs_json, nfpa_json, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
          rusqlite::params![
            id_str,
            product_name,
            manufacturer,
            file_path,
            full_text,
            ghs_json,
            nfpa_json,
            at_str,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(document)
  }

  async fn get_sds(&self, id: Uuid) -> Result<Option<SdsDocument>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawSdsDocument> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "SELECT sds_id, product_name, manufacturer, file_path, full_text,
                    ghs_json, nfpa_json, created_at
             FROM sds_documents WHERE sds_id = ?1",
            rusqlite::params![id_str],
            raw_sds,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawSdsDocument::into_document).transpose()
  }

  async fn search_sds(&self, text: &str, limit: usize) -> Result<Vec<SdsDocument>> {
    // SQLite LIKE is case-insensitive for ASCII, which covers product names.
    let pattern   = format!("%{text}%");
    let limit_val = limit as i64;

    let raws: Vec<RawSdsDocument> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT sds_id, product_name, manufacturer, file_path, full_text,
                  ghs_json, nfpa_json, created_at
           FROM sds_documents
           WHERE product_name LIKE ?1
              OR manufacturer LIKE ?1
              OR full_text    LIKE ?1
           ORDER BY product_name
           LIMIT ?2",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![pattern, limit_val], raw_sds)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawSdsDocument::into_document).collect()
  }

  // ── Chat history ───────────────────────────────────────────────────────────

  async fn record_chat(&self, input: NewChatEntry) -> Result<ChatEntry> {
    let entry = ChatEntry {
      chat_id:    Uuid::new_v4(),
      message:    input.message,
      response:   input.response,
      intent:     input.intent,
      confidence: input.confidence,
      created_at: Utc::now(),
    };

    let id_str     = encode_uuid(entry.chat_id);
    let message    = entry.message.clone();
    let response   = entry.response.clone();
    let intent_str = entry.intent.discriminant().to_owned();
    let confidence = entry.confidence as f64;
    let at_str     = encode_dt(entry.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO chat_history (chat_id, message, response, intent, confidence, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![id_str, message, response, intent_str, confidence, at_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(entry)
  }

  async fn recent_chat(&self, limit: usize) -> Result<Vec<ChatEntry>> {
    let limit_val = limit as i64;

    let raws: Vec<RawChatEntry> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT chat_id, message, response, intent, confidence, created_at
           FROM chat_history
           ORDER BY created_at DESC
           LIMIT ?1",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![limit_val], |row| {
            Ok(RawChatEntry {
              chat_id:    row.get(0)?,
              message:    row.get(1)?,
              response:   row.get(2)?,
              intent:     row.get(3)?,
              confidence: row.get(4)?,
              created_at: row.get(5)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawChatEntry::into_entry).collect()
  }

  // ── Dashboard ──────────────────────────────────────────────────────────────

  async fn dashboard_stats(&self) -> Result<DashboardStats> {
    let (total_incidents, open_incidents, high_risk_incidents, total_sds, raws) =
      self
        .conn
        .call(|conn| {
          let total_incidents: u64 =
            conn.query_row("SELECT COUNT(*) FROM incidents", [], |r| r.get(0))?;
          let open_incidents: u64 = conn.query_row(
            "SELECT COUNT(*) FROM incidents WHERE status = 'open'",
            [],
            |r| r.get(0),
          )?;
          let high_risk_incidents: u64 = conn.query_row(
            "SELECT COUNT(*) FROM incidents WHERE risk_score >= ?1",
            rusqlite::params![RiskLevel::HIGH_THRESHOLD],
            |r| r.get(0),
          )?;
          let total_sds: u64 = conn.query_row(
            "SELECT COUNT(*) FROM sds_documents",
            [],
            |r| r.get(0),
          )?;

          let mut stmt = conn.prepare(&format!(
            "SELECT {INCIDENT_COLUMNS} FROM incidents
             ORDER BY created_at DESC
             LIMIT 5"
          ))?;
          let raws = stmt
            .query_map([], raw_incident)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

          Ok((total_incidents, open_incidents, high_risk_incidents, total_sds, raws))
        })
        .await?;

    let recent_incidents = raws
      .into_iter()
      .map(|raw| {
        let incident = raw.into_incident()?;
        Ok(IncidentSummary {
          incident_id: incident.incident_id,
          kind:        incident.kind,
          title:       incident.title,
          risk_score:  incident.risk_score,
          created_at:  incident.created_at,
        })
      })
      .collect::<Result<Vec<_>>>()?;

    Ok(DashboardStats {
      total_incidents,
      open_incidents,
      high_risk_incidents,
      total_sds_documents: total_sds,
      recent_incidents,
    })
  }
}
