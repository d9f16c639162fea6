//! SQL schema for the Warden SQLite store.
//!
//! Executed once at connection startup via `PRAGMA user_version`. Future
//! migrations will be gated on that version number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS users (
    user_id       TEXT PRIMARY KEY,
    username      TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,   -- argon2 PHC string
    role          TEXT NOT NULL DEFAULT 'contributor',  -- 'admin' | 'contributor'
    created_at    TEXT NOT NULL    -- ISO 8601 UTC; server-assigned
);

CREATE TABLE IF NOT EXISTS incidents (
    incident_id          TEXT PRIMARY KEY,
    kind                 TEXT NOT NULL,   -- discriminant of IncidentKind
    title                TEXT NOT NULL,
    description          TEXT NOT NULL,
    location             TEXT,
    severity_people      INTEGER NOT NULL DEFAULT 0,
    severity_environment INTEGER NOT NULL DEFAULT 0,
    severity_cost        INTEGER NOT NULL DEFAULT 0,
    severity_reputation  INTEGER NOT NULL DEFAULT 0,
    severity_legal       INTEGER NOT NULL DEFAULT 0,
    likelihood           INTEGER NOT NULL DEFAULT 0,
    -- always overall severity * likelihood; assigned by the store
    risk_score           INTEGER NOT NULL DEFAULT 0,
    status               TEXT NOT NULL DEFAULT 'open',
    reported_by          TEXT NOT NULL REFERENCES users(user_id),
    created_at           TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS sds_documents (
    sds_id       TEXT PRIMARY KEY,
    product_name TEXT NOT NULL,
    manufacturer TEXT,
    file_path    TEXT,
    full_text    TEXT,
    ghs_json     TEXT,            -- JSON-encoded GhsInfo or NULL
    nfpa_json    TEXT,            -- JSON-encoded NfpaRating or NULL
    created_at   TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS chat_history (
    chat_id    TEXT PRIMARY KEY,
    message    TEXT NOT NULL,
    response   TEXT NOT NULL,
    intent     TEXT NOT NULL,     -- discriminant of Intent
    confidence REAL NOT NULL,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS incidents_status_idx  ON incidents(status);
CREATE INDEX IF NOT EXISTS incidents_risk_idx    ON incidents(risk_score);
CREATE INDEX IF NOT EXISTS incidents_created_idx ON incidents(created_at);
CREATE INDEX IF NOT EXISTS sds_product_idx       ON sds_documents(product_name);
CREATE INDEX IF NOT EXISTS chat_created_idx      ON chat_history(created_at);

PRAGMA user_version = 1;
";
