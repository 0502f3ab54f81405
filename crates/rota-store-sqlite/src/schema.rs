//! SQL schema for the Rota SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

-- Rows in every table are soft-deleted only (deleted = 1), never removed.

CREATE TABLE IF NOT EXISTS concierges (
    concierge_id TEXT PRIMARY KEY,
    name         TEXT NOT NULL COLLATE NOCASE,
    color        TEXT NOT NULL,             -- lowercase ColorTag
    active       INTEGER NOT NULL DEFAULT 1,
    deleted      INTEGER NOT NULL DEFAULT 0,
    created_at   TEXT NOT NULL,
    updated_at   TEXT NOT NULL
);

-- One live concierge per case-folded name.
CREATE UNIQUE INDEX IF NOT EXISTS concierges_live_name_idx
    ON concierges(name) WHERE deleted = 0;

CREATE TABLE IF NOT EXISTS shift_assignments (
    shift_id     TEXT PRIMARY KEY,
    shift_date   TEXT NOT NULL,             -- YYYY-MM-DD
    concierge_id TEXT NOT NULL REFERENCES concierges(concierge_id),
    shift_type   TEXT NOT NULL DEFAULT 'full_day',
    notes        TEXT,
    deleted      INTEGER NOT NULL DEFAULT 0,
    created_at   TEXT NOT NULL,
    updated_at   TEXT NOT NULL
);

-- One live assignment per date.
CREATE UNIQUE INDEX IF NOT EXISTS shift_assignments_live_date_idx
    ON shift_assignments(shift_date) WHERE deleted = 0;
CREATE INDEX IF NOT EXISTS shift_assignments_concierge_idx
    ON shift_assignments(concierge_id);

-- One row per month, live or not; a deleted row is revived in place.
CREATE TABLE IF NOT EXISTS month_snapshots (
    snapshot_id  TEXT PRIMARY KEY,
    year_value   INTEGER NOT NULL,
    month_value  INTEGER NOT NULL,
    payload      TEXT NOT NULL,             -- versioned JSON document
    description  TEXT,
    total_shifts INTEGER NOT NULL,
    taken_at     TEXT NOT NULL,
    deleted      INTEGER NOT NULL DEFAULT 0,
    created_at   TEXT NOT NULL,
    updated_at   TEXT NOT NULL,
    UNIQUE (year_value, month_value)
);

PRAGMA user_version = 1;
";
