//! SQL schema for the promo SQLite store.
//!
//! Executed once at connection startup via `PRAGMA user_version`. Future
//! migrations will be gated on that version number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

-- Events are owned by the events service. This table is a read model the
-- promo service joins against; rows are seeded, never mutated here.
CREATE TABLE IF NOT EXISTS events (
    event_id    TEXT PRIMARY KEY,
    name        TEXT NOT NULL,
    latitude    REAL NOT NULL,
    longitude   REAL NOT NULL,
    address     TEXT,
    created_at  TEXT NOT NULL    -- ISO 8601 UTC
);

-- Promos are never deleted. The only columns ever updated are `active`
-- (one-way, 1 -> 0) and `radius`.
CREATE TABLE IF NOT EXISTS promos (
    promo_id    TEXT PRIMARY KEY,
    event_id    TEXT NOT NULL REFERENCES events(event_id),
    code        TEXT NOT NULL UNIQUE,
    amount      REAL NOT NULL,
    radius      REAL NOT NULL,
    active      INTEGER NOT NULL DEFAULT 1,
    expiry_date TEXT NOT NULL,   -- YYYY-MM-DD
    created     TEXT NOT NULL    -- YYYY-MM-DD; store-assigned
);

CREATE INDEX IF NOT EXISTS promos_event_idx  ON promos(event_id);
CREATE INDEX IF NOT EXISTS promos_active_idx ON promos(active);

PRAGMA user_version = 1;
";
