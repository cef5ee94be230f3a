//! SQL schema for the pelagic SQLite store.
//!
//! One shared `observations` relation plus a `platforms` registry replaces
//! the per-platform table scheme: partitions are rows in the registry, the
//! two per-partition access-pattern indexes become composite indexes, and
//! no platform id is ever interpolated into a schema identifier.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE … IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA synchronous = NORMAL;
PRAGMA foreign_keys = ON;

-- Partition registry. A platform's partition exists iff its row does.
-- Platforms are never deleted except by explicit administrative reset.
CREATE TABLE IF NOT EXISTS platforms (
    platform_id   INTEGER PRIMARY KEY,
    registered_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS observations (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    platform_id     INTEGER NOT NULL REFERENCES platforms(platform_id),
    profile_id      TEXT NOT NULL,
    latitude        REAL,
    longitude       REAL,
    observed_at     TEXT NOT NULL,   -- canonical 'YYYY-MM-DD HH:MM:SS' UTC
    depth_min       REAL,
    depth_max       REAL,
    temperature_avg REAL,
    salinity_avg    REAL,
    pressure_avg    REAL,
    inserted_at     TEXT NOT NULL,   -- server-assigned, kept on merge
    UNIQUE (platform_id, profile_id, observed_at)
);

-- The two access patterns: latest-first reads and profile lookups.
CREATE INDEX IF NOT EXISTS observations_time_idx
    ON observations (platform_id, observed_at DESC);
CREATE INDEX IF NOT EXISTS observations_profile_idx
    ON observations (platform_id, profile_id);

PRAGMA user_version = 1;
";
