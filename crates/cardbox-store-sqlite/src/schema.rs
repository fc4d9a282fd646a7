//! SQL schema for the cardbox SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

-- One row per card file ever recorded; the name is the business key.
CREATE TABLE IF NOT EXISTS FILE (
    file_id       INTEGER PRIMARY KEY AUTOINCREMENT,
    file_name     TEXT NOT NULL UNIQUE,
    last_modified TEXT NOT NULL,   -- YYYY-MM-DD HH:MM:SS, local time of the file
    created_at    TEXT NOT NULL    -- ISO 8601 UTC; set once at insert
);

-- At most one contact per file; removed with its file.
CREATE TABLE IF NOT EXISTS CONTACT (
    contact_id  INTEGER PRIMARY KEY AUTOINCREMENT,
    name        TEXT NOT NULL,
    birthday    TEXT,
    anniversary TEXT,
    file_id     INTEGER NOT NULL UNIQUE
                REFERENCES FILE(file_id) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS contact_name_idx ON CONTACT(name);

PRAGMA user_version = 1;
";
