//! `SQLite` schema definitions for the key-value medium.
//!
//! Every statement is idempotent; versioning lives in [`super::migrations`].

/// SQL statement to create the key-value table.
pub const CREATE_KV_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS kv_store (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL,
    updated_at TEXT NOT NULL
)
";

/// SQL statement to create the metadata table for schema bookkeeping.
pub const CREATE_METADATA_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS metadata (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
)
";

/// All schema creation statements in order.
pub const SCHEMA_STATEMENTS: &[&str] = &[CREATE_KV_TABLE, CREATE_METADATA_TABLE];
