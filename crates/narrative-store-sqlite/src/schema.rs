//! SQL schema for the narrative item store.
//!
//! Executed once at connection startup via `PRAGMA user_version`. Future
//! migrations will be gated on that version number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
///
/// The primary key makes per-day deduplication an insert-time property:
/// a key seen twice on the same day under the same narrative is ignored,
/// so reads never need a DISTINCT pass.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS items (
    narrative  TEXT NOT NULL,
    item_key   TEXT NOT NULL,
    item_date  TEXT NOT NULL,   -- ISO 8601 calendar date (YYYY-MM-DD)
    sentiment  REAL,            -- NULL when the item was not scored
    PRIMARY KEY (narrative, item_key, item_date),
    CHECK (sentiment IS NULL OR (sentiment >= -1.0 AND sentiment <= 1.0))
);

CREATE INDEX IF NOT EXISTS items_narrative_date_idx
    ON items(narrative, item_date);

PRAGMA user_version = 1;
";
