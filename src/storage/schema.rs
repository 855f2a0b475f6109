//! Database schema definitions.
//!
//! One table per backend dialect. Both keep the column names of the original
//! `ping_results` layout (`timestamp`, `latency`, `error`), so a database
//! created without the `id` column keeps working: `CREATE TABLE IF NOT EXISTS`
//! leaves it alone and every statement names its columns explicitly.

/// Name of the results table.
pub const PING_RESULTS_TABLE: &str = "ping_results";

/// SQLite DDL for the results table.
pub const SQLITE_PING_RESULTS_DDL: &str = r#"
CREATE TABLE IF NOT EXISTS ping_results (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    "timestamp" REAL NOT NULL,
    latency     REAL,
    error       TEXT
);
"#;

/// PostgreSQL DDL for the results table.
pub const POSTGRES_PING_RESULTS_DDL: &str = r#"
CREATE TABLE IF NOT EXISTS ping_results (
    id          BIGSERIAL PRIMARY KEY,
    "timestamp" DOUBLE PRECISION NOT NULL,
    latency     DOUBLE PRECISION,
    error       TEXT
);
"#;

/// Timestamp index, valid in both dialects.
pub const PING_RESULTS_INDEX_DDL: &str = r#"
CREATE INDEX IF NOT EXISTS idx_ping_results_timestamp ON ping_results ("timestamp");
"#;

pub const SQLITE_INSERT: &str =
    r#"INSERT INTO ping_results ("timestamp", latency, error) VALUES (?1, ?2, ?3)"#;

pub const POSTGRES_INSERT: &str =
    r#"INSERT INTO ping_results ("timestamp", latency, error) VALUES ($1, $2, $3)"#;

/// Read interface for the analysis path.
pub const SELECT_ALL_ORDERED: &str =
    r#"SELECT "timestamp", latency, error FROM ping_results ORDER BY "timestamp" ASC"#;
