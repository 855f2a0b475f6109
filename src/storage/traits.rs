//! Backend-neutral store capability.

use crate::storage::{ProbeOutcome, StorageError};

/// Durable append-only store of probe outcomes.
///
/// The monitor only ever talks to this trait; whether the rows end up in a
/// local SQLite file or a remote PostgreSQL server is decided at startup.
///
/// # Contract
///
/// - `ensure_schema` is idempotent and is called once before the first append.
/// - `append` writes exactly one row and commits before returning. On error
///   nothing was written.
/// - Implementations never retry internally and never panic on backend failure.
#[async_trait::async_trait]
pub trait ResultStore: Send + Sync {
    /// Short backend name for logging (e.g., "sqlite").
    fn backend(&self) -> &'static str;

    /// Create the results table and index if they don't exist.
    async fn ensure_schema(&self) -> Result<(), StorageError>;

    /// Durably write one outcome.
    async fn append(&self, outcome: &ProbeOutcome) -> Result<(), StorageError>;

    /// All stored outcomes ordered by timestamp ascending.
    async fn fetch_all(&self) -> Result<Vec<ProbeOutcome>, StorageError>;
}
