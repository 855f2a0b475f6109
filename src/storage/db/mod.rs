//! Database backends.
//!
//! Both backends implement [`ResultStore`](crate::storage::ResultStore) with
//! the same connection-per-operation discipline:
//! - `SqliteStore`: local file, created on first use
//! - `PostgresStore`: remote server, credentials supplied through the URL
//!
//! # Example
//!
//! ```ignore
//! let store = SqliteStore::new("data/flynet.db");
//! store.ensure_schema().await?;
//! store.append(&ProbeOutcome::success(ts, 0.02)).await?;
//! ```

mod postgres;
mod sqlite;

pub use postgres::PostgresStore;
pub use sqlite::SqliteStore;

/// Close a connection after its work is committed.
///
/// A failed close cannot un-commit anything, so it is logged and dropped.
async fn close_quietly<C: sqlx::Connection>(conn: C, backend: &'static str) {
    if let Err(e) = conn.close().await {
        tracing::debug!(backend, error = %e, "Failed to close store connection cleanly");
    }
}
