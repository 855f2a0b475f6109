//! SQLite backend implementation using sqlx.

use std::path::{Path, PathBuf};
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection, SqliteJournalMode, SqliteSynchronous};
use sqlx::{ConnectOptions, Connection};

use crate::storage::schema::{
    PING_RESULTS_INDEX_DDL, SELECT_ALL_ORDERED, SQLITE_INSERT, SQLITE_PING_RESULTS_DDL,
};
use crate::storage::{ProbeOutcome, ResultStore, StorageError};

/// How long a connection waits on a locked database file.
const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

const BACKEND: &str = "sqlite";

/// Local file-backed result store.
///
/// Uses WAL journal mode and `synchronous = FULL`: an acknowledged append
/// survives power loss, which matters more here than write throughput.
#[derive(Clone)]
pub struct SqliteStore {
    path: PathBuf,
    options: SqliteConnectOptions,
}

impl std::fmt::Debug for SqliteStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteStore")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl SqliteStore {
    /// Create a store for the database file at `path`.
    ///
    /// Nothing is opened until the first operation; the file is created if
    /// missing.
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let options = SqliteConnectOptions::new()
            .filename(&path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Full)
            .busy_timeout(DEFAULT_BUSY_TIMEOUT);

        Self { path, options }
    }

    /// Create a store for a database file that must already exist.
    ///
    /// Used by readers: a mistyped path fails with
    /// [`StorageError::Connect`] instead of leaving an empty database
    /// behind. The journal mode is left as the writer set it.
    pub fn open_existing(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let options = SqliteConnectOptions::new()
            .filename(&path)
            .create_if_missing(false)
            .busy_timeout(DEFAULT_BUSY_TIMEOUT);

        Self { path, options }
    }

    /// Path of the database file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn connect(&self) -> Result<SqliteConnection, StorageError> {
        self.options.connect().await.map_err(StorageError::Connect)
    }
}

#[async_trait::async_trait]
impl ResultStore for SqliteStore {
    fn backend(&self) -> &'static str {
        BACKEND
    }

    async fn ensure_schema(&self) -> Result<(), StorageError> {
        let mut conn = self.connect().await?;

        sqlx::query(SQLITE_PING_RESULTS_DDL)
            .execute(&mut conn)
            .await
            .map_err(StorageError::Schema)?;
        sqlx::query(PING_RESULTS_INDEX_DDL)
            .execute(&mut conn)
            .await
            .map_err(StorageError::Schema)?;

        super::close_quietly(conn, BACKEND).await;
        tracing::info!(path = %self.path.display(), "SQLite schema ready");
        Ok(())
    }

    async fn append(&self, outcome: &ProbeOutcome) -> Result<(), StorageError> {
        let mut conn = self.connect().await?;

        let mut tx = conn.begin().await.map_err(StorageError::Write)?;
        sqlx::query(SQLITE_INSERT)
            .bind(outcome.timestamp)
            .bind(outcome.latency)
            .bind(outcome.error.as_deref())
            .execute(&mut *tx)
            .await
            .map_err(StorageError::Write)?;
        tx.commit().await.map_err(StorageError::Write)?;

        super::close_quietly(conn, BACKEND).await;
        Ok(())
    }

    async fn fetch_all(&self) -> Result<Vec<ProbeOutcome>, StorageError> {
        let mut conn = self.connect().await?;

        let rows: Vec<(f64, Option<f64>, Option<String>)> = sqlx::query_as(SELECT_ALL_ORDERED)
            .fetch_all(&mut conn)
            .await
            .map_err(StorageError::Read)?;

        super::close_quietly(conn, BACKEND).await;
        Ok(rows
            .into_iter()
            .map(|(timestamp, latency, error)| ProbeOutcome {
                timestamp,
                latency,
                error,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    async fn table_count(path: &Path) -> i64 {
        let mut conn = SqliteConnectOptions::new()
            .filename(path)
            .connect()
            .await
            .unwrap();
        let row: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'ping_results'",
        )
        .fetch_one(&mut conn)
        .await
        .unwrap();
        row.0
    }

    #[tokio::test]
    async fn test_ensure_schema_is_idempotent() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("flynet.db");
        let store = SqliteStore::new(&db_path);

        store.ensure_schema().await.unwrap();
        store.ensure_schema().await.unwrap();

        assert_eq!(table_count(&db_path).await, 1);
    }

    #[tokio::test]
    async fn test_append_and_fetch_ordered() {
        let dir = tempdir().unwrap();
        let store = SqliteStore::new(dir.path().join("flynet.db"));
        store.ensure_schema().await.unwrap();

        store
            .append(&ProbeOutcome::success(1_000.0, 0.02))
            .await
            .unwrap();
        store
            .append(&ProbeOutcome::failure(990.0, "Ping timed out"))
            .await
            .unwrap();

        let rows = store.fetch_all().await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].timestamp, 990.0);
        assert_eq!(rows[0].latency, None);
        assert_eq!(rows[0].error.as_deref(), Some("Ping timed out"));
        assert_eq!(rows[1].latency, Some(0.02));
        assert_eq!(rows[1].error, None);
    }

    #[tokio::test]
    async fn test_accepts_table_without_id_column() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("legacy.db");

        let mut conn = SqliteConnectOptions::new()
            .filename(&db_path)
            .create_if_missing(true)
            .connect()
            .await
            .unwrap();
        sqlx::query("CREATE TABLE ping_results (timestamp FLOAT, latency FLOAT, error TEXT)")
            .execute(&mut conn)
            .await
            .unwrap();
        sqlx::query("INSERT INTO ping_results VALUES (1.5, 0.03, NULL)")
            .execute(&mut conn)
            .await
            .unwrap();
        conn.close().await.unwrap();

        let store = SqliteStore::new(&db_path);
        store.ensure_schema().await.unwrap();
        store
            .append(&ProbeOutcome::failure(2.5, "Ping timed out"))
            .await
            .unwrap();

        let rows = store.fetch_all().await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].latency, Some(0.03));
        assert_eq!(rows[1].error.as_deref(), Some("Ping timed out"));
    }

    #[tokio::test]
    async fn test_append_without_schema_fails() {
        let dir = tempdir().unwrap();
        let store = SqliteStore::new(dir.path().join("empty.db"));

        let result = store.append(&ProbeOutcome::success(1.0, 0.01)).await;
        assert!(matches!(result, Err(StorageError::Write(_))));
    }

    #[tokio::test]
    async fn test_open_existing_does_not_create_file() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("typo.db");
        let store = SqliteStore::open_existing(&db_path);

        let result = store.fetch_all().await;
        assert!(matches!(result, Err(StorageError::Connect(_))));
        assert!(!db_path.exists());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_open_existing_reads_written_history() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("flynet.db");
        let writer = SqliteStore::new(&db_path);
        writer.ensure_schema().await.unwrap();
        writer
            .append(&ProbeOutcome::success(1_000.0, 0.02))
            .await
            .unwrap();

        let rows = SqliteStore::open_existing(&db_path).fetch_all().await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].latency, Some(0.02));
    }

    #[tokio::test]
    async fn test_connect_failure_is_reported() {
        let dir = tempdir().unwrap();
        let store = SqliteStore::new(dir.path().join("missing-dir").join("flynet.db"));

        let result = store.ensure_schema().await;
        assert!(matches!(result, Err(StorageError::Connect(_))));
    }
}
