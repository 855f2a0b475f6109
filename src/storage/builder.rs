//! Store construction from configuration.

use std::sync::Arc;

use crate::config::StoreConfig;
use crate::storage::{PostgresStore, ResultStore, SqliteStore, StorageError};

/// Build the store selected by `config`.
///
/// No connection is opened here; the first I/O happens in
/// [`ResultStore::ensure_schema`].
///
/// # Example
///
/// ```
/// use flynet::config::StoreConfig;
/// use flynet::storage::open_store;
///
/// let store = open_store(&StoreConfig::Sqlite { path: "/tmp/flynet-doc.db".into() }).unwrap();
/// assert_eq!(store.backend(), "sqlite");
/// ```
pub fn open_store(config: &StoreConfig) -> Result<Arc<dyn ResultStore>, StorageError> {
    let store: Arc<dyn ResultStore> = match config {
        StoreConfig::Sqlite { path } => Arc::new(SqliteStore::new(path)),
        StoreConfig::Postgres { url } => Arc::new(PostgresStore::new(url)?),
    };

    tracing::debug!(backend = store.backend(), store = %config, "Store selected");
    Ok(store)
}

/// Build the store selected by `config` for reading existing history.
///
/// Unlike [`open_store`], a SQLite file that does not exist is an error on
/// first use rather than being created.
pub fn open_existing_store(config: &StoreConfig) -> Result<Arc<dyn ResultStore>, StorageError> {
    let store: Arc<dyn ResultStore> = match config {
        StoreConfig::Sqlite { path } => Arc::new(SqliteStore::open_existing(path)),
        StoreConfig::Postgres { url } => Arc::new(PostgresStore::new(url)?),
    };

    tracing::debug!(backend = store.backend(), store = %config, "Store selected for reading");
    Ok(store)
}
