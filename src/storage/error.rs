//! Storage-specific error types.
//!
//! All storage operations return [`StorageError`] on failure. The variant
//! tells the monitor which stage failed (connect, schema, write, read), which
//! is what ends up in the tick's log line.

use std::time::Duration;

use thiserror::Error;

/// Errors that can occur in the storage layer.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Could not open a connection to the backend.
    #[error("failed to connect to store: {0}")]
    Connect(#[source] sqlx::Error),

    /// Schema creation failed.
    #[error("failed to initialize schema: {0}")]
    Schema(#[source] sqlx::Error),

    /// The insert or its commit was rejected.
    #[error("failed to write probe outcome: {0}")]
    Write(#[source] sqlx::Error),

    /// Reading the history failed.
    #[error("failed to read probe outcomes: {0}")]
    Read(#[source] sqlx::Error),

    /// The write did not finish within the configured bound.
    ///
    /// The outcome of the write is unknown, not lost. Dropping an in-flight
    /// SQLite append does not stop sqlx's worker thread, so a commit that was
    /// already queued may still land after this error is reported.
    #[error("store write timed out after {0:?} (row may still be committed)")]
    Timeout(Duration),

    /// Invalid connection options (e.g., malformed database URL).
    #[error("invalid store configuration: {0}")]
    InvalidConfig(String),
}
