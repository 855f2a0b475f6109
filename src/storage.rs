//! Storage Layer
//!
//! Durable, append-only persistence for probe outcomes.
//!
//! # Components
//!
//! - [`ResultStore`]: Capability trait shared by every backend (schema, append, read)
//! - [`SqliteStore`] / [`PostgresStore`]: Interchangeable backends
//! - [`open_store`]: Selects a backend from [`StoreConfig`](crate::config::StoreConfig)
//! - [`open_existing_store`]: Same, for readers that must not create a database
//! - [`ProbeOutcome`]: The single record type stored in `ping_results`
//!
//! Every operation opens its own connection and closes it before returning.
//! Ticks are seconds apart, so holding a connection across the idle gap buys
//! nothing and risks reusing a stale one.

mod builder;
pub mod db;
mod error;
mod schema;
mod traits;
mod types;

pub use builder::{open_existing_store, open_store};
pub use db::{PostgresStore, SqliteStore};
pub use error::StorageError;
pub use schema::PING_RESULTS_TABLE;
pub use traits::ResultStore;
pub use types::ProbeOutcome;
