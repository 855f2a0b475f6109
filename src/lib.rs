//! flynet - Network Reachability Probe
//!
//! This crate provides a long-running latency probe: it pings one target at a
//! fixed cadence and records every outcome (latency or failure reason) in a
//! durable store for later analysis. It can be used as a library, or run as a
//! standalone binary with the `flynet` executable.
//!
//! # Architecture
//!
//! - **Probe**: One ICMP echo per tick with a bounded wait, failures classified
//! - **Storage**: Append-only `ping_results` table in SQLite or PostgreSQL
//! - **Monitor**: Fixed-cadence loop that never stops on per-tick failures
//! - **Analysis**: Date-filtered, smoothed view and hour-of-day distribution
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use flynet::{AppConfig, IcmpProber, Monitor, open_store};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AppConfig::default().with_target("1.1.1.1");
//!     config.validate()?;
//!
//!     let store = open_store(&config.store)?;
//!     store.ensure_schema().await?;
//!
//!     let monitor = Monitor::new(&config, Arc::new(IcmpProber::new()), store);
//!     monitor.run_until(async { let _ = tokio::signal::ctrl_c().await; }).await;
//!     Ok(())
//! }
//! ```

pub mod analysis;
pub mod config;
pub mod monitor;
pub mod probe;
pub mod storage;

pub use config::{AppConfig, ConfigError, StoreConfig};
pub use monitor::{Clock, Monitor, SystemClock, TickReport};
pub use probe::{FailureKind, IcmpProber, ProbeFailure, ProbeStatus, Prober};
pub use storage::{
    PostgresStore, ProbeOutcome, ResultStore, SqliteStore, StorageError, open_existing_store,
    open_store,
};
