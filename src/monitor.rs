//! Monitor Loop
//!
//! Drives the probe-and-record cadence: probe, append, sleep for whatever is
//! left of the interval, repeat until the shutdown future resolves.
//!
//! # Architecture
//!
//! - [`Monitor`]: Owns the prober and store, runs ticks one at a time
//! - [`TickReport`]: What happened in one tick (outcome, store result)
//! - [`Clock`]: Wall-clock source for record timestamps
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use flynet::{AppConfig, IcmpProber, Monitor, open_store};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AppConfig::default();
//! let store = open_store(&config.store)?;
//! store.ensure_schema().await?;
//!
//! let monitor = Monitor::new(&config, Arc::new(IcmpProber::new()), store);
//! monitor.run_until(async { let _ = tokio::signal::ctrl_c().await; }).await;
//! # Ok(())
//! # }
//! ```

mod clock;
mod runner;

pub use clock::{Clock, SystemClock, remaining_sleep};
pub use runner::{Monitor, TickReport};
