//! Configuration module for flynet.
//!
//! Provides YAML-based configuration loading and validation for:
//! - Probe target, interval and timeout
//! - Store backend (SQLite file or PostgreSQL URL) and write timeout
//!
//! Values are resolved once at startup (defaults, then the optional file,
//! then CLI/env overrides) and never re-read while running.

mod app;
mod validation;

pub use app::{AppConfig, StoreConfig};
pub use validation::{ConfigError, expand_env_vars, redact_url};

// Re-export constants
pub use app::{DEFAULT_INTERVAL_SECS, DEFAULT_SQLITE_PATH, DEFAULT_TARGET, DEFAULT_TIMEOUT_SECS};
