//! Core probe traits and types.

use std::time::Duration;

use strum_macros::{AsRefStr, Display};
use thiserror::Error;

/// Error text stored for a probe that got no reply in time.
pub const TIMEOUT_MESSAGE: &str = "Ping timed out";

/// Stable classification of a failed probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum FailureKind {
    /// No reply within the timeout.
    Timeout,
    /// Hostname could not be resolved.
    Resolve,
    /// ICMP socket could not be created (usually missing privileges).
    Socket,
    /// Any other send/receive failure.
    Network,
}

/// Why a probe produced no latency.
///
/// The `Display` text is what gets stored in the `error` column. A timeout
/// always renders as [`TIMEOUT_MESSAGE`]; every other kind is prefixed with
/// its kind code so the two can't be confused when reading the history.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProbeFailure {
    #[error("Ping timed out")]
    Timeout,

    #[error("resolve: {0}")]
    Resolve(String),

    #[error("socket: {0}")]
    Socket(String),

    #[error("network: {0}")]
    Network(String),
}

impl ProbeFailure {
    /// Stable kind code.
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Timeout => FailureKind::Timeout,
            Self::Resolve(_) => FailureKind::Resolve,
            Self::Socket(_) => FailureKind::Socket,
            Self::Network(_) => FailureKind::Network,
        }
    }
}

/// Result of a single probe.
#[derive(Debug, Clone, PartialEq)]
pub enum ProbeStatus {
    /// The target answered.
    Reply {
        /// Measured round-trip time.
        rtt: Duration,
    },
    /// The target did not answer or the probe could not be sent.
    Failed(ProbeFailure),
}

impl ProbeStatus {
    /// Whether the target answered.
    pub fn is_reply(&self) -> bool {
        matches!(self, Self::Reply { .. })
    }
}

/// A reachability probe.
///
/// # Contract
///
/// `probe` never panics and has no error channel: resolution, permission,
/// network and timeout failures all come back as [`ProbeStatus::Failed`].
/// Each call is exactly one attempt; there are no internal retries. The call
/// completes within roughly `timeout`.
#[async_trait::async_trait]
pub trait Prober: Send + Sync {
    /// Probe kind for logging (e.g., "icmp").
    fn kind(&self) -> &'static str;

    /// Send one probe to `target` and wait at most `timeout`.
    async fn probe(&self, target: &str, timeout: Duration) -> ProbeStatus;
}
