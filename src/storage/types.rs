//! Core data types for the storage layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::probe::ProbeStatus;

/// One probe attempt as stored in the `ping_results` table.
///
/// Exactly one of `latency` / `error` is set. Records are never updated once
/// written.
///
/// # Example
///
/// ```
/// use flynet::ProbeOutcome;
///
/// let ok = ProbeOutcome::success(1_700_000_000.0, 0.021);
/// assert_eq!(ok.latency, Some(0.021));
/// assert!(ok.error.is_none());
///
/// let failed = ProbeOutcome::failure(1_700_000_005.0, "Ping timed out");
/// assert!(failed.latency.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbeOutcome {
    /// Seconds since the Unix epoch, taken when the probe was initiated.
    pub timestamp: f64,
    /// Round-trip time in seconds (success only).
    pub latency: Option<f64>,
    /// Diagnostic message (failure only).
    pub error: Option<String>,
}

impl ProbeOutcome {
    /// Successful probe with the measured round-trip time in seconds.
    ///
    /// Negative latencies are clamped to zero.
    pub fn success(timestamp: f64, latency: f64) -> Self {
        Self {
            timestamp,
            latency: Some(latency.max(0.0)),
            error: None,
        }
    }

    /// Failed probe with a diagnostic message.
    pub fn failure(timestamp: f64, error: impl Into<String>) -> Self {
        Self {
            timestamp,
            latency: None,
            error: Some(error.into()),
        }
    }

    /// Combine a tick-start timestamp with the prober's status.
    pub fn from_status(timestamp: f64, status: &ProbeStatus) -> Self {
        match status {
            ProbeStatus::Reply { rtt } => Self::success(timestamp, rtt.as_secs_f64()),
            ProbeStatus::Failed(failure) => Self::failure(timestamp, failure.to_string()),
        }
    }

    /// Whether this outcome records a reply.
    pub fn is_success(&self) -> bool {
        self.latency.is_some()
    }

    /// Calendar time (UTC) of the probe, if the timestamp is representable.
    pub fn datetime(&self) -> Option<DateTime<Utc>> {
        let secs = self.timestamp.floor();
        let nanos = ((self.timestamp - secs) * 1e9).round().min(999_999_999.0) as u32;
        DateTime::from_timestamp(secs as i64, nanos)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use chrono::Timelike;

    use super::*;
    use crate::probe::ProbeFailure;

    #[test]
    fn test_from_status_reply() {
        let outcome = ProbeOutcome::from_status(
            10.0,
            &ProbeStatus::Reply {
                rtt: Duration::from_millis(20),
            },
        );
        assert_eq!(outcome.timestamp, 10.0);
        assert!((outcome.latency.unwrap() - 0.02).abs() < 1e-9);
        assert!(outcome.error.is_none());
        assert!(outcome.is_success());
    }

    #[test]
    fn test_from_status_timeout() {
        let outcome =
            ProbeOutcome::from_status(10.0, &ProbeStatus::Failed(ProbeFailure::Timeout));
        assert!(outcome.latency.is_none());
        assert_eq!(outcome.error.as_deref(), Some("Ping timed out"));
        assert!(!outcome.is_success());
    }

    #[test]
    fn test_success_clamps_negative_latency() {
        let outcome = ProbeOutcome::success(0.0, -0.5);
        assert_eq!(outcome.latency, Some(0.0));
    }

    #[test]
    fn test_datetime_conversion() {
        // 2024-01-01T12:30:00.5Z
        let outcome = ProbeOutcome::success(1_704_112_200.5, 0.01);
        let dt = outcome.datetime().unwrap();
        assert_eq!(dt.hour(), 12);
        assert_eq!(dt.minute(), 30);
        assert_eq!(dt.timestamp_subsec_millis(), 500);
    }
}
