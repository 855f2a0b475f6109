//! Time sources for the monitor loop.

use std::time::Duration;

use chrono::Utc;

/// Wall-clock source for record timestamps.
///
/// Sleep arithmetic always uses the monotonic tokio clock; this trait only
/// decides what gets written into the `timestamp` column.
pub trait Clock: Send + Sync {
    /// Current time as seconds since the Unix epoch.
    fn now(&self) -> f64;
}

/// System wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> f64 {
        Utc::now().timestamp_micros() as f64 / 1_000_000.0
    }
}

/// Time left in the current slot after `elapsed` of work.
///
/// Never negative: an overrunning tick is followed immediately by the next
/// one, and the overrun is not carried forward.
pub fn remaining_sleep(interval: Duration, elapsed: Duration) -> Duration {
    interval.saturating_sub(elapsed)
}
