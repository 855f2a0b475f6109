//! Tick execution and the run loop.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;

use crate::config::AppConfig;
use crate::monitor::{Clock, SystemClock, remaining_sleep};
use crate::probe::Prober;
use crate::storage::{ProbeOutcome, ResultStore, StorageError};

/// Result of one tick.
#[derive(Debug)]
pub struct TickReport {
    /// The outcome that was (or should have been) stored.
    pub outcome: ProbeOutcome,
    /// Why the outcome was not stored, if it wasn't.
    pub store_error: Option<StorageError>,
    /// Time spent probing and storing.
    pub elapsed: Duration,
}

impl TickReport {
    /// Whether the outcome reached the store.
    pub fn stored(&self) -> bool {
        self.store_error.is_none()
    }
}

/// The probe-and-record loop.
///
/// Ticks never overlap: each one probes, appends, and only then is the next
/// start scheduled. Per-tick failures (probe or store) are logged and never
/// stop the loop; only the shutdown future does.
pub struct Monitor {
    target: String,
    interval: Duration,
    timeout: Duration,
    store_timeout: Duration,
    prober: Arc<dyn Prober>,
    store: Arc<dyn ResultStore>,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for Monitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Monitor")
            .field("target", &self.target)
            .field("interval", &self.interval)
            .field("timeout", &self.timeout)
            .field("store_timeout", &self.store_timeout)
            .field("prober", &self.prober.kind())
            .field("store", &self.store.backend())
            .finish_non_exhaustive()
    }
}

impl Monitor {
    /// Create a monitor from validated configuration.
    pub fn new(config: &AppConfig, prober: Arc<dyn Prober>, store: Arc<dyn ResultStore>) -> Self {
        Self {
            target: config.target.clone(),
            interval: config.interval(),
            timeout: config.timeout(),
            store_timeout: config.store_timeout(),
            prober,
            store,
            clock: Arc::new(SystemClock),
        }
    }

    /// Replace the wall-clock source used for record timestamps.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Time between tick starts.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Run one tick: probe, then append. Does not sleep.
    ///
    /// Emits exactly one log line describing the tick.
    pub async fn tick(&self) -> TickReport {
        let started = Instant::now();
        let timestamp = self.clock.now();

        let status = self.prober.probe(&self.target, self.timeout).await;
        let outcome = ProbeOutcome::from_status(timestamp, &status);

        // On timeout the append future is dropped, but a commit already handed
        // to the backend may still complete.
        let store_error =
            match tokio::time::timeout(self.store_timeout, self.store.append(&outcome)).await {
                Ok(Ok(())) => None,
                Ok(Err(e)) => Some(e),
                Err(_) => Some(StorageError::Timeout(self.store_timeout)),
            };

        let report = TickReport {
            outcome,
            store_error,
            elapsed: started.elapsed(),
        };
        self.log_tick(&report);
        report
    }

    /// Tick at a fixed cadence until `shutdown` resolves.
    ///
    /// Shutdown abandons whatever step is in flight; dropping it releases any
    /// open store connection. Returns the number of completed ticks.
    pub async fn run_until<F>(&self, shutdown: F) -> u64
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        let mut ticks: u64 = 0;

        tracing::info!(
            target_host = %self.target,
            interval_secs = self.interval.as_secs(),
            timeout_secs = self.timeout.as_secs(),
            prober = self.prober.kind(),
            store = self.store.backend(),
            "Monitor started"
        );

        loop {
            let started = Instant::now();

            tokio::select! {
                biased;
                () = &mut shutdown => break,
                _ = self.tick() => ticks += 1,
            }

            let pause = remaining_sleep(self.interval, started.elapsed());
            if pause.is_zero() {
                tracing::debug!(
                    overrun_ms = started.elapsed().saturating_sub(self.interval).as_millis() as u64,
                    "Tick overran interval, starting next tick immediately"
                );
            }

            tokio::select! {
                biased;
                () = &mut shutdown => break,
                () = tokio::time::sleep(pause) => {}
            }
        }

        tracing::info!(ticks, "Monitor stopped");
        ticks
    }

    fn log_tick(&self, report: &TickReport) {
        let outcome = &report.outcome;
        let elapsed_ms = report.elapsed.as_millis() as u64;

        match (&report.store_error, outcome.latency) {
            (Some(e), _) => tracing::error!(
                timestamp = outcome.timestamp,
                latency = ?outcome.latency,
                error = ?outcome.error,
                store_error = %e,
                elapsed_ms,
                "Probe outcome not stored"
            ),
            (None, Some(latency)) => tracing::info!(
                timestamp = outcome.timestamp,
                latency,
                elapsed_ms,
                "Probe succeeded"
            ),
            (None, None) => tracing::warn!(
                timestamp = outcome.timestamp,
                error = outcome.error.as_deref().unwrap_or_default(),
                elapsed_ms,
                "Probe failed"
            ),
        }
    }
}
