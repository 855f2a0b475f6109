//! Filtered and smoothed latency series.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::DateRange;
use crate::storage::ProbeOutcome;

/// Latency (seconds) plotted for a failed probe.
pub const DEFAULT_FAILURE_SENTINEL: f64 = 5.0;

/// Trailing moving-average window, in samples.
pub const DEFAULT_SMA_WINDOW: usize = 5;

/// How the view treats failures and smoothing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewOptions {
    /// Latency substituted for failed probes, so outages show as spikes
    /// instead of gaps.
    pub failure_sentinel: f64,
    /// Moving-average window (clamped to at least 1).
    pub window: usize,
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self {
            failure_sentinel: DEFAULT_FAILURE_SENTINEL,
            window: DEFAULT_SMA_WINDOW,
        }
    }
}

/// One sample of the view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewPoint {
    pub time: DateTime<Utc>,
    /// Measured latency, or the sentinel when `failed`.
    pub latency: f64,
    /// Trailing mean over the last `window` latencies.
    pub smoothed: f64,
    pub failed: bool,
}

/// Latency series restricted to a date range.
#[derive(Debug, Clone, Serialize)]
pub struct LatencyView {
    pub points: Vec<ViewPoint>,
    /// Mean over all points, sentinels included.
    pub mean_latency: Option<f64>,
    pub samples: usize,
    pub failures: usize,
}

impl LatencyView {
    /// Build the view from history ordered by timestamp.
    ///
    /// Records outside `range` are dropped before smoothing, so the first
    /// points of the range average over fewer than `window` samples.
    pub fn build(records: &[ProbeOutcome], range: &DateRange, options: &ViewOptions) -> Self {
        let window = options.window.max(1);
        let mut recent: VecDeque<f64> = VecDeque::with_capacity(window);
        let mut running = 0.0;
        let mut total = 0.0;
        let mut failures = 0;
        let mut points = Vec::new();

        for record in records.iter().filter(|r| range.contains(r)) {
            let Some(time) = record.datetime() else {
                continue;
            };
            let failed = record.latency.is_none();
            let latency = record.latency.unwrap_or(options.failure_sentinel);

            if recent.len() == window {
                if let Some(oldest) = recent.pop_front() {
                    running -= oldest;
                }
            }
            recent.push_back(latency);
            running += latency;

            total += latency;
            if failed {
                failures += 1;
            }

            points.push(ViewPoint {
                time,
                latency,
                smoothed: running / recent.len() as f64,
                failed,
            });
        }

        let samples = points.len();
        let mean_latency = (samples > 0).then(|| total / samples as f64);

        Self {
            points,
            mean_latency,
            samples,
            failures,
        }
    }

    /// Fraction of samples that failed (0 when empty).
    pub fn failure_ratio(&self) -> f64 {
        if self.samples == 0 {
            0.0
        } else {
            self.failures as f64 / self.samples as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 2024-01-01T00:00:00Z
    const DAY_START: f64 = 1_704_067_200.0;

    fn range() -> DateRange {
        DateRange::parse("2024-01-01", "2024-01-01").unwrap()
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_sentinel_substitution() {
        let records = vec![
            ProbeOutcome::success(DAY_START, 0.02),
            ProbeOutcome::failure(DAY_START + 5.0, "Ping timed out"),
        ];
        let view = LatencyView::build(&records, &range(), &ViewOptions::default());

        assert_eq!(view.samples, 2);
        assert_eq!(view.failures, 1);
        assert!(view.points[1].failed);
        assert!(approx(view.points[1].latency, DEFAULT_FAILURE_SENTINEL));
        assert!(approx(view.mean_latency.unwrap(), 2.51));
        assert!(approx(view.failure_ratio(), 0.5));
    }

    #[test]
    fn test_trailing_moving_average() {
        let records: Vec<_> = (1..=7)
            .map(|i| ProbeOutcome::success(DAY_START + i as f64, i as f64))
            .collect();
        let view = LatencyView::build(&records, &range(), &ViewOptions::default());

        let smoothed: Vec<f64> = view.points.iter().map(|p| p.smoothed).collect();
        // Partial windows: 1, 1.5, 2, 2.5, 3; then full windows of 5.
        let expected = [1.0, 1.5, 2.0, 2.5, 3.0, 4.0, 5.0];
        for (got, want) in smoothed.iter().zip(expected) {
            assert!(approx(*got, want), "got {got}, want {want}");
        }
    }

    #[test]
    fn test_filter_by_range_before_smoothing() {
        let records = vec![
            // previous day, excluded
            ProbeOutcome::success(DAY_START - 1.0, 100.0),
            ProbeOutcome::success(DAY_START, 1.0),
            // next day, excluded
            ProbeOutcome::success(DAY_START + 86_400.0, 100.0),
        ];
        let view = LatencyView::build(&records, &range(), &ViewOptions::default());

        assert_eq!(view.samples, 1);
        assert!(approx(view.points[0].smoothed, 1.0));
    }

    #[test]
    fn test_zero_window_is_clamped() {
        let records = vec![
            ProbeOutcome::success(DAY_START, 1.0),
            ProbeOutcome::success(DAY_START + 1.0, 3.0),
        ];
        let options = ViewOptions {
            window: 0,
            ..ViewOptions::default()
        };
        let view = LatencyView::build(&records, &range(), &options);
        assert!(approx(view.points[1].smoothed, 3.0));
    }

    #[test]
    fn test_empty_view() {
        let view = LatencyView::build(&[], &range(), &ViewOptions::default());
        assert_eq!(view.samples, 0);
        assert!(view.mean_latency.is_none());
        assert_eq!(view.failure_ratio(), 0.0);
    }
}
