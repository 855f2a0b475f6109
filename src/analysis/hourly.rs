//! Latency distribution by hour of day.

use chrono::Timelike;
use serde::Serialize;

use super::LatencyView;

/// Five-number summary of a sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoxStats {
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

impl BoxStats {
    /// Summarize `values`; `None` when empty.
    ///
    /// Quartiles use linear interpolation between closest ranks.
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);

        Some(Self {
            min: sorted[0],
            q1: quantile(&sorted, 0.25),
            median: quantile(&sorted, 0.5),
            q3: quantile(&sorted, 0.75),
            max: sorted[sorted.len() - 1],
        })
    }
}

fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

/// Samples falling in one hour of the day (UTC).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourStats {
    pub hour: u32,
    pub count: usize,
    pub stats: Option<BoxStats>,
}

/// Per-hour summaries, always 24 entries ordered 0..=23.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourlyDistribution {
    pub hours: Vec<HourStats>,
}

impl HourlyDistribution {
    pub fn from_view(view: &LatencyView) -> Self {
        let mut buckets: Vec<Vec<f64>> = vec![Vec::new(); 24];
        for point in &view.points {
            buckets[point.time.hour() as usize].push(point.latency);
        }

        let hours = buckets
            .iter()
            .enumerate()
            .map(|(hour, values)| HourStats {
                hour: hour as u32,
                count: values.len(),
                stats: BoxStats::from_values(values),
            })
            .collect();

        Self { hours }
    }
}
