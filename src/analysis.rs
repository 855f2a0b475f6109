//! Analysis Layer
//!
//! Read-side consumer of the stored history. Nothing here is used by the
//! monitor loop; it only reads what [`ResultStore::fetch_all`] returns.
//!
//! - [`DateRange`]: Inclusive calendar-day filter (UTC)
//! - [`LatencyView`]: Filtered series with sentinel substitution and a
//!   trailing moving average
//! - [`HourlyDistribution`]: Five-number summary per hour of day
//! - [`Report`]: Both of the above, printable as a table or JSON
//!
//! [`ResultStore::fetch_all`]: crate::storage::ResultStore::fetch_all

mod hourly;
mod view;

pub use hourly::{BoxStats, HourStats, HourlyDistribution};
pub use view::{DEFAULT_FAILURE_SENTINEL, DEFAULT_SMA_WINDOW, LatencyView, ViewOptions, ViewPoint};

use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

use crate::storage::ProbeOutcome;

/// Date format accepted on the command line.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Errors raised while preparing an analysis.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// A date argument is not `YYYY-MM-DD`.
    #[error("invalid date '{value}': {source}")]
    InvalidDate {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    /// Start date is after end date.
    #[error("start date {start} is after end date {end}")]
    ReversedRange { start: NaiveDate, end: NaiveDate },
}

/// Inclusive range of calendar days, evaluated in UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, AnalysisError> {
        if start > end {
            return Err(AnalysisError::ReversedRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Parse `YYYY-MM-DD` bounds.
    ///
    /// ```
    /// use flynet::analysis::DateRange;
    ///
    /// let range = DateRange::parse("2024-01-01", "2024-02-08").unwrap();
    /// assert_eq!(range.days(), 39);
    /// ```
    pub fn parse(start: &str, end: &str) -> Result<Self, AnalysisError> {
        Self::new(parse_date(start)?, parse_date(end)?)
    }

    /// Whether `outcome` falls on a day inside the range.
    pub fn contains(&self, outcome: &ProbeOutcome) -> bool {
        outcome
            .datetime()
            .map(|dt| {
                let day = dt.date_naive();
                day >= self.start && day <= self.end
            })
            .unwrap_or(false)
    }

    /// Number of calendar days covered.
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

fn parse_date(value: &str) -> Result<NaiveDate, AnalysisError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|source| {
        AnalysisError::InvalidDate {
            value: value.to_string(),
            source,
        }
    })
}

/// Latency report over a date range.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub range: DateRange,
    pub view: LatencyView,
    pub hourly: HourlyDistribution,
}

impl Report {
    /// Build the view and the hourly distribution from raw history.
    pub fn build(records: &[ProbeOutcome], range: DateRange, options: &ViewOptions) -> Self {
        let view = LatencyView::build(records, &range, options);
        let hourly = HourlyDistribution::from_view(&view);
        Self {
            range,
            view,
            hourly,
        }
    }
}

fn fmt_ms(seconds: Option<f64>) -> String {
    seconds
        .map(|s| format!("{:.2}", s * 1000.0))
        .unwrap_or_else(|| "-".to_string())
}

impl std::fmt::Display for Report {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let view = &self.view;
        writeln!(f, "range:        {} .. {}", self.range.start, self.range.end)?;
        writeln!(
            f,
            "samples:      {} (failures: {}, {:.2}%)",
            view.samples,
            view.failures,
            view.failure_ratio() * 100.0
        )?;
        writeln!(f, "mean latency: {} ms", fmt_ms(view.mean_latency))?;
        writeln!(f)?;
        writeln!(
            f,
            "{:>4} {:>7} {:>9} {:>9} {:>9} {:>9} {:>9}",
            "hour", "count", "min", "q1", "median", "q3", "max"
        )?;
        for hour in &self.hourly.hours {
            let stats = hour.stats.as_ref();
            writeln!(
                f,
                "{:>4} {:>7} {:>9} {:>9} {:>9} {:>9} {:>9}",
                format!("{:02}", hour.hour),
                hour.count,
                fmt_ms(stats.map(|s| s.min)),
                fmt_ms(stats.map(|s| s.q1)),
                fmt_ms(stats.map(|s| s.median)),
                fmt_ms(stats.map(|s| s.q3)),
                fmt_ms(stats.map(|s| s.max)),
            )?;
        }
        Ok(())
    }
}
