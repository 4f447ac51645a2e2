//! Data types used by the resampling core.

use chrono::{DateTime, Duration, Utc};

/// One input measurement resolved to its half-open measurement interval.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub interval_start: DateTime<Utc>,
    pub interval_end: DateTime<Utc>,
    pub value: Option<f64>,
}

impl Sample {
    /// Duration this sample's interval shares with `[b_start, b_end)`,
    /// clamped to zero. Intervals that only touch a boundary share nothing.
    pub fn overlap(&self, b_start: DateTime<Utc>, b_end: DateTime<Utc>) -> Duration {
        let start = self.interval_start.max(b_start);
        let end = self.interval_end.min(b_end);
        (end - start).max(Duration::zero())
    }
}

/// One half-open output interval on the target grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bin {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// One output row: the reported instant plus the aggregated value, absent
/// when no sample covered the bin.
#[derive(Debug, Clone, PartialEq)]
pub struct ResampledPoint {
    pub instant: DateTime<Utc>,
    pub value: Option<f64>,
}

/// Result of one resampling run, including bin accounting for summaries.
#[derive(Debug)]
pub struct ResampleOutcome {
    pub points: Vec<ResampledPoint>,
    pub bins_total: usize,
    pub bins_empty: usize,
}
