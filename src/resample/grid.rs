//! Output grid construction.
//!
//! Builds the ordered, contiguous run of fixed-length bins covering the
//! full input span, with no gaps and no overlaps.

use chrono::{DateTime, Duration, Utc};

use super::types::{Bin, Sample};
use crate::error::ConvertError;

/// Rounds `t` down to the previous multiple of `step`, anchored at the epoch.
/// Already-aligned instants are unchanged.
pub fn floor_to_step(t: DateTime<Utc>, step: Duration) -> DateTime<Utc> {
    let rem = t.timestamp().rem_euclid(step.num_seconds());
    t - Duration::seconds(rem)
}

/// Rounds `t` up to the next multiple of `step`. Already-aligned instants
/// are unchanged.
pub fn ceil_to_step(t: DateTime<Utc>, step: Duration) -> DateTime<Utc> {
    let floored = floor_to_step(t, step);
    if floored == t { t } else { floored + step }
}

/// Builds the bin sequence `[floor(min start), ceil(max end))` in `step`
/// increments.
///
/// # Errors
///
/// Returns [`ConvertError::EmptyInput`] when `samples` is empty, since the
/// span is undefined.
pub fn build_grid(samples: &[Sample], step: Duration) -> Result<Vec<Bin>, ConvertError> {
    let min_start = samples
        .iter()
        .map(|s| s.interval_start)
        .min()
        .ok_or(ConvertError::EmptyInput)?;
    let max_end = samples
        .iter()
        .map(|s| s.interval_end)
        .max()
        .ok_or(ConvertError::EmptyInput)?;

    let grid_start = floor_to_step(min_start, step);
    let grid_end = ceil_to_step(max_end, step);

    let mut bins = Vec::new();
    let mut start = grid_start;
    while start < grid_end {
        let end = start + step;
        bins.push(Bin { start, end });
        start = end;
    }

    Ok(bins)
}
