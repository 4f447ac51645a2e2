//! Overlap-weighted aggregation of interval samples onto an output grid.

use super::types::{Bin, Sample};

/// Aggregates `samples` onto `grid` with a single forward pass.
///
/// `samples` must be sorted by `interval_start` and share one interval
/// length; the scan window per bin is then bounded by the step ratio. Each
/// sample with a present value contributes its value weighted by the
/// duration its interval shares with the bin. A bin nothing contributed to
/// yields `None`.
pub fn aggregate(samples: &[Sample], grid: &[Bin]) -> Vec<Option<f64>> {
    let mut cursor = 0;
    let mut out = Vec::with_capacity(grid.len());

    for bin in grid {
        // Samples entirely before this bin stay behind for good: bins are
        // ascending, so they cannot overlap anything later either.
        while cursor < samples.len() && samples[cursor].interval_end <= bin.start {
            cursor += 1;
        }

        let mut weighted_sum = 0.0;
        let mut overlap_secs = 0.0;

        for sample in &samples[cursor..] {
            if sample.interval_start >= bin.end {
                break;
            }
            let Some(value) = sample.value else {
                continue;
            };
            let secs = sample.overlap(bin.start, bin.end).num_seconds() as f64;
            if secs > 0.0 {
                weighted_sum += value * secs;
                overlap_secs += secs;
            }
        }

        out.push((overlap_secs > 0.0).then(|| weighted_sum / overlap_secs));
    }

    out
}

/// Rounds to 2 decimals, half away from zero. Presentation only; the
/// accumulation above stays in full precision.
pub fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}
