//! Overlap-weighted resampling between two regular interval grids.
//!
//! Each input sample carries a half-open measurement interval derived from
//! its recorded timestamp and the input alignment; each output bin averages
//! the overlapping samples weighted by shared duration. The core is
//! parameterized by both step lengths and instantiated here with the
//! 10-minute SCADA input and 15-minute settlement output.

pub mod aggregate;
pub mod grid;
pub mod types;

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, warn};

use crate::config::{Alignment, ConvertOptions, EmptyBinPolicy};
use crate::error::ConvertError;
use crate::parser::RawSample;

use aggregate::{aggregate, round2};
use grid::build_grid;
use types::{Bin, ResampleOutcome, ResampledPoint, Sample};

/// Resampler from an input grid of `input_step`-long intervals onto an
/// output grid of `output_step`-long bins.
#[derive(Debug, Clone, Copy)]
pub struct Resampler {
    input_step: Duration,
    output_step: Duration,
}

impl Resampler {
    pub fn new(input_step: Duration, output_step: Duration) -> Self {
        Resampler {
            input_step,
            output_step,
        }
    }

    /// The 10-minute → 15-minute instantiation used for SCADA exports.
    pub fn scada_to_settlement() -> Self {
        Resampler::new(Duration::minutes(10), Duration::minutes(15))
    }

    /// Runs the full transform: interval normalization, grid construction,
    /// weighted aggregation, output alignment.
    ///
    /// Reads nothing besides its arguments. Only the alignment and
    /// empty-bin fields of `options` are consulted; parsing options were
    /// applied upstream.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError::EmptyInput`] when `raw` holds no samples.
    pub fn resample(
        &self,
        raw: &[RawSample],
        options: &ConvertOptions,
    ) -> Result<ResampleOutcome, ConvertError> {
        let samples = self.normalize(raw, options.input_alignment);
        let bins = build_grid(&samples, self.output_step)?;
        let values = aggregate(&samples, &bins);

        let bins_total = bins.len();
        let mut bins_empty = 0;
        let mut points = Vec::with_capacity(bins_total);

        for (bin, value) in bins.iter().zip(values) {
            if value.is_none() {
                bins_empty += 1;
                if options.empty_bins == EmptyBinPolicy::Drop {
                    continue;
                }
            }
            points.push(ResampledPoint {
                instant: report_instant(bin, options.output_alignment),
                value: value.map(round2),
            });
        }

        if bins_empty > 0 {
            warn!(bins_empty, bins_total, "Bins without contributing data");
        }
        debug!(
            samples = samples.len(),
            bins_total,
            emitted = points.len(),
            "Resampling complete"
        );

        Ok(ResampleOutcome {
            points,
            bins_total,
            bins_empty,
        })
    }

    /// Resolves each raw instant to its half-open measurement interval and
    /// sorts by interval start, as the aggregation pass requires.
    fn normalize(&self, raw: &[RawSample], alignment: Alignment) -> Vec<Sample> {
        let mut samples: Vec<Sample> = raw
            .iter()
            .map(|r| {
                let interval_start = match alignment {
                    Alignment::Left => r.instant,
                    Alignment::Right => r.instant - self.input_step,
                };
                Sample {
                    interval_start,
                    interval_end: interval_start + self.input_step,
                    value: r.value,
                }
            })
            .collect();
        samples.sort_by_key(|s| s.interval_start);
        samples
    }
}

fn report_instant(bin: &Bin, alignment: Alignment) -> DateTime<Utc> {
    match alignment {
        Alignment::Left => bin.start,
        Alignment::Right => bin.end,
    }
}
