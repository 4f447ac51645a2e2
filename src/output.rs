//! Output formatting and persistence for resampled series.
//!
//! The single place where instants become strings and values get their
//! decimal comma. Supports result CSV writing plus pretty-printed and JSON
//! conversion summaries.

use anyhow::Result;
use chrono::{DateTime, Utc};
use csv::WriterBuilder;
use serde::Serialize;
use tracing::{debug, info};

use crate::config::TimestampFormat;
use crate::resample::types::ResampledPoint;

/// Output header cells, matching the source exports.
const HEADER: [&str; 2] = ["timestamp", "Wind Speed (avg)"];

/// Day-first locale layout, as in the input files.
const LOCALE_FORMAT: &str = "%d.%m.%Y %H:%M";

/// Serializes one instant according to the configured format.
pub fn format_instant(instant: DateTime<Utc>, format: TimestampFormat) -> String {
    match format {
        TimestampFormat::Locale => instant.format(LOCALE_FORMAT).to_string(),
        TimestampFormat::Iso8601Utc => instant.format("%Y-%m-%dT%H:%M:%SZ").to_string(),
    }
}

/// Formats a value with two decimals and a decimal comma; absent values
/// become empty cells.
pub fn format_value(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.2}").replace('.', ","),
        None => String::new(),
    }
}

/// Writes the resampled series as a `;`-separated file at `path`, one row
/// per point, ascending time order.
pub fn write_result(
    path: &str,
    points: &[ResampledPoint],
    format: TimestampFormat,
) -> Result<()> {
    debug!(path, rows = points.len(), "Writing result CSV");

    let mut writer = WriterBuilder::new().delimiter(b';').from_path(path)?;
    writer.write_record(HEADER)?;
    for point in points {
        writer.write_record([
            format_instant(point.instant, format),
            format_value(point.value),
        ])?;
    }
    writer.flush()?;

    Ok(())
}

/// Summary of one conversion run.
#[derive(Debug, Default, Serialize)]
pub struct ConversionSummary {
    pub rows_total: usize,
    pub rows_skipped: usize,
    pub values_missing: usize,
    pub bins_total: usize,
    pub bins_empty: usize,
    pub rows_written: usize,
}

/// Logs a conversion summary using Rust's debug pretty-print format.
pub fn print_pretty(summary: &ConversionSummary) {
    debug!("{:#?}", summary);
}

/// Logs a conversion summary as pretty-printed JSON.
pub fn print_json(summary: &ConversionSummary) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(summary)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::env;
    use std::fs;

    fn temp_path(name: &str) -> String {
        format!("{}/{}", env::temp_dir().display(), name)
    }

    fn point(h: u32, m: u32, value: Option<f64>) -> ResampledPoint {
        ResampledPoint {
            instant: Utc.with_ymd_and_hms(2025, 7, 1, h, m, 0).unwrap(),
            value,
        }
    }

    #[test]
    fn test_format_instant_locale() {
        let instant = Utc.with_ymd_and_hms(2025, 7, 1, 10, 15, 0).unwrap();
        assert_eq!(
            format_instant(instant, TimestampFormat::Locale),
            "01.07.2025 10:15"
        );
    }

    #[test]
    fn test_format_instant_iso8601_utc() {
        let instant = Utc.with_ymd_and_hms(2025, 7, 1, 10, 15, 0).unwrap();
        assert_eq!(
            format_instant(instant, TimestampFormat::Iso8601Utc),
            "2025-07-01T10:15:00Z"
        );
    }

    #[test]
    fn test_format_value_decimal_comma() {
        assert_eq!(format_value(Some(6.33)), "6,33");
        assert_eq!(format_value(Some(5.0)), "5,00");
        assert_eq!(format_value(None), "");
    }

    #[test]
    fn test_write_result_file_layout() {
        let path = temp_path("wind_resampler_test_write.csv");
        let _ = fs::remove_file(&path); // clean up any prior run

        let points = vec![point(10, 15, Some(6.33)), point(10, 30, None)];
        write_result(&path, &points, TimestampFormat::Locale).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "timestamp;Wind Speed (avg)");
        assert_eq!(lines[1], "01.07.2025 10:15;6,33");
        assert_eq!(lines[2], "01.07.2025 10:30;");

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_print_pretty_does_not_panic() {
        let summary = ConversionSummary::default();
        print_pretty(&summary);
    }

    #[test]
    fn test_print_json_does_not_panic() {
        let summary = ConversionSummary::default();
        print_json(&summary).unwrap();
    }
}
