//! Delimited-text parser for SCADA wind exports.
//!
//! Reads `;`-separated, decimal-comma files, validates column presence up
//! front, and resolves each row to an instant plus an optional value.

use std::io::Read;

use chrono::{DateTime, NaiveDateTime, Utc};
use csv::ReaderBuilder;
use tracing::debug;

use crate::config::{ColumnProfile, MissingValuePolicy, ParseMode};
use crate::error::ConvertError;

/// One raw input row: the recorded instant, not yet resolved to an interval,
/// and the measured value if it parsed.
#[derive(Debug, Clone, PartialEq)]
pub struct RawSample {
    pub instant: DateTime<Utc>,
    pub value: Option<f64>,
}

/// Parsed table plus row accounting for summaries and the `check` command.
#[derive(Debug)]
pub struct ParsedInput {
    pub samples: Vec<RawSample>,
    pub rows_total: usize,
    pub rows_skipped: usize,
    pub values_missing: usize,
}

/// Day-first layouts accepted for the combined date + time columns.
const DATETIME_FORMATS: &[&str] = &["%d.%m.%Y %H:%M:%S", "%d.%m.%Y %H:%M"];

/// Parses the input file at `path`.
pub fn parse_file(
    path: &str,
    columns: &ColumnProfile,
    parse_mode: ParseMode,
    missing_values: MissingValuePolicy,
) -> Result<ParsedInput, ConvertError> {
    let file = std::fs::File::open(path)?;
    parse_input(file, columns, parse_mode, missing_values)
}

/// Parses a `;`-separated export from any reader.
///
/// Column presence is checked against `columns` before any row is touched;
/// the error names exactly the headers that are absent.
pub fn parse_input<R: Read>(
    reader: R,
    columns: &ColumnProfile,
    parse_mode: ParseMode,
    missing_values: MissingValuePolicy,
) -> Result<ParsedInput, ConvertError> {
    let mut rdr = ReaderBuilder::new().delimiter(b';').from_reader(reader);

    // SCADA exports routinely carry a UTF-8 BOM on the first header cell.
    let header_names: Vec<String> = rdr
        .headers()?
        .iter()
        .enumerate()
        .map(|(i, h)| {
            let h = if i == 0 { h.trim_start_matches('\u{feff}') } else { h };
            h.trim().to_string()
        })
        .collect();

    let find = |name: &str| header_names.iter().position(|h| h == name);

    let (date_idx, time_idx, value_idx) =
        match (find(&columns.date), find(&columns.time), find(&columns.value)) {
            (Some(d), Some(t), Some(v)) => (d, t, v),
            (d, t, v) => {
                let mut missing = Vec::new();
                if d.is_none() {
                    missing.push(columns.date.clone());
                }
                if t.is_none() {
                    missing.push(columns.time.clone());
                }
                if v.is_none() {
                    missing.push(columns.value.clone());
                }
                return Err(ConvertError::MissingColumns { missing });
            }
        };

    let mut samples = Vec::new();
    let mut rows_total = 0;
    let mut rows_skipped = 0;
    let mut values_missing = 0;

    for (i, record) in rdr.records().enumerate() {
        let record = record?;
        rows_total += 1;
        let line = i + 2; // header occupies line 1

        let date = record.get(date_idx).unwrap_or("").trim();
        let time = record.get(time_idx).unwrap_or("").trim();

        let instant = match parse_instant(date, time) {
            Some(instant) => instant,
            None => match parse_mode {
                ParseMode::Strict => {
                    return Err(ConvertError::TimestampParse {
                        line,
                        text: format!("{date} {time}"),
                    });
                }
                ParseMode::Lenient => {
                    debug!(line, date, time, "Skipping row with unparseable timestamp");
                    rows_skipped += 1;
                    continue;
                }
            },
        };

        let value = match parse_decimal(record.get(value_idx).unwrap_or("")) {
            Some(v) => Some(v),
            None => {
                values_missing += 1;
                match missing_values {
                    MissingValuePolicy::Zero => Some(0.0),
                    MissingValuePolicy::Absent => None,
                }
            }
        };

        samples.push(RawSample { instant, value });
    }

    debug!(rows_total, rows_skipped, values_missing, "Input parsed");

    Ok(ParsedInput {
        samples,
        rows_total,
        rows_skipped,
        values_missing,
    })
}

/// Parses a day-first date plus time of day into a UTC instant.
fn parse_instant(date: &str, time: &str) -> Option<DateTime<Utc>> {
    let combined = format!("{date} {time}");
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(&combined, fmt).ok())
        .map(|naive| naive.and_utc())
}

/// Parses a decimal-comma number. Empty or non-numeric text yields `None`.
fn parse_decimal(text: &str) -> Option<f64> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    text.replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BuiltinProfile;
    use chrono::{TimeZone, Utc};

    fn plant_local() -> ColumnProfile {
        BuiltinProfile::PlantLocal.columns()
    }

    fn parse(
        data: &str,
        parse_mode: ParseMode,
        missing_values: MissingValuePolicy,
    ) -> Result<ParsedInput, ConvertError> {
        parse_input(data.as_bytes(), &plant_local(), parse_mode, missing_values)
    }

    #[test]
    fn test_parse_basic_rows() {
        let data = "\
Datum (Anlage);Zeit (Anlage);Wind Speed (avg)
01.07.2025;10:00;5,5
01.07.2025;10:10;6,0
";
        let parsed = parse(data, ParseMode::Strict, MissingValuePolicy::Absent).unwrap();

        assert_eq!(parsed.rows_total, 2);
        assert_eq!(parsed.rows_skipped, 0);
        assert_eq!(parsed.samples.len(), 2);
        assert_eq!(
            parsed.samples[0].instant,
            Utc.with_ymd_and_hms(2025, 7, 1, 10, 0, 0).unwrap()
        );
        assert_eq!(parsed.samples[0].value, Some(5.5));
        assert_eq!(parsed.samples[1].value, Some(6.0));
    }

    #[test]
    fn test_day_first_date_order() {
        // 03.02.2025 is February 3rd, not March 2nd
        let data = "\
Datum (Anlage);Zeit (Anlage);Wind Speed (avg)
03.02.2025;00:00;1,0
";
        let parsed = parse(data, ParseMode::Strict, MissingValuePolicy::Absent).unwrap();
        assert_eq!(
            parsed.samples[0].instant,
            Utc.with_ymd_and_hms(2025, 2, 3, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_parse_seconds_format() {
        let data = "\
Datum (Anlage);Zeit (Anlage);Wind Speed (avg)
01.07.2025;10:00:00;5,0
";
        let parsed = parse(data, ParseMode::Strict, MissingValuePolicy::Absent).unwrap();
        assert_eq!(
            parsed.samples[0].instant,
            Utc.with_ymd_and_hms(2025, 7, 1, 10, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_missing_columns_named_exactly() {
        let data = "\
Datum (Anlage);Wind Speed (avg)
01.07.2025;5,0
";
        let err = parse(data, ParseMode::Strict, MissingValuePolicy::Absent).unwrap_err();
        match err {
            ConvertError::MissingColumns { missing } => {
                assert_eq!(missing, vec!["Zeit (Anlage)".to_string()]);
            }
            other => panic!("expected MissingColumns, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_columns_checked_before_rows() {
        // The rows are garbage, but the column check must fire first.
        let data = "\
wrong;headers;here
not;a;row
";
        let err = parse(data, ParseMode::Strict, MissingValuePolicy::Absent).unwrap_err();
        match err {
            ConvertError::MissingColumns { missing } => assert_eq!(missing.len(), 3),
            other => panic!("expected MissingColumns, got {other:?}"),
        }
    }

    #[test]
    fn test_bom_on_first_header() {
        let data = "\u{feff}\
Datum (Anlage);Zeit (Anlage);Wind Speed (avg)
01.07.2025;10:00;5,0
";
        let parsed = parse(data, ParseMode::Strict, MissingValuePolicy::Absent).unwrap();
        assert_eq!(parsed.samples.len(), 1);
    }

    #[test]
    fn test_plant_utc_profile() {
        let data = "\
Date (UTC, Plant);Time (UTC, Plant);Wind Speed (avg)
01.07.2025;10:00;5,0
";
        let parsed = parse_input(
            data.as_bytes(),
            &BuiltinProfile::PlantUtc.columns(),
            ParseMode::Strict,
            MissingValuePolicy::Absent,
        )
        .unwrap();
        assert_eq!(parsed.samples.len(), 1);
    }

    #[test]
    fn test_strict_mode_reports_line() {
        let data = "\
Datum (Anlage);Zeit (Anlage);Wind Speed (avg)
01.07.2025;10:00;5,0
garbage;nope;6,0
";
        let err = parse(data, ParseMode::Strict, MissingValuePolicy::Absent).unwrap_err();
        match err {
            ConvertError::TimestampParse { line, text } => {
                assert_eq!(line, 3);
                assert_eq!(text, "garbage nope");
            }
            other => panic!("expected TimestampParse, got {other:?}"),
        }
    }

    #[test]
    fn test_lenient_mode_skips_bad_rows() {
        let data = "\
Datum (Anlage);Zeit (Anlage);Wind Speed (avg)
01.07.2025;10:00;5,0
garbage;nope;6,0
01.07.2025;10:20;7,0
";
        let parsed = parse(data, ParseMode::Lenient, MissingValuePolicy::Absent).unwrap();
        assert_eq!(parsed.rows_total, 3);
        assert_eq!(parsed.rows_skipped, 1);
        assert_eq!(parsed.samples.len(), 2);
    }

    #[test]
    fn test_missing_value_absent() {
        let data = "\
Datum (Anlage);Zeit (Anlage);Wind Speed (avg)
01.07.2025;10:00;
01.07.2025;10:10;n/a
";
        let parsed = parse(data, ParseMode::Strict, MissingValuePolicy::Absent).unwrap();
        assert_eq!(parsed.values_missing, 2);
        assert_eq!(parsed.samples[0].value, None);
        assert_eq!(parsed.samples[1].value, None);
    }

    #[test]
    fn test_missing_value_zero_substitution() {
        let data = "\
Datum (Anlage);Zeit (Anlage);Wind Speed (avg)
01.07.2025;10:00;
";
        let parsed = parse(data, ParseMode::Strict, MissingValuePolicy::Zero).unwrap();
        assert_eq!(parsed.values_missing, 1);
        assert_eq!(parsed.samples[0].value, Some(0.0));
    }

    #[test]
    fn test_decimal_comma_and_point_both_parse() {
        assert_eq!(parse_decimal("12,5"), Some(12.5));
        assert_eq!(parse_decimal("12.5"), Some(12.5));
        assert_eq!(parse_decimal(" 3,0 "), Some(3.0));
        assert_eq!(parse_decimal(""), None);
        assert_eq!(parse_decimal("NaN"), None);
        assert_eq!(parse_decimal("abc"), None);
    }
}
