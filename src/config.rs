//! Conversion options and input column profiles.
//!
//! Everything the core is allowed to consult lives in [`ConvertOptions`];
//! the CLI assembles it once per request and the core reads no other state.

use anyhow::Result;
use clap::ValueEnum;

use serde::{Deserialize, Serialize};

/// Which edge of its measurement interval a recorded timestamp marks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Alignment {
    /// The timestamp marks the start of the interval.
    Left,
    /// The timestamp marks the end of the interval (the usual SCADA and
    /// market-settlement convention).
    Right,
}

/// How to react to a timestamp that does not parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ParseMode {
    /// Abort the whole request on the first bad timestamp.
    Strict,
    /// Skip the offending row and keep going.
    Lenient,
}

/// How missing or non-numeric measurement values enter the average.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MissingValuePolicy {
    /// Exclude the sample from both the weighted sum and the denominator.
    Absent,
    /// Substitute 0.0, so the sample's minutes still count.
    Zero,
}

/// What to do with an output bin no sample contributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum EmptyBinPolicy {
    /// Write the bin's row with an empty value cell.
    Emit,
    /// Leave the bin out of the output entirely.
    Drop,
}

/// Serialization of the reported output timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TimestampFormat {
    /// Day-first locale form, `DD.MM.YYYY HH:MM`, as in the input files.
    Locale,
    /// Fixed ISO-8601 UTC with a trailing `Z`.
    Iso8601Utc,
}

/// Names of the three required input columns.
///
/// Stored as a plain JSON object on disk when loaded from a file:
/// ```json
/// {
///   "date": "Datum (Anlage)",
///   "time": "Zeit (Anlage)",
///   "value": "Wind Speed (avg)"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnProfile {
    pub date: String,
    pub time: String,
    pub value: String,
}

impl ColumnProfile {
    /// Loads a custom column mapping from a JSON file at `path`.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let profile: ColumnProfile = serde_json::from_str(&content)?;
        Ok(profile)
    }
}

/// Built-in header sets observed across export revisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BuiltinProfile {
    /// `Datum (Anlage)` / `Zeit (Anlage)` / `Wind Speed (avg)`
    PlantLocal,
    /// `Date (UTC, Plant)` / `Time (UTC, Plant)` / `Wind Speed (avg)`
    PlantUtc,
}

impl BuiltinProfile {
    pub fn columns(self) -> ColumnProfile {
        match self {
            BuiltinProfile::PlantLocal => ColumnProfile {
                date: "Datum (Anlage)".to_string(),
                time: "Zeit (Anlage)".to_string(),
                value: "Wind Speed (avg)".to_string(),
            },
            BuiltinProfile::PlantUtc => ColumnProfile {
                date: "Date (UTC, Plant)".to_string(),
                time: "Time (UTC, Plant)".to_string(),
                value: "Wind Speed (avg)".to_string(),
            },
        }
    }
}

/// All options for one conversion request.
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    pub input_alignment: Alignment,
    pub output_alignment: Alignment,
    pub parse_mode: ParseMode,
    pub missing_values: MissingValuePolicy,
    pub empty_bins: EmptyBinPolicy,
    pub timestamp_format: TimestampFormat,
    pub columns: ColumnProfile,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        ConvertOptions {
            input_alignment: Alignment::Right,
            output_alignment: Alignment::Right,
            parse_mode: ParseMode::Strict,
            missing_values: MissingValuePolicy::Absent,
            empty_bins: EmptyBinPolicy::Drop,
            timestamp_format: TimestampFormat::Locale,
            columns: BuiltinProfile::PlantLocal.columns(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::fs;

    #[test]
    fn test_builtin_profiles_share_value_column() {
        let local = BuiltinProfile::PlantLocal.columns();
        let utc = BuiltinProfile::PlantUtc.columns();
        assert_eq!(local.value, utc.value);
        assert_ne!(local.date, utc.date);
    }

    #[test]
    fn test_load_profile_from_json() {
        let path = format!("{}/wind_resampler_test_profile.json", env::temp_dir().display());
        fs::write(
            &path,
            r#"{"date": "Tag", "time": "Uhrzeit", "value": "Windgeschwindigkeit"}"#,
        )
        .unwrap();

        let profile = ColumnProfile::load(&path).unwrap();
        assert_eq!(profile.date, "Tag");
        assert_eq!(profile.time, "Uhrzeit");
        assert_eq!(profile.value, "Windgeschwindigkeit");

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_load_profile_rejects_incomplete_json() {
        let path = format!("{}/wind_resampler_test_bad_profile.json", env::temp_dir().display());
        fs::write(&path, r#"{"date": "Tag"}"#).unwrap();

        assert!(ColumnProfile::load(&path).is_err());

        fs::remove_file(&path).unwrap();
    }
}
