//! CLI entry point for the wind data resampler.
//!
//! Provides subcommands for converting 10-minute SCADA wind exports to
//! 15-minute settlement intervals and for validating input files without
//! converting them.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::ffi::OsStr;
use std::path::Path;
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

use wind_resampler::config::{
    Alignment, BuiltinProfile, ColumnProfile, ConvertOptions, EmptyBinPolicy,
    MissingValuePolicy, ParseMode, TimestampFormat,
};
use wind_resampler::output::{self, ConversionSummary};
use wind_resampler::parser::parse_file;
use wind_resampler::resample::Resampler;

#[derive(Parser)]
#[command(name = "wind_resampler")]
#[command(about = "Converts 10-minute wind telemetry to 15-minute settlement intervals", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a 10-minute SCADA export to a 15-minute series
    Convert {
        /// Path of the `;`-separated input file
        #[arg(value_name = "FILE")]
        input: String,

        /// CSV file to write the result to
        #[arg(short, long, default_value = "wind_15min.csv")]
        output: String,

        /// Which interval edge the input timestamps mark
        #[arg(long, value_enum, default_value_t = Alignment::Right)]
        input_alignment: Alignment,

        /// Which interval edge the output timestamps mark
        #[arg(long, value_enum, default_value_t = Alignment::Right)]
        output_alignment: Alignment,

        /// Abort on the first bad timestamp, or skip such rows
        #[arg(long, value_enum, default_value_t = ParseMode::Strict)]
        parse_mode: ParseMode,

        /// How missing or non-numeric values enter the average
        #[arg(long, value_enum, default_value_t = MissingValuePolicy::Absent)]
        missing_values: MissingValuePolicy,

        /// Emit bins without data as empty rows, or drop them
        #[arg(long, value_enum, default_value_t = EmptyBinPolicy::Drop)]
        empty_bins: EmptyBinPolicy,

        /// Serialization of the output timestamps
        #[arg(long, value_enum, default_value_t = TimestampFormat::Locale)]
        timestamp_format: TimestampFormat,

        /// Built-in input column naming profile
        #[arg(long, value_enum, default_value_t = BuiltinProfile::PlantLocal)]
        profile: BuiltinProfile,

        /// JSON file overriding the column names (keys: date, time, value)
        #[arg(long, value_name = "FILE")]
        columns: Option<String>,

        /// Also log the conversion summary as JSON
        #[arg(long, default_value_t = false)]
        json_summary: bool,
    },
    /// Validate an input file without converting it
    Check {
        /// Path of the `;`-separated input file
        #[arg(value_name = "FILE")]
        input: String,

        /// Built-in input column naming profile
        #[arg(long, value_enum, default_value_t = BuiltinProfile::PlantLocal)]
        profile: BuiltinProfile,

        /// JSON file overriding the column names (keys: date, time, value)
        #[arg(long, value_name = "FILE")]
        columns: Option<String>,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/wind_resampler.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("wind_resampler.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse().unwrap()));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse().unwrap()));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Convert {
            input,
            output,
            input_alignment,
            output_alignment,
            parse_mode,
            missing_values,
            empty_bins,
            timestamp_format,
            profile,
            columns,
            json_summary,
        } => {
            let options = ConvertOptions {
                input_alignment,
                output_alignment,
                parse_mode,
                missing_values,
                empty_bins,
                timestamp_format,
                columns: resolve_columns(profile, columns)?,
            };
            convert(&input, &output, &options, json_summary)?;
        }
        Commands::Check {
            input,
            profile,
            columns,
        } => {
            check(&input, &resolve_columns(profile, columns)?)?;
        }
    }

    Ok(())
}

/// Resolves the active column profile: a JSON mapping file wins over the
/// built-in selection.
fn resolve_columns(profile: BuiltinProfile, columns: Option<String>) -> Result<ColumnProfile> {
    match columns {
        Some(path) => ColumnProfile::load(&path),
        None => Ok(profile.columns()),
    }
}

/// Runs one file-to-file conversion.
#[tracing::instrument(skip(options, json_summary), fields(input, output))]
fn convert(input: &str, output: &str, options: &ConvertOptions, json_summary: bool) -> Result<()> {
    let parsed = parse_file(input, &options.columns, options.parse_mode, options.missing_values)?;
    let outcome = Resampler::scada_to_settlement().resample(&parsed.samples, options)?;
    output::write_result(output, &outcome.points, options.timestamp_format)?;

    let summary = ConversionSummary {
        rows_total: parsed.rows_total,
        rows_skipped: parsed.rows_skipped,
        values_missing: parsed.values_missing,
        bins_total: outcome.bins_total,
        bins_empty: outcome.bins_empty,
        rows_written: outcome.points.len(),
    };
    output::print_pretty(&summary);
    if json_summary {
        output::print_json(&summary)?;
    }

    info!(
        input,
        output,
        rows_read = summary.rows_total,
        rows_written = summary.rows_written,
        "Conversion complete"
    );
    Ok(())
}

/// Validates an input file and logs what a conversion would work with.
#[tracing::instrument(skip(columns), fields(input))]
fn check(input: &str, columns: &ColumnProfile) -> Result<()> {
    // Lenient parse: the point is to report bad rows, not abort on them.
    let parsed = parse_file(input, columns, ParseMode::Lenient, MissingValuePolicy::Absent)?;

    let span_start = parsed
        .samples
        .iter()
        .map(|s| s.instant)
        .min()
        .map(|t| t.to_rfc3339())
        .unwrap_or_default();
    let span_end = parsed
        .samples
        .iter()
        .map(|s| s.instant)
        .max()
        .map(|t| t.to_rfc3339())
        .unwrap_or_default();

    info!(
        rows_total = parsed.rows_total,
        rows_valid = parsed.samples.len(),
        rows_skipped = parsed.rows_skipped,
        values_missing = parsed.values_missing,
        span_start = %span_start,
        span_end = %span_end,
        "Input file check"
    );
    Ok(())
}
