use thiserror::Error;

/// Failures produced by the conversion pipeline.
///
/// The core signals everything through this type; the binary boundary
/// renders fatal variants as a single human-readable message.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// The input file lacks one or more required columns. Checked against
    /// the active column profile before any row is parsed.
    #[error("missing required columns: {}", missing.join(", "))]
    MissingColumns {
        /// Exactly the expected column names that were absent.
        missing: Vec<String>,
    },

    /// A timestamp could not be parsed. Raised in strict mode only; lenient
    /// mode skips the row instead.
    #[error("unparseable timestamp {text:?} on line {line}")]
    TimestampParse {
        /// 1-based line number in the input file (header is line 1).
        line: usize,
        /// The offending date/time text as read from the file.
        text: String,
    },

    /// No valid samples remained after parsing and filtering, so the output
    /// grid is undefined.
    #[error("no valid samples in input, nothing to aggregate")]
    EmptyInput,

    /// Malformed delimited input underneath the column layer.
    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
