use std::path::PathBuf;

use thiserror::Error;

/// Convenient alias for fallible results returned throughout the crate.
pub type Result<T> = std::result::Result<T, ToolError>;

/// Error type covering the failures that abort a report run.
///
/// Problems with individual work orders never surface here; those are skipped
/// by the aggregator and described by [`SkipReason`](crate::aggregate::SkipReason).
#[derive(Debug, Error)]
pub enum ToolError {
    /// Wrapper for IO failures such as reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Raised when a delimited source cannot be read.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Errors bubbled up from the Excel writer implementation.
    #[error("Excel write error: {0}")]
    ExcelWrite(#[from] rust_xlsxwriter::XlsxError),

    /// Errors bubbled up from the Excel reader implementation.
    #[error("Excel read error: {0}")]
    ExcelRead(#[from] calamine::XlsxError),

    /// Raised when a work-order workbook does not contain a readable sheet.
    #[error("invalid workbook structure: {0}")]
    InvalidWorkbook(String),

    /// Raised when a payroll line cannot be interpreted.
    #[error("invalid salary record on line {line}: {reason}")]
    InvalidSalaryRecord { line: u64, reason: String },

    /// Raised when a user supplied date does not follow the expected format.
    #[error("invalid date '{value}', expected {expected}")]
    InvalidDate { value: String, expected: &'static str },

    /// Raised when a month outside 1-12 is requested.
    #[error("invalid month {0}, expected a value between 1 and 12")]
    InvalidMonth(u32),

    /// Raised when an interactive answer cannot be parsed.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Raised when the interactive period choice is neither 1 nor 2.
    #[error("invalid choice '{0}', enter either 1 or 2")]
    InvalidChoice(String),

    /// Raised when the user provides a path that does not exist.
    #[error("input file not found: {0}")]
    MissingInput(PathBuf),

    /// Raised when the tracing subscriber fails to initialise.
    #[error("failed to initialise logging: {0}")]
    Logging(String),
}
