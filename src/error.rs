//! Error types for report parsing and aggregation

use thiserror::Error;

/// Errors raised while parsing table sections out of a report stream.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The stream ended right after a marker line, before the header row.
    #[error("section '{section}': stream ended before the header row")]
    UnexpectedEndOfSection { section: String },

    /// A data row had more or fewer values than the header declared.
    #[error("section '{section}' row {row}: expected {expected} values, found {found}")]
    RowWidthMismatch {
        section: String,
        row: usize,
        expected: usize,
        found: usize,
    },

    /// The header row named the same column twice.
    #[error("section '{section}': duplicate column '{column}' in header")]
    DuplicateColumn { section: String, column: String },

    /// Reading a line from the underlying stream failed.
    #[error("failed to read report line: {0}")]
    Io(#[from] std::io::Error),
}

/// Raised when no recalibration report parsed successfully across all inputs.
#[derive(Debug, Error)]
#[error("no recalibration reports found in the given inputs")]
pub struct NoSamplesFound;
