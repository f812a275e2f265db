//! Error types for deltacheck data sets.
//!
//! Every variant signals caller misuse (a malformed row, a write to a frozen
//! data set, mixing data sources) rather than a data mismatch.

use alloc::string::String;
use core::fmt;

/// Result type alias for data set operations.
pub type Result<T> = core::result::Result<T, Error>;

/// Usage errors raised while building or slicing data sets.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Error {
    /// Row arity does not match the data source column count.
    ArityMismatch {
        expected: usize,
        got: usize,
    },
    /// Mutation attempted on a read-only data set.
    ReadOnly {
        source: String,
    },
    /// Two data sets bound to different data sources were combined.
    SourceMismatch {
        expected: String,
        got: String,
    },
    /// Position-based subset out of range.
    InvalidRange {
        start: usize,
        count: usize,
        len: usize,
    },
    /// Invalid data source definition.
    InvalidSource {
        message: String,
    },
    /// Invalid operation.
    InvalidOperation {
        message: String,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::ArityMismatch { expected, got } => {
                write!(f, "{} columns expected, not {}", expected, got)
            }
            Error::ReadOnly { source } => {
                write!(f, "Data set for {} is read-only", source)
            }
            Error::SourceMismatch { expected, got } => {
                write!(f, "Data source mismatch: expected {}, got {}", expected, got)
            }
            Error::InvalidRange { start, count, len } => {
                write!(
                    f,
                    "Invalid range: {} rows from index {} in a data set of {} rows",
                    count, start, len
                )
            }
            Error::InvalidSource { message } => {
                write!(f, "Invalid data source: {}", message)
            }
            Error::InvalidOperation { message } => {
                write!(f, "Invalid operation: {}", message)
            }
        }
    }
}

impl core::error::Error for Error {}

impl Error {
    /// Creates an arity mismatch error.
    pub fn arity_mismatch(expected: usize, got: usize) -> Self {
        Error::ArityMismatch { expected, got }
    }

    /// Creates a read-only error.
    pub fn read_only(source: impl Into<String>) -> Self {
        Error::ReadOnly {
            source: source.into(),
        }
    }

    /// Creates a data source mismatch error.
    pub fn source_mismatch(expected: impl Into<String>, got: impl Into<String>) -> Self {
        Error::SourceMismatch {
            expected: expected.into(),
            got: got.into(),
        }
    }

    /// Creates an invalid range error.
    pub fn invalid_range(start: usize, count: usize, len: usize) -> Self {
        Error::InvalidRange { start, count, len }
    }

    /// Creates an invalid data source error.
    pub fn invalid_source(message: impl Into<String>) -> Self {
        Error::InvalidSource {
            message: message.into(),
        }
    }

    /// Creates an invalid operation error.
    pub fn invalid_operation(message: impl Into<String>) -> Self {
        Error::InvalidOperation {
            message: message.into(),
        }
    }
}
