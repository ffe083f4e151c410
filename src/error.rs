//! Error types for record loading, field access and configuration.
//!
//! Structural problems with a dataset abort the run: nothing in the
//! pipeline produces partial results from a malformed record set.
//! Configuration inconsistencies (an invalid cull range, a degenerate
//! bounding volume) are not errors and never appear here.

use thiserror::Error;

/// Failure while turning delimited text into a [`RecordSet`](crate::RecordSet).
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("input has no header row")]
    MissingHeader,

    #[error("line {line}: expected {expected} fields, found {found}")]
    FieldCountMismatch {
        line: u64,
        expected: usize,
        found: usize,
    },

    #[error("required column '{column}' is not in the header")]
    MissingColumn { column: String },

    #[error("line {line}: field '{field}' has non-numeric value '{value}'")]
    InvalidNumber {
        line: u64,
        field: String,
        value: String,
    },

    #[error("invalid separator {separator:?}: {reason}")]
    InvalidSeparator {
        separator: char,
        reason: &'static str,
    },

    #[error("malformed input: {0}")]
    Csv(#[from] csv::Error),
}

/// Failure while extracting a typed value from a record.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FieldError {
    #[error("field '{field}' is not present")]
    Missing { field: String },

    #[error("field '{field}' is not numeric (value '{value}')")]
    NotNumeric { field: String, value: String },
}

/// Top-level error for every fallible operation in the crate.
#[derive(Error, Debug)]
pub enum DwellMapError {
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("field error: {0}")]
    Field(#[from] FieldError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, DwellMapError>;

/// Convert a failed field lookup into a [`FieldError::Missing`].
pub trait OptionExt<T> {
    fn ok_or_missing_field(self, field: &str) -> std::result::Result<T, FieldError>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_missing_field(self, field: &str) -> std::result::Result<T, FieldError> {
        self.ok_or_else(|| FieldError::Missing {
            field: field.to_string(),
        })
    }
}
