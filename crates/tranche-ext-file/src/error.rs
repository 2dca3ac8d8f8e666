//! Error types for file I/O.

use std::path::PathBuf;

use thiserror::Error;
use tranche_core::CoreError;

/// Result type for file operations.
pub type FileResult<T> = Result<T, FileError>;

/// Errors raised while reading or writing asset files.
#[derive(Error, Debug)]
pub enum FileError {
    /// The file could not be opened or created.
    #[error("Cannot access {}: {source}", path.display())]
    Io {
        /// The offending path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Malformed CSV.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A cell could not be parsed.
    #[error("Row {row}: invalid {column} value '{value}'")]
    InvalidValue {
        /// 1-based data row.
        row: usize,
        /// Normalized column name.
        column: String,
        /// Raw cell contents.
        value: String,
    },

    /// Weight vector and universe disagree in length.
    #[error("Expected {expected} weights, got {actual}")]
    LengthMismatch {
        /// Universe size.
        expected: usize,
        /// Weights supplied.
        actual: usize,
    },

    /// The data failed model validation.
    #[error(transparent)]
    Data(#[from] CoreError),
}

impl FileError {
    /// Creates an I/O error for `path`.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Creates an invalid value error.
    pub fn invalid_value(row: usize, column: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidValue {
            row,
            column: column.into(),
            value: value.into(),
        }
    }
}
