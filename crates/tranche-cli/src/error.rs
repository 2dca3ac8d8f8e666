//! CLI error types.

use std::path::PathBuf;

use thiserror::Error;
use tranche_allocation::AllocationError;
use tranche_core::CoreError;
use tranche_ext_file::FileError;

/// CLI error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// The configuration file could not be read.
    #[error("Cannot read config {}: {source}", path.display())]
    ConfigRead {
        /// Path given on the command line.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML for an allocation config.
    #[error("Invalid config {}: {source}", path.display())]
    ConfigParse {
        /// Path given on the command line.
        path: PathBuf,
        /// Underlying error.
        source: toml::de::Error,
    },

    /// Input data or configuration failed validation.
    #[error(transparent)]
    Data(#[from] CoreError),

    /// Loading or writing a file failed.
    #[error(transparent)]
    File(#[from] FileError),

    /// The base solve failed.
    #[error("Allocation failed: {0}")]
    Allocation(#[from] AllocationError),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// CLI result type.
pub type CliResult<T> = Result<T, CliError>;
