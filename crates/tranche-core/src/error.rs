//! Error types for the data model.
//!
//! Every variant here is a data validation failure: the input cannot be
//! turned into a well-formed universe or configuration. None of them are
//! retried.

use thiserror::Error;

/// A specialized Result type for data model operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Data validation errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    /// A required input column is absent.
    #[error("Missing required column '{column}'")]
    MissingColumn {
        /// Normalized name of the missing column.
        column: String,
    },

    /// A categorical value does not resolve against the configured tables.
    #[error("Unmapped {field} '{value}' for asset '{asset}'")]
    UnmappedLabel {
        /// The field holding the value (sector, liquidity label, quality, ...).
        field: String,
        /// The offending value.
        value: String,
        /// The asset carrying it.
        asset: String,
    },

    /// An asset violates a per-asset invariant.
    #[error("Invalid asset '{id}': {reason}")]
    InvalidAsset {
        /// The asset ID.
        id: String,
        /// What is wrong with it.
        reason: String,
    },

    /// Two assets share an ID.
    #[error("Duplicate asset id '{id}'")]
    DuplicateAsset {
        /// The duplicated ID.
        id: String,
    },

    /// A universe must contain at least one asset.
    #[error("Asset universe is empty")]
    EmptyUniverse,

    /// A configuration value is out of range.
    #[error("Invalid configuration for {field}: {reason}")]
    InvalidConfig {
        /// The configuration field.
        field: String,
        /// What is wrong with it.
        reason: String,
    },

    /// The solver name does not match any supported backend.
    #[error("Unsupported solver '{name}' (expected one of: simplex, bland)")]
    UnsupportedSolver {
        /// The name that was requested.
        name: String,
    },
}

impl CoreError {
    /// Creates a missing column error.
    #[must_use]
    pub fn missing_column(column: impl Into<String>) -> Self {
        Self::MissingColumn {
            column: column.into(),
        }
    }

    /// Creates an unmapped label error.
    #[must_use]
    pub fn unmapped(
        field: impl Into<String>,
        value: impl Into<String>,
        asset: impl Into<String>,
    ) -> Self {
        Self::UnmappedLabel {
            field: field.into(),
            value: value.into(),
            asset: asset.into(),
        }
    }

    /// Creates an invalid asset error.
    #[must_use]
    pub fn invalid_asset(id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidAsset {
            id: id.into(),
            reason: reason.into(),
        }
    }

    /// Creates an invalid configuration error.
    #[must_use]
    pub fn invalid_config(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CoreError::missing_column("duration");
        assert_eq!(err.to_string(), "Missing required column 'duration'");

        let err = CoreError::unmapped("sector", "Muni", "BOND7");
        assert!(err.to_string().contains("Muni"));
        assert!(err.to_string().contains("BOND7"));

        let err = CoreError::UnsupportedSolver {
            name: "ECOS".into(),
        };
        assert!(err.to_string().contains("ECOS"));
    }

    #[test]
    fn test_error_clone() {
        let err = CoreError::EmptyUniverse;
        assert_eq!(err.clone(), err);
    }
}
