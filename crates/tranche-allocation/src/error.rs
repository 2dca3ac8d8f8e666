//! Error types for the allocation engine.
//!
//! Every failure is returned in-band. Data problems surface as
//! [`AllocationError::DataValidation`] before any LP work is done; solver
//! outcomes map onto the remaining variants.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tranche_core::CoreError;
use tranche_math::MathError;

/// Result type for allocation operations.
pub type AllocationResult<T> = Result<T, AllocationError>;

/// Errors that can occur while building or solving an allocation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AllocationError {
    /// Input data or configuration failed validation.
    #[error("Data validation failed: {0}")]
    DataValidation(CoreError),

    /// No weight vector satisfies every constraint.
    #[error("Infeasible allocation (implicated: {})", format_implicated(implicated))]
    Infeasible {
        /// Constraint labels left violated by the solver, best effort.
        implicated: Vec<String>,
    },

    /// The objective has no finite maximum.
    #[error("Unbounded allocation: {reason}")]
    Unbounded {
        /// Solver-provided description of the unbounded direction.
        reason: String,
    },

    /// The backend gave up or returned unusable values.
    #[error("Solver failure: {reason}")]
    SolverFailure {
        /// What went wrong.
        reason: String,
    },

    /// The requested backend does not exist.
    #[error("Unsupported solver '{name}'")]
    UnsupportedSolver {
        /// The requested name.
        name: String,
    },
}

fn format_implicated(implicated: &[String]) -> String {
    if implicated.is_empty() {
        "undetermined".to_string()
    } else {
        implicated.join(", ")
    }
}

impl AllocationError {
    /// Creates a solver failure error.
    #[must_use]
    pub fn solver_failure(reason: impl Into<String>) -> Self {
        Self::SolverFailure {
            reason: reason.into(),
        }
    }

    /// Coarse classification of the error.
    #[must_use]
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::DataValidation(_) => FailureKind::DataValidation,
            Self::Infeasible { .. } => FailureKind::Infeasible,
            Self::Unbounded { .. } => FailureKind::Unbounded,
            Self::SolverFailure { .. } | Self::UnsupportedSolver { .. } => {
                FailureKind::SolverFailure
            }
        }
    }
}

impl From<CoreError> for AllocationError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::UnsupportedSolver { name } => Self::UnsupportedSolver { name },
            other => Self::DataValidation(other),
        }
    }
}

impl From<MathError> for AllocationError {
    fn from(err: MathError) -> Self {
        match err {
            MathError::Infeasible { implicated } => Self::Infeasible { implicated },
            MathError::Unbounded { .. } => Self::Unbounded {
                reason: err.to_string(),
            },
            other => Self::solver_failure(other.to_string()),
        }
    }
}

/// Failure categories reported per scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Missing or unmapped data, or an invalid configuration.
    DataValidation,
    /// No feasible allocation.
    Infeasible,
    /// Objective without a finite maximum.
    Unbounded,
    /// Numerical failure, exhausted budget, or unsupported backend.
    SolverFailure,
}
