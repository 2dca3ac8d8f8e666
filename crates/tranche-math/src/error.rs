//! Error types for numerical routines.

use thiserror::Error;

/// A specialized Result type for numerical routines.
pub type MathResult<T> = Result<T, MathError>;

/// Errors that can occur while solving a linear program.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    /// No point satisfies every constraint and bound.
    #[error("Infeasible program (unsatisfied: {})", implicated.join(", "))]
    Infeasible {
        /// Labels of the constraints left violated at the end of phase one.
        implicated: Vec<String>,
    },

    /// The objective can be improved without limit.
    #[error("Unbounded program: objective improves without limit along {variable}")]
    Unbounded {
        /// The variable (or slack) whose increase is unbounded.
        variable: String,
    },

    /// The pivot budget ran out before reaching optimality.
    #[error("Iteration limit reached after {iterations} pivots")]
    IterationLimit {
        /// Number of pivots performed.
        iterations: usize,
    },

    /// The caller's deadline expired between pivots.
    #[error("Deadline exceeded after {iterations} pivots")]
    DeadlineExceeded {
        /// Number of pivots performed before the deadline was noticed.
        iterations: usize,
    },

    /// Vector lengths do not agree with the number of variables.
    #[error("Dimension mismatch in {context}: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Where the mismatch was found.
        context: String,
        /// Expected length.
        expected: usize,
        /// Actual length.
        actual: usize,
    },

    /// The solver lost numerical integrity.
    #[error("Numerical failure: {reason}")]
    NumericalFailure {
        /// Description of the failure.
        reason: String,
    },

    /// Invalid input parameter.
    #[error("Invalid input: {reason}")]
    InvalidInput {
        /// Description of the invalid input.
        reason: String,
    },
}

impl MathError {
    /// Creates an infeasibility error.
    #[must_use]
    pub fn infeasible(implicated: Vec<String>) -> Self {
        Self::Infeasible { implicated }
    }

    /// Creates an unbounded error.
    #[must_use]
    pub fn unbounded(variable: impl Into<String>) -> Self {
        Self::Unbounded {
            variable: variable.into(),
        }
    }

    /// Creates a dimension mismatch error.
    #[must_use]
    pub fn dimension_mismatch(context: impl Into<String>, expected: usize, actual: usize) -> Self {
        Self::DimensionMismatch {
            context: context.into(),
            expected,
            actual,
        }
    }

    /// Creates a numerical failure error.
    #[must_use]
    pub fn numerical(reason: impl Into<String>) -> Self {
        Self::NumericalFailure {
            reason: reason.into(),
        }
    }

    /// Creates an invalid input error.
    #[must_use]
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = MathError::infeasible(vec!["budget".into(), "floor".into()]);
        assert_eq!(err.to_string(), "Infeasible program (unsatisfied: budget, floor)");

        let err = MathError::IterationLimit { iterations: 42 };
        assert!(err.to_string().contains("42 pivots"));
    }

    #[test]
    fn test_dimension_mismatch() {
        let err = MathError::dimension_mismatch("objective", 3, 2);
        assert!(err.to_string().contains("expected 3, got 2"));
    }
}
