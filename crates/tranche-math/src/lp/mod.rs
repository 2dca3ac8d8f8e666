//! Linear programming.
//!
//! A [`LinearProgram`] is an objective over `n` variables, a set of labelled
//! linear constraints and a box `[lower, upper]` per variable. Programs are
//! solved through the [`LpSolver`] trait; [`SimplexSolver`] is the bundled
//! backend.
//!
//! # Example
//!
//! ```rust
//! use tranche_math::lp::{Comparator, LinearConstraint, LinearProgram, LpConfig, LpSolver, SimplexSolver};
//!
//! // maximize 3x + 5y  s.t.  x <= 4, 2y <= 12, 3x + 2y <= 18
//! let program = LinearProgram::maximize(vec![3.0, 5.0])
//!     .with_constraint(LinearConstraint::new("x cap", vec![1.0, 0.0], Comparator::LessEqual, 4.0))
//!     .with_constraint(LinearConstraint::new("y cap", vec![0.0, 2.0], Comparator::LessEqual, 12.0))
//!     .with_constraint(LinearConstraint::new("mix", vec![3.0, 2.0], Comparator::LessEqual, 18.0));
//!
//! let solution = SimplexSolver::default().solve(&program, &LpConfig::default()).unwrap();
//! assert!((solution.objective_value - 36.0).abs() < 1e-9);
//! ```

mod simplex;

pub use simplex::{PivotRule, SimplexSolver};

use std::fmt;
use std::time::{Duration, Instant};

use crate::error::{MathError, MathResult};

/// Default pivot tolerance.
pub const DEFAULT_TOLERANCE: f64 = 1e-9;

/// Default tolerance on the phase-one objective when declaring feasibility.
pub const DEFAULT_FEASIBILITY_TOLERANCE: f64 = 1e-7;

/// Default pivot budget.
pub const DEFAULT_MAX_ITERATIONS: usize = 10_000;

/// Optimization direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sense {
    /// Maximize the objective.
    Maximize,
    /// Minimize the objective.
    Minimize,
}

/// Relation between a constraint's left-hand side and its bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparator {
    /// `a · x <= b`
    LessEqual,
    /// `a · x >= b`
    GreaterEqual,
    /// `a · x == b`
    Equal,
}

impl Comparator {
    /// The comparator obtained by multiplying both sides by -1.
    #[must_use]
    pub fn flipped(self) -> Self {
        match self {
            Self::LessEqual => Self::GreaterEqual,
            Self::GreaterEqual => Self::LessEqual,
            Self::Equal => Self::Equal,
        }
    }

    /// Returns true if `lhs` satisfies the relation against `rhs` within `tolerance`.
    #[must_use]
    pub fn holds(self, lhs: f64, rhs: f64, tolerance: f64) -> bool {
        match self {
            Self::LessEqual => lhs <= rhs + tolerance,
            Self::GreaterEqual => lhs >= rhs - tolerance,
            Self::Equal => (lhs - rhs).abs() <= tolerance,
        }
    }
}

impl fmt::Display for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            Self::LessEqual => "<=",
            Self::GreaterEqual => ">=",
            Self::Equal => "==",
        };
        f.write_str(symbol)
    }
}

/// A labelled linear constraint `coefficients · x (comparator) rhs`.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearConstraint {
    /// Name reported back when the constraint cannot be satisfied.
    pub label: String,
    /// One coefficient per variable.
    pub coefficients: Vec<f64>,
    /// Relation to the bound.
    pub comparator: Comparator,
    /// Right-hand side.
    pub rhs: f64,
}

impl LinearConstraint {
    /// Creates a new constraint.
    #[must_use]
    pub fn new(
        label: impl Into<String>,
        coefficients: Vec<f64>,
        comparator: Comparator,
        rhs: f64,
    ) -> Self {
        Self {
            label: label.into(),
            coefficients,
            comparator,
            rhs,
        }
    }

    /// Evaluates the left-hand side at `x`.
    #[must_use]
    pub fn lhs(&self, x: &[f64]) -> f64 {
        self.coefficients.iter().zip(x).map(|(a, v)| a * v).sum()
    }

    /// Returns true if `x` satisfies the constraint within `tolerance`.
    #[must_use]
    pub fn is_satisfied(&self, x: &[f64], tolerance: f64) -> bool {
        self.comparator.holds(self.lhs(x), self.rhs, tolerance)
    }
}

/// Box bounds for a single variable. The lower bound must be finite.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VariableBounds {
    /// Lower bound.
    pub lower: f64,
    /// Upper bound (`f64::INFINITY` for none).
    pub upper: f64,
}

impl VariableBounds {
    /// Creates bounds `[lower, upper]`.
    #[must_use]
    pub fn new(lower: f64, upper: f64) -> Self {
        Self { lower, upper }
    }

    /// Bounds `[0, +inf)`.
    #[must_use]
    pub fn non_negative() -> Self {
        Self::new(0.0, f64::INFINITY)
    }
}

impl Default for VariableBounds {
    fn default() -> Self {
        Self::non_negative()
    }
}

/// A linear program over `n` bounded variables.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearProgram {
    /// Optimization direction.
    pub sense: Sense,
    /// Objective coefficients, one per variable.
    pub objective: Vec<f64>,
    /// Box bounds, one per variable.
    pub bounds: Vec<VariableBounds>,
    /// General linear constraints.
    pub constraints: Vec<LinearConstraint>,
    /// Display names used in diagnostics.
    pub variable_names: Vec<String>,
}

impl LinearProgram {
    /// Creates a program with the given sense; every variable defaults to `[0, +inf)`.
    #[must_use]
    pub fn new(sense: Sense, objective: Vec<f64>) -> Self {
        let n = objective.len();
        Self {
            sense,
            objective,
            bounds: vec![VariableBounds::default(); n],
            constraints: Vec::new(),
            variable_names: (0..n).map(|j| format!("x{j}")).collect(),
        }
    }

    /// Creates a maximization program.
    #[must_use]
    pub fn maximize(objective: Vec<f64>) -> Self {
        Self::new(Sense::Maximize, objective)
    }

    /// Creates a minimization program.
    #[must_use]
    pub fn minimize(objective: Vec<f64>) -> Self {
        Self::new(Sense::Minimize, objective)
    }

    /// Replaces the variable bounds.
    #[must_use]
    pub fn with_bounds(mut self, bounds: Vec<VariableBounds>) -> Self {
        self.bounds = bounds;
        self
    }

    /// Adds a constraint.
    #[must_use]
    pub fn with_constraint(mut self, constraint: LinearConstraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    /// Adds several constraints.
    #[must_use]
    pub fn with_constraints(mut self, constraints: impl IntoIterator<Item = LinearConstraint>) -> Self {
        self.constraints.extend(constraints);
        self
    }

    /// Replaces the variable display names.
    #[must_use]
    pub fn with_variable_names(mut self, names: Vec<String>) -> Self {
        self.variable_names = names;
        self
    }

    /// Number of decision variables.
    #[must_use]
    pub fn num_variables(&self) -> usize {
        self.objective.len()
    }

    /// Evaluates the objective at `x`.
    #[must_use]
    pub fn objective_at(&self, x: &[f64]) -> f64 {
        self.objective.iter().zip(x).map(|(c, v)| c * v).sum()
    }

    /// Checks dimensions and finiteness of every input.
    pub fn validate(&self) -> MathResult<()> {
        let n = self.num_variables();
        if n == 0 {
            return Err(MathError::invalid_input("program has no variables"));
        }
        if self.bounds.len() != n {
            return Err(MathError::dimension_mismatch("bounds", n, self.bounds.len()));
        }
        if self.variable_names.len() != n {
            return Err(MathError::dimension_mismatch(
                "variable names",
                n,
                self.variable_names.len(),
            ));
        }
        if self.objective.iter().any(|c| !c.is_finite()) {
            return Err(MathError::invalid_input("objective has non-finite coefficients"));
        }
        for (j, b) in self.bounds.iter().enumerate() {
            if !b.lower.is_finite() || b.upper.is_nan() {
                return Err(MathError::invalid_input(format!(
                    "bounds of {} must have a finite lower end",
                    self.variable_names[j]
                )));
            }
        }
        for c in &self.constraints {
            if c.coefficients.len() != n {
                return Err(MathError::dimension_mismatch(
                    format!("constraint '{}'", c.label),
                    n,
                    c.coefficients.len(),
                ));
            }
            if !c.rhs.is_finite() || c.coefficients.iter().any(|a| !a.is_finite()) {
                return Err(MathError::invalid_input(format!(
                    "constraint '{}' has non-finite terms",
                    c.label
                )));
            }
        }
        Ok(())
    }
}

/// A cooperative time limit checked by solvers between pivots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadline {
    at: Instant,
}

impl Deadline {
    /// A deadline at a fixed instant.
    #[must_use]
    pub fn at(at: Instant) -> Self {
        Self { at }
    }

    /// A deadline `budget` from now.
    #[must_use]
    pub fn after(budget: Duration) -> Self {
        Self::at(Instant::now() + budget)
    }

    /// Returns true once the deadline has passed.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.at
    }

    /// Time left before expiry (zero once expired).
    #[must_use]
    pub fn remaining(&self) -> Duration {
        self.at.saturating_duration_since(Instant::now())
    }
}

/// Configuration for LP solvers.
#[derive(Debug, Clone, Copy)]
pub struct LpConfig {
    /// Pivot tolerance: entries smaller than this are treated as zero.
    pub tolerance: f64,
    /// Phase-one objective above this means the program is infeasible.
    pub feasibility_tolerance: f64,
    /// Maximum number of pivots across both phases.
    pub max_iterations: usize,
    /// Optional deadline checked between pivots.
    pub deadline: Option<Deadline>,
}

impl Default for LpConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            feasibility_tolerance: DEFAULT_FEASIBILITY_TOLERANCE,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            deadline: None,
        }
    }
}

impl LpConfig {
    /// Sets the pivot tolerance.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Sets the pivot budget.
    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Sets the deadline.
    #[must_use]
    pub fn with_deadline(mut self, deadline: Deadline) -> Self {
        self.deadline = Some(deadline);
        self
    }
}

/// Optimal solution of a linear program.
#[derive(Debug, Clone, PartialEq)]
pub struct LpSolution {
    /// Optimal variable values.
    pub values: Vec<f64>,
    /// Objective value at `values`.
    pub objective_value: f64,
    /// Pivots performed across both phases.
    pub iterations: usize,
}

/// Trait for linear programming backends.
pub trait LpSolver: Send + Sync {
    /// Solves the program to optimality.
    ///
    /// # Errors
    ///
    /// Returns [`MathError::Infeasible`] or [`MathError::Unbounded`] for
    /// programs without a finite optimum, and iteration, deadline or
    /// numerical errors when the backend gives up.
    fn solve(&self, program: &LinearProgram, config: &LpConfig) -> MathResult<LpSolution>;

    /// Returns the name of the backend.
    fn name(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comparator_flip_and_holds() {
        assert_eq!(Comparator::LessEqual.flipped(), Comparator::GreaterEqual);
        assert_eq!(Comparator::Equal.flipped(), Comparator::Equal);
        assert!(Comparator::LessEqual.holds(1.0 + 1e-10, 1.0, 1e-9));
        assert!(!Comparator::GreaterEqual.holds(0.9, 1.0, 1e-9));
        assert_eq!(Comparator::Equal.to_string(), "==");
    }

    #[test]
    fn test_validate_dimensions() {
        let program = LinearProgram::maximize(vec![1.0, 1.0]).with_constraint(
            LinearConstraint::new("short", vec![1.0], Comparator::LessEqual, 1.0),
        );
        assert!(matches!(
            program.validate(),
            Err(MathError::DimensionMismatch { expected: 2, actual: 1, .. })
        ));

        let program = LinearProgram::maximize(vec![1.0]).with_bounds(vec![]);
        assert!(program.validate().is_err());

        assert!(LinearProgram::maximize(vec![]).validate().is_err());
    }

    #[test]
    fn test_validate_rejects_infinite_lower_bound() {
        let program = LinearProgram::maximize(vec![1.0])
            .with_bounds(vec![VariableBounds::new(f64::NEG_INFINITY, 1.0)]);
        assert!(matches!(program.validate(), Err(MathError::InvalidInput { .. })));
    }

    #[test]
    fn test_deadline() {
        let expired = Deadline::at(Instant::now());
        assert!(expired.is_expired());
        assert_eq!(expired.remaining(), Duration::ZERO);

        let later = Deadline::after(Duration::from_secs(3600));
        assert!(!later.is_expired());
    }

    #[test]
    fn test_constraint_evaluation() {
        let c = LinearConstraint::new("sum", vec![1.0, 2.0], Comparator::Equal, 5.0);
        assert_eq!(c.lhs(&[1.0, 2.0]), 5.0);
        assert!(c.is_satisfied(&[1.0, 2.0], 1e-12));
        assert!(!c.is_satisfied(&[1.0, 1.0], 1e-12));
    }
}
