//! Allocation solving.
//!
//! [`solve_allocation`] validates the configuration, builds the constraint
//! set, hands it to the configured LP backend and returns an immutable
//! [`Portfolio`]. Every call builds its own tableau, so the functions here
//! are safe to call repeatedly and from several threads at once.

use std::time::Duration;

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use tranche_core::{AllocationConfig, SolverBackend, Universe};
use tranche_math::lp::{
    Deadline, LpConfig, LpSolver, PivotRule, SimplexSolver, DEFAULT_MAX_ITERATIONS,
    DEFAULT_TOLERANCE,
};

use crate::builder::build_constraints;
use crate::diagnostics::{extract_diagnostics, Diagnostics};
use crate::error::{AllocationError, AllocationResult};

/// Decimal places kept in reported weights.
pub const WEIGHT_DECIMALS: u32 = 10;

/// Per-call solver controls.
///
/// The engine imposes no timeout of its own; callers that need one pass a
/// [`Deadline`], which the backend checks before every pivot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolveOptions {
    /// Wall-clock cutoff, if any.
    pub deadline: Option<Deadline>,
    /// Pivot budget across both simplex phases.
    pub max_iterations: usize,
    /// Pivot tolerance.
    pub tolerance: f64,
}

impl Default for SolveOptions {
    fn default() -> Self {
        Self {
            deadline: None,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            tolerance: DEFAULT_TOLERANCE,
        }
    }
}

impl SolveOptions {
    /// Sets the deadline.
    #[must_use]
    pub fn with_deadline(mut self, deadline: Deadline) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Sets a deadline `budget` from now.
    #[must_use]
    pub fn with_timeout(self, budget: Duration) -> Self {
        self.with_deadline(Deadline::after(budget))
    }

    /// Sets the pivot budget.
    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Sets the pivot tolerance.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    fn lp_config(&self) -> LpConfig {
        let config = LpConfig::default()
            .with_tolerance(self.tolerance)
            .with_max_iterations(self.max_iterations);
        match self.deadline {
            Some(deadline) => config.with_deadline(deadline),
            None => config,
        }
    }
}

/// The result of one successful solve.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Portfolio {
    weights: Vec<f64>,
    diagnostics: Diagnostics,
    solver: SolverBackend,
    iterations: usize,
}

impl Portfolio {
    /// Weights in universe order, rounded to [`WEIGHT_DECIMALS`] places.
    #[must_use]
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Portfolio diagnostics computed from the rounded weights.
    #[must_use]
    pub fn diagnostics(&self) -> Diagnostics {
        self.diagnostics
    }

    /// Backend that produced the solution.
    #[must_use]
    pub fn solver(&self) -> SolverBackend {
        self.solver
    }

    /// Simplex pivots performed.
    #[must_use]
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Number of weights.
    #[must_use]
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    /// Always false for a solved portfolio.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }
}

/// Returns the LP backend for `backend`.
#[must_use]
pub fn lp_backend(backend: SolverBackend) -> Box<dyn LpSolver> {
    match backend {
        SolverBackend::Simplex => Box::new(SimplexSolver::new(PivotRule::Dantzig)),
        SolverBackend::Bland => Box::new(SimplexSolver::new(PivotRule::Bland)),
    }
}

/// Solves the allocation with default [`SolveOptions`].
///
/// # Errors
///
/// See [`solve_allocation_with`].
pub fn solve_allocation(
    universe: &Universe,
    config: &AllocationConfig,
) -> AllocationResult<Portfolio> {
    solve_allocation_with(universe, config, &SolveOptions::default())
}

/// Maximizes portfolio yield over `universe` subject to `config`.
///
/// # Errors
///
/// - [`AllocationError::DataValidation`] if `config` is invalid or an asset
///   label does not resolve against it
/// - [`AllocationError::Infeasible`] if no allocation satisfies every rule
/// - [`AllocationError::Unbounded`] if the objective has no finite maximum
/// - [`AllocationError::SolverFailure`] on an exhausted pivot budget, an
///   expired deadline or non-finite output
pub fn solve_allocation_with(
    universe: &Universe,
    config: &AllocationConfig,
    options: &SolveOptions,
) -> AllocationResult<Portfolio> {
    config.validate()?;
    universe.ensure_resolvable(config)?;

    let constraints = build_constraints(universe, config);
    let program = constraints.to_program();
    let backend = lp_backend(config.solver);

    tracing::debug!(
        assets = universe.len(),
        constraints = constraints.len(),
        backend = backend.name(),
        "Solving allocation"
    );

    let solution = match backend.solve(&program, &options.lp_config()) {
        Ok(solution) => solution,
        Err(err) => {
            tracing::debug!(error = %err, "Allocation solve failed");
            return Err(err.into());
        }
    };

    let weights = round_weights(&solution.values)?;
    let diagnostics = extract_diagnostics(&weights, universe);

    tracing::info!(
        backend = backend.name(),
        iterations = solution.iterations,
        portfolio_yield = diagnostics.yield_,
        duration = diagnostics.duration,
        rating_num = diagnostics.rating_num,
        "Allocation solved"
    );

    Ok(Portfolio {
        weights,
        diagnostics,
        solver: config.solver,
        iterations: solution.iterations,
    })
}

/// Rounds raw solver output to [`WEIGHT_DECIMALS`] places, half to even.
///
/// # Errors
///
/// Returns [`AllocationError::SolverFailure`] for non-finite or
/// unrepresentable values.
pub fn round_weights(values: &[f64]) -> AllocationResult<Vec<f64>> {
    values
        .iter()
        .enumerate()
        .map(|(i, &value)| {
            Decimal::from_f64(value)
                .map(|d| {
                    d.round_dp_with_strategy(WEIGHT_DECIMALS, RoundingStrategy::MidpointNearestEven)
                })
                .and_then(|d| d.to_f64())
                .filter(|w| w.is_finite())
                .ok_or_else(|| {
                    AllocationError::solver_failure(format!(
                        "weight {i} is not a finite number ({value})"
                    ))
                })
        })
        .collect()
}
