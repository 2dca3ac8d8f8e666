//! Dense two-phase simplex.
//!
//! Variables are shifted to `y = x - lower` so every structural column is
//! non-negative; finite upper bounds become `y <= upper - lower` rows. Each
//! row is normalized to a non-negative right-hand side and receives a slack
//! (`<=`), a surplus plus artificial (`>=`), or an artificial (`==`).
//!
//! Phase one minimizes the sum of artificials. A positive optimum means the
//! program is infeasible, and the rows whose artificials remain basic are
//! reported. Phase two optimizes the real objective with artificial columns
//! barred from entering.
//!
//! The tableau keeps reduced costs in its last row and `-z` in the bottom
//! right cell, so the current objective value is the negated corner entry.

use nalgebra::DMatrix;

use super::{Comparator, LinearProgram, LpConfig, LpSolution, LpSolver, Sense};
use crate::error::{MathError, MathResult};

/// Consecutive degenerate pivots tolerated before Dantzig pricing falls back
/// to Bland's rule.
const DEGENERATE_STREAK_LIMIT: usize = 50;

/// Entering-variable selection rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PivotRule {
    /// Most negative reduced cost, switching to Bland's rule while stalled.
    #[default]
    Dantzig,
    /// Lowest-index improving column (never cycles, usually slower).
    Bland,
}

/// Dense two-phase simplex backend.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimplexSolver {
    rule: PivotRule,
}

impl SimplexSolver {
    /// Creates a solver with the given pivot rule.
    #[must_use]
    pub fn new(rule: PivotRule) -> Self {
        Self { rule }
    }

    /// Returns the pivot rule.
    #[must_use]
    pub fn rule(&self) -> PivotRule {
        self.rule
    }
}

impl LpSolver for SimplexSolver {
    fn solve(&self, program: &LinearProgram, config: &LpConfig) -> MathResult<LpSolution> {
        program.validate()?;

        let rows = standardize(program);
        let mut tableau = Tableau::build(program.num_variables(), &rows);
        let mut iterations = 0;

        if tableau.has_artificials() {
            let costs = tableau.phase_one_costs();
            tableau.set_objective(&costs);
            match tableau.run(self.rule, tableau.total_columns(), config, &mut iterations)? {
                Outcome::Optimal => {}
                Outcome::Unbounded(_) => {
                    return Err(MathError::numerical("phase one reported an unbounded ray"));
                }
            }

            let infeasibility = tableau.objective_value();
            if infeasibility > config.feasibility_tolerance {
                let implicated = tableau.violated_rows(config.feasibility_tolerance, &rows);
                log::debug!(
                    "simplex phase one ended with infeasibility {infeasibility:.3e} after {iterations} pivots"
                );
                return Err(MathError::infeasible(implicated));
            }
            tableau.drive_out_artificials(config.tolerance);
        }

        let costs = tableau.phase_two_costs(program);
        tableau.set_objective(&costs);
        match tableau.run(self.rule, tableau.first_artificial, config, &mut iterations)? {
            Outcome::Optimal => {}
            Outcome::Unbounded(column) => {
                return Err(MathError::unbounded(tableau.describe_column(column, program, &rows)));
            }
        }

        let values = tableau.solution(program);
        if values.iter().any(|v| !v.is_finite()) {
            return Err(MathError::numerical("solution contains non-finite values"));
        }
        log::debug!("simplex converged after {iterations} pivots");

        Ok(LpSolution {
            objective_value: program.objective_at(&values),
            values,
            iterations,
        })
    }

    fn name(&self) -> &'static str {
        match self.rule {
            PivotRule::Dantzig => "Simplex",
            PivotRule::Bland => "Simplex (Bland)",
        }
    }
}

/// A constraint row in shifted, sign-normalized form.
#[derive(Debug, Clone)]
struct StandardRow {
    label: String,
    coefficients: Vec<f64>,
    comparator: Comparator,
    rhs: f64,
}

/// Shifts variables to their lower bounds, turns finite upper bounds into
/// rows, and flips rows so every right-hand side is non-negative.
fn standardize(program: &LinearProgram) -> Vec<StandardRow> {
    let n = program.num_variables();
    let lower: Vec<f64> = program.bounds.iter().map(|b| b.lower).collect();

    let mut rows: Vec<StandardRow> = program
        .constraints
        .iter()
        .map(|c| StandardRow {
            label: c.label.clone(),
            coefficients: c.coefficients.clone(),
            comparator: c.comparator,
            rhs: c.rhs - c.lhs(&lower),
        })
        .collect();

    for (j, bounds) in program.bounds.iter().enumerate() {
        if bounds.upper.is_finite() {
            let mut coefficients = vec![0.0; n];
            coefficients[j] = 1.0;
            rows.push(StandardRow {
                label: format!("{} upper bound", program.variable_names[j]),
                coefficients,
                comparator: Comparator::LessEqual,
                rhs: bounds.upper - bounds.lower,
            });
        }
    }

    for row in &mut rows {
        if row.rhs < 0.0 {
            row.rhs = -row.rhs;
            row.coefficients.iter_mut().for_each(|a| *a = -*a);
            row.comparator = row.comparator.flipped();
        }
    }

    rows
}

enum Outcome {
    Optimal,
    Unbounded(usize),
}

struct Tableau {
    t: DMatrix<f64>,
    basis: Vec<usize>,
    /// Number of constraint rows; the objective row sits at this index.
    m: usize,
    /// Number of structural variables.
    n: usize,
    /// Slack/surplus column per row, if any.
    slack_of_row: Vec<Option<usize>>,
    first_artificial: usize,
    rhs: usize,
}

impl Tableau {
    fn build(n: usize, rows: &[StandardRow]) -> Self {
        let m = rows.len();
        let slacks = rows
            .iter()
            .filter(|r| r.comparator != Comparator::Equal)
            .count();
        let artificials = rows
            .iter()
            .filter(|r| r.comparator != Comparator::LessEqual)
            .count();
        let first_artificial = n + slacks;
        let rhs = first_artificial + artificials;

        let mut t = DMatrix::<f64>::zeros(m + 1, rhs + 1);
        let mut basis = vec![0; m];
        let mut slack_of_row = vec![None; m];
        let mut next_slack = n;
        let mut next_artificial = first_artificial;

        for (i, row) in rows.iter().enumerate() {
            for (j, a) in row.coefficients.iter().enumerate() {
                t[(i, j)] = *a;
            }
            t[(i, rhs)] = row.rhs;

            match row.comparator {
                Comparator::LessEqual => {
                    t[(i, next_slack)] = 1.0;
                    basis[i] = next_slack;
                    slack_of_row[i] = Some(next_slack);
                    next_slack += 1;
                }
                Comparator::GreaterEqual => {
                    t[(i, next_slack)] = -1.0;
                    slack_of_row[i] = Some(next_slack);
                    next_slack += 1;
                    t[(i, next_artificial)] = 1.0;
                    basis[i] = next_artificial;
                    next_artificial += 1;
                }
                Comparator::Equal => {
                    t[(i, next_artificial)] = 1.0;
                    basis[i] = next_artificial;
                    next_artificial += 1;
                }
            }
        }

        Self {
            t,
            basis,
            m,
            n,
            slack_of_row,
            first_artificial,
            rhs,
        }
    }

    fn total_columns(&self) -> usize {
        self.rhs
    }

    fn has_artificials(&self) -> bool {
        self.first_artificial < self.rhs
    }

    fn is_artificial(&self, column: usize) -> bool {
        column >= self.first_artificial && column < self.rhs
    }

    fn phase_one_costs(&self) -> Vec<f64> {
        (0..self.rhs)
            .map(|j| if self.is_artificial(j) { 1.0 } else { 0.0 })
            .collect()
    }

    fn phase_two_costs(&self, program: &LinearProgram) -> Vec<f64> {
        let sign = match program.sense {
            Sense::Maximize => -1.0,
            Sense::Minimize => 1.0,
        };
        let mut costs = vec![0.0; self.rhs];
        for (j, c) in program.objective.iter().enumerate() {
            costs[j] = sign * c;
        }
        costs
    }

    /// Installs `costs` in the objective row and prices out the basis.
    fn set_objective(&mut self, costs: &[f64]) {
        let m = self.m;
        for j in 0..self.rhs {
            self.t[(m, j)] = costs[j];
        }
        self.t[(m, self.rhs)] = 0.0;

        for i in 0..m {
            let cb = costs[self.basis[i]];
            if cb != 0.0 {
                for j in 0..=self.rhs {
                    let v = self.t[(i, j)];
                    self.t[(m, j)] -= cb * v;
                }
            }
        }
    }

    /// Current (minimization) objective value.
    fn objective_value(&self) -> f64 {
        -self.t[(self.m, self.rhs)]
    }

    fn entering(&self, rule: PivotRule, limit: usize, tolerance: f64) -> Option<usize> {
        let m = self.m;
        match rule {
            PivotRule::Bland => (0..limit).find(|&j| self.t[(m, j)] < -tolerance),
            PivotRule::Dantzig => {
                let mut best: Option<(usize, f64)> = None;
                for j in 0..limit {
                    let d = self.t[(m, j)];
                    if d < -tolerance && best.map_or(true, |(_, b)| d < b) {
                        best = Some((j, d));
                    }
                }
                best.map(|(j, _)| j)
            }
        }
    }

    /// Minimum ratio test; ties go to the lowest basic index.
    fn leaving(&self, column: usize, tolerance: f64) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for i in 0..self.m {
            let a = self.t[(i, column)];
            if a <= tolerance {
                continue;
            }
            let ratio = self.t[(i, self.rhs)] / a;
            best = match best {
                None => Some((i, ratio)),
                Some((r, b)) => {
                    let tie = (ratio - b).abs() <= tolerance;
                    if ratio < b - tolerance || (tie && self.basis[i] < self.basis[r]) {
                        Some((i, ratio))
                    } else {
                        Some((r, b))
                    }
                }
            };
        }
        best.map(|(i, _)| i)
    }

    fn pivot(&mut self, row: usize, column: usize, tolerance: f64) {
        let p = self.t[(row, column)];
        for j in 0..=self.rhs {
            self.t[(row, j)] /= p;
        }
        self.t[(row, column)] = 1.0;

        for i in 0..=self.m {
            if i == row {
                continue;
            }
            let factor = self.t[(i, column)];
            if factor == 0.0 {
                continue;
            }
            for j in 0..=self.rhs {
                let v = self.t[(row, j)];
                self.t[(i, j)] -= factor * v;
            }
            self.t[(i, column)] = 0.0;
            if i < self.m && self.t[(i, self.rhs)] < 0.0 && self.t[(i, self.rhs)] > -tolerance {
                self.t[(i, self.rhs)] = 0.0;
            }
        }

        self.basis[row] = column;
    }

    /// Pivots until no column below `limit` improves the objective.
    fn run(
        &mut self,
        rule: PivotRule,
        limit: usize,
        config: &LpConfig,
        iterations: &mut usize,
    ) -> MathResult<Outcome> {
        let mut degenerate_streak = 0;

        loop {
            if config.deadline.is_some_and(|d| d.is_expired()) {
                return Err(MathError::DeadlineExceeded {
                    iterations: *iterations,
                });
            }

            let active_rule = if degenerate_streak >= DEGENERATE_STREAK_LIMIT {
                PivotRule::Bland
            } else {
                rule
            };

            let Some(column) = self.entering(active_rule, limit, config.tolerance) else {
                return Ok(Outcome::Optimal);
            };
            let Some(row) = self.leaving(column, config.tolerance) else {
                return Ok(Outcome::Unbounded(column));
            };

            if *iterations >= config.max_iterations {
                log::warn!("simplex stopped at the pivot limit ({})", config.max_iterations);
                return Err(MathError::IterationLimit {
                    iterations: *iterations,
                });
            }

            if self.t[(row, self.rhs)] <= config.tolerance {
                degenerate_streak += 1;
            } else {
                degenerate_streak = 0;
            }

            self.pivot(row, column, config.tolerance);
            *iterations += 1;
        }
    }

    /// Labels of rows whose artificial variable is still basic and positive.
    fn violated_rows(&self, tolerance: f64, rows: &[StandardRow]) -> Vec<String> {
        let mut implicated: Vec<String> = (0..self.m)
            .filter(|&i| self.is_artificial(self.basis[i]) && self.t[(i, self.rhs)] > tolerance)
            .map(|i| rows[i].label.clone())
            .collect();
        implicated.dedup();
        implicated
    }

    /// Replaces zero-level artificials in the basis with real columns. Rows
    /// with no eligible column are redundant and keep their artificial at zero.
    fn drive_out_artificials(&mut self, tolerance: f64) {
        for i in 0..self.m {
            if !self.is_artificial(self.basis[i]) {
                continue;
            }
            let replacement = (0..self.first_artificial).find(|&j| self.t[(i, j)].abs() > tolerance);
            if let Some(j) = replacement {
                self.pivot(i, j, tolerance);
            }
        }
    }

    fn solution(&self, program: &LinearProgram) -> Vec<f64> {
        let mut y = vec![0.0; self.n];
        for i in 0..self.m {
            let column = self.basis[i];
            if column < self.n {
                y[column] = self.t[(i, self.rhs)].max(0.0);
            }
        }
        program
            .bounds
            .iter()
            .zip(y)
            .map(|(b, shift)| b.lower + shift)
            .collect()
    }

    fn describe_column(&self, column: usize, program: &LinearProgram, rows: &[StandardRow]) -> String {
        if column < self.n {
            return program.variable_names[column].clone();
        }
        self.slack_of_row
            .iter()
            .position(|s| *s == Some(column))
            .map_or_else(
                || format!("column {column}"),
                |i| format!("slack of '{}'", rows[i].label),
            )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lp::{Deadline, LinearConstraint, VariableBounds};
    use approx::assert_relative_eq;
    use std::time::Instant;

    fn textbook() -> LinearProgram {
        LinearProgram::maximize(vec![3.0, 5.0])
            .with_constraint(LinearConstraint::new(
                "plant 1",
                vec![1.0, 0.0],
                Comparator::LessEqual,
                4.0,
            ))
            .with_constraint(LinearConstraint::new(
                "plant 2",
                vec![0.0, 2.0],
                Comparator::LessEqual,
                12.0,
            ))
            .with_constraint(LinearConstraint::new(
                "plant 3",
                vec![3.0, 2.0],
                Comparator::LessEqual,
                18.0,
            ))
    }

    #[test]
    fn test_textbook_maximization() {
        let solution = SimplexSolver::default()
            .solve(&textbook(), &LpConfig::default())
            .unwrap();

        assert_relative_eq!(solution.values[0], 2.0, epsilon = 1e-9);
        assert_relative_eq!(solution.values[1], 6.0, epsilon = 1e-9);
        assert_relative_eq!(solution.objective_value, 36.0, epsilon = 1e-9);
        assert_eq!(solution.iterations, 2);
    }

    #[test]
    fn test_pivot_rules_agree() {
        let dantzig = SimplexSolver::new(PivotRule::Dantzig)
            .solve(&textbook(), &LpConfig::default())
            .unwrap();
        let bland = SimplexSolver::new(PivotRule::Bland)
            .solve(&textbook(), &LpConfig::default())
            .unwrap();

        assert_relative_eq!(dantzig.objective_value, bland.objective_value, epsilon = 1e-9);
        assert_relative_eq!(bland.values[0], 2.0, epsilon = 1e-9);
        assert_relative_eq!(bland.values[1], 6.0, epsilon = 1e-9);
    }

    #[test]
    fn test_minimization_with_equality_and_floor() {
        // minimize x + 2y  s.t.  x + y >= 2, x - y == 0
        let program = LinearProgram::minimize(vec![1.0, 2.0])
            .with_constraint(LinearConstraint::new(
                "floor",
                vec![1.0, 1.0],
                Comparator::GreaterEqual,
                2.0,
            ))
            .with_constraint(LinearConstraint::new(
                "balance",
                vec![1.0, -1.0],
                Comparator::Equal,
                0.0,
            ));

        let solution = SimplexSolver::default()
            .solve(&program, &LpConfig::default())
            .unwrap();

        assert_relative_eq!(solution.values[0], 1.0, epsilon = 1e-9);
        assert_relative_eq!(solution.values[1], 1.0, epsilon = 1e-9);
        assert_relative_eq!(solution.objective_value, 3.0, epsilon = 1e-9);
    }

    #[test]
    fn test_box_bounds_are_respected() {
        let program = LinearProgram::maximize(vec![1.0, 1.0])
            .with_bounds(vec![
                VariableBounds::new(0.2, 0.5),
                VariableBounds::new(0.1, 0.3),
            ])
            .with_constraint(LinearConstraint::new(
                "budget",
                vec![1.0, 1.0],
                Comparator::LessEqual,
                10.0,
            ));

        let solution = SimplexSolver::default()
            .solve(&program, &LpConfig::default())
            .unwrap();

        assert_relative_eq!(solution.values[0], 0.5, epsilon = 1e-12);
        assert_relative_eq!(solution.values[1], 0.3, epsilon = 1e-12);
    }

    #[test]
    fn test_fixed_variables() {
        // Two pinned variables leave exactly one value for the third.
        let program = LinearProgram::minimize(vec![1.0, 1.0, 5.0])
            .with_bounds(vec![
                VariableBounds::new(0.3, 0.3),
                VariableBounds::new(0.5, 0.5),
                VariableBounds::new(0.0, 1.0),
            ])
            .with_constraint(LinearConstraint::new(
                "budget",
                vec![1.0, 1.0, 1.0],
                Comparator::Equal,
                1.0,
            ));

        let solution = SimplexSolver::default()
            .solve(&program, &LpConfig::default())
            .unwrap();

        assert_relative_eq!(solution.values[0], 0.3, epsilon = 1e-12);
        assert_relative_eq!(solution.values[1], 0.5, epsilon = 1e-12);
        assert_relative_eq!(solution.values[2], 0.2, epsilon = 1e-12);
    }

    #[test]
    fn test_infeasible_reports_constraint() {
        let program = LinearProgram::maximize(vec![1.0, 1.0])
            .with_bounds(vec![VariableBounds::new(0.0, 1.0); 2])
            .with_constraint(LinearConstraint::new(
                "needs three",
                vec![1.0, 1.0],
                Comparator::GreaterEqual,
                3.0,
            ));

        let err = SimplexSolver::default()
            .solve(&program, &LpConfig::default())
            .unwrap_err();

        match err {
            MathError::Infeasible { implicated } => {
                assert_eq!(implicated, vec!["needs three".to_string()]);
            }
            other => panic!("expected infeasible, got {other:?}"),
        }
    }

    #[test]
    fn test_inverted_bounds_are_infeasible() {
        let program = LinearProgram::maximize(vec![1.0])
            .with_bounds(vec![VariableBounds::new(0.6, 0.4)])
            .with_variable_names(vec!["bond".into()]);

        let err = SimplexSolver::default()
            .solve(&program, &LpConfig::default())
            .unwrap_err();

        assert_eq!(err, MathError::infeasible(vec!["bond upper bound".into()]));
    }

    #[test]
    fn test_zero_row_with_positive_floor_is_infeasible() {
        let program = LinearProgram::maximize(vec![1.0])
            .with_bounds(vec![VariableBounds::new(0.0, 1.0)])
            .with_constraint(LinearConstraint::new(
                "empty bucket",
                vec![0.0],
                Comparator::GreaterEqual,
                0.1,
            ));

        let err = SimplexSolver::default()
            .solve(&program, &LpConfig::default())
            .unwrap_err();

        assert_eq!(err, MathError::infeasible(vec!["empty bucket".into()]));
    }

    #[test]
    fn test_unbounded() {
        let program = LinearProgram::maximize(vec![1.0, 0.0]).with_constraint(
            LinearConstraint::new("spread", vec![1.0, -1.0], Comparator::LessEqual, 1.0),
        );

        let err = SimplexSolver::default()
            .solve(&program, &LpConfig::default())
            .unwrap_err();

        assert!(matches!(err, MathError::Unbounded { .. }));
    }

    #[test]
    fn test_redundant_equalities() {
        let program = LinearProgram::maximize(vec![1.0, 2.0])
            .with_bounds(vec![VariableBounds::new(0.0, 1.0); 2])
            .with_constraint(LinearConstraint::new(
                "budget",
                vec![1.0, 1.0],
                Comparator::Equal,
                1.0,
            ))
            .with_constraint(LinearConstraint::new(
                "budget again",
                vec![2.0, 2.0],
                Comparator::Equal,
                2.0,
            ));

        let solution = SimplexSolver::default()
            .solve(&program, &LpConfig::default())
            .unwrap();

        assert_relative_eq!(solution.values[0], 0.0, epsilon = 1e-12);
        assert_relative_eq!(solution.values[1], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_iteration_limit() {
        let config = LpConfig::default().with_max_iterations(1);
        let err = SimplexSolver::default()
            .solve(&textbook(), &config)
            .unwrap_err();

        assert_eq!(err, MathError::IterationLimit { iterations: 1 });
    }

    #[test]
    fn test_expired_deadline() {
        let config = LpConfig::default().with_deadline(Deadline::at(Instant::now()));
        let err = SimplexSolver::default()
            .solve(&textbook(), &config)
            .unwrap_err();

        assert!(matches!(err, MathError::DeadlineExceeded { iterations: 0 }));
    }

    #[test]
    fn test_solver_names() {
        assert_eq!(SimplexSolver::default().name(), "Simplex");
        assert_eq!(SimplexSolver::new(PivotRule::Bland).name(), "Simplex (Bland)");
    }
}
