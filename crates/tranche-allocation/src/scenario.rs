//! Scenario sweeps over uniform yield shocks.
//!
//! Each shock derives a new universe with every yield moved by the same
//! number of basis points, then solves it independently. Shocks are
//! additive in decimal yield space and not duration or sector weighted.
//! A failing scenario is recorded and the sweep moves on.

use std::collections::HashSet;
use std::fmt;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use tranche_core::{AllocationConfig, Universe};

use crate::diagnostics::Diagnostics;
use crate::error::{AllocationResult, FailureKind};
use crate::parallel::maybe_parallel_map;
use crate::solver::{solve_allocation, Portfolio};

/// Shocks applied by [`run_scenarios`] callers that have no preference.
pub const DEFAULT_SHOCKS_BPS: [i32; 3] = [-100, 0, 100];

/// A uniform yield shock in basis points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct YieldShock {
    /// Shock size in basis points (positive raises yields).
    pub bps: i32,
}

impl YieldShock {
    /// Creates a shock of `bps` basis points.
    #[must_use]
    pub fn new(bps: i32) -> Self {
        Self { bps }
    }

    /// The shock as a decimal yield change (100bp = 0.01).
    #[must_use]
    pub fn decimal(&self) -> f64 {
        f64::from(self.bps) / 10_000.0
    }

    /// Sign-prefixed label, e.g. `+100bp`, `-100bp`, `+0bp`.
    #[must_use]
    pub fn label(&self) -> String {
        format!("{:+}bp", self.bps)
    }
}

impl fmt::Display for YieldShock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:+}bp", self.bps)
    }
}

/// Derives a universe with every yield raised by `bps` basis points.
#[must_use]
pub fn bump_yields(universe: &Universe, bps: i32) -> Universe {
    universe.with_yield_shift(YieldShock::new(bps).decimal())
}

/// Why a scenario produced no diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioFailure {
    /// Failure category.
    pub kind: FailureKind,
    /// Error message from the solve.
    pub message: String,
}

/// Result of one scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioOutcome {
    /// The scenario solved.
    Solved(Diagnostics),
    /// The scenario failed; other scenarios are unaffected.
    Failed(ScenarioFailure),
}

impl ScenarioOutcome {
    /// Returns true if the scenario solved.
    #[must_use]
    pub fn is_solved(&self) -> bool {
        matches!(self, Self::Solved(_))
    }

    /// Diagnostics of a solved scenario.
    #[must_use]
    pub fn diagnostics(&self) -> Option<&Diagnostics> {
        match self {
            Self::Solved(diagnostics) => Some(diagnostics),
            Self::Failed(_) => None,
        }
    }

    /// Failure of a failed scenario.
    #[must_use]
    pub fn failure(&self) -> Option<&ScenarioFailure> {
        match self {
            Self::Solved(_) => None,
            Self::Failed(failure) => Some(failure),
        }
    }
}

impl From<AllocationResult<Portfolio>> for ScenarioOutcome {
    fn from(result: AllocationResult<Portfolio>) -> Self {
        match result {
            Ok(portfolio) => Self::Solved(portfolio.diagnostics()),
            Err(err) => Self::Failed(ScenarioFailure {
                kind: err.kind(),
                message: err.to_string(),
            }),
        }
    }
}

/// One entry of a sweep.
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioRecord {
    /// The applied shock.
    pub shock: YieldShock,
    /// Its outcome.
    pub outcome: ScenarioOutcome,
}

impl ScenarioRecord {
    /// The scenario label.
    #[must_use]
    pub fn label(&self) -> String {
        self.shock.label()
    }
}

/// Outcomes keyed by scenario label, in the order the shocks were given.
///
/// Serializes as a map from label to outcome.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SweepResult {
    records: Vec<ScenarioRecord>,
}

impl SweepResult {
    /// Looks up a scenario by label.
    #[must_use]
    pub fn get(&self, label: &str) -> Option<&ScenarioOutcome> {
        self.records
            .iter()
            .find(|r| r.label() == label)
            .map(|r| &r.outcome)
    }

    /// Looks up a scenario by shock size.
    #[must_use]
    pub fn get_shock(&self, bps: i32) -> Option<&ScenarioOutcome> {
        self.records
            .iter()
            .find(|r| r.shock.bps == bps)
            .map(|r| &r.outcome)
    }

    /// Scenario labels in order.
    #[must_use]
    pub fn labels(&self) -> Vec<String> {
        self.records.iter().map(ScenarioRecord::label).collect()
    }

    /// Iterates over the records.
    pub fn iter(&self) -> impl Iterator<Item = &ScenarioRecord> {
        self.records.iter()
    }

    /// Number of scenarios.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if no scenarios ran.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of scenarios that solved.
    #[must_use]
    pub fn solved_count(&self) -> usize {
        self.records.iter().filter(|r| r.outcome.is_solved()).count()
    }

    /// Failed scenarios with their labels.
    pub fn failures(&self) -> impl Iterator<Item = (String, &ScenarioFailure)> {
        self.records
            .iter()
            .filter_map(|r| r.outcome.failure().map(|f| (r.label(), f)))
    }
}

impl Serialize for SweepResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.records.len()))?;
        for record in &self.records {
            map.serialize_entry(&record.label(), &record.outcome)?;
        }
        map.end()
    }
}

/// Controls for sweep execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepOptions {
    /// Allow parallel execution (requires the `parallel` feature).
    pub parallel: bool,
    /// Minimum number of scenarios before going parallel.
    pub parallel_threshold: usize,
}

impl Default for SweepOptions {
    fn default() -> Self {
        Self {
            parallel: true,
            parallel_threshold: 4,
        }
    }
}

impl SweepOptions {
    /// Options that never parallelize.
    #[must_use]
    pub fn sequential() -> Self {
        Self {
            parallel: false,
            ..Self::default()
        }
    }

    /// Sets the parallel threshold.
    #[must_use]
    pub fn with_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    /// Returns true if parallel processing should be used for the given count.
    #[must_use]
    pub fn should_parallelize(&self, count: usize) -> bool {
        cfg!(feature = "parallel") && self.parallel && count >= self.parallel_threshold
    }
}

/// Runs the sweep under the default constraint configuration.
#[must_use]
pub fn run_scenarios(universe: &Universe, shocks_bps: &[i32]) -> SweepResult {
    let config = AllocationConfig::default();
    run_scenarios_with(universe, shocks_bps, &SweepOptions::default(), |_, shocked| {
        solve_allocation(shocked, &config)
    })
}

/// Runs the sweep with a caller-supplied solve for each scenario.
///
/// `solve` receives the shock and the derived universe. Repeated shock
/// values run once, at their first position.
pub fn run_scenarios_with<F>(
    universe: &Universe,
    shocks_bps: &[i32],
    options: &SweepOptions,
    solve: F,
) -> SweepResult
where
    F: Fn(&YieldShock, &Universe) -> AllocationResult<Portfolio> + Sync + Send,
{
    let mut seen = HashSet::with_capacity(shocks_bps.len());
    let shocks: Vec<YieldShock> = shocks_bps
        .iter()
        .filter(|bps| seen.insert(**bps))
        .map(|&bps| YieldShock::new(bps))
        .collect();

    tracing::debug!(scenarios = shocks.len(), "Starting scenario sweep");

    let records = maybe_parallel_map(&shocks, options, |shock| {
        let shocked = bump_yields(universe, shock.bps);
        let outcome = ScenarioOutcome::from(solve(shock, &shocked));
        if let ScenarioOutcome::Failed(failure) = &outcome {
            tracing::warn!(
                scenario = %shock,
                kind = ?failure.kind,
                error = %failure.message,
                "Scenario failed"
            );
        }
        ScenarioRecord {
            shock: *shock,
            outcome,
        }
    });

    let result = SweepResult { records };
    tracing::info!(
        scenarios = result.len(),
        solved = result.solved_count(),
        "Scenario sweep complete"
    );
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AllocationError;
    use approx::assert_relative_eq;
    use tranche_core::Asset;

    fn universe() -> Universe {
        let assets = [
            ("T1", "TSY", 0.040, "Same Day"),
            ("C1", "Corp", 0.060, "Next Day"),
            ("M1", "MBS", 0.050, "Next Day"),
        ]
        .into_iter()
        .map(|(id, sector, y, liq)| {
            Asset::builder()
                .id(id)
                .sector(sector)
                .yield_(y)
                .duration(4.0)
                .quality_num(2.0)
                .liquidity_label(liq)
                .build()
                .unwrap()
        })
        .collect();
        Universe::new(assets, &AllocationConfig::default()).unwrap()
    }

    #[test]
    fn test_labels() {
        assert_eq!(YieldShock::new(100).label(), "+100bp");
        assert_eq!(YieldShock::new(-100).label(), "-100bp");
        assert_eq!(YieldShock::new(0).label(), "+0bp");
        assert_eq!(YieldShock::new(-25).to_string(), "-25bp");
    }

    #[test]
    fn test_bump_yields() {
        let u = universe();
        let bumped = bump_yields(&u, -100);
        assert_relative_eq!(bumped.yields()[0], 0.030, epsilon = 1e-12);
        assert_relative_eq!(bumped.yields()[1], 0.050, epsilon = 1e-12);
        assert_relative_eq!(u.yields()[0], 0.040, epsilon = 1e-12);
    }

    #[test]
    fn test_default_sweep() {
        let result = run_scenarios(&universe(), &DEFAULT_SHOCKS_BPS);
        assert_eq!(result.labels(), vec!["-100bp", "+0bp", "+100bp"]);
        assert_eq!(result.solved_count(), 3);

        let base = result.get("+0bp").and_then(ScenarioOutcome::diagnostics).unwrap();
        let up = result.get("+100bp").and_then(ScenarioOutcome::diagnostics).unwrap();
        let down = result.get_shock(-100).and_then(ScenarioOutcome::diagnostics).unwrap();
        assert_relative_eq!(up.yield_ - base.yield_, 0.01, epsilon = 1e-9);
        assert_relative_eq!(base.yield_ - down.yield_, 0.01, epsilon = 1e-9);
    }

    #[test]
    fn test_failure_is_isolated() {
        let result = run_scenarios_with(
            &universe(),
            &DEFAULT_SHOCKS_BPS,
            &SweepOptions::sequential(),
            |shock, shocked| {
                if shock.bps == 0 {
                    Err(AllocationError::Infeasible {
                        implicated: vec!["full allocation".into()],
                    })
                } else {
                    solve_allocation(shocked, &AllocationConfig::default())
                }
            },
        );

        assert_eq!(result.len(), 3);
        assert_eq!(result.solved_count(), 2);
        let failures: Vec<_> = result.failures().collect();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].0, "+0bp");
        assert_eq!(failures[0].1.kind, FailureKind::Infeasible);
    }

    #[test]
    fn test_duplicate_shocks_run_once() {
        let result = run_scenarios(&universe(), &[50, 50, -50]);
        assert_eq!(result.labels(), vec!["+50bp", "-50bp"]);
    }

    #[test]
    fn test_serializes_as_label_map() {
        let result = run_scenarios(&universe(), &[0]);
        let json = serde_json::to_value(&result).unwrap();
        assert!(json["+0bp"]["solved"]["yield"].is_number());
    }

    #[test]
    fn test_should_parallelize() {
        let options = SweepOptions::default().with_threshold(3);

        #[cfg(feature = "parallel")]
        {
            assert!(!options.should_parallelize(2));
            assert!(options.should_parallelize(3));
        }

        #[cfg(not(feature = "parallel"))]
        {
            assert!(!options.should_parallelize(2));
            assert!(!options.should_parallelize(3));
        }

        assert!(!SweepOptions::sequential().should_parallelize(100));
    }
}
