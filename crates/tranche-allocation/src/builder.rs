//! Constraint building.
//!
//! Translates an asset universe and an [`AllocationConfig`] into a
//! [`ConstraintSet`]: per-asset weight bounds, yield objective coefficients
//! and labelled linear constraints, one per business rule.
//!
//! The builder does not check joint feasibility. A configured sector with no
//! assets produces an all-zero row; combined with a positive floor it is
//! infeasible and the solver reports it.

use std::fmt;

use serde::{Deserialize, Serialize};
use tranche_core::{AllocationConfig, Universe};
use tranche_math::lp::{Comparator, LinearConstraint, LinearProgram, VariableBounds};

/// The business rule a constraint row encodes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstraintGroup {
    /// Weights sum to one.
    FullAllocation,
    /// Portfolio duration at or above the minimum.
    DurationFloor,
    /// Portfolio duration at or below the maximum.
    DurationCap,
    /// Weighted rating number at or below the ceiling.
    RatingCeiling,
    /// Same-day liquidity at or above the floor.
    LiquidityFloor,
    /// Sector weight at or below its upper cap.
    SectorCap(String),
    /// Sector weight at or above its (positive) lower cap.
    SectorFloor(String),
}

impl fmt::Display for ConstraintGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FullAllocation => write!(f, "full allocation"),
            Self::DurationFloor => write!(f, "duration floor"),
            Self::DurationCap => write!(f, "duration cap"),
            Self::RatingCeiling => write!(f, "rating ceiling"),
            Self::LiquidityFloor => write!(f, "same-day liquidity floor"),
            Self::SectorCap(sector) => write!(f, "sector cap ({sector})"),
            Self::SectorFloor(sector) => write!(f, "sector floor ({sector})"),
        }
    }
}

/// One linear constraint `coefficients · w (comparator) rhs`.
#[derive(Debug, Clone, PartialEq)]
pub struct BusinessConstraint {
    /// The rule this row encodes.
    pub group: ConstraintGroup,
    /// One coefficient per asset, in universe order.
    pub coefficients: Vec<f64>,
    /// Comparison direction.
    pub comparator: Comparator,
    /// Right-hand side.
    pub rhs: f64,
}

impl BusinessConstraint {
    fn new(group: ConstraintGroup, coefficients: Vec<f64>, comparator: Comparator, rhs: f64) -> Self {
        Self {
            group,
            coefficients,
            comparator,
            rhs,
        }
    }

    /// Left-hand side at `weights`.
    #[must_use]
    pub fn lhs(&self, weights: &[f64]) -> f64 {
        self.coefficients
            .iter()
            .zip(weights)
            .map(|(a, w)| a * w)
            .sum()
    }

    /// Returns true if `weights` satisfy the row within `tolerance`.
    #[must_use]
    pub fn is_satisfied(&self, weights: &[f64], tolerance: f64) -> bool {
        self.comparator.holds(self.lhs(weights), self.rhs, tolerance)
    }
}

/// Normalized LP inputs for one universe and configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstraintSet {
    /// Asset IDs, in universe order.
    pub variable_names: Vec<String>,
    /// Objective coefficients (asset yields).
    pub objective: Vec<f64>,
    /// Per-asset `[min_weight, max_weight]`.
    pub bounds: Vec<VariableBounds>,
    /// Business constraints in emission order.
    pub constraints: Vec<BusinessConstraint>,
}

impl ConstraintSet {
    /// Number of decision variables.
    #[must_use]
    pub fn num_variables(&self) -> usize {
        self.objective.len()
    }

    /// Number of business constraints.
    #[must_use]
    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    /// Returns true if no business constraints were emitted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }

    /// Finds the constraint for `group`.
    #[must_use]
    pub fn get(&self, group: &ConstraintGroup) -> Option<&BusinessConstraint> {
        self.constraints.iter().find(|c| &c.group == group)
    }

    /// Groups of the constraints violated by `weights`.
    #[must_use]
    pub fn violations(&self, weights: &[f64], tolerance: f64) -> Vec<ConstraintGroup> {
        self.constraints
            .iter()
            .filter(|c| !c.is_satisfied(weights, tolerance))
            .map(|c| c.group.clone())
            .collect()
    }

    /// Lowers the set to a maximization program.
    ///
    /// Constraint labels are the group display names and variable names are
    /// the asset IDs, so solver diagnostics read in business terms.
    #[must_use]
    pub fn to_program(&self) -> LinearProgram {
        LinearProgram::maximize(self.objective.clone())
            .with_bounds(self.bounds.clone())
            .with_variable_names(self.variable_names.clone())
            .with_constraints(self.constraints.iter().map(|c| {
                LinearConstraint::new(
                    c.group.to_string(),
                    c.coefficients.clone(),
                    c.comparator,
                    c.rhs,
                )
            }))
    }
}

/// Builds the constraint set for `universe` under `config`.
///
/// Sector floors are emitted only for a strictly positive lower cap.
#[must_use]
pub fn build_constraints(universe: &Universe, config: &AllocationConfig) -> ConstraintSet {
    let n = universe.len();
    let mut constraints = Vec::with_capacity(5 + 2 * config.sector_bounds.len());

    constraints.push(BusinessConstraint::new(
        ConstraintGroup::FullAllocation,
        vec![1.0; n],
        Comparator::Equal,
        1.0,
    ));

    let durations = universe.durations();
    constraints.push(BusinessConstraint::new(
        ConstraintGroup::DurationFloor,
        durations.clone(),
        Comparator::GreaterEqual,
        config.duration_bounds.min_years,
    ));
    constraints.push(BusinessConstraint::new(
        ConstraintGroup::DurationCap,
        durations,
        Comparator::LessEqual,
        config.duration_bounds.max_years,
    ));

    constraints.push(BusinessConstraint::new(
        ConstraintGroup::RatingCeiling,
        universe.qualities(),
        Comparator::LessEqual,
        config.max_rating_num,
    ));

    constraints.push(BusinessConstraint::new(
        ConstraintGroup::LiquidityFloor,
        indicator(&universe.same_day_mask()),
        Comparator::GreaterEqual,
        config.min_same_day,
    ));

    for (sector, bounds) in &config.sector_bounds {
        let members = indicator(&universe.sector_mask(sector));
        if bounds.lower > 0.0 {
            constraints.push(BusinessConstraint::new(
                ConstraintGroup::SectorFloor(sector.clone()),
                members.clone(),
                Comparator::GreaterEqual,
                bounds.lower,
            ));
        }
        constraints.push(BusinessConstraint::new(
            ConstraintGroup::SectorCap(sector.clone()),
            members,
            Comparator::LessEqual,
            bounds.upper,
        ));
    }

    ConstraintSet {
        variable_names: universe.ids(),
        objective: universe.yields(),
        bounds: universe
            .iter()
            .map(|a| VariableBounds::new(a.min_weight, a.max_weight))
            .collect(),
        constraints,
    }
}

fn indicator(mask: &[bool]) -> Vec<f64> {
    mask.iter().map(|&m| if m { 1.0 } else { 0.0 }).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tranche_core::{Asset, SectorBounds};

    fn asset(id: &str, sector: &str, liquidity: &str) -> Asset {
        Asset::builder()
            .id(id)
            .sector(sector)
            .yield_(0.05)
            .duration(4.0)
            .quality_num(2.0)
            .liquidity_label(liquidity)
            .weight_bounds(0.0, 0.6)
            .build()
            .unwrap()
    }

    fn universe() -> Universe {
        Universe::new(
            vec![
                asset("T1", "TSY", "Same Day"),
                asset("C1", "Corp", "Next Day"),
                asset("T2", "TSY", "Next Day"),
            ],
            &AllocationConfig::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_default_rows() {
        let set = build_constraints(&universe(), &AllocationConfig::default());

        // 5 core rows + 5 sector caps + 1 TSY floor.
        assert_eq!(set.len(), 11);
        assert_eq!(set.num_variables(), 3);
        assert_eq!(set.variable_names, vec!["T1", "C1", "T2"]);
        assert_eq!(set.bounds[1], VariableBounds::new(0.0, 0.6));

        let full = set.get(&ConstraintGroup::FullAllocation).unwrap();
        assert_eq!(full.coefficients, vec![1.0; 3]);
        assert_eq!(full.comparator, Comparator::Equal);

        let liquidity = set.get(&ConstraintGroup::LiquidityFloor).unwrap();
        assert_eq!(liquidity.coefficients, vec![1.0, 0.0, 0.0]);
        assert!((liquidity.rhs - 0.20).abs() < f64::EPSILON);

        let floor = set.get(&ConstraintGroup::SectorFloor("TSY".into())).unwrap();
        assert_eq!(floor.coefficients, vec![1.0, 0.0, 1.0]);
        assert_eq!(floor.comparator, Comparator::GreaterEqual);
    }

    #[test]
    fn test_zero_floor_emits_no_row() {
        let set = build_constraints(&universe(), &AllocationConfig::default());
        for sector in ["ABS", "MBS", "Corp", "High Yield"] {
            assert!(set.get(&ConstraintGroup::SectorFloor(sector.into())).is_none());
            assert!(set.get(&ConstraintGroup::SectorCap(sector.into())).is_some());
        }
    }

    #[test]
    fn test_empty_sector_row_is_all_zero() {
        let config = AllocationConfig::default().with_sector("ABS", SectorBounds::new(0.05, 0.2));
        let set = build_constraints(&universe(), &config);
        let floor = set.get(&ConstraintGroup::SectorFloor("ABS".into())).unwrap();
        assert!(floor.coefficients.iter().all(|&a| a == 0.0));
        assert!(!floor.is_satisfied(&[0.4, 0.3, 0.3], 1e-9));
    }

    #[test]
    fn test_violations() {
        let set = build_constraints(&universe(), &AllocationConfig::default());
        // Sums to 0.9 and holds no same-day weight.
        let violated = set.violations(&[0.0, 0.5, 0.4], 1e-9);
        assert!(violated.contains(&ConstraintGroup::FullAllocation));
        assert!(violated.contains(&ConstraintGroup::LiquidityFloor));
        assert!(!violated.contains(&ConstraintGroup::RatingCeiling));
    }

    #[test]
    fn test_to_program_labels() {
        let set = build_constraints(&universe(), &AllocationConfig::default());
        let program = set.to_program();
        assert_eq!(program.num_variables(), 3);
        assert_eq!(program.constraints.len(), set.len());
        assert!(program
            .constraints
            .iter()
            .any(|c| c.label == "sector cap (High Yield)"));
        assert_eq!(program.variable_names, set.variable_names);
        program.validate().unwrap();
    }

    #[test]
    fn test_group_display() {
        assert_eq!(ConstraintGroup::LiquidityFloor.to_string(), "same-day liquidity floor");
        assert_eq!(
            ConstraintGroup::SectorFloor("TSY".into()).to_string(),
            "sector floor (TSY)"
        );
    }
}
