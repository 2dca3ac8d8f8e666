//! Constraint configuration.
//!
//! An [`AllocationConfig`] is immutable per solve. Callers either use the
//! documented default or supply a full override; overrides are built with
//! the `with_*` methods, which return a new value.
//!
//! ## Defaults
//!
//! | Setting | Default |
//! |---------|---------|
//! | Sector bounds | TSY 10-100%, ABS 0-20%, MBS 0-40%, Corp 0-50%, High Yield 0-5% |
//! | Duration band | 2 to 8 years |
//! | Same-day liquidity floor | 20% |
//! | Rating ceiling | 5 (A+ or better on the standard scale) |
//! | Solver | simplex |

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::types::SAME_DAY;

/// Lower and upper cap on the total weight of a sector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SectorBounds {
    /// Minimum sector weight. Zero emits no constraint.
    pub lower: f64,
    /// Maximum sector weight.
    pub upper: f64,
}

impl SectorBounds {
    /// Creates sector bounds.
    #[must_use]
    pub fn new(lower: f64, upper: f64) -> Self {
        Self { lower, upper }
    }

    /// A cap with no floor.
    #[must_use]
    pub fn cap(upper: f64) -> Self {
        Self::new(0.0, upper)
    }
}

/// Band on the weighted-average portfolio duration, in years.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DurationBounds {
    /// Minimum portfolio duration.
    pub min_years: f64,
    /// Maximum portfolio duration.
    pub max_years: f64,
}

impl DurationBounds {
    /// Creates a duration band.
    #[must_use]
    pub fn new(min_years: f64, max_years: f64) -> Self {
        Self {
            min_years,
            max_years,
        }
    }
}

impl Default for DurationBounds {
    fn default() -> Self {
        Self::new(2.0, 8.0)
    }
}

/// Supported linear programming backends.
///
/// Parsing is case-insensitive; unknown names fail with
/// [`CoreError::UnsupportedSolver`] when the configuration is built, not
/// when a solve is attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum SolverBackend {
    /// Dense simplex with Dantzig pricing and a Bland fallback on stalls.
    #[default]
    Simplex,
    /// Dense simplex using Bland's rule throughout.
    Bland,
}

impl SolverBackend {
    /// All supported backends.
    pub const ALL: [SolverBackend; 2] = [SolverBackend::Simplex, SolverBackend::Bland];

    /// Canonical name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Simplex => "simplex",
            Self::Bland => "bland",
        }
    }
}

impl fmt::Display for SolverBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SolverBackend {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "simplex" | "dantzig" => Ok(Self::Simplex),
            "bland" => Ok(Self::Bland),
            _ => Err(CoreError::UnsupportedSolver {
                name: s.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for SolverBackend {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SolverBackend> for String {
    fn from(backend: SolverBackend) -> Self {
        backend.as_str().to_string()
    }
}

/// Business constraints applied to every solve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AllocationConfig {
    /// Weight bounds per sector, keyed by sector name.
    pub sector_bounds: BTreeMap<String, SectorBounds>,

    /// Portfolio duration band.
    pub duration_bounds: DurationBounds,

    /// Minimum weight in "Same Day" liquidity.
    pub min_same_day: f64,

    /// Ceiling on the weight-averaged rating number (lower is better).
    pub max_rating_num: f64,

    /// Liquidity labels an asset may carry.
    pub liquidity_labels: Vec<String>,

    /// LP backend.
    pub solver: SolverBackend,
}

impl Default for AllocationConfig {
    fn default() -> Self {
        let sector_bounds = [
            ("TSY", SectorBounds::new(0.10, 1.00)),
            ("ABS", SectorBounds::cap(0.20)),
            ("MBS", SectorBounds::cap(0.40)),
            ("Corp", SectorBounds::cap(0.50)),
            ("High Yield", SectorBounds::cap(0.05)),
        ]
        .into_iter()
        .map(|(name, bounds)| (name.to_string(), bounds))
        .collect();

        Self {
            sector_bounds,
            duration_bounds: DurationBounds::default(),
            min_same_day: 0.20,
            max_rating_num: 5.0,
            liquidity_labels: default_liquidity_labels(),
            solver: SolverBackend::default(),
        }
    }
}

/// Liquidity labels of the standard data key, fastest first.
#[must_use]
pub fn default_liquidity_labels() -> Vec<String> {
    [SAME_DAY, "Next Day", "2-5 Days", "6-30 Days", "30+ Days"]
        .into_iter()
        .map(String::from)
        .collect()
}

impl AllocationConfig {
    /// Creates the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the sector bounds.
    #[must_use]
    pub fn with_sector_bounds<I, S>(mut self, bounds: I) -> Self
    where
        I: IntoIterator<Item = (S, SectorBounds)>,
        S: Into<String>,
    {
        self.sector_bounds = bounds.into_iter().map(|(k, v)| (k.into(), v)).collect();
        self
    }

    /// Sets the bounds of one sector, adding it if absent.
    #[must_use]
    pub fn with_sector(mut self, sector: impl Into<String>, bounds: SectorBounds) -> Self {
        self.sector_bounds.insert(sector.into(), bounds);
        self
    }

    /// Sets the duration band.
    #[must_use]
    pub fn with_duration_bounds(mut self, bounds: DurationBounds) -> Self {
        self.duration_bounds = bounds;
        self
    }

    /// Sets the same-day liquidity floor.
    #[must_use]
    pub fn with_min_same_day(mut self, floor: f64) -> Self {
        self.min_same_day = floor;
        self
    }

    /// Sets the rating ceiling.
    #[must_use]
    pub fn with_max_rating_num(mut self, ceiling: f64) -> Self {
        self.max_rating_num = ceiling;
        self
    }

    /// Replaces the known liquidity labels.
    #[must_use]
    pub fn with_liquidity_labels<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.liquidity_labels = labels.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the solver backend.
    #[must_use]
    pub fn with_solver(mut self, solver: SolverBackend) -> Self {
        self.solver = solver;
        self
    }

    /// Returns true if `sector` has configured bounds.
    #[must_use]
    pub fn has_sector(&self, sector: &str) -> bool {
        self.sector_bounds.contains_key(sector)
    }

    /// Returns true if `label` is a known liquidity label.
    #[must_use]
    pub fn has_liquidity_label(&self, label: &str) -> bool {
        self.liquidity_labels.iter().any(|l| l == label)
    }

    /// Checks every bound is in range and consistently ordered.
    pub fn validate(&self) -> CoreResult<()> {
        for (sector, bounds) in &self.sector_bounds {
            let field = format!("sector_bounds.{sector}");
            check_unit_interval(&field, bounds.lower)?;
            check_unit_interval(&field, bounds.upper)?;
            if bounds.lower > bounds.upper {
                return Err(CoreError::invalid_config(
                    field,
                    format!("lower {} exceeds upper {}", bounds.lower, bounds.upper),
                ));
            }
        }

        let d = self.duration_bounds;
        if !d.min_years.is_finite() || !d.max_years.is_finite() || d.min_years < 0.0 {
            return Err(CoreError::invalid_config(
                "duration_bounds",
                "bounds must be finite and non-negative",
            ));
        }
        if d.min_years > d.max_years {
            return Err(CoreError::invalid_config(
                "duration_bounds",
                format!("min {} exceeds max {}", d.min_years, d.max_years),
            ));
        }

        check_unit_interval("min_same_day", self.min_same_day)?;

        if !self.max_rating_num.is_finite() {
            return Err(CoreError::invalid_config("max_rating_num", "must be finite"));
        }

        if !self.has_liquidity_label(SAME_DAY) {
            return Err(CoreError::invalid_config(
                "liquidity_labels",
                format!("must include '{SAME_DAY}'"),
            ));
        }

        Ok(())
    }
}

fn check_unit_interval(field: &str, value: f64) -> CoreResult<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(CoreError::invalid_config(
            field,
            format!("{value} is outside [0, 1]"),
        ))
    }
}
