//! # Tranche Allocation
//!
//! Constrained yield-maximizing allocation for fixed income universes.
//!
//! The engine turns a validated [`Universe`](tranche_core::Universe) and an
//! [`AllocationConfig`](tranche_core::AllocationConfig) into a linear
//! program, solves it, and reports portfolio diagnostics.
//!
//! ## Design Philosophy
//!
//! - **Pure functions**: every solve takes its inputs explicitly and shares
//!   no state with other solves
//! - **Typed outcomes**: infeasible, unbounded and failed solves are distinct
//!   errors, never a zero-filled weight vector
//! - **Config-driven parallelism**: optional rayon support for sweeps
//!
//! ## Pipeline
//!
//! ```text
//! Universe ─► build_constraints ─► solve_allocation ─► extract_diagnostics
//!                     ▲                                         │
//!                     └──────── run_scenarios (per shock) ◄─────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use tranche_allocation::prelude::*;
//! use tranche_core::prelude::*;
//!
//! let config = AllocationConfig::default();
//! let assets = vec![
//!     Asset::builder()
//!         .id("UST-3Y").sector("TSY").yield_(0.041).duration(2.8)
//!         .quality_num(1.0).liquidity_label("Same Day").build().unwrap(),
//!     Asset::builder()
//!         .id("CORP-7Y").sector("Corp").yield_(0.058).duration(6.2)
//!         .quality_num(4.0).liquidity_label("Next Day").build().unwrap(),
//! ];
//! let universe = Universe::new(assets, &config).unwrap();
//!
//! let portfolio = solve_allocation(&universe, &config).unwrap();
//! let total: f64 = portfolio.weights().iter().sum();
//! assert!((total - 1.0).abs() < 1e-8);
//!
//! let sweep = run_scenarios(&universe, &DEFAULT_SHOCKS_BPS);
//! assert_eq!(sweep.solved_count(), 3);
//! ```
//!
//! ## Feature Flags
//!
//! - `parallel`: Run scenario sweeps on rayon above the configured threshold

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::cast_precision_loss)]

pub mod builder;
pub mod diagnostics;
pub mod error;
pub mod parallel;
pub mod scenario;
pub mod solver;

pub use error::{AllocationError, AllocationResult, FailureKind};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::builder::{build_constraints, BusinessConstraint, ConstraintGroup, ConstraintSet};
    pub use crate::diagnostics::{extract_diagnostics, same_day_weight, sector_weights, Diagnostics};
    pub use crate::error::{AllocationError, AllocationResult, FailureKind};
    pub use crate::scenario::{
        bump_yields, run_scenarios, run_scenarios_with, ScenarioFailure, ScenarioOutcome,
        ScenarioRecord, SweepOptions, SweepResult, YieldShock, DEFAULT_SHOCKS_BPS,
    };
    pub use crate::solver::{
        lp_backend, round_weights, solve_allocation, solve_allocation_with, Portfolio,
        SolveOptions, WEIGHT_DECIMALS,
    };
    pub use tranche_math::lp::Deadline;
}
