//! # Tranche Math
//!
//! Numerical building blocks for the Tranche allocation engine.
//!
//! This crate provides:
//!
//! - **Linear Programs**: [`lp::LinearProgram`] with labelled constraints and
//!   per-variable box bounds
//! - **Simplex Backend**: a dense two-phase simplex with selectable pivot rules
//! - **Deadlines**: cooperative time limits checked between pivots
//!
//! ## Design Philosophy
//!
//! - **Stateless solvers**: every solve builds its own tableau, so a solver can
//!   be shared freely across threads and calls
//! - **Deterministic**: identical programs produce identical solutions
//! - **Diagnosable**: infeasibility reports the constraint labels that could
//!   not be satisfied

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::similar_names)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::needless_range_loop)]
#![allow(clippy::float_cmp)]

pub mod error;
pub mod lp;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::error::{MathError, MathResult};
    pub use crate::lp::{
        Comparator, Deadline, LinearConstraint, LinearProgram, LpConfig, LpSolution, LpSolver,
        PivotRule, Sense, SimplexSolver, VariableBounds,
    };
}

pub use error::{MathError, MathResult};
