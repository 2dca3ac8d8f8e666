//! # Tranche Core
//!
//! Data model for the Tranche allocation engine.
//!
//! This crate provides the typed, validated inputs the engine consumes:
//!
//! - **Assets**: one row of the investable universe (sector, yield, duration,
//!   credit quality score, liquidity label, weight bounds)
//! - **Universe**: an ordered, read-only set of assets validated against a
//!   configuration
//! - **Configuration**: sector bounds, duration band, liquidity floor, rating
//!   ceiling and solver backend, with documented defaults
//! - **Schema**: the column contract loaders must satisfy
//!
//! ## Design Philosophy
//!
//! - **Validate at the boundary**: unmapped sectors or liquidity labels are
//!   data errors, never silently ignored
//! - **Immutable inputs**: configurations are substituted, never mutated
//! - **Explicit defaults**: [`AllocationConfig::default`] instead of globals
//!
//! ## Example
//!
//! ```rust
//! use tranche_core::prelude::*;
//!
//! let config = AllocationConfig::default();
//! let asset = Asset::builder()
//!     .id("UST-5Y")
//!     .sector("TSY")
//!     .yield_(0.041)
//!     .duration(4.6)
//!     .quality_num(1.0)
//!     .liquidity_label("Same Day")
//!     .build()
//!     .unwrap();
//!
//! let universe = Universe::new(vec![asset], &config).unwrap();
//! assert_eq!(universe.len(), 1);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::struct_field_names)]

pub mod config;
pub mod error;
pub mod schema;
pub mod types;

pub use config::{AllocationConfig, DurationBounds, SectorBounds, SolverBackend};
pub use error::{CoreError, CoreResult};
pub use types::{Asset, AssetBuilder, Universe, SAME_DAY};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::config::{AllocationConfig, DurationBounds, SectorBounds, SolverBackend};
    pub use crate::error::{CoreError, CoreResult};
    pub use crate::schema::{normalize_column_name, AssetColumns, LiquiditySource, QualitySource};
    pub use crate::types::{Asset, AssetBuilder, Universe, SAME_DAY};
}
