//! # Tranche Ext File
//!
//! File-based input and output for the Tranche allocation engine.
//!
//! - CSV asset universes, with either numeric or textual credit quality and
//!   either liquidity labels or numeric tiers
//! - CSV data keys translating credit text and liquidity tiers
//! - CSV export of optimal weights alongside the asset inputs
//!
//! Loading stops at the first bad row; nothing is silently skipped.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod assets;
mod data_key;
pub mod error;
mod weights;

pub use assets::{load_assets, read_assets};
pub use data_key::{DataKey, DEFAULT_CREDIT_SCALE};
pub use error::{FileError, FileResult};
pub use weights::{write_weights, write_weights_to};
