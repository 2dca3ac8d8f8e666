//! Core types: assets and the asset universe.

mod asset;
mod universe;

pub use asset::{Asset, AssetBuilder};
pub use universe::Universe;

/// Liquidity label of the bucket subject to the liquidity floor.
pub const SAME_DAY: &str = "Same Day";
