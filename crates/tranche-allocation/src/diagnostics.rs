//! Portfolio diagnostics.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tranche_core::Universe;

/// Weighted portfolio summaries.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Diagnostics {
    /// Portfolio yield, `yield · w`.
    #[serde(rename = "yield")]
    pub yield_: f64,
    /// Portfolio duration in years, `duration · w`.
    pub duration: f64,
    /// Weighted average rating number, `quality · w`.
    pub rating_num: f64,
}

/// Computes yield, duration and average rating for `weights`.
///
/// # Panics
///
/// Panics if `weights` and `universe` differ in length.
#[must_use]
pub fn extract_diagnostics(weights: &[f64], universe: &Universe) -> Diagnostics {
    check_len(weights, universe);

    universe.iter().zip(weights).fold(
        Diagnostics {
            yield_: 0.0,
            duration: 0.0,
            rating_num: 0.0,
        },
        |acc, (asset, &w)| Diagnostics {
            yield_: acc.yield_ + asset.yield_ * w,
            duration: acc.duration + asset.duration * w,
            rating_num: acc.rating_num + asset.quality_num * w,
        },
    )
}

/// Total weight per sector present in the universe.
#[must_use]
pub fn sector_weights(weights: &[f64], universe: &Universe) -> BTreeMap<String, f64> {
    check_len(weights, universe);

    let mut totals = BTreeMap::new();
    for (asset, &w) in universe.iter().zip(weights) {
        *totals.entry(asset.sector.clone()).or_insert(0.0) += w;
    }
    totals
}

/// Total weight in "Same Day" liquidity.
#[must_use]
pub fn same_day_weight(weights: &[f64], universe: &Universe) -> f64 {
    check_len(weights, universe);

    universe
        .iter()
        .zip(weights)
        .filter(|(asset, _)| asset.is_same_day())
        .map(|(_, w)| w)
        .sum()
}

fn check_len(weights: &[f64], universe: &Universe) {
    assert_eq!(
        weights.len(),
        universe.len(),
        "weight vector has {} entries for a universe of {} assets",
        weights.len(),
        universe.len()
    );
}
