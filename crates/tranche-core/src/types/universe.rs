//! The asset universe.

use std::collections::HashSet;

use serde::Serialize;

use super::{Asset, SAME_DAY};
use crate::config::AllocationConfig;
use crate::error::{CoreError, CoreResult};

/// An ordered, validated set of assets.
///
/// The order is significant: weight vectors produced by the engine follow
/// it. A universe is read-only; [`Universe::with_yield_shift`] derives a new
/// one instead of mutating.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Universe {
    assets: Vec<Asset>,
}

impl Universe {
    /// Validates `assets` against `config` and builds a universe.
    ///
    /// # Errors
    ///
    /// Returns an error if the list is empty, an ID repeats, an asset breaks
    /// its invariants, or a sector or liquidity label is not configured.
    pub fn new(assets: Vec<Asset>, config: &AllocationConfig) -> CoreResult<Self> {
        if assets.is_empty() {
            return Err(CoreError::EmptyUniverse);
        }

        let mut seen = HashSet::with_capacity(assets.len());
        for asset in &assets {
            asset.validate()?;
            if !seen.insert(asset.id.as_str()) {
                return Err(CoreError::DuplicateAsset {
                    id: asset.id.clone(),
                });
            }
        }

        let universe = Self { assets };
        universe.ensure_resolvable(config)?;
        Ok(universe)
    }

    /// Checks every sector and liquidity label resolves against `config`.
    pub fn ensure_resolvable(&self, config: &AllocationConfig) -> CoreResult<()> {
        for asset in &self.assets {
            if !config.has_sector(&asset.sector) {
                return Err(CoreError::unmapped("sector", &asset.sector, &asset.id));
            }
            if !config.has_liquidity_label(&asset.liquidity_label) {
                return Err(CoreError::unmapped(
                    "liquidity label",
                    &asset.liquidity_label,
                    &asset.id,
                ));
            }
        }
        Ok(())
    }

    /// The assets, in universe order.
    #[must_use]
    pub fn assets(&self) -> &[Asset] {
        &self.assets
    }

    /// Number of assets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.assets.len()
    }

    /// Always false for a validated universe.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    /// Iterates over the assets.
    pub fn iter(&self) -> impl Iterator<Item = &Asset> {
        self.assets.iter()
    }

    /// Asset IDs.
    #[must_use]
    pub fn ids(&self) -> Vec<String> {
        self.assets.iter().map(|a| a.id.clone()).collect()
    }

    /// Yield column.
    #[must_use]
    pub fn yields(&self) -> Vec<f64> {
        self.column(|a| a.yield_)
    }

    /// Duration column.
    #[must_use]
    pub fn durations(&self) -> Vec<f64> {
        self.column(|a| a.duration)
    }

    /// Quality score column.
    #[must_use]
    pub fn qualities(&self) -> Vec<f64> {
        self.column(|a| a.quality_num)
    }

    /// Minimum weight column.
    #[must_use]
    pub fn min_weights(&self) -> Vec<f64> {
        self.column(|a| a.min_weight)
    }

    /// Maximum weight column.
    #[must_use]
    pub fn max_weights(&self) -> Vec<f64> {
        self.column(|a| a.max_weight)
    }

    /// Membership mask for an exact sector name.
    #[must_use]
    pub fn sector_mask(&self, sector: &str) -> Vec<bool> {
        self.assets.iter().map(|a| a.sector == sector).collect()
    }

    /// Membership mask for an exact liquidity label.
    #[must_use]
    pub fn liquidity_mask(&self, label: &str) -> Vec<bool> {
        self.assets.iter().map(|a| a.liquidity_label == label).collect()
    }

    /// Membership mask for the "Same Day" bucket.
    #[must_use]
    pub fn same_day_mask(&self) -> Vec<bool> {
        self.liquidity_mask(SAME_DAY)
    }

    /// Derives a universe with every yield shifted by `delta` (decimal).
    ///
    /// The result is not re-validated: a negative shock may push yields
    /// below zero, which is a legitimate scenario input.
    #[must_use]
    pub fn with_yield_shift(&self, delta: f64) -> Self {
        let assets = self
            .assets
            .iter()
            .map(|a| Asset {
                yield_: a.yield_ + delta,
                ..a.clone()
            })
            .collect();
        Self { assets }
    }

    fn column(&self, f: impl Fn(&Asset) -> f64) -> Vec<f64> {
        self.assets.iter().map(f).collect()
    }
}

impl<'a> IntoIterator for &'a Universe {
    type Item = &'a Asset;
    type IntoIter = std::slice::Iter<'a, Asset>;

    fn into_iter(self) -> Self::IntoIter {
        self.assets.iter()
    }
}
