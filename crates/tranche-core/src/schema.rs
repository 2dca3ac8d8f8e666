//! Column contract for asset tables.
//!
//! Loaders normalize header names with [`normalize_column_name`] and resolve
//! them once with [`AssetColumns::resolve`]. A missing column is reported by
//! its normalized name before any row is read.

use crate::error::{CoreError, CoreResult};

/// Columns every asset table must provide (after normalization).
pub const REQUIRED_COLUMNS: [&str; 7] = [
    "sector",
    "yield",
    "duration",
    "quality_num",
    "liquidity_label",
    "asset_level_min_weight",
    "asset_level_max_weight",
];

/// Optional identifier column.
pub const ID_COLUMN: &str = "id";

/// Textual credit quality, accepted in place of `quality_num`.
pub const QUALITY_TEXT_COLUMN: &str = "quality";

/// Numeric liquidity tier, accepted in place of `liquidity_label`.
pub const LIQUIDITY_TIER_COLUMN: &str = "liquidity_tier";

/// Normalizes a header: trims, lowercases and replaces spaces with
/// underscores.
///
/// ```rust
/// use tranche_core::schema::normalize_column_name;
///
/// assert_eq!(normalize_column_name("  Asset Level Min Weight "), "asset_level_min_weight");
/// ```
#[must_use]
pub fn normalize_column_name(name: &str) -> String {
    name.trim().to_lowercase().replace(' ', "_")
}

/// Where the credit quality score comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QualitySource {
    /// A numeric `quality_num` column.
    Numeric(usize),
    /// A textual `quality` column mapped through a credit scale.
    Text(usize),
}

/// Where the liquidity label comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiquiditySource {
    /// A `liquidity_label` column used verbatim.
    Label(usize),
    /// A numeric `liquidity_tier` column mapped through a tier table.
    Tier(usize),
}

/// Resolved column positions for an asset table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetColumns {
    /// Identifier column, if present.
    pub id: Option<usize>,
    /// Sector column.
    pub sector: usize,
    /// Yield column.
    pub yield_: usize,
    /// Duration column.
    pub duration: usize,
    /// Credit quality source.
    pub quality: QualitySource,
    /// Liquidity source.
    pub liquidity: LiquiditySource,
    /// Minimum weight column.
    pub min_weight: usize,
    /// Maximum weight column.
    pub max_weight: usize,
}

impl AssetColumns {
    /// Resolves raw headers against the column contract.
    ///
    /// Headers are normalized before matching. When both a numeric and a
    /// textual source exist for the same field, the numeric one wins.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::MissingColumn`] naming the first absent column.
    pub fn resolve<I, S>(headers: I) -> CoreResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let normalized: Vec<String> = headers
            .into_iter()
            .map(|h| normalize_column_name(h.as_ref()))
            .collect();
        let find = |name: &str| normalized.iter().position(|h| h == name);
        let require = |name: &str| find(name).ok_or_else(|| CoreError::missing_column(name));

        let sector = require("sector")?;
        let yield_ = require("yield")?;
        let duration = require("duration")?;

        let quality = match (find("quality_num"), find(QUALITY_TEXT_COLUMN)) {
            (Some(idx), _) => QualitySource::Numeric(idx),
            (None, Some(idx)) => QualitySource::Text(idx),
            (None, None) => return Err(CoreError::missing_column("quality_num")),
        };

        let liquidity = match (find("liquidity_label"), find(LIQUIDITY_TIER_COLUMN)) {
            (Some(idx), _) => LiquiditySource::Label(idx),
            (None, Some(idx)) => LiquiditySource::Tier(idx),
            (None, None) => return Err(CoreError::missing_column("liquidity_label")),
        };

        Ok(Self {
            id: find(ID_COLUMN),
            sector,
            yield_,
            duration,
            quality,
            liquidity,
            min_weight: require("asset_level_min_weight")?,
            max_weight: require("asset_level_max_weight")?,
        })
    }
}
