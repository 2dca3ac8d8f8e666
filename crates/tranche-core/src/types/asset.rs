//! A single investable asset.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// One row of the asset universe.
///
/// Yields are decimals (0.045 = 4.5%), durations are in years and
/// `quality_num` encodes credit quality with lower values meaning better
/// credit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    /// Identifier, unique within a universe.
    pub id: String,

    /// Sector name; must be a configured sector key.
    pub sector: String,

    /// Expected yield as a decimal.
    #[serde(rename = "yield")]
    pub yield_: f64,

    /// Duration in years.
    pub duration: f64,

    /// Numeric credit quality (lower is better).
    pub quality_num: f64,

    /// Liquidity bucket, e.g. "Same Day".
    pub liquidity_label: String,

    /// Minimum portfolio weight.
    pub min_weight: f64,

    /// Maximum portfolio weight.
    pub max_weight: f64,
}

impl Asset {
    /// Creates a new asset builder.
    #[must_use]
    pub fn builder() -> AssetBuilder {
        AssetBuilder::new()
    }

    /// Checks the per-asset invariants: finite non-negative yield and
    /// duration, finite quality, and `0 <= min_weight <= max_weight <= 1`.
    pub fn validate(&self) -> CoreResult<()> {
        let invalid = |reason: String| Err(CoreError::invalid_asset(&self.id, reason));

        if self.id.trim().is_empty() {
            return invalid("id is empty".into());
        }
        if !self.yield_.is_finite() || self.yield_ < 0.0 {
            return invalid(format!("yield {} must be finite and >= 0", self.yield_));
        }
        if !self.duration.is_finite() || self.duration < 0.0 {
            return invalid(format!("duration {} must be finite and >= 0", self.duration));
        }
        if !self.quality_num.is_finite() {
            return invalid(format!("quality_num {} must be finite", self.quality_num));
        }
        if !(0.0..=1.0).contains(&self.min_weight) || !(0.0..=1.0).contains(&self.max_weight) {
            return invalid(format!(
                "weight bounds [{}, {}] must lie in [0, 1]",
                self.min_weight, self.max_weight
            ));
        }
        if self.min_weight > self.max_weight {
            return invalid(format!(
                "min_weight {} exceeds max_weight {}",
                self.min_weight, self.max_weight
            ));
        }
        Ok(())
    }

    /// Returns true if the asset is in the "Same Day" liquidity bucket.
    #[must_use]
    pub fn is_same_day(&self) -> bool {
        self.liquidity_label == super::SAME_DAY
    }
}

/// Builder for [`Asset`].
///
/// Weight bounds default to `[0, 1]`; every other field is required.
#[derive(Debug, Clone, Default)]
pub struct AssetBuilder {
    id: Option<String>,
    sector: Option<String>,
    yield_: Option<f64>,
    duration: Option<f64>,
    quality_num: Option<f64>,
    liquidity_label: Option<String>,
    min_weight: Option<f64>,
    max_weight: Option<f64>,
}

impl AssetBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the identifier.
    #[must_use]
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Sets the sector.
    #[must_use]
    pub fn sector(mut self, sector: impl Into<String>) -> Self {
        self.sector = Some(sector.into());
        self
    }

    /// Sets the yield (decimal).
    #[must_use]
    pub fn yield_(mut self, value: f64) -> Self {
        self.yield_ = Some(value);
        self
    }

    /// Sets the duration in years.
    #[must_use]
    pub fn duration(mut self, years: f64) -> Self {
        self.duration = Some(years);
        self
    }

    /// Sets the numeric credit quality.
    #[must_use]
    pub fn quality_num(mut self, value: f64) -> Self {
        self.quality_num = Some(value);
        self
    }

    /// Sets the liquidity label.
    #[must_use]
    pub fn liquidity_label(mut self, label: impl Into<String>) -> Self {
        self.liquidity_label = Some(label.into());
        self
    }

    /// Sets both weight bounds.
    #[must_use]
    pub fn weight_bounds(mut self, min_weight: f64, max_weight: f64) -> Self {
        self.min_weight = Some(min_weight);
        self.max_weight = Some(max_weight);
        self
    }

    /// Builds and validates the asset.
    ///
    /// # Errors
    ///
    /// Returns an error if a required field is missing or an invariant fails.
    pub fn build(self) -> CoreResult<Asset> {
        let id = self.id.unwrap_or_default();
        let missing = |field: &str| CoreError::invalid_asset(&id, format!("missing {field}"));

        let asset = Asset {
            sector: self.sector.ok_or_else(|| missing("sector"))?,
            yield_: self.yield_.ok_or_else(|| missing("yield"))?,
            duration: self.duration.ok_or_else(|| missing("duration"))?,
            quality_num: self.quality_num.ok_or_else(|| missing("quality_num"))?,
            liquidity_label: self
                .liquidity_label
                .ok_or_else(|| missing("liquidity_label"))?,
            min_weight: self.min_weight.unwrap_or(0.0),
            max_weight: self.max_weight.unwrap_or(1.0),
            id,
        };
        asset.validate()?;
        Ok(asset)
    }
}
