//! Credit scale and liquidity tier lookups.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tranche_core::config::default_liquidity_labels;
use tranche_core::schema::normalize_column_name;

use crate::error::{FileError, FileResult};

/// Default credit scale, best first.
pub const DEFAULT_CREDIT_SCALE: [&str; 17] = [
    "AAA", "AA+", "AA", "AA-", "A+", "A", "A-", "BBB+", "BBB", "BBB-", "BB+", "BB", "BB-", "B+",
    "B", "B-", "CCC",
];

/// Maps textual credit quality and numeric liquidity tiers to the values
/// the engine consumes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataKey {
    /// Credit quality text to rating number (lower is better).
    pub credit_scale: BTreeMap<String, f64>,
    /// Liquidity tier to liquidity label.
    pub liquidity_tiers: BTreeMap<u32, String>,
}

impl Default for DataKey {
    /// AAA=1 through CCC=17; tiers 1..=5 map to the default labels.
    fn default() -> Self {
        let credit_scale = DEFAULT_CREDIT_SCALE
            .iter()
            .zip(1u32..)
            .map(|(text, n)| ((*text).to_string(), f64::from(n)))
            .collect();
        let liquidity_tiers = (1u32..).zip(default_liquidity_labels()).collect();
        Self {
            credit_scale,
            liquidity_tiers,
        }
    }
}

impl DataKey {
    /// Creates an empty key.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            credit_scale: BTreeMap::new(),
            liquidity_tiers: BTreeMap::new(),
        }
    }

    /// Adds or replaces a credit mapping.
    #[must_use]
    pub fn with_credit(mut self, text: impl Into<String>, score: f64) -> Self {
        self.credit_scale.insert(text.into(), score);
        self
    }

    /// Adds or replaces a liquidity tier.
    #[must_use]
    pub fn with_tier(mut self, tier: u32, label: impl Into<String>) -> Self {
        self.liquidity_tiers.insert(tier, label.into());
        self
    }

    /// Rating number for a credit quality string.
    ///
    /// Matching is exact after trimming, then falls back to upper case.
    #[must_use]
    pub fn quality_score(&self, text: &str) -> Option<f64> {
        let text = text.trim();
        self.credit_scale
            .get(text)
            .or_else(|| self.credit_scale.get(&text.to_ascii_uppercase()))
            .copied()
    }

    /// Label for a liquidity tier.
    #[must_use]
    pub fn liquidity_label(&self, tier: u32) -> Option<&str> {
        self.liquidity_tiers.get(&tier).map(String::as_str)
    }

    /// Loads a key from a CSV file.
    ///
    /// See [`DataKey::read`] for the expected layout.
    pub fn load(path: impl AsRef<Path>) -> FileResult<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| FileError::io(path, e))?;
        Self::read(file)
    }

    /// Reads a key from CSV with `credit_quality`, `numeric`,
    /// `liquidity_tier` and `translation` columns.
    ///
    /// The two tables share rows but are independent: a row may fill only
    /// one of them, and blank rows are skipped.
    pub fn read<R: Read>(reader: R) -> FileResult<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers: Vec<String> = rdr.headers()?.iter().map(normalize_column_name).collect();
        let position = |name: &str| headers.iter().position(|h| h == name);
        let credit = position("credit_quality").zip(position("numeric"));
        let tiers = position("liquidity_tier").zip(position("translation"));

        let mut key = Self::empty();
        for (i, record) in rdr.records().enumerate() {
            let record = record?;
            let row = i + 1;
            let cell = |idx: usize| record.get(idx).unwrap_or("");

            if let Some((text_idx, num_idx)) = credit {
                let (text, num) = (cell(text_idx), cell(num_idx));
                if !text.is_empty() && !num.is_empty() {
                    let score = num
                        .parse::<f64>()
                        .ok()
                        .filter(|v| v.is_finite())
                        .ok_or_else(|| FileError::invalid_value(row, "numeric", num))?;
                    key.credit_scale.insert(text.to_string(), score);
                }
            }

            if let Some((tier_idx, label_idx)) = tiers {
                let (tier, label) = (cell(tier_idx), cell(label_idx));
                if !tier.is_empty() && !label.is_empty() {
                    let tier = parse_tier(tier)
                        .ok_or_else(|| FileError::invalid_value(row, "liquidity_tier", tier))?;
                    key.liquidity_tiers.insert(tier, label.to_string());
                }
            }
        }
        Ok(key)
    }
}

/// Parses a tier cell, accepting spreadsheet exports such as `"2.0"`.
pub(crate) fn parse_tier(text: &str) -> Option<u32> {
    let text = text.trim();
    if let Ok(tier) = text.parse::<u32>() {
        return Some(tier);
    }
    let value = text.parse::<f64>().ok()?;
    if value.fract() != 0.0 || value < 0.0 || value > f64::from(u32::MAX) {
        return None;
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let tier = value as u32;
    Some(tier)
}
