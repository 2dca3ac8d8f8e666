//! CSV asset loading.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use tranche_core::schema::{AssetColumns, LiquiditySource, QualitySource};
use tranche_core::{AllocationConfig, Asset, CoreError, Universe};

use crate::data_key::{parse_tier, DataKey};
use crate::error::{FileError, FileResult};

/// Loads an asset universe from a CSV file.
///
/// Headers are normalized (trimmed, lowercased, spaces to underscores)
/// before being matched against the column contract. Asset IDs come from an
/// `id` column when present and default to `row-{n}` otherwise.
pub fn load_assets(
    path: impl AsRef<Path>,
    key: &DataKey,
    config: &AllocationConfig,
) -> FileResult<Universe> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| FileError::io(path, e))?;
    read_assets(file, key, config)
}

/// Reads an asset universe from any CSV source.
pub fn read_assets<R: Read>(
    reader: R,
    key: &DataKey,
    config: &AllocationConfig,
) -> FileResult<Universe> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let columns = AssetColumns::resolve(rdr.headers()?.iter())?;

    let mut assets = Vec::new();
    for (i, record) in rdr.records().enumerate() {
        let record = record?;
        let row = i + 1;
        let cell = |idx: usize| record.get(idx).unwrap_or("");
        let number = |idx: usize, column: &str| -> FileResult<f64> {
            let raw = cell(idx);
            raw.parse::<f64>()
                .map_err(|_| FileError::invalid_value(row, column, raw))
        };

        let id = columns
            .id
            .map(cell)
            .filter(|s| !s.is_empty())
            .map_or_else(|| format!("row-{row}"), str::to_string);

        let quality_num = match columns.quality {
            QualitySource::Numeric(idx) => number(idx, "quality_num")?,
            QualitySource::Text(idx) => {
                let text = cell(idx);
                key.quality_score(text)
                    .ok_or_else(|| CoreError::unmapped("credit quality", text, &id))?
            }
        };

        let liquidity_label = match columns.liquidity {
            LiquiditySource::Label(idx) => cell(idx).to_string(),
            LiquiditySource::Tier(idx) => {
                let raw = cell(idx);
                parse_tier(raw)
                    .and_then(|tier| key.liquidity_label(tier))
                    .ok_or_else(|| CoreError::unmapped("liquidity tier", raw, &id))?
                    .to_string()
            }
        };

        let asset = Asset::builder()
            .id(id)
            .sector(cell(columns.sector))
            .yield_(number(columns.yield_, "yield")?)
            .duration(number(columns.duration, "duration")?)
            .quality_num(quality_num)
            .liquidity_label(liquidity_label)
            .weight_bounds(
                number(columns.min_weight, "asset_level_min_weight")?,
                number(columns.max_weight, "asset_level_max_weight")?,
            )
            .build()?;
        assets.push(asset);
    }

    Ok(Universe::new(assets, config)?)
}
