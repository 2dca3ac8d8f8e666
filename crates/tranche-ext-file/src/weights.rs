//! Optimal weight export.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use serde::Serialize;
use tranche_core::{Asset, Universe};

use crate::error::{FileError, FileResult};

/// One output row: the asset's inputs followed by its optimal weight.
#[derive(Debug, Serialize)]
struct WeightRecord<'a> {
    id: &'a str,
    sector: &'a str,
    #[serde(rename = "yield")]
    yield_: f64,
    duration: f64,
    quality_num: f64,
    liquidity_label: &'a str,
    asset_level_min_weight: f64,
    asset_level_max_weight: f64,
    optimal_weight: f64,
}

impl<'a> WeightRecord<'a> {
    fn new(asset: &'a Asset, weight: f64) -> Self {
        Self {
            id: &asset.id,
            sector: &asset.sector,
            yield_: asset.yield_,
            duration: asset.duration,
            quality_num: asset.quality_num,
            liquidity_label: &asset.liquidity_label,
            asset_level_min_weight: asset.min_weight,
            asset_level_max_weight: asset.max_weight,
            optimal_weight: weight,
        }
    }
}

/// Writes the universe with an `optimal_weight` column to a CSV file.
///
/// The file is created or truncated.
pub fn write_weights(path: impl AsRef<Path>, universe: &Universe, weights: &[f64]) -> FileResult<()> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|e| FileError::io(path, e))?;
    write_weights_to(file, universe, weights)
}

/// Writes the universe with an `optimal_weight` column to any sink.
pub fn write_weights_to<W: Write>(writer: W, universe: &Universe, weights: &[f64]) -> FileResult<()> {
    if weights.len() != universe.len() {
        return Err(FileError::LengthMismatch {
            expected: universe.len(),
            actual: weights.len(),
        });
    }

    let mut wtr = csv::Writer::from_writer(writer);
    for (asset, &weight) in universe.iter().zip(weights) {
        wtr.serialize(WeightRecord::new(asset, weight))?;
    }
    wtr.flush().map_err(csv::Error::from)?;
    Ok(())
}
