//! File round trips through the allocation engine.

use std::fs;

use tempfile::TempDir;
use tranche_allocation::prelude::*;
use tranche_core::prelude::*;
use tranche_ext_file::{load_assets, write_weights, DataKey, FileError};

const ASSETS: &str = "\
ID,Sector,Yield,Duration,Quality_Num,Liquidity_Label,Asset_Level_Min_Weight,Asset_Level_Max_Weight
UST-2Y,TSY,0.040,1.9,1,Same Day,0,1
UST-10Y,TSY,0.043,8.5,1,Same Day,0,1
MBS-30,MBS,0.052,5.5,2,Next Day,0,0.4
CORP-A,Corp,0.055,6.0,6,2-5 Days,0,0.3
CORP-BBB,Corp,0.061,7.0,9,6-30 Days,0,0.2
HY-1,High Yield,0.080,4.0,13,30+ Days,0,0.05
";

fn write(dir: &TempDir, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn test_load_solve_export() {
    let dir = TempDir::new().unwrap();
    let input = write(&dir, "assets.csv", ASSETS);
    let config = AllocationConfig::default();

    let universe = load_assets(&input, &DataKey::default(), &config).unwrap();
    assert_eq!(universe.len(), 6);
    assert_eq!(universe.ids()[0], "UST-2Y");

    let portfolio = solve_allocation(&universe, &config).unwrap();
    let output = dir.path().join("weights.csv");
    write_weights(&output, &universe, portfolio.weights()).unwrap();

    let text = fs::read_to_string(&output).unwrap();
    let mut rdr = csv::Reader::from_reader(text.as_bytes());
    let headers = rdr.headers().unwrap().clone();
    assert_eq!(headers.get(8), Some("optimal_weight"));

    let mut total = 0.0;
    let mut rows = 0;
    for record in rdr.records() {
        let record = record.unwrap();
        total += record[8].parse::<f64>().unwrap();
        rows += 1;
    }
    assert_eq!(rows, 6);
    assert!((total - 1.0).abs() < 1e-8);

    // The export is itself a valid asset file.
    let reloaded = load_assets(&output, &DataKey::default(), &config).unwrap();
    assert_eq!(reloaded.ids(), universe.ids());
}

#[test]
fn test_custom_data_key_file() {
    let dir = TempDir::new().unwrap();
    let key_path = write(
        &dir,
        "key.csv",
        "Credit Quality,Numeric,Liquidity Tier,Translation\nPrime,1,1,Same Day\nSub,8,2,Next Day\n",
    );
    let assets = write(
        &dir,
        "assets.csv",
        "sector,yield,duration,quality,liquidity_tier,asset_level_min_weight,asset_level_max_weight\n\
         TSY,0.04,3,Prime,1,0,1\n\
         Corp,0.06,6,Sub,2,0,0.5\n",
    );

    let key = DataKey::load(&key_path).unwrap();
    let universe = load_assets(&assets, &key, &AllocationConfig::default()).unwrap();
    assert_eq!(universe.qualities(), vec![1.0, 8.0]);
    assert_eq!(universe.assets()[1].liquidity_label, "Next Day");
}

#[test]
fn test_missing_file() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("nope.csv");
    let err = load_assets(&missing, &DataKey::default(), &AllocationConfig::default()).unwrap_err();
    assert!(matches!(err, FileError::Io { .. }));
    assert!(err.to_string().contains("nope.csv"));
}

#[test]
fn test_unknown_sector_is_data_error() {
    let dir = TempDir::new().unwrap();
    let input = write(&dir, "assets.csv", &ASSETS.replace("MBS-30,MBS", "MUNI-1,Muni"));
    let err = load_assets(&input, &DataKey::default(), &AllocationConfig::default()).unwrap_err();
    match err {
        FileError::Data(CoreError::UnmappedLabel { field, value, .. }) => {
            assert_eq!(field, "sector");
            assert_eq!(value, "Muni");
        }
        other => panic!("unexpected error: {other}"),
    }
}
