//! Integration tests for the data model: configuration overrides, universe
//! validation and the column contract.

use proptest::prelude::*;
use tranche_core::prelude::*;
use tranche_core::schema::REQUIRED_COLUMNS;

fn asset(id: &str, sector: &str, liquidity: &str, bounds: (f64, f64)) -> Asset {
    Asset::builder()
        .id(id)
        .sector(sector)
        .yield_(0.045)
        .duration(4.0)
        .quality_num(3.0)
        .liquidity_label(liquidity)
        .weight_bounds(bounds.0, bounds.1)
        .build()
        .unwrap()
}

// =============================================================================
// CONFIGURATION OVERRIDES
// =============================================================================

#[test]
fn override_config_admits_new_sector() {
    let config = AllocationConfig::default().with_sector("Muni", SectorBounds::cap(0.15));
    let universe = Universe::new(vec![asset("M1", "Muni", "Next Day", (0.0, 1.0))], &config);
    assert!(universe.is_ok());

    // The default configuration still rejects it.
    let err = universe
        .unwrap()
        .ensure_resolvable(&AllocationConfig::default())
        .unwrap_err();
    assert_eq!(err, CoreError::unmapped("sector", "Muni", "M1"));
}

#[test]
fn override_config_does_not_touch_default() {
    let base = AllocationConfig::default();
    let tightened = base.clone().with_min_same_day(0.5);
    assert!((base.min_same_day - 0.20).abs() < f64::EPSILON);
    assert!((tightened.min_same_day - 0.5).abs() < f64::EPSILON);
    assert_eq!(AllocationConfig::default(), base);
}

#[test]
fn toml_override_round_trip() {
    let config = AllocationConfig::default()
        .with_max_rating_num(7.0)
        .with_solver(SolverBackend::Bland);
    let text = toml::to_string(&config).unwrap();
    let parsed: AllocationConfig = toml::from_str(&text).unwrap();
    assert_eq!(parsed, config);
    parsed.validate().unwrap();
}

// =============================================================================
// UNIVERSE
// =============================================================================

#[test]
fn universe_preserves_order() {
    let config = AllocationConfig::default();
    let universe = Universe::new(
        vec![
            asset("Z", "Corp", "Next Day", (0.0, 0.3)),
            asset("A", "TSY", "Same Day", (0.1, 1.0)),
            asset("M", "MBS", "2-5 Days", (0.0, 0.4)),
        ],
        &config,
    )
    .unwrap();

    assert_eq!(universe.ids(), vec!["Z", "A", "M"]);
    assert_eq!(universe.min_weights(), vec![0.0, 0.1, 0.0]);
    assert_eq!(universe.max_weights(), vec![0.3, 1.0, 0.4]);
    assert_eq!(universe.liquidity_mask("2-5 Days"), vec![false, false, true]);
}

#[test]
fn invalid_asset_rejected_by_universe() {
    let mut bad = asset("B", "TSY", "Same Day", (0.0, 1.0));
    bad.min_weight = 0.9;
    bad.max_weight = 0.1;
    let err = Universe::new(vec![bad], &AllocationConfig::default()).unwrap_err();
    assert!(matches!(err, CoreError::InvalidAsset { ref id, .. } if id == "B"));
}

#[test]
fn asset_deserializes_from_json_record() {
    let json = r#"{
        "id": "ABS-1",
        "sector": "ABS",
        "yield": 0.051,
        "duration": 2.4,
        "quality_num": 1.0,
        "liquidity_label": "Next Day",
        "min_weight": 0.0,
        "max_weight": 0.2
    }"#;
    let parsed: Asset = serde_json::from_str(json).unwrap();
    assert_eq!(parsed, asset_with_yield("ABS-1", 0.051));
}

fn asset_with_yield(id: &str, yield_: f64) -> Asset {
    Asset::builder()
        .id(id)
        .sector("ABS")
        .yield_(yield_)
        .duration(2.4)
        .quality_num(1.0)
        .liquidity_label("Next Day")
        .weight_bounds(0.0, 0.2)
        .build()
        .unwrap()
}

// =============================================================================
// COLUMN CONTRACT
// =============================================================================

#[test]
fn messy_headers_resolve() {
    let headers = [
        " Sector ",
        "YIELD",
        "Duration",
        "Quality Num",
        "Liquidity Label",
        "Asset Level Min Weight",
        "Asset Level Max Weight",
    ];
    let cols = AssetColumns::resolve(headers).unwrap();
    assert_eq!(cols.quality, QualitySource::Numeric(3));
    assert_eq!(cols.liquidity, LiquiditySource::Label(4));
    assert_eq!(cols.min_weight, 5);
}

#[test]
fn missing_column_is_named() {
    let err = AssetColumns::resolve(["sector", "yield", "duration"]).unwrap_err();
    assert_eq!(err.to_string(), "Missing required column 'quality_num'");
}

proptest! {
    #[test]
    fn normalize_is_idempotent(name in "[ A-Za-z_]{0,24}") {
        let once = normalize_column_name(&name);
        prop_assert_eq!(normalize_column_name(&once), once.clone());
        prop_assert!(!once.contains(' '));
    }

    #[test]
    fn required_columns_resolve_in_any_order(seed in any::<u64>()) {
        let mut headers: Vec<&str> = REQUIRED_COLUMNS.to_vec();
        let len = headers.len();
        // Deterministic rotation driven by the seed.
        headers.rotate_left((seed % len as u64) as usize);
        let cols = AssetColumns::resolve(&headers).unwrap();
        prop_assert_eq!(headers[cols.sector], "sector");
        prop_assert_eq!(headers[cols.duration], "duration");
        prop_assert_eq!(headers[cols.max_weight], "asset_level_max_weight");
    }

    #[test]
    fn yield_shift_is_uniform(bps in -500i32..500) {
        let config = AllocationConfig::default();
        let universe = Universe::new(
            vec![
                asset("A", "TSY", "Same Day", (0.0, 1.0)),
                asset("B", "Corp", "Next Day", (0.0, 0.5)),
            ],
            &config,
        )
        .unwrap();
        let delta = f64::from(bps) / 10_000.0;
        let shifted = universe.with_yield_shift(delta);
        for (before, after) in universe.yields().iter().zip(shifted.yields()) {
            prop_assert!((after - before - delta).abs() < 1e-12);
        }
    }
}
