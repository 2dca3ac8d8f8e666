//! Optimize command implementation.
//!
//! Loads an asset file, solves the base allocation, optionally runs the
//! yield-shock sweep, and reports or exports the result.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use tranche_allocation::prelude::*;
use tranche_core::{AllocationConfig, SolverBackend, Universe};
use tranche_ext_file::{load_assets, write_weights, DataKey};

use crate::cli::OutputFormat;
use crate::commands::load_config;
use crate::error::CliError;
use crate::output::{
    format_percent, print_header, print_json, print_success, print_table, print_warning, KeyValue,
};

/// Arguments for the optimize command.
#[derive(Args, Debug)]
pub struct OptimizeArgs {
    /// Asset CSV file
    #[arg(short, long)]
    pub assets: PathBuf,

    /// Constraint configuration (TOML). Defaults apply when omitted.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Data key CSV translating credit quality text and liquidity tiers
    #[arg(long)]
    pub data_key: Option<PathBuf>,

    /// LP backend (simplex, bland). Overrides the config file.
    #[arg(long, env = "TRANCHE_SOLVER")]
    pub solver: Option<String>,

    /// Run the yield-shock scenario sweep
    #[arg(long)]
    pub scenario: bool,

    /// Shocks in basis points for the sweep
    #[arg(
        long,
        value_delimiter = ',',
        allow_hyphen_values = true,
        default_values_t = DEFAULT_SHOCKS_BPS
    )]
    pub shocks: Vec<i32>,

    /// Wall-clock budget in seconds shared by the base solve and the sweep
    #[arg(long)]
    pub timeout: Option<f64>,

    /// Write the asset table with an optimal_weight column to this CSV
    #[arg(short, long)]
    pub out: Option<PathBuf>,
}

/// One row of the weight table.
#[derive(Debug, Serialize, Tabled)]
struct WeightRow {
    #[tabled(rename = "Asset")]
    id: String,
    #[tabled(rename = "Sector")]
    sector: String,
    #[tabled(rename = "Yield")]
    #[serde(skip)]
    yield_text: String,
    #[tabled(rename = "Weight")]
    #[serde(skip)]
    weight_text: String,
    #[tabled(skip)]
    weight: f64,
}

/// One row of the scenario table.
#[derive(Debug, Tabled)]
struct ScenarioRow {
    #[tabled(rename = "Scenario")]
    label: String,
    #[tabled(rename = "Yield")]
    yield_: String,
    #[tabled(rename = "Duration")]
    duration: String,
    #[tabled(rename = "Rating")]
    rating: String,
    #[tabled(rename = "Status")]
    status: String,
}

impl From<&ScenarioRecord> for ScenarioRow {
    fn from(record: &ScenarioRecord) -> Self {
        let dash = || "-".to_string();
        match &record.outcome {
            ScenarioOutcome::Solved(d) => Self {
                label: record.label(),
                yield_: format_percent(d.yield_),
                duration: format!("{:.4}", d.duration),
                rating: format!("{:.4}", d.rating_num),
                status: "solved".to_string(),
            },
            ScenarioOutcome::Failed(failure) => Self {
                label: record.label(),
                yield_: dash(),
                duration: dash(),
                rating: dash(),
                status: failure.message.clone(),
            },
        }
    }
}

/// JSON report.
#[derive(Debug, Serialize)]
struct OptimizeReport {
    solver: SolverBackend,
    iterations: usize,
    weights: Vec<WeightRow>,
    diagnostics: Diagnostics,
    same_day_weight: f64,
    sector_weights: BTreeMap<String, f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    scenarios: Option<SweepResult>,
}

/// Execute the optimize command.
pub fn execute(args: OptimizeArgs, format: OutputFormat, quiet: bool) -> Result<()> {
    let config = resolve_config(&args)?;

    let key = match &args.data_key {
        Some(path) => DataKey::load(path).map_err(CliError::from)?,
        None => DataKey::default(),
    };
    let universe = load_assets(&args.assets, &key, &config).map_err(CliError::from)?;
    tracing::info!(
        assets = universe.len(),
        path = %args.assets.display(),
        "Loaded asset universe"
    );

    let options = match args.timeout {
        Some(secs) if secs.is_finite() && secs > 0.0 => {
            SolveOptions::default().with_timeout(Duration::from_secs_f64(secs))
        }
        Some(secs) => anyhow::bail!("Invalid timeout: {secs}. Must be a positive number of seconds."),
        None => SolveOptions::default(),
    };

    let portfolio = solve_allocation_with(&universe, &config, &options).map_err(CliError::from)?;

    // Scenarios run under the default constraints; only the backend carries over.
    let sweep_config = AllocationConfig::default().with_solver(config.solver);
    let sweep = args.scenario.then(|| {
        run_scenarios_with(
            &universe,
            &args.shocks,
            &SweepOptions::default(),
            |_, shocked| solve_allocation_with(shocked, &sweep_config, &options),
        )
    });

    if let Some(path) = &args.out {
        write_weights(path, &universe, portfolio.weights()).map_err(CliError::from)?;
        if format == OutputFormat::Table && !quiet {
            print_success(&format!("Wrote weights to {}", path.display()));
        }
    }

    match format {
        OutputFormat::Table => print_report(&universe, &portfolio, sweep.as_ref()),
        OutputFormat::Json => {
            let report = OptimizeReport {
                solver: portfolio.solver(),
                iterations: portfolio.iterations(),
                weights: weight_rows(&universe, &portfolio),
                diagnostics: portfolio.diagnostics(),
                same_day_weight: same_day_weight(portfolio.weights(), &universe),
                sector_weights: sector_weights(portfolio.weights(), &universe),
                scenarios: sweep,
            };
            print_json(&report)?;
        }
    }

    Ok(())
}

fn resolve_config(args: &OptimizeArgs) -> Result<AllocationConfig> {
    let config = load_config(args.config.as_deref())?;
    match &args.solver {
        Some(name) => {
            let backend: SolverBackend = name.parse().map_err(CliError::from)?;
            Ok(config.with_solver(backend))
        }
        None => Ok(config),
    }
}

fn weight_rows(universe: &Universe, portfolio: &Portfolio) -> Vec<WeightRow> {
    universe
        .iter()
        .zip(portfolio.weights())
        .map(|(asset, &weight)| WeightRow {
            id: asset.id.clone(),
            sector: asset.sector.clone(),
            yield_text: format_percent(asset.yield_),
            weight_text: format_percent(weight),
            weight,
        })
        .collect()
}

fn print_report(universe: &Universe, portfolio: &Portfolio, sweep: Option<&SweepResult>) {
    let weights = portfolio.weights();
    let diagnostics = portfolio.diagnostics();

    print_header("Optimal Portfolio");
    let held: Vec<WeightRow> = weight_rows(universe, portfolio)
        .into_iter()
        .filter(|row| row.weight > 0.0)
        .collect();
    print_table(&held);

    print_header("Diagnostics");
    let metrics = vec![
        KeyValue::from_percent("Portfolio Yield", diagnostics.yield_),
        KeyValue::from_f64("Duration (years)", diagnostics.duration, 4),
        KeyValue::from_f64("Rating Number", diagnostics.rating_num, 4),
        KeyValue::from_percent("Same-Day Liquidity", same_day_weight(weights, universe)),
        KeyValue::new("Solver", portfolio.solver().to_string()),
        KeyValue::new("Iterations", portfolio.iterations().to_string()),
    ];
    print_table(&metrics);

    print_header("Sector Weights");
    let sectors: Vec<KeyValue> = sector_weights(weights, universe)
        .into_iter()
        .map(|(sector, weight)| KeyValue::from_percent(sector, weight))
        .collect();
    print_table(&sectors);

    if let Some(sweep) = sweep {
        print_header("Scenario Sweep");
        let rows: Vec<ScenarioRow> = sweep.iter().map(ScenarioRow::from).collect();
        print_table(&rows);
        for (label, failure) in sweep.failures() {
            print_warning(&format!("Scenario {label} failed: {}", failure.message));
        }
    }
}
