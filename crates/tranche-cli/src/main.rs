//! Tranche CLI - constrained allocation from the command line.
//!
//! # Usage
//!
//! ```bash
//! # Solve the base portfolio
//! tranche optimize --assets assets.csv
//!
//! # Custom constraints, the ±100bp sweep, and a weight export
//! tranche optimize --assets assets.csv --config limits.toml --scenario --out weights.csv
//!
//! # Print the default configuration as a starting point
//! tranche config > limits.toml
//! ```
//!
//! Logging goes to stderr and follows `RUST_LOG` (default `warn,tranche=info`).

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;
mod commands;
mod error;
mod output;

use cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.quiet { "error" } else { "warn,tranche=info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| default_filter.into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let format = cli.format;

    match cli.command {
        Commands::Optimize(args) => commands::optimize::execute(args, format, cli.quiet)?,
        Commands::Config(args) => commands::config::execute(&args, format)?,
    }

    Ok(())
}
