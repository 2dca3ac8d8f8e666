//! Config command implementation.
//!
//! Prints the effective constraint configuration so it can be saved,
//! edited and passed back with `optimize --config`.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use crate::cli::OutputFormat;
use crate::commands::load_config;
use crate::error::CliError;
use crate::output::print_json;

/// Arguments for the config command.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Validate and print this TOML file instead of the defaults
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

/// Execute the config command.
pub fn execute(args: &ConfigArgs, format: OutputFormat) -> Result<()> {
    let config = load_config(args.config.as_deref())?;

    match format {
        OutputFormat::Table => {
            let text = toml::to_string_pretty(&config)
                .map_err(|e| CliError::Serialization(e.to_string()))?;
            print!("{text}");
        }
        OutputFormat::Json => print_json(&config)?,
    }

    Ok(())
}
