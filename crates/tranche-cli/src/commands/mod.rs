//! CLI command implementations.

pub mod config;
pub mod optimize;

pub use config::ConfigArgs;
pub use optimize::OptimizeArgs;

use std::path::Path;

use tranche_core::AllocationConfig;

use crate::error::{CliError, CliResult};

/// Loads an allocation config from TOML, or the defaults when no path is
/// given. Missing keys take their default values.
pub fn load_config(path: Option<&Path>) -> CliResult<AllocationConfig> {
    let Some(path) = path else {
        return Ok(AllocationConfig::default());
    };

    let text = std::fs::read_to_string(path).map_err(|source| CliError::ConfigRead {
        path: path.to_path_buf(),
        source,
    })?;
    let config: AllocationConfig = toml::from_str(&text).map_err(|source| CliError::ConfigParse {
        path: path.to_path_buf(),
        source,
    })?;
    config.validate()?;

    tracing::debug!(path = %path.display(), "Loaded allocation config");
    Ok(config)
}
