//! Solver configuration files.
//!
//! A configuration file is TOML with the fields of [`EvolutionConfig`];
//! missing fields take their defaults. Loading only parses: validation runs
//! when a [`Population`](crate::gp::Population) is built, so command-line
//! overrides can still fix a file's values first.
//!
//! ```toml
//! goal = 952
//! numbers = [25, 50, 75, 100, 3, 6]
//! population_size = 200
//! elitism_count = 2
//! mutation_chance = 0.1
//! epochs = 5000
//! seed = 7
//!
//! [crossover]
//! min_position = 2
//! ```

use crate::error::ConfigError;
use crate::gp::EvolutionConfig;
use std::path::Path;

/// Read an [`EvolutionConfig`] from a TOML file.
///
/// # Errors
///
/// Returns [`ConfigError::Read`] if the file cannot be read and
/// [`ConfigError::Parse`] if it is not valid configuration TOML.
pub fn load(path: &Path) -> Result<EvolutionConfig, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse(&contents)
}

/// Parse an [`EvolutionConfig`] from TOML text.
///
/// # Errors
///
/// Returns [`ConfigError::Parse`] if `text` is not valid configuration TOML.
pub fn parse(text: &str) -> Result<EvolutionConfig, ConfigError> {
    Ok(toml::from_str(text)?)
}
