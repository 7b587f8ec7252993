//! CLI command implementations for Reckon.

pub(crate) mod batch;
pub(crate) mod solve;

mod output;

use clap::{Args, ValueEnum};
use reckon::error::{ConfigError, EvolutionError};
use reckon::gp::EvolutionConfig;
use std::error::Error;
use std::fmt;
use std::path::PathBuf;

/// Output format for the `solve` and `batch` commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// Problem and engine settings shared by every command.
///
/// Flags override values read from `--config`; anything left unset takes
/// the engine default.
#[derive(Args, Debug)]
pub(crate) struct SolverArgs {
    /// Target value
    #[arg(short, long, allow_negative_numbers = true)]
    goal: Option<i64>,

    /// Operand pool (each number may be used once)
    #[arg(allow_negative_numbers = true)]
    numbers: Vec<i64>,

    /// Population size (default: 100)
    #[arg(long)]
    population: Option<usize>,

    /// Individuals copied unchanged into each generation (default: 0)
    #[arg(long)]
    elitism: Option<usize>,

    /// Mutation chance in [0, 1] (default: 0.05)
    #[arg(short, long)]
    mutation: Option<f64>,

    /// Maximum generations (default: 1000)
    #[arg(short, long)]
    epochs: Option<usize>,

    /// Random seed (default: 42)
    #[arg(short, long)]
    seed: Option<u64>,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl SolverArgs {
    /// Merge the flags over the configuration file, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be loaded or no goal is given.
    pub(crate) fn into_config(self) -> Result<EvolutionConfig, CliError> {
        let mut config = match &self.config {
            Some(path) => reckon::config::load(path)?,
            None => EvolutionConfig::default(),
        };

        if self.goal.is_some() {
            config.goal = self.goal;
        }
        if config.goal.is_none() {
            return Err(CliError::new("a goal is required (--goal or --config)"));
        }
        if !self.numbers.is_empty() {
            config.numbers = self.numbers;
        }
        if let Some(population) = self.population {
            config.population_size = population;
        }
        if let Some(elitism) = self.elitism {
            config.elitism_count = elitism;
        }
        if let Some(mutation) = self.mutation {
            config.mutation_chance = mutation;
        }
        if let Some(epochs) = self.epochs {
            config.epochs = epochs;
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        Ok(config)
    }
}

/// CLI error type.
#[derive(Debug)]
pub(crate) struct CliError {
    message: String,
}

impl CliError {
    /// Create a new CLI error.
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for CliError {}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        Self::new(e.to_string())
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        Self::new(e.to_string())
    }
}

impl From<EvolutionError> for CliError {
    fn from(e: EvolutionError) -> Self {
        Self::new(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::new(format!("JSON serialization failed: {e}"))
    }
}

impl From<indicatif::style::TemplateError> for CliError {
    fn from(e: indicatif::style::TemplateError) -> Self {
        Self::new(format!("invalid progress template: {e}"))
    }
}
