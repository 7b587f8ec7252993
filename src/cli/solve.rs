//! Solve command implementation.

use super::output::{JsonSolveResult, format_history_csv, format_solve_text};
use super::{CliError, OutputFormat, SolverArgs};
use indicatif::{ProgressBar, ProgressStyle};
use reckon::gp::{GenerationStats, LogReporter, ProgressReporter, evolve};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

/// Progress bar advanced once per generation.
struct BarReporter {
    pb: ProgressBar,
}

impl BarReporter {
    fn new(epochs: usize) -> Result<Self, CliError> {
        let pb = ProgressBar::new(epochs as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} generations {msg}")?
                .progress_chars("=>-"),
        );
        Ok(Self { pb })
    }
}

impl ProgressReporter for BarReporter {
    fn on_generation(&mut self, stats: &GenerationStats, _elapsed: Duration) {
        self.pb.set_position(stats.generation as u64 + 1);
        self.pb.set_message(format!("best {:.2}", stats.best_fitness));
    }
}

/// Execute the solve command.
///
/// # Errors
///
/// Returns an error if the configuration is invalid, the run fails or the
/// history file cannot be written.
pub(crate) fn execute(
    solver: SolverArgs,
    format: OutputFormat,
    history: Option<PathBuf>,
    progress: bool,
) -> Result<(), CliError> {
    let mut config = solver.into_config()?;
    let seed = config.seed;

    let outcome = if progress {
        config.report_interval = 1;
        let mut reporter = BarReporter::new(config.epochs)?;
        let outcome = evolve(config, &mut reporter)?;
        reporter.pb.finish_with_message(if outcome.solved { "solved" } else { "done" });
        outcome
    } else {
        evolve(config, &mut LogReporter)?
    };

    match format {
        OutputFormat::Text => print!("{}", format_solve_text(&outcome, seed)),
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&JsonSolveResult::from_outcome(&outcome, seed))?;
            println!("{json}");
        }
    }

    if let Some(path) = history {
        fs::write(&path, format_history_csv(&outcome.stats)).map_err(|e| {
            CliError::new(format!("Failed to write {}: {e}", path.display()))
        })?;
    }

    Ok(())
}
