//! Batch command implementation.

use super::output::{BatchStats, JsonBatchResult, format_batch_text};
use super::{CliError, OutputFormat, SolverArgs};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use reckon::gp::evolve;
use std::time::Instant;

/// Execute the batch command.
///
/// Runs `runs` independent solves with seeds `seed, seed + 1, ...` in
/// parallel and aggregates their results.
///
/// # Errors
///
/// Returns an error if the configuration is invalid.
pub(crate) fn execute(
    solver: SolverArgs,
    runs: u64,
    threads: Option<usize>,
    format: OutputFormat,
    progress: bool,
) -> Result<(), CliError> {
    let mut config = solver.into_config()?;
    config.report_interval = 0;
    config.validate()?;

    // Set thread pool size if specified
    if let Some(num_threads) = threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build_global()
            .ok(); // Ignore error if already initialized
    }

    let pb = if progress {
        let pb = ProgressBar::new(runs);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} runs ({per_sec})")?
                .progress_chars("=>-"),
        );
        Some(pb)
    } else {
        None
    };

    let start = Instant::now();
    let base_seed = config.seed;

    // Each thread accumulates into its own BatchStats, merged at the end
    let stats = (0..runs)
        .into_par_iter()
        .fold(BatchStats::default, |mut local, i| {
            let mut run_config = config.clone();
            run_config.seed = base_seed.wrapping_add(i);
            let seed = run_config.seed;

            match evolve(run_config, &mut ()) {
                Ok(outcome) => local.add_outcome(seed, &outcome),
                Err(e) => {
                    log::warn!("run with seed {seed} failed: {e}");
                    local.add_failure();
                }
            }
            if let Some(pb) = &pb {
                pb.inc(1);
            }
            local
        })
        .reduce(BatchStats::default, |mut a, b| {
            a.merge(b);
            a
        });

    if let Some(pb) = pb {
        pb.finish_with_message("done");
    }
    let duration = start.elapsed();

    match format {
        OutputFormat::Text => {
            print!("{}", format_batch_text(&stats));
            println!("Duration: {:.2}s", duration.as_secs_f64());
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&JsonBatchResult::from_stats(&stats, duration))?;
            println!("{json}");
        }
    }

    Ok(())
}
