//! Output formatting utilities for CLI.

// Averages over run counts
#![allow(clippy::cast_precision_loss)]

use reckon::gp::{EvolutionOutcome, GenerationStats};
use serde::Serialize;
use std::time::Duration;

/// JSON-serializable result of one solve.
#[derive(Debug, Serialize)]
pub(super) struct JsonSolveResult {
    /// Random seed used.
    pub(super) seed: u64,
    /// Best expression found.
    pub(super) expression: String,
    /// Value of the expression (null if not finite).
    pub(super) value: f64,
    /// Fitness of the expression.
    pub(super) fitness: f64,
    /// Whether the expression obeys the operand pool.
    pub(super) valid: bool,
    /// Whether a perfect match was found.
    pub(super) solved: bool,
    /// Generations ranked.
    pub(super) generations: usize,
    /// Wall time in seconds.
    pub(super) elapsed_seconds: f64,
}

impl JsonSolveResult {
    /// Create from an evolution outcome.
    pub(super) fn from_outcome(outcome: &EvolutionOutcome, seed: u64) -> Self {
        Self {
            seed,
            expression: outcome.best.to_string(),
            value: outcome.best.value(),
            fitness: outcome.best.fitness(),
            valid: outcome.best.is_valid(),
            solved: outcome.solved,
            generations: outcome.generations,
            elapsed_seconds: outcome.elapsed.as_secs_f64(),
        }
    }
}

/// Format a solve result as human-readable text.
pub(super) fn format_solve_text(outcome: &EvolutionOutcome, seed: u64) -> String {
    let best = &outcome.best;
    let mut output = String::new();

    output.push_str(&format!("Solve (goal: {}, seed: {seed})\n", best.goal()));
    output.push_str(&format!("  Expression: {best}\n"));
    output.push_str(&format!("  Value:      {}\n", best.value()));
    output.push_str(&format!("  Fitness:    {:.4}\n", best.fitness()));
    let status = if outcome.solved { "solved" } else { "not solved" };
    output.push_str(&format!(
        "  Status:     {status} after {} generations ({:.2}s)\n",
        outcome.generations,
        outcome.elapsed.as_secs_f64()
    ));
    let unused = best.unused_numbers();
    if !unused.is_empty() {
        output.push_str(&format!("  Unused:     {unused:?}\n"));
    }
    output
}

/// Format per-generation statistics as CSV.
pub(super) fn format_history_csv(stats: &[GenerationStats]) -> String {
    let mut output = String::from("generation,best,mean,worst,std\n");
    for s in stats {
        output.push_str(&format!(
            "{},{},{},{},{}\n",
            s.generation, s.best_fitness, s.mean_fitness, s.worst_fitness, s.fitness_std
        ));
    }
    output
}

/// Best expression seen across a batch.
#[derive(Debug, Clone, Serialize)]
pub(super) struct BatchBest {
    /// Seed of the run that found it.
    pub(super) seed: u64,
    /// Expression text.
    pub(super) expression: String,
    /// Value of the expression.
    pub(super) value: f64,
    /// Fitness of the expression.
    pub(super) fitness: f64,
}

/// Accumulated statistics across batch runs.
#[derive(Debug, Default)]
pub(super) struct BatchStats {
    /// Completed runs.
    pub(super) runs: u64,
    /// Runs that found a perfect match.
    pub(super) solved: u64,
    /// Runs that ended in an error.
    pub(super) failed: u64,
    /// Generations summed over completed runs.
    pub(super) total_generations: u64,
    /// Generations summed over solved runs.
    pub(super) solved_generations: u64,
    /// Fittest expression over all runs.
    pub(super) best: Option<BatchBest>,
}

impl BatchStats {
    /// Add the result of one run.
    pub(super) fn add_outcome(&mut self, seed: u64, outcome: &EvolutionOutcome) {
        self.runs += 1;
        self.total_generations += outcome.generations as u64;
        if outcome.solved {
            self.solved += 1;
            self.solved_generations += outcome.generations as u64;
        }
        self.offer(BatchBest {
            seed,
            expression: outcome.best.to_string(),
            value: outcome.best.value(),
            fitness: outcome.best.fitness(),
        });
    }

    /// Count a run that ended in an error.
    pub(super) fn add_failure(&mut self) {
        self.failed += 1;
    }

    /// Merge another thread's statistics into these.
    pub(super) fn merge(&mut self, other: Self) {
        self.runs += other.runs;
        self.solved += other.solved;
        self.failed += other.failed;
        self.total_generations += other.total_generations;
        self.solved_generations += other.solved_generations;
        if let Some(best) = other.best {
            self.offer(best);
        }
    }

    /// Keep the fitter candidate; the lower seed wins ties so the result
    /// does not depend on how runs were split across threads.
    fn offer(&mut self, candidate: BatchBest) {
        let better = match &self.best {
            None => true,
            Some(current) => match candidate.fitness.total_cmp(&current.fitness) {
                std::cmp::Ordering::Greater => true,
                std::cmp::Ordering::Equal => candidate.seed < current.seed,
                std::cmp::Ordering::Less => false,
            },
        };
        if better {
            self.best = Some(candidate);
        }
    }

    /// Fraction of completed runs that were solved.
    pub(super) fn solve_rate(&self) -> f64 {
        if self.runs == 0 {
            0.0
        } else {
            self.solved as f64 / self.runs as f64
        }
    }

    /// Mean generations per completed run.
    pub(super) fn mean_generations(&self) -> f64 {
        if self.runs == 0 {
            0.0
        } else {
            self.total_generations as f64 / self.runs as f64
        }
    }

    /// Mean generations per solved run.
    pub(super) fn mean_generations_solved(&self) -> Option<f64> {
        (self.solved > 0).then(|| self.solved_generations as f64 / self.solved as f64)
    }
}

/// Format batch statistics as human-readable text.
pub(super) fn format_batch_text(stats: &BatchStats) -> String {
    let mut output = String::new();

    output.push_str(&format!("Batch Results ({} runs)\n", stats.runs + stats.failed));
    output.push_str(&format!(
        "  Solved:           {} ({:.1}%)\n",
        stats.solved,
        stats.solve_rate() * 100.0
    ));
    if stats.failed > 0 {
        output.push_str(&format!("  Failed:           {}\n", stats.failed));
    }
    output.push_str(&format!("  Mean generations: {:.1}\n", stats.mean_generations()));
    if let Some(mean) = stats.mean_generations_solved() {
        output.push_str(&format!("  Mean to solve:    {mean:.1}\n"));
    }
    if let Some(best) = &stats.best {
        output.push_str(&format!(
            "  Best:             {} = {} (fitness {:.4}, seed {})\n",
            best.expression, best.value, best.fitness, best.seed
        ));
    }
    output
}

/// JSON-serializable batch summary.
#[derive(Debug, Serialize)]
pub(super) struct JsonBatchResult {
    /// Completed runs.
    pub(super) runs: u64,
    /// Runs that found a perfect match.
    pub(super) solved: u64,
    /// Runs that ended in an error.
    pub(super) failed: u64,
    /// Fraction of completed runs that were solved.
    pub(super) solve_rate: f64,
    /// Mean generations per completed run.
    pub(super) mean_generations: f64,
    /// Mean generations per solved run.
    pub(super) mean_generations_solved: Option<f64>,
    /// Fittest expression over all runs.
    pub(super) best: Option<BatchBest>,
    /// Wall time in seconds.
    pub(super) elapsed_seconds: f64,
}

impl JsonBatchResult {
    /// Create from batch statistics.
    pub(super) fn from_stats(stats: &BatchStats, elapsed: Duration) -> Self {
        Self {
            runs: stats.runs,
            solved: stats.solved,
            failed: stats.failed,
            solve_rate: stats.solve_rate(),
            mean_generations: stats.mean_generations(),
            mean_generations_solved: stats.mean_generations_solved(),
            best: stats.best.clone(),
            elapsed_seconds: elapsed.as_secs_f64(),
        }
    }
}
