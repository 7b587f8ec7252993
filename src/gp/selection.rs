//! Selection operators for genetic programming.
//!
//! Parents are picked by tournament: a fixed number of distinct individuals
//! is sampled and the fittest wins. Ties go to whichever was sampled first.

// Selection uses intentional casts for statistics
#![allow(clippy::cast_precision_loss)]

use rand::Rng;
use rand::seq::index;
use serde::Serialize;

/// Number of distinct individuals sampled per tournament.
pub const TOURNAMENT_SIZE: usize = 10;

/// Tournament selection: sample up to [`TOURNAMENT_SIZE`] distinct indices
/// and return `(best, runner_up)`.
///
/// The runner-up equals the best when only one individual competes. An
/// empty population yields `(0, 0)`.
#[must_use]
pub fn tournament_select<R: Rng>(fitness: &[f64], rng: &mut R) -> (usize, usize) {
    let pop_size = fitness.len();
    if pop_size == 0 {
        return (0, 0);
    }

    let k = TOURNAMENT_SIZE.min(pop_size);
    let mut best: Option<usize> = None;
    let mut runner_up: Option<usize> = None;

    for idx in index::sample(rng, pop_size, k) {
        match best {
            Some(b) if fitness[idx] <= fitness[b] => {
                if runner_up.is_none_or(|r| fitness[idx] > fitness[r]) {
                    runner_up = Some(idx);
                }
            }
            _ => {
                runner_up = best;
                best = Some(idx);
            }
        }
    }

    let best = best.unwrap_or(0);
    (best, runner_up.unwrap_or(best))
}

/// Pick two parents from two independent tournaments.
///
/// Parent B is the winner of the second tournament unless that repeats
/// parent A, in which case the second tournament's runner-up is used.
#[must_use]
pub fn select_parents<R: Rng>(fitness: &[f64], rng: &mut R) -> (usize, usize) {
    let (a, _) = tournament_select(fitness, rng);
    let (b, b_runner_up) = tournament_select(fitness, rng);
    if b == a { (a, b_runner_up) } else { (a, b) }
}

/// Fitness statistics of one generation.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct GenerationStats {
    /// Zero-based generation number.
    pub generation: usize,
    /// Mean fitness of the population.
    pub mean_fitness: f64,
    /// Best fitness in the population.
    pub best_fitness: f64,
    /// Worst fitness in the population.
    pub worst_fitness: f64,
    /// Standard deviation of fitness.
    pub fitness_std: f64,
}

impl GenerationStats {
    /// Calculate statistics from fitness values.
    #[must_use]
    pub fn from_fitness(generation: usize, fitness: &[f64]) -> Self {
        if fitness.is_empty() {
            return Self {
                generation,
                mean_fitness: 0.0,
                best_fitness: 0.0,
                worst_fitness: 0.0,
                fitness_std: 0.0,
            };
        }

        let sum: f64 = fitness.iter().sum();
        let mean = sum / fitness.len() as f64;

        let best = fitness
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max);
        let worst = fitness
            .iter()
            .copied()
            .fold(f64::INFINITY, f64::min);

        let variance: f64 = fitness
            .iter()
            .map(|f| (f - mean).powi(2))
            .sum::<f64>()
            / fitness.len() as f64;

        Self {
            generation,
            mean_fitness: mean,
            best_fitness: best,
            worst_fitness: worst,
            fitness_std: variance.sqrt(),
        }
    }
}
