//! Main evolution loop for genetic programming.
//!
//! Each epoch ranks the current generation by fitness, records its
//! statistics and stops on a perfect match. Otherwise the elites are copied
//! into the next generation and the rest is filled with mutated offspring of
//! tournament-selected parents.

use crate::error::{ConfigError, EvolutionError};
use crate::gp::chromosome::{Chromosome, PERFECT_FITNESS};
use crate::gp::crossover::{CrossoverConfig, crossover};
use crate::gp::selection::{GenerationStats, TOURNAMENT_SIZE, select_parents};
use log::{debug, info};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Smallest population the engine accepts; a tournament needs that many
/// distinct individuals.
pub const MIN_POPULATION: usize = TOURNAMENT_SIZE;

/// Configuration for the evolution process.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EvolutionConfig {
    /// Target value. Required; there is no sensible default target.
    pub goal: Option<i64>,
    /// Operand pool; each entry may be used at most once per expression.
    pub numbers: Vec<i64>,
    /// Population size.
    pub population_size: usize,
    /// Number of best individuals copied unchanged into the next generation.
    pub elitism_count: usize,
    /// Probability used by each mutation coin flip.
    pub mutation_chance: f64,
    /// Maximum number of generations.
    pub epochs: usize,
    /// RNG seed for reproducibility.
    pub seed: u64,
    /// Crossover configuration.
    pub crossover: CrossoverConfig,
    /// Report progress every N generations; 0 disables reporting.
    pub report_interval: usize,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            goal: None,
            numbers: Vec::new(),
            population_size: 100,
            elitism_count: 0,
            mutation_chance: 0.05,
            epochs: 1000,
            seed: 42,
            crossover: CrossoverConfig::default(),
            report_interval: 100,
        }
    }
}

impl EvolutionConfig {
    /// Check that a population can be built from this configuration.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found, checking in this order:
    /// the goal, elitism against population size, the minimum population,
    /// the operand pool, the mutation chance and the epoch budget.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.goal.is_none() {
            return Err(ConfigError::MissingGoal);
        }
        if self.population_size <= self.elitism_count {
            return Err(ConfigError::ElitismTooLarge {
                population: self.population_size,
                elitism: self.elitism_count,
            });
        }
        if self.population_size < MIN_POPULATION {
            return Err(ConfigError::PopulationTooSmall {
                population: self.population_size,
                minimum: MIN_POPULATION,
            });
        }
        if self.numbers.is_empty() {
            return Err(ConfigError::EmptyOperandPool);
        }
        if !(0.0..=1.0).contains(&self.mutation_chance) {
            return Err(ConfigError::InvalidMutationChance(self.mutation_chance));
        }
        if self.epochs == 0 {
            return Err(ConfigError::ZeroEpochs);
        }
        Ok(())
    }
}

/// Observer of a running evolution.
pub trait ProgressReporter {
    /// Called with the statistics of a ranked generation.
    fn on_generation(&mut self, stats: &GenerationStats, elapsed: Duration);
}

impl ProgressReporter for () {
    fn on_generation(&mut self, _stats: &GenerationStats, _elapsed: Duration) {}
}

/// Reporter that logs generation statistics at debug level.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogReporter;

impl ProgressReporter for LogReporter {
    fn on_generation(&mut self, stats: &GenerationStats, elapsed: Duration) {
        debug!(
            "gen {:>5}: best={:.4} mean={:.4} worst={:.4} std={:.4} ({:.2?})",
            stats.generation,
            stats.best_fitness,
            stats.mean_fitness,
            stats.worst_fitness,
            stats.fitness_std,
            elapsed
        );
    }
}

/// Result of an evolution run.
#[derive(Debug, Clone)]
pub struct EvolutionOutcome {
    /// Fittest chromosome of the final generation.
    pub best: Chromosome,
    /// Best fitness of every ranked generation, in order.
    pub history: Vec<f64>,
    /// Full statistics of every ranked generation.
    pub stats: Vec<GenerationStats>,
    /// Number of generations ranked.
    pub generations: usize,
    /// Whether a perfect match was found.
    pub solved: bool,
    /// Wall time of the run.
    pub elapsed: Duration,
}

/// A generation of chromosomes and the machinery to evolve it.
#[derive(Debug)]
pub struct Population {
    config: EvolutionConfig,
    goal: i64,
    current: Vec<Chromosome>,
    next: Vec<Chromosome>,
    fitness: Vec<f64>,
    stats: Vec<GenerationStats>,
    epoch: usize,
    rng: SmallRng,
    best_fit: Option<Chromosome>,
}

impl Population {
    /// Build a random initial generation.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the configuration fails
    /// [`EvolutionConfig::validate`].
    pub fn new(config: EvolutionConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let goal = config.goal.ok_or(ConfigError::MissingGoal)?;

        let mut rng = SmallRng::seed_from_u64(config.seed);
        let current = (0..config.population_size)
            .map(|_| {
                Chromosome::new(
                    goal,
                    config.numbers.clone(),
                    config.mutation_chance,
                    &mut rng,
                )
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            next: Vec::with_capacity(config.population_size),
            fitness: Vec::with_capacity(config.population_size),
            stats: Vec::new(),
            epoch: 0,
            current,
            rng,
            best_fit: None,
            goal,
            config,
        })
    }

    /// The configuration this population was built from.
    #[must_use]
    pub fn config(&self) -> &EvolutionConfig {
        &self.config
    }

    /// The current generation. Ranked best-first after a ranking step.
    #[must_use]
    pub fn individuals(&self) -> &[Chromosome] {
        &self.current
    }

    /// Best fitness of every generation ranked so far.
    #[must_use]
    pub fn history(&self) -> Vec<f64> {
        self.stats.iter().map(|s| s.best_fitness).collect()
    }

    /// Copy of the fittest chromosome, available after [`Population::run`].
    #[must_use]
    pub fn best_fit(&self) -> Option<&Chromosome> {
        self.best_fit.as_ref()
    }

    /// Run until a perfect match or the epoch budget is exhausted.
    ///
    /// `reporter` sees the statistics of every `report_interval`-th
    /// generation and of the final one.
    ///
    /// # Errors
    ///
    /// Returns [`EvolutionError::Structural`] if a tree edit fails, which
    /// means the size bookkeeping of some chromosome is broken, and
    /// [`EvolutionError::EmptyPopulation`] if the final generation is empty.
    pub fn run<P: ProgressReporter + ?Sized>(
        &mut self,
        reporter: &mut P,
    ) -> Result<EvolutionOutcome, EvolutionError> {
        let start = Instant::now();
        let first = self.stats.len();
        info!(
            "evolving {} chromosomes toward {} from {:?} for up to {} epochs (seed {})",
            self.config.population_size,
            self.goal,
            self.config.numbers,
            self.config.epochs,
            self.config.seed
        );

        let mut solved = false;
        for remaining in (0..self.config.epochs).rev() {
            let stats = self.rank();
            let interval = self.config.report_interval;
            let last = remaining == 0 || stats.best_fitness.trunc() >= PERFECT_FITNESS;
            if last || (interval > 0 && stats.generation.is_multiple_of(interval)) {
                reporter.on_generation(&stats, start.elapsed());
            }

            if stats.best_fitness.trunc() >= PERFECT_FITNESS {
                solved = true;
                info!("perfect match found in generation {}", stats.generation);
                break;
            }
            self.reproduce()?;
            self.advance();
        }

        let best = self.record_best()?;

        let stats = self.stats[first..].to_vec();
        let elapsed = start.elapsed();
        info!(
            "finished after {} generations in {elapsed:.2?}: {} = {} (fitness {:.4})",
            stats.len(),
            best,
            best.value(),
            best.fitness()
        );

        Ok(EvolutionOutcome {
            history: stats.iter().map(|s| s.best_fitness).collect(),
            generations: stats.len(),
            stats,
            best,
            solved,
            elapsed,
        })
    }

    /// Sort the current generation best-first and record its statistics.
    fn rank(&mut self) -> GenerationStats {
        let mut scored: Vec<(f64, Chromosome)> = self
            .current
            .drain(..)
            .map(|c| (c.fitness(), c))
            .collect();
        scored.sort_by(|a, b| b.0.total_cmp(&a.0));

        self.fitness.clear();
        for (fitness, chromosome) in scored {
            self.fitness.push(fitness);
            self.current.push(chromosome);
        }

        let stats = GenerationStats::from_fitness(self.epoch, &self.fitness);
        self.stats.push(stats);
        self.epoch += 1;
        stats
    }

    /// Fill the next generation from the ranked current one.
    fn reproduce(&mut self) -> Result<(), EvolutionError> {
        let size = self.config.population_size;
        self.next.clear();
        self.next
            .extend(self.current.iter().take(self.config.elitism_count).cloned());

        while self.next.len() < size {
            let (a, b) = select_parents(&self.fitness, &mut self.rng);
            let (mut child_a, mut child_b) = crossover(
                &self.current[a],
                &self.current[b],
                &self.config.crossover,
                &mut self.rng,
            )?;
            child_a.mutate(&mut self.rng)?;
            child_b.mutate(&mut self.rng)?;

            self.next.push(child_a);
            if self.next.len() < size {
                self.next.push(child_b);
            }
        }
        Ok(())
    }

    /// Make the next generation current; the old buffer is reused.
    fn advance(&mut self) {
        std::mem::swap(&mut self.current, &mut self.next);
        self.next.clear();
    }

    /// First chromosome of maximal fitness in the current generation.
    fn fittest(&self) -> Option<&Chromosome> {
        let mut best: Option<(f64, &Chromosome)> = None;
        for chromosome in &self.current {
            let fitness = chromosome.fitness();
            if best.is_none_or(|(f, _)| fitness > f) {
                best = Some((fitness, chromosome));
            }
        }
        best.map(|(_, c)| c)
    }

    /// Remember a copy of the fittest chromosome as the run's best fit.
    fn record_best(&mut self) -> Result<Chromosome, EvolutionError> {
        let best = self.fittest().cloned().ok_or(EvolutionError::EmptyPopulation)?;
        self.best_fit = Some(best.clone());
        Ok(best)
    }
}

/// Build a population from `config` and run it to completion.
///
/// # Errors
///
/// Returns [`EvolutionError::Config`] for an invalid configuration and
/// [`EvolutionError::Structural`] if a tree edit fails during the run.
pub fn evolve<P: ProgressReporter + ?Sized>(
    config: EvolutionConfig,
    reporter: &mut P,
) -> Result<EvolutionOutcome, EvolutionError> {
    Population::new(config)?.run(reporter)
}
