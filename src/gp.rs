//! Genetic programming search for numbers-game expressions.
//!
//! A population of chromosomes, each an arithmetic expression tree over the
//! operand pool, evolves toward the goal until some expression hits it
//! exactly or the epoch budget runs out.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │         Evolution Loop              │
//! ├─────────────────────────────────────┤
//! │  Selection │ Crossover │ Mutation   │
//! ├─────────────────────────────────────┤
//! │     Chromosome (fitness, validity)  │
//! ├─────────────────────────────────────┤
//! │     Expression Tree (arena)         │
//! └─────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use reckon::gp::{EvolutionConfig, evolve};
//!
//! let config = EvolutionConfig {
//!     goal: Some(24),
//!     numbers: vec![3, 8, 1],
//!     epochs: 50,
//!     ..EvolutionConfig::default()
//! };
//! let outcome = evolve(config, &mut ())?;
//! println!("{} = {}", outcome.best, outcome.best.value());
//! # Ok::<(), reckon::error::EvolutionError>(())
//! ```

mod chromosome;
mod crossover;
mod evolution;
mod mutation;
mod selection;
mod tree;

pub use chromosome::{Chromosome, PERFECT_FITNESS, random_tree};
pub use crossover::{CrossoverConfig, crossover, crossover_at};
pub use evolution::{
    EvolutionConfig, EvolutionOutcome, LogReporter, MIN_POPULATION, Population, ProgressReporter,
    evolve,
};
pub use selection::{GenerationStats, TOURNAMENT_SIZE, select_parents, tournament_select};
pub use tree::{ExprTree, NodeId, OPERATOR_WEIGHT, Operand, Operator, Side};
