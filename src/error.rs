//! Error types for the solver.
//!
//! Configuration problems are reported when a population or chromosome is
//! built. Structural errors come from tree edits addressed at a node that
//! cannot take them; the evolution engine never triggers them when its size
//! bookkeeping is correct, so callers treat them as fatal.

use std::path::PathBuf;
use thiserror::Error;

/// Invalid solver configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The population cannot hold the requested number of elites plus offspring.
    #[error("population size {population} must be larger than elitism count {elitism}")]
    ElitismTooLarge {
        /// Requested population size.
        population: usize,
        /// Requested elitism count.
        elitism: usize,
    },

    /// Tournament selection samples a fixed number of distinct individuals.
    #[error("population size {population} is below the minimum of {minimum}")]
    PopulationTooSmall {
        /// Requested population size.
        population: usize,
        /// Smallest population the engine accepts.
        minimum: usize,
    },

    /// No target value was given.
    #[error("a goal is required")]
    MissingGoal,

    /// No operands to build expressions from.
    #[error("operand pool needs at least one number")]
    EmptyOperandPool,

    /// Mutation chance outside `[0, 1]`.
    #[error("mutation chance {0} is not within [0, 1]")]
    InvalidMutationChance(f64),

    /// The epoch budget must allow at least one generation.
    #[error("epoch budget must be greater than zero")]
    ZeroEpochs,

    /// Reading a configuration file failed.
    #[error("failed to read config {}: {source}", path.display())]
    Read {
        /// File that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// A configuration file is not valid TOML for this crate.
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// An expression-tree edit that does not fit the addressed node.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StructuralError {
    /// An operator was given without both operands, or an operand without an operator.
    #[error("an operator needs exactly two operands")]
    InvalidConstruction,

    /// Operator text other than `+`, `-`, `*` or `/`.
    #[error("operator {0:?} is not accepted")]
    InvalidOperator(String),

    /// Child index other than 0 or 1, or a child edit aimed at the wrong kind of node.
    #[error("operand position {position} is not valid for this node")]
    InvalidPosition {
        /// The rejected child index.
        position: usize,
    },

    /// Subtree position outside `[1, size]`.
    #[error("position {position} is out of bounds for a subtree of size {size}")]
    OutOfBounds {
        /// Requested 1-based position.
        position: usize,
        /// Size of the subtree that was addressed.
        size: usize,
    },

    /// Operator requested from, or assigned to, a leaf.
    #[error("leaf node has no operator")]
    NoOperator,

    /// Operand value assigned to an internal node.
    #[error("internal node has no operand value")]
    NotALeaf,
}

/// Error during an evolution run.
#[derive(Error, Debug)]
pub enum EvolutionError {
    /// The run was configured incorrectly.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A tree edit failed; this indicates broken size bookkeeping.
    #[error("structural error during evolution: {0}")]
    Structural(#[from] StructuralError),

    /// The run ended with no chromosomes to pick a best fit from.
    #[error("final generation is empty")]
    EmptyPopulation,
}
