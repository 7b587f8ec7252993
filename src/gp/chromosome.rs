//! Chromosome representation.
//!
//! A chromosome is one expression tree (the gene) together with the goal it
//! is scored against and the operand pool its leaves may draw from. Each
//! operand of the pool may be used at most once; a gene that breaks this,
//! evaluates to a non-integer or grows past the largest possible tree is
//! invalid and scores zero.

// Goal and pool are integers scored in floating point
#![allow(clippy::cast_precision_loss)]

use crate::error::ConfigError;
use crate::gp::tree::{ExprTree, Operator};
use rand::Rng;
use rand::seq::{SliceRandom, index};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;

/// Fitness of an exact match.
pub const PERFECT_FITNESS: f64 = 100.0;

/// A candidate solution: an expression tree scored against a goal.
#[derive(Debug, Clone)]
pub struct Chromosome {
    goal: i64,
    numbers: Vec<i64>,
    mutation_chance: f64,
    gene: ExprTree,
}

impl Chromosome {
    /// Create a chromosome with a random gene.
    ///
    /// A single-number pool yields a single leaf and a two-number pool uses
    /// both numbers. Larger pools use a random subset of between 2 and
    /// `numbers.len() - 1` operands, picked by position without replacement.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyOperandPool`] if `numbers` is empty and
    /// [`ConfigError::InvalidMutationChance`] if `mutation_chance` is outside
    /// `[0, 1]`.
    pub fn new<R: Rng>(
        goal: i64,
        numbers: Vec<i64>,
        mutation_chance: f64,
        rng: &mut R,
    ) -> Result<Self, ConfigError> {
        check_mutation_chance(mutation_chance)?;
        let gene = random_gene(&numbers, rng).ok_or(ConfigError::EmptyOperandPool)?;
        Ok(Self {
            goal,
            numbers,
            mutation_chance,
            gene,
        })
    }

    /// Create a chromosome around an existing gene.
    ///
    /// # Errors
    ///
    /// Same conditions as [`Chromosome::new`].
    pub fn with_gene(
        goal: i64,
        numbers: Vec<i64>,
        mutation_chance: f64,
        gene: ExprTree,
    ) -> Result<Self, ConfigError> {
        check_mutation_chance(mutation_chance)?;
        if numbers.is_empty() {
            return Err(ConfigError::EmptyOperandPool);
        }
        Ok(Self {
            goal,
            numbers,
            mutation_chance,
            gene,
        })
    }

    /// Target value.
    #[must_use]
    pub fn goal(&self) -> i64 {
        self.goal
    }

    /// Operand pool, in the order it was given.
    #[must_use]
    pub fn numbers(&self) -> &[i64] {
        &self.numbers
    }

    /// Probability used by each mutation coin flip.
    #[must_use]
    pub fn mutation_chance(&self) -> f64 {
        self.mutation_chance
    }

    /// The expression tree.
    #[must_use]
    pub fn gene(&self) -> &ExprTree {
        &self.gene
    }

    pub(crate) fn gene_mut(&mut self) -> &mut ExprTree {
        &mut self.gene
    }

    /// Value of the gene.
    #[must_use]
    pub fn value(&self) -> f64 {
        self.gene.value()
    }

    /// Size of a tree that uses every operand exactly once.
    #[must_use]
    pub fn max_size(&self) -> usize {
        (2 * self.numbers.len()).saturating_sub(1)
    }

    /// Closeness of the gene's value to the goal.
    ///
    /// An exact match scores [`PERFECT_FITNESS`]; invalid genes score 0.
    /// Valid genes far from the goal can score below zero.
    #[must_use]
    pub fn fitness(&self) -> f64 {
        if !self.is_valid() {
            return 0.0;
        }
        let goal = self.goal as f64;
        PERFECT_FITNESS * (1.0 - (goal - self.gene.value()).abs() / (goal.abs() + 1.0))
    }

    /// Whether the gene is an integer-valued expression that uses each pool
    /// operand at most once.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        let value = self.gene.value();
        if !value.is_finite() || value.fract() != 0.0 || self.gene.size() > self.max_size() {
            return false;
        }

        let mut available = count(&self.numbers);
        for leaf in self.gene.leaves() {
            match available.get_mut(leaf) {
                Some(remaining) if *remaining > 0 => *remaining -= 1,
                _ => return false,
            }
        }
        true
    }

    /// Pool operands not used by the gene, in pool order.
    #[must_use]
    pub fn unused_numbers(&self) -> Vec<i64> {
        let mut used = count(self.gene.leaves());
        self.numbers
            .iter()
            .copied()
            .filter(|n| match used.get_mut(n) {
                Some(remaining) if *remaining > 0 => {
                    *remaining -= 1;
                    false
                }
                _ => true,
            })
            .collect()
    }
}

impl fmt::Display for Chromosome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.gene)
    }
}

/// Chromosomes compare by fitness.
impl PartialEq for Chromosome {
    fn eq(&self, other: &Self) -> bool {
        self.fitness().total_cmp(&other.fitness()) == Ordering::Equal
    }
}

impl PartialOrd for Chromosome {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.fitness().total_cmp(&other.fitness()))
    }
}

/// Build a random full binary tree over `operands`, in the given order.
///
/// The list is split at a uniform point, each half becomes a subtree and
/// the halves are joined under a uniform operator. Returns `None` for an
/// empty list.
pub fn random_tree<R: Rng>(operands: &[i64], rng: &mut R) -> Option<ExprTree> {
    match operands {
        [] => None,
        [n] => Some(ExprTree::leaf(*n)),
        _ => {
            let op = *Operator::ALL.choose(rng)?;
            let split = rng.gen_range(1..operands.len());
            let left = random_tree(&operands[..split], rng)?;
            let right = random_tree(&operands[split..], rng)?;
            Some(ExprTree::join(left, op, right))
        }
    }
}

fn random_gene<R: Rng>(numbers: &[i64], rng: &mut R) -> Option<ExprTree> {
    match numbers.len() {
        0 => None,
        1 => random_tree(numbers, rng),
        len => {
            let k = if len == 2 { 2 } else { rng.gen_range(2..len) };
            let chosen: Vec<i64> = index::sample(rng, len, k)
                .into_iter()
                .map(|i| numbers[i])
                .collect();
            random_tree(&chosen, rng)
        }
    }
}

fn check_mutation_chance(chance: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&chance) {
        Ok(())
    } else {
        Err(ConfigError::InvalidMutationChance(chance))
    }
}

fn count(values: &[i64]) -> HashMap<i64, usize> {
    let mut counts = HashMap::with_capacity(values.len());
    for &v in values {
        *counts.entry(v).or_insert(0) += 1;
    }
    counts
}
