//! Mutation operators for chromosomes.
//!
//! Three operators run on every call, each gated by the chromosome's
//! mutation chance:
//! - grow: append an unused operand to the whole gene, moving toward the goal
//! - replace: splice a fresh two-operand subtree somewhere below the root
//! - point: change the operand or operator of the first node whose coin lands

// Goal comparison happens in floating point
#![allow(clippy::cast_precision_loss)]

use crate::error::StructuralError;
use crate::gp::chromosome::{Chromosome, random_tree};
use crate::gp::tree::Operator;
use rand::Rng;
use rand::seq::{SliceRandom, index};

impl Chromosome {
    /// Mutate the gene in place.
    ///
    /// # Errors
    ///
    /// Returns a [`StructuralError`] only if a tree edit is addressed outside
    /// the gene, which indicates broken size bookkeeping.
    pub fn mutate<R: Rng>(&mut self, rng: &mut R) -> Result<(), StructuralError> {
        let chance = self.mutation_chance();

        if rng.gen_bool(chance) {
            grow(self, rng);
        }
        if rng.gen_bool(chance) {
            replace_subtree(self, rng)?;
        }
        mutate_node(self, rng)
    }
}

/// Wrap the whole gene with an unused operand: `gene + n` below the goal,
/// `gene - n` at or above it.
fn grow<R: Rng>(chromosome: &mut Chromosome, rng: &mut R) {
    let unused = chromosome.unused_numbers();
    let Some(&n) = unused.choose(rng) else {
        return;
    };

    let op = if chromosome.value() < chromosome.goal() as f64 {
        Operator::Add
    } else {
        Operator::Sub
    };
    chromosome.gene_mut().wrap(op, n);
}

/// Replace a random non-root subtree with a random tree over two pool operands.
fn replace_subtree<R: Rng>(chromosome: &mut Chromosome, rng: &mut R) -> Result<(), StructuralError> {
    let size = chromosome.gene().size();
    let numbers = chromosome.numbers();
    if size <= 1 || numbers.len() < 2 {
        return Ok(());
    }

    let picked = index::sample(rng, numbers.len(), 2);
    let pair = [numbers[picked.index(0)], numbers[picked.index(1)]];
    let Some(subtree) = random_tree(&pair, rng) else {
        return Ok(());
    };

    let position = rng.gen_range(2..=size);
    chromosome.gene_mut().replace_subtree_at(position, &subtree)?;
    Ok(())
}

/// Mutate the first node, scanning positions `1..size`, whose coin lands.
///
/// Leaves take another pool value (one occurrence of the current value is
/// set aside first); internal nodes take one of the other three operators.
fn mutate_node<R: Rng>(chromosome: &mut Chromosome, rng: &mut R) -> Result<(), StructuralError> {
    let chance = chromosome.mutation_chance();
    let size = chromosome.gene().size();

    for position in 1..size {
        if !rng.gen_bool(chance) {
            continue;
        }

        let id = chromosome.gene().subtree_at(position)?;
        if let Some(current) = chromosome.gene().number_of(id) {
            let mut candidates = chromosome.numbers().to_vec();
            if let Some(i) = candidates.iter().position(|&n| n == current) {
                candidates.remove(i);
            }
            if let Some(&n) = candidates.choose(rng) {
                chromosome.gene_mut().set_number(id, n)?;
            }
        } else {
            let op = chromosome.gene().operator_of(id)?;
            if let Some(&other) = op.others().choose(rng) {
                chromosome.gene_mut().set_operator(id, other)?;
            }
        }
        break;
    }
    Ok(())
}
