//! Subtree crossover.
//!
//! Two parents exchange one subtree each: a position is drawn in each
//! parent, the subtrees found there are copied out, and each is grafted into
//! a copy of the other parent. Parents are never modified.

use crate::error::StructuralError;
use crate::gp::chromosome::Chromosome;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Configuration for crossover operations.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct CrossoverConfig {
    /// Smallest subtree position drawn in either parent.
    ///
    /// Position 1 is the whole tree; the default of 2 keeps the root
    /// operator of both parents in place.
    pub min_position: usize,
}

impl Default for CrossoverConfig {
    fn default() -> Self {
        Self { min_position: 2 }
    }
}

/// Produce two children by exchanging a random subtree of each parent.
///
/// Positions are uniform in `[min_position, size]` for each parent. If
/// either parent is smaller than `min_position` the children are plain
/// copies of the parents.
///
/// # Errors
///
/// Returns [`StructuralError::OutOfBounds`] only if a parent's cached size
/// disagrees with its tree.
pub fn crossover<R: Rng>(
    parent_a: &Chromosome,
    parent_b: &Chromosome,
    config: &CrossoverConfig,
    rng: &mut R,
) -> Result<(Chromosome, Chromosome), StructuralError> {
    let min = config.min_position.max(1);
    let size_a = parent_a.gene().size();
    let size_b = parent_b.gene().size();
    if size_a < min || size_b < min {
        return Ok((parent_a.clone(), parent_b.clone()));
    }

    let pos_a = rng.gen_range(min..=size_a);
    let pos_b = rng.gen_range(min..=size_b);
    crossover_at(parent_a, parent_b, pos_a, pos_b)
}

/// Exchange the subtree at `pos_a` of `parent_a` with the subtree at
/// `pos_b` of `parent_b`.
///
/// The first child is `parent_a` with its subtree replaced by a copy of
/// `parent_b`'s, and the second child is the mirror image.
///
/// # Errors
///
/// Returns [`StructuralError::OutOfBounds`] if either position is outside
/// `[1, size]` of its parent.
pub fn crossover_at(
    parent_a: &Chromosome,
    parent_b: &Chromosome,
    pos_a: usize,
    pos_b: usize,
) -> Result<(Chromosome, Chromosome), StructuralError> {
    let donor_a = parent_a.gene().extract(parent_a.gene().subtree_at(pos_a)?);
    let donor_b = parent_b.gene().extract(parent_b.gene().subtree_at(pos_b)?);

    let mut child_a = parent_a.clone();
    let mut child_b = parent_b.clone();
    child_a.gene_mut().replace_subtree_at(pos_a, &donor_b)?;
    child_b.gene_mut().replace_subtree_at(pos_b, &donor_a)?;
    Ok((child_a, child_b))
}
