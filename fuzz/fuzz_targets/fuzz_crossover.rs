#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use reckon::gp::{Chromosome, crossover_at};

/// Structured input for crossover fuzzing.
#[derive(Arbitrary, Debug)]
struct CrossoverInput {
    /// RNG seed for both random parents.
    seed: u64,
    /// Operand pool.
    numbers: Vec<i8>,
    /// Raw crossover position in the first parent.
    pos_a: u16,
    /// Raw crossover position in the second parent.
    pos_b: u16,
}

fuzz_target!(|input: CrossoverInput| {
    // Cap the pool to keep trees small
    let numbers: Vec<i64> = input.numbers.iter().take(12).map(|&n| i64::from(n)).collect();
    let mut rng = SmallRng::seed_from_u64(input.seed);
    let (Ok(a), Ok(b)) = (
        Chromosome::new(0, numbers.clone(), 0.1, &mut rng),
        Chromosome::new(0, numbers, 0.1, &mut rng),
    ) else {
        return; // Empty pool
    };

    let pos_a = usize::from(input.pos_a) % a.gene().size() + 1;
    let pos_b = usize::from(input.pos_b) % b.gene().size() + 1;
    let Ok((child_a, child_b)) = crossover_at(&a, &b, pos_a, pos_b) else {
        panic!("positions inside [1, size] must be accepted");
    };

    // Operands are exchanged, never created or lost
    assert_eq!(
        child_a.gene().leaves().len() + child_b.gene().leaves().len(),
        a.gene().leaves().len() + b.gene().leaves().len()
    );
    assert_eq!(
        child_a.gene().size() + child_b.gene().size(),
        a.gene().size() + b.gene().size()
    );
});
