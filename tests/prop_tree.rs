//! Property-based tests for expression trees and the operators built on them.
//!
//! Run with: cargo test --release prop_tree

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::float_cmp)]

use proptest::prelude::*;
use rand::SeedableRng;
use rand::rngs::SmallRng;

use reckon::error::StructuralError;
use reckon::gp::{Chromosome, ExprTree, NodeId, Operator, Side, crossover_at, random_tree};

/// One edit applied to a tree; positions are reduced modulo the tree size.
#[derive(Debug, Clone)]
enum Edit {
    SetOperator(usize, usize),
    SetNumber(usize, i64),
    SetOperand(usize, bool, i64),
    Replace(usize, u64, Vec<i64>),
    Wrap(usize, i64),
}

fn operands() -> impl Strategy<Value = Vec<i64>> {
    prop::collection::vec(-20i64..=20, 1..8)
}

fn edit() -> impl Strategy<Value = Edit> {
    prop_oneof![
        (any::<usize>(), 0usize..4).prop_map(|(p, o)| Edit::SetOperator(p, o)),
        (any::<usize>(), -20i64..=20).prop_map(|(p, n)| Edit::SetNumber(p, n)),
        (any::<usize>(), any::<bool>(), -20i64..=20).prop_map(|(p, s, n)| Edit::SetOperand(p, s, n)),
        (any::<usize>(), any::<u64>(), operands()).prop_map(|(p, s, v)| Edit::Replace(p, s, v)),
        (0usize..4, -20i64..=20).prop_map(|(o, n)| Edit::Wrap(o, n)),
    ]
}

fn tree(seed: u64, operands: &[i64]) -> ExprTree {
    random_tree(operands, &mut SmallRng::seed_from_u64(seed)).unwrap()
}

fn position(tree: &ExprTree, raw: usize) -> usize {
    raw % tree.size() + 1
}

fn apply(tree: &mut ExprTree, edit: &Edit) {
    match edit {
        Edit::SetOperator(p, o) => {
            let id = tree.subtree_at(position(tree, *p)).unwrap();
            let result = tree.set_operator(id, Operator::ALL[*o]);
            assert_eq!(result.is_err(), tree.is_leaf(id));
        }
        Edit::SetNumber(p, n) => {
            let id = tree.subtree_at(position(tree, *p)).unwrap();
            let was_leaf = tree.is_leaf(id);
            let result = tree.set_number(id, *n);
            assert_eq!(result, if was_leaf { Ok(()) } else { Err(StructuralError::NotALeaf) });
        }
        Edit::SetOperand(p, right, n) => {
            let id = tree.subtree_at(position(tree, *p)).unwrap();
            let side = if *right { Side::Right } else { Side::Left };
            let was_leaf = tree.is_leaf(id);
            assert_eq!(tree.set_operand(id, *n, side).is_err(), was_leaf);
        }
        Edit::Replace(p, seed, operands) => {
            let replacement = random_tree(operands, &mut SmallRng::seed_from_u64(*seed)).unwrap();
            let pos = position(tree, *p);
            tree.replace_subtree_at(pos, &replacement).unwrap();
        }
        Edit::Wrap(o, n) => tree.wrap(Operator::ALL[*o], *n),
    }
}

/// Evaluate the fully parenthesized rendering of a tree.
fn evaluate(text: &str) -> f64 {
    fn expr(chars: &[u8], i: &mut usize) -> f64 {
        if chars[*i] == b'(' {
            *i += 1;
            let left = expr(chars, i);
            *i += 1; // space
            let op = Operator::try_from(chars[*i] as char).unwrap();
            *i += 2; // operator and space
            let right = expr(chars, i);
            assert_eq!(chars[*i], b')');
            *i += 1;
            op.apply(left, right)
        } else {
            let start = *i;
            if chars[*i] == b'-' {
                *i += 1;
            }
            while *i < chars.len() && chars[*i].is_ascii_digit() {
                *i += 1;
            }
            let literal = std::str::from_utf8(&chars[start..*i]).unwrap();
            literal.parse::<i64>().unwrap() as f64
        }
    }

    let mut i = 0;
    let value = expr(text.as_bytes(), &mut i);
    assert_eq!(i, text.len());
    value
}

fn same_value(a: f64, b: f64) -> bool {
    a == b || (a.is_nan() && b.is_nan())
}

fn sorted(values: &[i64]) -> Vec<i64> {
    let mut values = values.to_vec();
    values.sort_unstable();
    values
}

/// Check the cached size, leaves and value of `id` and everything below it
/// against its children, and record the nodes in pre-order.
fn check_node(tree: &ExprTree, id: NodeId, order: &mut Vec<NodeId>) -> Result<(), TestCaseError> {
    order.push(id);
    match tree.children(id) {
        None => {
            let number = tree.number_of(id);
            prop_assert!(number.is_some());
            let number = number.unwrap();
            prop_assert_eq!(tree.size_of(id), 1);
            prop_assert_eq!(tree.leaves_of(id), &[number][..]);
            prop_assert_eq!(tree.value_of(id), number as f64);
            prop_assert!(tree.operator_of(id).is_err());
        }
        Some((left, right)) => {
            prop_assert_eq!(tree.parent(left), Some(id));
            prop_assert_eq!(tree.parent(right), Some(id));
            prop_assert_eq!(tree.number_of(id), None);

            check_node(tree, left, order)?;
            check_node(tree, right, order)?;

            prop_assert_eq!(tree.size_of(id), 1 + tree.size_of(left) + tree.size_of(right));
            let joined: Vec<i64> = tree
                .leaves_of(left)
                .iter()
                .chain(tree.leaves_of(right))
                .copied()
                .collect();
            prop_assert_eq!(tree.leaves_of(id), joined.as_slice());

            let op = tree.operator_of(id).unwrap();
            let expected = op.apply(tree.value_of(left), tree.value_of(right));
            prop_assert!(
                same_value(tree.value_of(id), expected),
                "node caches {} but {} {} {} = {}",
                tree.value_of(id),
                tree.value_of(left),
                op,
                tree.value_of(right),
                expected
            );
        }
    }
    Ok(())
}

fn assert_consistent(tree: &ExprTree) -> Result<(), TestCaseError> {
    let root = tree.root();
    prop_assert_eq!(tree.parent(root), None);

    let mut order = Vec::new();
    check_node(tree, root, &mut order)?;
    prop_assert_eq!(order.len(), tree.size());
    prop_assert_eq!(tree.node_count(), tree.size());
    prop_assert_eq!(tree.size(), 2 * tree.leaves().len() - 1);
    for (i, id) in order.iter().enumerate() {
        prop_assert_eq!(tree.subtree_at(i + 1), Ok(*id), "position {}", i + 1);
    }

    let rendered = tree.to_string();
    prop_assert!(
        same_value(tree.value(), evaluate(&rendered)),
        "{} evaluates to {} but tree caches {}",
        rendered,
        evaluate(&rendered),
        tree.value()
    );
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(2000))]

    /// Caches stay consistent under any sequence of edits.
    #[test]
    fn prop_edits_keep_caches_consistent(
        seed in any::<u64>(),
        operands in operands(),
        edits in prop::collection::vec(edit(), 0..12)
    ) {
        let mut tree = tree(seed, &operands);
        assert_consistent(&tree)?;
        for edit in &edits {
            apply(&mut tree, edit);
            assert_consistent(&tree)?;
        }
    }

    /// Every position in [1, size] addresses a node; nothing outside does.
    #[test]
    fn prop_subtree_at_total(seed in any::<u64>(), operands in operands()) {
        let tree = tree(seed, &operands);
        let size = tree.size();
        for pos in 1..=size {
            let id = tree.subtree_at(pos).unwrap();
            prop_assert!(tree.size_of(id) <= size + 1 - pos);
        }
        prop_assert_eq!(
            tree.subtree_at(0),
            Err(StructuralError::OutOfBounds { position: 0, size })
        );
        prop_assert_eq!(
            tree.subtree_at(size + 1),
            Err(StructuralError::OutOfBounds { position: size + 1, size })
        );
    }

    /// Pre-order positions visit leaves left to right.
    #[test]
    fn prop_leaf_positions_follow_leaves(seed in any::<u64>(), operands in operands()) {
        let tree = tree(seed, &operands);
        let in_order: Vec<i64> = (1..=tree.size())
            .filter_map(|pos| tree.number_of(tree.subtree_at(pos).unwrap()))
            .collect();
        prop_assert_eq!(in_order.as_slice(), tree.leaves());
    }

    /// Crossover swaps exactly the addressed subtrees.
    #[test]
    fn prop_crossover_exchanges_subtrees(
        seed_a in any::<u64>(),
        seed_b in any::<u64>(),
        operands_a in operands(),
        operands_b in operands(),
        raw_a in any::<usize>(),
        raw_b in any::<usize>()
    ) {
        let pool: Vec<i64> = operands_a.iter().chain(&operands_b).copied().collect();
        let a = Chromosome::with_gene(0, pool.clone(), 0.05, tree(seed_a, &operands_a)).unwrap();
        let b = Chromosome::with_gene(0, pool, 0.05, tree(seed_b, &operands_b)).unwrap();
        let pos_a = position(a.gene(), raw_a);
        let pos_b = position(b.gene(), raw_b);

        let sub_a = a.gene().extract(a.gene().subtree_at(pos_a).unwrap());
        let sub_b = b.gene().extract(b.gene().subtree_at(pos_b).unwrap());
        let before_a = a.gene().to_string();
        let before_b = b.gene().to_string();

        let (child_a, child_b) = crossover_at(&a, &b, pos_a, pos_b).unwrap();

        let grafted_a = child_a.gene().extract(child_a.gene().subtree_at(pos_a).unwrap());
        let grafted_b = child_b.gene().extract(child_b.gene().subtree_at(pos_b).unwrap());
        prop_assert!(grafted_a.structurally_eq(&sub_b));
        prop_assert!(grafted_b.structurally_eq(&sub_a));

        prop_assert_eq!(child_a.gene().size(), a.gene().size() - sub_a.size() + sub_b.size());
        prop_assert_eq!(child_b.gene().size(), b.gene().size() - sub_b.size() + sub_a.size());

        let mut parents: Vec<i64> = a.gene().leaves().to_vec();
        parents.extend_from_slice(b.gene().leaves());
        let mut children: Vec<i64> = child_a.gene().leaves().to_vec();
        children.extend_from_slice(child_b.gene().leaves());
        prop_assert_eq!(sorted(&parents), sorted(&children));

        prop_assert_eq!(a.gene().to_string(), before_a);
        prop_assert_eq!(b.gene().to_string(), before_b);
        assert_consistent(child_a.gene())?;
        assert_consistent(child_b.gene())?;
    }

    /// Mutation keeps the gene well formed.
    #[test]
    fn prop_mutation_keeps_caches_consistent(
        seed in any::<u64>(),
        goal in -100i64..=100,
        numbers in prop::collection::vec(0i64..=20, 1..7),
        chance in 0.0f64..=1.0
    ) {
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut chromosome = Chromosome::new(goal, numbers, chance, &mut rng).unwrap();
        for _ in 0..8 {
            chromosome.mutate(&mut rng).unwrap();
            assert_consistent(chromosome.gene())?;
        }
    }
}
