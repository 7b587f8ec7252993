#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use reckon::gp::{ExprTree, Operator, Side};

/// One tree edit; positions are reduced modulo the current tree size.
#[derive(Arbitrary, Debug)]
enum Edit {
    /// Set the operator of the node at a position.
    SetOperator { position: u16, op: u8 },
    /// Set the operand of the leaf at a position.
    SetNumber { position: u16, value: i16 },
    /// Replace one child of the node at a position.
    SetOperand { position: u16, right: bool, value: i16 },
    /// Overwrite the subtree at a position with a two-leaf tree.
    Replace { position: u16, op: u8, left: i16, right: i16 },
    /// Make the tree the left child of a new root.
    Wrap { op: u8, value: i16 },
}

/// Structured input for tree-edit fuzzing.
#[derive(Arbitrary, Debug)]
struct TreeInput {
    /// Operand of the initial single-leaf tree.
    seed: i16,
    /// Edits applied in order.
    edits: Vec<Edit>,
}

fn operator(raw: u8) -> Operator {
    Operator::ALL[usize::from(raw) % Operator::ALL.len()]
}

fn position(tree: &ExprTree, raw: u16) -> usize {
    usize::from(raw) % tree.size() + 1
}

fuzz_target!(|input: TreeInput| {
    let mut tree = ExprTree::leaf(i64::from(input.seed));

    // Cap edits to keep trees small
    for edit in input.edits.iter().take(64) {
        match *edit {
            Edit::SetOperator { position: p, op } => {
                let Ok(id) = tree.subtree_at(position(&tree, p)) else {
                    panic!("position inside [1, size] must resolve");
                };
                let _ = tree.set_operator(id, operator(op));
            }
            Edit::SetNumber { position: p, value } => {
                let Ok(id) = tree.subtree_at(position(&tree, p)) else {
                    panic!("position inside [1, size] must resolve");
                };
                let _ = tree.set_number(id, i64::from(value));
            }
            Edit::SetOperand { position: p, right, value } => {
                let Ok(id) = tree.subtree_at(position(&tree, p)) else {
                    panic!("position inside [1, size] must resolve");
                };
                let side = if right { Side::Right } else { Side::Left };
                let _ = tree.set_operand(id, i64::from(value), side);
            }
            Edit::Replace { position: p, op, left, right } => {
                let replacement = ExprTree::join(i64::from(left), operator(op), i64::from(right));
                let pos = position(&tree, p);
                assert!(tree.replace_subtree_at(pos, &replacement).is_ok());
            }
            Edit::Wrap { op, value } => tree.wrap(operator(op), i64::from(value)),
        }

        // Cached size, leaves and slot usage must agree after every edit
        assert_eq!(tree.size(), 2 * tree.leaves().len() - 1);
        assert_eq!(tree.node_count(), tree.size());
        assert!(tree.subtree_at(0).is_err());
        assert!(tree.subtree_at(tree.size() + 1).is_err());
    }
});
