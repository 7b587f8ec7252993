//! Binary expression trees over integer operands.
//!
//! Nodes live in a flat arena owned by [`ExprTree`] and refer to each other by
//! [`NodeId`]. Every node caches its value, its size and the left-to-right
//! list of leaf operands below it. Edits recompute those caches from the
//! edited node up to the root by following parent indices, so a local change
//! never requires a full re-walk of the tree.
//!
//! Subtrees are addressed by 1-based pre-order position: position 1 is the
//! addressed node itself, positions `2..=left.size + 1` fall in the left
//! child and the rest in the right child.

// Leaf operands are small integers; converting them to f64 is intentional
#![allow(clippy::cast_precision_loss)]

use crate::error::StructuralError;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Size contributed by an operator on top of its two operands.
pub const OPERATOR_WEIGHT: usize = 1;

/// Index of a node slot inside an [`ExprTree`].
///
/// Ids are only meaningful for the tree that produced them, and only until
/// the subtree containing them is replaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// One of the four arithmetic operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    /// Addition.
    Add,
    /// Subtraction.
    Sub,
    /// Multiplication.
    Mul,
    /// Division; a zero divisor yields positive infinity.
    Div,
}

impl Operator {
    /// All operators, in symbol order `+ - * /`.
    pub const ALL: [Operator; 4] = [Operator::Add, Operator::Sub, Operator::Mul, Operator::Div];

    /// The operator's symbol.
    #[must_use]
    pub fn symbol(self) -> char {
        match self {
            Self::Add => '+',
            Self::Sub => '-',
            Self::Mul => '*',
            Self::Div => '/',
        }
    }

    /// Parse an operator symbol.
    ///
    /// # Errors
    ///
    /// Returns [`StructuralError::InvalidOperator`] for anything other than
    /// `+`, `-`, `*` or `/`.
    pub fn from_symbol(symbol: &str) -> Result<Self, StructuralError> {
        match symbol {
            "+" => Ok(Self::Add),
            "-" => Ok(Self::Sub),
            "*" => Ok(Self::Mul),
            "/" => Ok(Self::Div),
            other => Err(StructuralError::InvalidOperator(other.to_string())),
        }
    }

    /// Apply the operator to two values.
    ///
    /// Division by zero is absorbed as `+inf` rather than reported.
    #[must_use]
    pub fn apply(self, left: f64, right: f64) -> f64 {
        match self {
            Self::Add => left + right,
            Self::Sub => left - right,
            Self::Mul => left * right,
            Self::Div => {
                if right == 0.0 {
                    f64::INFINITY
                } else {
                    left / right
                }
            }
        }
    }

    /// The three operators other than this one.
    #[must_use]
    pub fn others(self) -> [Operator; 3] {
        match self {
            Self::Add => [Self::Sub, Self::Mul, Self::Div],
            Self::Sub => [Self::Add, Self::Mul, Self::Div],
            Self::Mul => [Self::Add, Self::Sub, Self::Div],
            Self::Div => [Self::Add, Self::Sub, Self::Mul],
        }
    }
}

impl FromStr for Operator {
    type Err = StructuralError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_symbol(s)
    }
}

impl TryFrom<char> for Operator {
    type Error = StructuralError;

    fn try_from(c: char) -> Result<Self, Self::Error> {
        let mut buf = [0u8; 4];
        Self::from_symbol(c.encode_utf8(&mut buf))
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Which child of an internal node an edit targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// First operand (index 0).
    Left,
    /// Second operand (index 1).
    Right,
}

impl Side {
    /// Child index of this side.
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Self::Left => 0,
            Self::Right => 1,
        }
    }
}

impl TryFrom<usize> for Side {
    type Error = StructuralError;

    fn try_from(position: usize) -> Result<Self, Self::Error> {
        match position {
            0 => Ok(Self::Left),
            1 => Ok(Self::Right),
            position => Err(StructuralError::InvalidPosition { position }),
        }
    }
}

/// Something that can be placed in an operand slot.
///
/// Raw numbers become fresh leaves.
#[derive(Debug, Clone)]
pub enum Operand {
    /// A bare number.
    Number(i64),
    /// An existing subtree.
    Tree(ExprTree),
}

impl Operand {
    fn into_tree(self) -> ExprTree {
        match self {
            Self::Number(n) => ExprTree::leaf(n),
            Self::Tree(tree) => tree,
        }
    }
}

impl From<i64> for Operand {
    fn from(n: i64) -> Self {
        Self::Number(n)
    }
}

impl From<ExprTree> for Operand {
    fn from(tree: ExprTree) -> Self {
        Self::Tree(tree)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Payload {
    Leaf(i64),
    Branch {
        op: Operator,
        left: NodeId,
        right: NodeId,
    },
}

#[derive(Debug, Clone)]
struct Node {
    payload: Payload,
    parent: Option<NodeId>,
    value: f64,
    size: usize,
    leaves: Vec<i64>,
}

impl Node {
    fn leaf(n: i64) -> Self {
        Self {
            payload: Payload::Leaf(n),
            parent: None,
            value: n as f64,
            size: 1,
            leaves: vec![n],
        }
    }

    /// Internal node whose caches are filled in by the next recompute.
    fn branch(op: Operator, left: NodeId, right: NodeId) -> Self {
        Self {
            payload: Payload::Branch { op, left, right },
            parent: None,
            value: 0.0,
            size: 0,
            leaves: Vec::new(),
        }
    }
}

/// A binary expression tree with cached value, size and leaves.
#[derive(Debug, Clone)]
pub struct ExprTree {
    nodes: Vec<Node>,
    free: Vec<NodeId>,
    root: NodeId,
}

impl ExprTree {
    /// A single-leaf tree.
    #[must_use]
    pub fn leaf(value: i64) -> Self {
        Self {
            nodes: vec![Node::leaf(value)],
            free: Vec::new(),
            root: NodeId(0),
        }
    }

    /// Join two operands under a new root.
    #[must_use]
    pub fn join(left: impl Into<Operand>, op: Operator, right: impl Into<Operand>) -> Self {
        let mut tree = left.into().into_tree();
        tree.wrap(op, right);
        tree
    }

    /// General constructor: a leaf when no operator is given, otherwise an
    /// operator applied to `first` and `second`.
    ///
    /// # Errors
    ///
    /// Returns [`StructuralError::InvalidConstruction`] if exactly one of
    /// `op` and `second` is present.
    pub fn build(
        first: impl Into<Operand>,
        op: Option<Operator>,
        second: Option<Operand>,
    ) -> Result<Self, StructuralError> {
        match (op, second) {
            (None, None) => Ok(first.into().into_tree()),
            (Some(op), Some(second)) => Ok(Self::join(first, op, second)),
            _ => Err(StructuralError::InvalidConstruction),
        }
    }

    /// Make the whole tree the left operand of `op`, with `right` as the
    /// right operand.
    pub fn wrap(&mut self, op: Operator, right: impl Into<Operand>) {
        let right = right.into().into_tree();
        let old_root = self.root;
        let right_root = self.import(&right, right.root, None);
        let root = self.alloc(Node::branch(op, old_root, right_root));
        self.nodes[old_root.0].parent = Some(root);
        self.nodes[right_root.0].parent = Some(root);
        self.root = root;
        self.refresh(root);
    }

    /// Id of the root node.
    #[must_use]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Value of the whole expression.
    #[must_use]
    pub fn value(&self) -> f64 {
        self.value_of(self.root)
    }

    /// Size of the whole tree.
    #[must_use]
    pub fn size(&self) -> usize {
        self.size_of(self.root)
    }

    /// Leaf operands of the whole tree, left to right.
    #[must_use]
    pub fn leaves(&self) -> &[i64] {
        self.leaves_of(self.root)
    }

    /// Operator at the root.
    ///
    /// # Errors
    ///
    /// Returns [`StructuralError::NoOperator`] if the tree is a single leaf.
    pub fn operator(&self) -> Result<Operator, StructuralError> {
        self.operator_of(self.root)
    }

    /// Cached value of the subtree rooted at `id`.
    #[must_use]
    pub fn value_of(&self, id: NodeId) -> f64 {
        self.nodes[id.0].value
    }

    /// Cached size of the subtree rooted at `id`.
    #[must_use]
    pub fn size_of(&self, id: NodeId) -> usize {
        self.nodes[id.0].size
    }

    /// Cached leaf operands of the subtree rooted at `id`.
    #[must_use]
    pub fn leaves_of(&self, id: NodeId) -> &[i64] {
        &self.nodes[id.0].leaves
    }

    /// Operator of the node `id`.
    ///
    /// # Errors
    ///
    /// Returns [`StructuralError::NoOperator`] if `id` is a leaf.
    pub fn operator_of(&self, id: NodeId) -> Result<Operator, StructuralError> {
        match self.nodes[id.0].payload {
            Payload::Branch { op, .. } => Ok(op),
            Payload::Leaf(_) => Err(StructuralError::NoOperator),
        }
    }

    /// Operand of the leaf `id`, or `None` for an internal node.
    #[must_use]
    pub fn number_of(&self, id: NodeId) -> Option<i64> {
        match self.nodes[id.0].payload {
            Payload::Leaf(n) => Some(n),
            Payload::Branch { .. } => None,
        }
    }

    /// Whether `id` is a leaf.
    #[must_use]
    pub fn is_leaf(&self, id: NodeId) -> bool {
        matches!(self.nodes[id.0].payload, Payload::Leaf(_))
    }

    /// Children of `id`, or `None` for a leaf.
    #[must_use]
    pub fn children(&self, id: NodeId) -> Option<(NodeId, NodeId)> {
        match self.nodes[id.0].payload {
            Payload::Branch { left, right, .. } => Some((left, right)),
            Payload::Leaf(_) => None,
        }
    }

    /// Parent of `id`, or `None` for the root.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    /// Number of live nodes in the arena.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len() - self.free.len()
    }

    /// Replace the operator of `id`.
    ///
    /// # Errors
    ///
    /// Returns [`StructuralError::NoOperator`] if `id` is a leaf.
    pub fn set_operator(&mut self, id: NodeId, op: Operator) -> Result<(), StructuralError> {
        match &mut self.nodes[id.0].payload {
            Payload::Branch { op: current, .. } => *current = op,
            Payload::Leaf(_) => return Err(StructuralError::NoOperator),
        }
        self.refresh(id);
        Ok(())
    }

    /// Replace the operator of `id` by symbol.
    ///
    /// # Errors
    ///
    /// Returns [`StructuralError::InvalidOperator`] for an unknown symbol and
    /// [`StructuralError::NoOperator`] if `id` is a leaf.
    pub fn set_operator_symbol(&mut self, id: NodeId, symbol: &str) -> Result<(), StructuralError> {
        let op = Operator::from_symbol(symbol)?;
        self.set_operator(id, op)
    }

    /// Replace one child of `id` and return the new child's id.
    ///
    /// # Errors
    ///
    /// Returns [`StructuralError::InvalidPosition`] if `id` is a leaf.
    pub fn set_operand(
        &mut self,
        id: NodeId,
        operand: impl Into<Operand>,
        side: Side,
    ) -> Result<NodeId, StructuralError> {
        let Payload::Branch { left, right, .. } = self.nodes[id.0].payload else {
            return Err(StructuralError::InvalidPosition {
                position: side.index(),
            });
        };
        let old = match side {
            Side::Left => left,
            Side::Right => right,
        };

        let operand = operand.into().into_tree();
        self.release(old);
        let child = self.import(&operand, operand.root, Some(id));
        if let Payload::Branch { left, right, .. } = &mut self.nodes[id.0].payload {
            match side {
                Side::Left => *left = child,
                Side::Right => *right = child,
            }
        }
        self.refresh(id);
        Ok(child)
    }

    /// Overwrite the operand of the leaf `id`.
    ///
    /// # Errors
    ///
    /// Returns [`StructuralError::NotALeaf`] if `id` is an internal node.
    pub fn set_number(&mut self, id: NodeId, value: i64) -> Result<(), StructuralError> {
        match &mut self.nodes[id.0].payload {
            Payload::Leaf(n) => *n = value,
            Payload::Branch { .. } => return Err(StructuralError::NotALeaf),
        }
        self.refresh(id);
        Ok(())
    }

    /// Find the node at a 1-based pre-order position within the subtree
    /// rooted at `from`.
    ///
    /// # Errors
    ///
    /// Returns [`StructuralError::OutOfBounds`] if `position` is 0 or larger
    /// than the subtree's size.
    pub fn locate(&self, from: NodeId, position: usize) -> Result<NodeId, StructuralError> {
        let size = self.size_of(from);
        if position == 0 || position > size {
            return Err(StructuralError::OutOfBounds { position, size });
        }

        let mut pos = position;
        let mut current = from;
        while pos != 1 {
            // pos stays within [1, size_of(current)], so current is a branch here
            let Payload::Branch { left, right, .. } = self.nodes[current.0].payload else {
                return Err(StructuralError::OutOfBounds { position, size });
            };
            let left_size = self.size_of(left);
            if pos <= left_size + 1 {
                pos -= 1;
                current = left;
            } else {
                pos -= left_size + 1;
                current = right;
            }
        }
        Ok(current)
    }

    /// Find the node at a 1-based pre-order position in the whole tree.
    ///
    /// # Errors
    ///
    /// Returns [`StructuralError::OutOfBounds`] if `position` is outside
    /// `[1, size]`.
    pub fn subtree_at(&self, position: usize) -> Result<NodeId, StructuralError> {
        self.locate(self.root, position)
    }

    /// Overwrite the subtree at `position` with a copy of `replacement`.
    ///
    /// The addressed slot keeps its id and parent link; only its content is
    /// swapped. Returns the id of the overwritten slot.
    ///
    /// # Errors
    ///
    /// Returns [`StructuralError::OutOfBounds`] if `position` is outside
    /// `[1, size]`.
    pub fn replace_subtree_at(
        &mut self,
        position: usize,
        replacement: &ExprTree,
    ) -> Result<NodeId, StructuralError> {
        let target = self.subtree_at(position)?;
        self.replace_subtree(target, replacement);
        Ok(target)
    }

    /// Overwrite the content of slot `target` with a copy of `replacement`.
    pub fn replace_subtree(&mut self, target: NodeId, replacement: &ExprTree) {
        if let Payload::Branch { left, right, .. } = self.nodes[target.0].payload {
            self.release(left);
            self.release(right);
        }

        let payload = match replacement.nodes[replacement.root.0].payload {
            Payload::Leaf(n) => Payload::Leaf(n),
            Payload::Branch { op, left, right } => {
                let left = self.import(replacement, left, Some(target));
                let right = self.import(replacement, right, Some(target));
                Payload::Branch { op, left, right }
            }
        };
        self.nodes[target.0].payload = payload;
        self.refresh(target);
    }

    /// Deep-copy the subtree rooted at `id` into a standalone tree.
    #[must_use]
    pub fn extract(&self, id: NodeId) -> ExprTree {
        let mut out = ExprTree {
            nodes: Vec::with_capacity(self.size_of(id)),
            free: Vec::new(),
            root: NodeId(0),
        };
        out.root = out.import(self, id, None);
        out
    }

    /// Whether both trees have the same operators and operands in the same
    /// shape.
    #[must_use]
    pub fn structurally_eq(&self, other: &ExprTree) -> bool {
        self.shape_eq(self.root, other, other.root)
    }

    fn shape_eq(&self, id: NodeId, other: &ExprTree, other_id: NodeId) -> bool {
        match (self.nodes[id.0].payload, other.nodes[other_id.0].payload) {
            (Payload::Leaf(a), Payload::Leaf(b)) => a == b,
            (
                Payload::Branch { op, left, right },
                Payload::Branch {
                    op: other_op,
                    left: other_left,
                    right: other_right,
                },
            ) => {
                op == other_op
                    && self.shape_eq(left, other, other_left)
                    && self.shape_eq(right, other, other_right)
            }
            _ => false,
        }
    }

    fn alloc(&mut self, node: Node) -> NodeId {
        if let Some(id) = self.free.pop() {
            self.nodes[id.0] = node;
            id
        } else {
            self.nodes.push(node);
            NodeId(self.nodes.len() - 1)
        }
    }

    /// Copy the subtree `src_id` of `src` into this arena under `parent`.
    ///
    /// `src` is consistent, so its caches are copied as they are.
    fn import(&mut self, src: &ExprTree, src_id: NodeId, parent: Option<NodeId>) -> NodeId {
        let mut node = src.nodes[src_id.0].clone();
        node.parent = parent;
        let id = self.alloc(node);

        if let Payload::Branch { op, left, right } = src.nodes[src_id.0].payload {
            let left = self.import(src, left, Some(id));
            let right = self.import(src, right, Some(id));
            self.nodes[id.0].payload = Payload::Branch { op, left, right };
        }
        id
    }

    /// Return the subtree rooted at `id` to the free list.
    fn release(&mut self, id: NodeId) {
        if let Payload::Branch { left, right, .. } = self.nodes[id.0].payload {
            self.release(left);
            self.release(right);
        }
        let node = &mut self.nodes[id.0];
        node.payload = Payload::Leaf(0);
        node.parent = None;
        node.leaves = Vec::new();
        self.free.push(id);
    }

    /// Recompute caches from `from` up to the root.
    fn refresh(&mut self, from: NodeId) {
        let mut current = Some(from);
        while let Some(id) = current {
            self.recompute(id);
            current = self.nodes[id.0].parent;
        }
    }

    fn recompute(&mut self, id: NodeId) {
        match self.nodes[id.0].payload {
            Payload::Leaf(n) => {
                let node = &mut self.nodes[id.0];
                node.value = n as f64;
                node.size = 1;
                node.leaves.clear();
                node.leaves.push(n);
            }
            Payload::Branch { op, left, right } => {
                let (l, r) = (&self.nodes[left.0], &self.nodes[right.0]);
                let value = op.apply(l.value, r.value);
                let size = OPERATOR_WEIGHT + l.size + r.size;
                let mut leaves = Vec::with_capacity(l.leaves.len() + r.leaves.len());
                leaves.extend_from_slice(&l.leaves);
                leaves.extend_from_slice(&r.leaves);

                let node = &mut self.nodes[id.0];
                node.value = value;
                node.size = size;
                node.leaves = leaves;
            }
        }
    }

    fn fmt_node(&self, id: NodeId, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.nodes[id.0].payload {
            Payload::Leaf(n) => write!(f, "{n}"),
            Payload::Branch { op, left, right } => {
                write!(f, "(")?;
                self.fmt_node(left, f)?;
                write!(f, " {op} ")?;
                self.fmt_node(right, f)?;
                write!(f, ")")
            }
        }
    }
}

impl From<i64> for ExprTree {
    fn from(n: i64) -> Self {
        Self::leaf(n)
    }
}

impl fmt::Display for ExprTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_node(self.root, f)
    }
}

/// Trees compare by value only.
impl PartialEq for ExprTree {
    fn eq(&self, other: &Self) -> bool {
        self.value().total_cmp(&other.value()) == Ordering::Equal
    }
}

impl PartialOrd for ExprTree {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.value().total_cmp(&other.value()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// `((3 * 8) - (4 / 2))`
    fn sample() -> ExprTree {
        ExprTree::join(
            ExprTree::join(3, Operator::Mul, 8),
            Operator::Sub,
            ExprTree::join(4, Operator::Div, 2),
        )
    }

    #[test]
    fn test_leaf_caches() {
        let tree = ExprTree::leaf(7);
        assert_eq!(tree.size(), 1);
        assert_eq!(tree.leaves(), &[7]);
        assert!((tree.value() - 7.0).abs() < f64::EPSILON);
        assert_eq!(tree.operator(), Err(StructuralError::NoOperator));
    }

    #[test]
    fn test_join_caches() {
        let tree = sample();
        assert_eq!(tree.size(), 7);
        assert_eq!(tree.leaves(), &[3, 8, 4, 2]);
        assert!((tree.value() - 22.0).abs() < f64::EPSILON);
        assert_eq!(tree.operator(), Ok(Operator::Sub));
        assert_eq!(tree.to_string(), "((3 * 8) - (4 / 2))");
    }

    #[test]
    fn test_join_sets_parents() {
        let tree = sample();
        let (left, right) = tree.children(tree.root()).unwrap();
        assert_eq!(tree.parent(left), Some(tree.root()));
        assert_eq!(tree.parent(right), Some(tree.root()));
        assert_eq!(tree.parent(tree.root()), None);
    }

    #[test]
    fn test_build_rejects_half_operator() {
        assert_eq!(
            ExprTree::build(1, Some(Operator::Add), None).unwrap_err(),
            StructuralError::InvalidConstruction
        );
        assert_eq!(
            ExprTree::build(1, None, Some(Operand::Number(2))).unwrap_err(),
            StructuralError::InvalidConstruction
        );
        let tree = ExprTree::build(1, Some(Operator::Add), Some(Operand::Number(2))).unwrap();
        assert_eq!(tree.to_string(), "(1 + 2)");
        assert_eq!(ExprTree::build(5, None, None).unwrap().size(), 1);
    }

    #[test]
    fn test_division_by_zero_is_infinite() {
        let tree = ExprTree::join(4, Operator::Div, 0);
        assert!(tree.value().is_infinite());
        assert!(tree.value() > 0.0);

        let tree = ExprTree::join(-4, Operator::Div, 0);
        assert_eq!(tree.value(), f64::INFINITY);
    }

    #[test]
    fn test_operator_symbols() {
        for op in Operator::ALL {
            assert_eq!(Operator::try_from(op.symbol()), Ok(op));
            assert!(!op.others().contains(&op));
        }
        assert_eq!(
            "%".parse::<Operator>(),
            Err(StructuralError::InvalidOperator("%".to_string()))
        );
    }

    #[test]
    fn test_set_operator_propagates() {
        let mut tree = sample();
        let left = tree.subtree_at(2).unwrap();
        tree.set_operator(left, Operator::Add).unwrap();
        assert!((tree.value() - 9.0).abs() < f64::EPSILON);
        assert_eq!(tree.to_string(), "((3 + 8) - (4 / 2))");

        tree.set_operator_symbol(tree.root(), "*").unwrap();
        assert!((tree.value() - 22.0).abs() < f64::EPSILON);

        let leaf = tree.subtree_at(3).unwrap();
        assert_eq!(tree.set_operator(leaf, Operator::Add), Err(StructuralError::NoOperator));
        assert!(matches!(
            tree.set_operator_symbol(tree.root(), "^"),
            Err(StructuralError::InvalidOperator(_))
        ));
    }

    #[test]
    fn test_set_operand_replaces_child() {
        let mut tree = sample();
        let root = tree.root();
        let child = tree
            .set_operand(root, ExprTree::join(1, Operator::Add, 1), Side::Right)
            .unwrap();
        assert_eq!(tree.parent(child), Some(root));
        assert_eq!(tree.to_string(), "((3 * 8) - (1 + 1))");
        assert_eq!(tree.size(), 7);
        assert_eq!(tree.leaves(), &[3, 8, 1, 1]);
        assert!((tree.value() - 22.0).abs() < f64::EPSILON);

        tree.set_operand(root, 10, Side::Left).unwrap();
        assert_eq!(tree.to_string(), "(10 - (1 + 1))");
        assert_eq!(tree.size(), 5);
        assert_eq!(tree.node_count(), 5);
    }

    #[test]
    fn test_set_operand_rejects_leaf_and_bad_side() {
        let mut tree = sample();
        let leaf = tree.subtree_at(3).unwrap();
        assert_eq!(
            tree.set_operand(leaf, 1, Side::Left),
            Err(StructuralError::InvalidPosition { position: 0 })
        );
        assert_eq!(
            Side::try_from(2),
            Err(StructuralError::InvalidPosition { position: 2 })
        );
        assert_eq!(Side::try_from(1), Ok(Side::Right));
    }

    #[test]
    fn test_set_number() {
        let mut tree = sample();
        let leaf = tree.subtree_at(7).unwrap();
        tree.set_number(leaf, 1).unwrap();
        assert_eq!(tree.leaves(), &[3, 8, 4, 1]);
        assert!((tree.value() - 20.0).abs() < f64::EPSILON);
        assert_eq!(tree.set_number(tree.root(), 1), Err(StructuralError::NotALeaf));
    }

    #[test]
    fn test_subtree_positions_are_preorder() {
        let tree = sample();
        let rendered: Vec<String> = (1..=tree.size())
            .map(|pos| tree.extract(tree.subtree_at(pos).unwrap()).to_string())
            .collect();
        assert_eq!(
            rendered,
            vec!["((3 * 8) - (4 / 2))", "(3 * 8)", "3", "8", "(4 / 2)", "4", "2"]
        );
    }

    #[test]
    fn test_subtree_out_of_bounds() {
        let tree = sample();
        assert_eq!(
            tree.subtree_at(8),
            Err(StructuralError::OutOfBounds { position: 8, size: 7 })
        );
        assert_eq!(
            tree.subtree_at(0),
            Err(StructuralError::OutOfBounds { position: 0, size: 7 })
        );
    }

    #[test]
    fn test_locate_is_relative() {
        let tree = sample();
        let right = tree.subtree_at(5).unwrap();
        let leaf = tree.locate(right, 3).unwrap();
        assert_eq!(tree.number_of(leaf), Some(2));
        assert!(tree.locate(right, 4).is_err());
    }

    #[test]
    fn test_replace_keeps_slot_and_parent() {
        let mut tree = sample();
        let before = tree.subtree_at(2).unwrap();
        let parent = tree.parent(before);

        let replaced = tree
            .replace_subtree_at(2, &ExprTree::join(ExprTree::join(1, Operator::Add, 2), Operator::Mul, 5))
            .unwrap();
        assert_eq!(replaced, before);
        assert_eq!(tree.parent(replaced), parent);
        assert_eq!(tree.to_string(), "(((1 + 2) * 5) - (4 / 2))");
        assert_eq!(tree.size(), 9);
        assert_eq!(tree.node_count(), 9);
        assert!((tree.value() - 13.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_replace_root_with_leaf() {
        let mut tree = sample();
        tree.replace_subtree_at(1, &ExprTree::leaf(6)).unwrap();
        assert_eq!(tree.to_string(), "6");
        assert_eq!(tree.size(), 1);
        assert_eq!(tree.node_count(), 1);
    }

    #[test]
    fn test_released_slots_are_reused() {
        let mut tree = sample();
        for _ in 0..50 {
            tree.replace_subtree_at(2, &ExprTree::join(1, Operator::Add, 2)).unwrap();
        }
        assert!(tree.nodes.len() <= 9);
        assert_eq!(tree.node_count(), tree.size());
    }

    #[test]
    fn test_extract_is_independent() {
        let tree = sample();
        let sub = tree.extract(tree.subtree_at(5).unwrap());
        assert_eq!(sub.to_string(), "(4 / 2)");
        assert_eq!(sub.parent(sub.root()), None);
        assert!((sub.value() - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_wrap() {
        let mut tree = ExprTree::join(3, Operator::Mul, 8);
        tree.wrap(Operator::Sub, 1);
        assert_eq!(tree.to_string(), "((3 * 8) - 1)");
        assert_eq!(tree.size(), 5);
        assert_eq!(tree.leaves(), &[3, 8, 1]);
    }

    #[test]
    fn test_ordering_by_value() {
        let small = ExprTree::join(1, Operator::Add, 1);
        let large = ExprTree::leaf(5);
        assert!(small < large);
        assert!(ExprTree::leaf(2) == small);
        assert!(!small.structurally_eq(&ExprTree::leaf(2)));
        assert!(small.structurally_eq(&ExprTree::join(1, Operator::Add, 1)));
    }
}
