//! Interchange tree produced by the host.
//!
//! The host serializes its live block graph into a `BlockTree` on every
//! structural mutation. The tree is the input to flattening; the engine
//! never walks the live graph directly.

use crate::StableId;
use serde::{Deserialize, Serialize};

/// A field rendered to text (name and current value).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldStub {
    /// Field name within its block.
    pub name: String,

    /// Rendered field value.
    pub value: String,
}

impl FieldStub {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// One block and everything attached to it.
///
/// Inputs with nothing attached do not appear: `values` and `statements`
/// carry only inputs that currently hold a block, so the flattened mirror
/// keeps the one-block-per-connector invariant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockNode {
    /// Permanent identity assigned by the host at creation (non-zero).
    pub identity: StableId,

    /// Block kind name (e.g. "controls_repeat").
    pub kind_name: String,

    /// Fields in declaration order.
    pub fields: Vec<FieldStub>,

    /// Expression inputs with an attached block, in declaration order.
    pub values: Vec<(String, BlockNode)>,

    /// Statement inputs with an attached block, in declaration order.
    pub statements: Vec<(String, BlockNode)>,

    /// Comment text, if the block carries one.
    pub comment: Option<String>,

    /// Stacked successor, if connected.
    pub next: Option<Box<BlockNode>>,
}

impl BlockNode {
    /// Create a bare block with no fields, inputs, comment or successor.
    pub fn new(identity: StableId, kind_name: impl Into<String>) -> Self {
        Self {
            identity,
            kind_name: kind_name.into(),
            fields: Vec::new(),
            values: Vec::new(),
            statements: Vec::new(),
            comment: None,
            next: None,
        }
    }

    /// Append a field.
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push(FieldStub::new(name, value));
        self
    }

    /// Attach a block to an expression input.
    pub fn with_value(mut self, input: impl Into<String>, child: BlockNode) -> Self {
        self.values.push((input.into(), child));
        self
    }

    /// Attach a block to a statement input.
    pub fn with_statement(mut self, input: impl Into<String>, child: BlockNode) -> Self {
        self.statements.push((input.into(), child));
        self
    }

    /// Attach a comment.
    pub fn with_comment(mut self, text: impl Into<String>) -> Self {
        self.comment = Some(text.into());
        self
    }

    /// Connect a stacked successor.
    pub fn with_next(mut self, next: BlockNode) -> Self {
        self.next = Some(Box::new(next));
        self
    }

    /// Number of blocks in this chain including nested blocks.
    pub fn block_count(&self) -> usize {
        let mut count = 1;
        for (_, child) in &self.values {
            count += child.block_count();
        }
        for (_, child) in &self.statements {
            count += child.block_count();
        }
        if let Some(next) = &self.next {
            count += next.block_count();
        }
        count
    }
}

/// The whole canvas: top-level container stacks in layout order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BlockTree {
    /// Container blocks, left-to-right / top-to-bottom.
    pub roots: Vec<BlockNode>,
}

impl BlockTree {
    /// Create an empty canvas.
    pub fn new() -> Self {
        Self::default()
    }

    /// Canvas with the given containers.
    pub fn with_roots(roots: Vec<BlockNode>) -> Self {
        Self { roots }
    }

    /// Total number of blocks on the canvas.
    pub fn block_count(&self) -> usize {
        self.roots.iter().map(BlockNode::block_count).sum()
    }

    /// Check if the canvas has no blocks.
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_count_spans_chains_and_nesting() {
        // repeat { move -> turn } -> stop
        let tree = BlockTree::with_roots(vec![BlockNode::new(1, "controls_repeat")
            .with_statement(
                "DO",
                BlockNode::new(2, "move_forward").with_next(BlockNode::new(3, "turn_left")),
            )
            .with_next(BlockNode::new(4, "stop"))]);

        assert_eq!(tree.block_count(), 4);
        assert!(!tree.is_empty());
    }

    #[test]
    fn empty_tree() {
        let tree = BlockTree::new();
        assert_eq!(tree.block_count(), 0);
        assert!(tree.is_empty());
    }

    #[test]
    fn builder_preserves_declaration_order() {
        let block = BlockNode::new(1, "math_arithmetic")
            .with_field("OP", "ADD")
            .with_value("A", BlockNode::new(2, "math_number").with_field("NUM", "1"))
            .with_value("B", BlockNode::new(3, "math_number").with_field("NUM", "2"));

        assert_eq!(block.fields[0].name, "OP");
        assert_eq!(block.values[0].0, "A");
        assert_eq!(block.values[1].0, "B");
    }

    #[test]
    fn tree_round_trips_through_json() {
        let tree = BlockTree::with_roots(vec![BlockNode::new(7, "event_start")
            .with_comment("entry point")
            .with_next(BlockNode::new(8, "move_forward"))]);

        let json = serde_json::to_string(&tree).expect("serialize");
        let restored: BlockTree = serde_json::from_str(&json).expect("deserialize");

        assert_eq!(restored, tree);
    }
}
