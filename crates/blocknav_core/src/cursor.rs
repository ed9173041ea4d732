//! The navigation cursor - one logical position in the mirror.
//!
//! The cursor always rests on a `Block` node. Vertical moves walk the
//! next-chain of the current stack, `move_in`/`move_out` cross statement
//! nesting levels, and jumps address blocks directly. All operations are
//! read-only over the snapshot; a resync swaps the snapshot and remaps
//! the cursor by permanent identity.

use crate::{Edge, Fault};
use blocknav_mirror::{MirrorSnapshot, NodeIdx, NodeKind, StableId};

// =============================================================================
// STACK HELPERS
// =============================================================================

/// Top block of the stack containing `idx`.
///
/// Walks `Next` ancestry upward; stops at the block whose parent is not
/// a `Next` connector (a container or a statement-nested head).
pub fn find_top(mirror: &MirrorSnapshot, idx: usize) -> usize {
    let mut current = idx;
    while let Some(parent) = mirror.parent_idx(current) {
        if mirror.kind(parent) != Some(NodeKind::Next) {
            break;
        }
        match mirror.parent_idx(parent) {
            Some(owner) => current = owner,
            None => break,
        }
    }
    current
}

/// Bottom block of the stack containing `idx`.
///
/// Follows `Next` connectors downward to the last block in the chain.
pub fn find_bottom(mirror: &MirrorSnapshot, idx: usize) -> usize {
    let mut current = find_top(mirror, idx);
    while let Some(next) = mirror.next_connector(current) {
        match mirror.block_child(next) {
            Some(block) => current = block,
            None => break,
        }
    }
    current
}

// =============================================================================
// CURSOR
// =============================================================================

/// The current position in the mirror, always a `Block` node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursor {
    node: Option<NodeIdx>,
}

impl Cursor {
    /// Create an empty cursor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current node index, if a block is selected.
    #[inline]
    pub fn current(&self) -> Option<usize> {
        self.node.map(|idx| idx as usize)
    }

    /// Drop the selection. Returns true if something was cleared.
    pub fn clear(&mut self) -> bool {
        self.node.take().is_some()
    }

    /// Place the cursor on a node index of the current mirror.
    pub(crate) fn set(&mut self, idx: usize) {
        self.node = Some(idx as NodeIdx);
    }

    fn require(&self, mirror: &MirrorSnapshot) -> Result<usize, Fault> {
        match self.node {
            Some(idx) if (idx as usize) < mirror.node_count() => Ok(idx as usize),
            _ => Err(Fault::NoSelection),
        }
    }

    // =========================================================================
    // VERTICAL MOVES
    // =========================================================================

    /// Move to the stacked predecessor.
    ///
    /// At the top of the stack: wraps to the bottom in cycle mode,
    /// faults otherwise. Returns true if the move wrapped.
    pub fn move_up(&mut self, mirror: &MirrorSnapshot, cycle: bool) -> Result<bool, Fault> {
        let current = self.require(mirror)?;

        if let Some(parent) = mirror.parent_idx(current) {
            if mirror.kind(parent) == Some(NodeKind::Next) {
                if let Some(above) = mirror.parent_idx(parent) {
                    self.set(above);
                    return Ok(false);
                }
            }
        }

        if cycle {
            self.set(find_bottom(mirror, current));
            return Ok(true);
        }
        Err(Fault::BoundaryReached { edge: Edge::Top })
    }

    /// Move to the stacked successor.
    ///
    /// At the bottom of the stack: wraps to the top in cycle mode,
    /// faults otherwise. Returns true if the move wrapped.
    pub fn move_down(&mut self, mirror: &MirrorSnapshot, cycle: bool) -> Result<bool, Fault> {
        let current = self.require(mirror)?;

        if let Some(next) = mirror.next_connector(current) {
            if let Some(below) = mirror.block_child(next) {
                self.set(below);
                return Ok(false);
            }
        }

        if cycle {
            self.set(find_top(mirror, current));
            return Ok(true);
        }
        Err(Fault::BoundaryReached { edge: Edge::Bottom })
    }

    // =========================================================================
    // NESTING MOVES
    // =========================================================================

    /// Descend into the head of the first nested statement sequence.
    pub fn move_in(&mut self, mirror: &MirrorSnapshot) -> Result<(), Fault> {
        let current = self.require(mirror)?;

        let inner = mirror
            .first_statement(current)
            .and_then(|stmt| mirror.block_child(stmt))
            .ok_or(Fault::NoInnerSequence)?;

        self.set(inner);
        Ok(())
    }

    /// Ascend to the block owning the current statement sequence.
    ///
    /// Works from anywhere in the nested stack, not only its head.
    pub fn move_out(&mut self, mirror: &MirrorSnapshot) -> Result<(), Fault> {
        let current = self.require(mirror)?;

        let head = find_top(mirror, current);
        let owner = mirror
            .parent_idx(head)
            .filter(|&stmt| mirror.kind(stmt) == Some(NodeKind::Statement))
            .and_then(|stmt| mirror.parent_idx(stmt))
            .ok_or(Fault::AtOutermostLevel)?;

        self.set(owner);
        Ok(())
    }

    // =========================================================================
    // JUMPS
    // =========================================================================

    /// Jump to a block by permanent identity.
    pub fn jump_identity(&mut self, mirror: &MirrorSnapshot, id: StableId) -> Result<(), Fault> {
        let idx = mirror.find_identity(id).ok_or(Fault::BlockNotFound(id))?;
        self.set(idx);
        Ok(())
    }

    /// Jump to the n-th top-level container (0-based).
    pub fn jump_container(&mut self, mirror: &MirrorSnapshot, n: u32) -> Result<(), Fault> {
        let idx = mirror
            .container(n as usize)
            .ok_or(Fault::ContainerNotFound(n))?;
        self.set(idx);
        Ok(())
    }

    /// Jump to the top of the current stack.
    pub fn jump_top(&mut self, mirror: &MirrorSnapshot) -> Result<(), Fault> {
        let current = self.require(mirror)?;
        self.set(find_top(mirror, current));
        Ok(())
    }

    /// Jump to the bottom of the current stack.
    pub fn jump_bottom(&mut self, mirror: &MirrorSnapshot) -> Result<(), Fault> {
        let current = self.require(mirror)?;
        self.set(find_bottom(mirror, current));
        Ok(())
    }
}


#[cfg(test)]
mod props {
    use super::*;
    use blocknav_mirror::{flatten, BlockNode, BlockTree};
    use proptest::prelude::*;

    fn chain(len: u64) -> MirrorSnapshot {
        let mut node = BlockNode::new(len, "link");
        for id in (1..len).rev() {
            node = BlockNode::new(id, "link").with_next(node);
        }
        flatten(&BlockTree::with_roots(vec![node])).expect("flatten")
    }

    proptest! {
        /// A full lap down a cycling stack lands back on the start and
        /// wraps exactly once.
        #[test]
        fn full_lap_returns_home(len in 1u64..20, seed in 0u64..100) {
            let mirror = chain(len);
            let start = seed % len + 1;
            let mut cursor = Cursor::new();
            cursor.jump_identity(&mirror, start).expect("jump");

            let mut wraps = 0;
            for _ in 0..len {
                if cursor.move_down(&mirror, true).expect("move") {
                    wraps += 1;
                }
            }
            prop_assert_eq!(cursor.current(), mirror.find_identity(start));
            prop_assert_eq!(wraps, 1);
        }

        /// Up then down is the identity move in cycle mode.
        #[test]
        fn up_then_down_round_trips(len in 1u64..20, seed in 0u64..100) {
            let mirror = chain(len);
            let start = seed % len + 1;
            let mut cursor = Cursor::new();
            cursor.jump_identity(&mirror, start).expect("jump");

            cursor.move_up(&mirror, true).expect("up");
            cursor.move_down(&mirror, true).expect("down");
            prop_assert_eq!(cursor.current(), mirror.find_identity(start));
        }
    }
}
