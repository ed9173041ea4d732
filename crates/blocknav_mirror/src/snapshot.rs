//! Flat mirror snapshot - the navigable form of the canvas.
//!
//! A snapshot is immutable once built. Every structural mutation of the
//! live graph produces a whole new snapshot via flattening; nothing is
//! patched in place. The snapshot uses Structure-of-Arrays (SoA) layout
//! for cache-friendly iteration and O(1) navigation via precomputed
//! indices.

use crate::{NodeKind, NONE_IDX, NONE_SERIAL};
use serde::{Deserialize, Serialize};

// =============================================================================
// MIRROR SNAPSHOT
// =============================================================================

/// One immutable mirror of the canvas.
///
/// # Structure-of-Arrays Layout
///
/// Node data is stored in parallel arrays for cache efficiency:
///
/// ```text
/// kinds:         [k0,    k1,    k2,    ...]
/// serials:       [s0,    s1,    s2,    ...]
/// identities:    [id0,   id1,   id2,   ...]
/// labels:        [l0,    l1,    l2,    ...]
/// details:       [d0,    d1,    d2,    ...]
/// parent:        [p0,    p1,    p2,    ...]
/// first_child:   [fc0,   fc1,   fc2,   ...]
/// next_sibling:  [ns0,   ns1,   ns2,   ...]
/// ```
///
/// All arrays MUST have the same length N.
///
/// # Navigation Indices
///
/// The `parent`, `first_child`, `next_sibling` arrays enable O(1) tree
/// navigation. Values are indices into the node arrays. `NONE_IDX`
/// (u32::MAX) indicates no link.
///
/// # Invariants
///
/// - All parallel arrays have the same length
/// - Navigation indices are either NONE_IDX or < array length
/// - Block nodes carry a non-zero unique serial and a non-zero unique
///   identity; other kinds carry NONE_SERIAL / NONE_ID
/// - `Next`/`Statement`/`Value` nodes hold exactly one `Block` child;
///   `Field`/`Comment` nodes are leaves
/// - Children of a block appear in canonical order:
///   fields, values, statements, comment, next
/// - `roots` lists parentless block nodes in document order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MirrorSnapshot {
    // =========================================================================
    // SoA NODE DATA - ALL ARRAYS MUST HAVE SAME LENGTH
    // =========================================================================
    /// Node kinds.
    pub kinds: Vec<NodeKind>,

    /// Per-snapshot positional serials (NONE_SERIAL for non-block nodes).
    pub serials: Vec<u32>,

    /// Permanent block identities (NONE_ID for non-block nodes).
    pub identities: Vec<u64>,

    /// Label string IDs (index into string_table).
    /// Block kind name, field name, input name; empty for `Next`.
    pub labels: Vec<u32>,

    /// Detail string IDs (NONE_IDX if no detail).
    /// Field value text, comment text.
    pub details: Vec<u32>,

    // =========================================================================
    // NAVIGATION INDICES - Use NONE_IDX for no link
    // =========================================================================
    /// Index of parent node.
    pub parent: Vec<u32>,

    /// Index of first child node.
    pub first_child: Vec<u32>,

    /// Index of next sibling node.
    pub next_sibling: Vec<u32>,

    // =========================================================================
    // CANVAS STRUCTURE
    // =========================================================================
    /// Container node indices in document order.
    pub roots: Vec<u32>,

    /// Interned strings referenced by labels/details.
    pub string_table: Vec<String>,
}

impl MirrorSnapshot {
    /// Number of nodes in this snapshot.
    #[inline]
    pub fn node_count(&self) -> usize {
        self.kinds.len()
    }

    /// Check if the snapshot is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    /// Get node kind by index.
    #[inline]
    pub fn kind(&self, idx: usize) -> Option<NodeKind> {
        self.kinds.get(idx).copied()
    }

    /// Get block serial by index (NONE_SERIAL for non-block nodes).
    #[inline]
    pub fn serial(&self, idx: usize) -> Option<u32> {
        self.serials.get(idx).copied()
    }

    /// Get block identity by index (NONE_ID for non-block nodes).
    #[inline]
    pub fn identity(&self, idx: usize) -> Option<u64> {
        self.identities.get(idx).copied()
    }

    /// Get node label text.
    pub fn label(&self, idx: usize) -> Option<&str> {
        let label_id = *self.labels.get(idx)?;
        self.string_table.get(label_id as usize).map(String::as_str)
    }

    /// Get node detail text (field value, comment text).
    pub fn detail(&self, idx: usize) -> Option<&str> {
        let detail_id = *self.details.get(idx)?;
        if detail_id == NONE_IDX {
            return None;
        }
        self.string_table
            .get(detail_id as usize)
            .map(String::as_str)
    }

    /// Get parent index (O(1)).
    #[inline]
    pub fn parent_idx(&self, idx: usize) -> Option<usize> {
        self.parent.get(idx).and_then(|&p| {
            if p == NONE_IDX {
                None
            } else {
                Some(p as usize)
            }
        })
    }

    /// Get first child index (O(1)).
    #[inline]
    pub fn first_child_idx(&self, idx: usize) -> Option<usize> {
        self.first_child.get(idx).and_then(|&fc| {
            if fc == NONE_IDX {
                None
            } else {
                Some(fc as usize)
            }
        })
    }

    /// Get next sibling index (O(1)).
    #[inline]
    pub fn next_sibling_idx(&self, idx: usize) -> Option<usize> {
        self.next_sibling.get(idx).and_then(|&ns| {
            if ns == NONE_IDX {
                None
            } else {
                Some(ns as usize)
            }
        })
    }

    /// Get children of a node (via navigation indices).
    ///
    /// Returns iterator of child indices in canonical order.
    pub fn children(&self, parent_idx: usize) -> impl Iterator<Item = usize> + '_ {
        ChildrenIter {
            mirror: self,
            next_idx: self.first_child.get(parent_idx).copied(),
        }
    }

    /// The block held by a connector node (`Next`/`Statement`/`Value`).
    pub fn block_child(&self, idx: usize) -> Option<usize> {
        if !self.kind(idx)?.holds_block() {
            return None;
        }
        self.first_child_idx(idx)
            .filter(|&child| self.kinds[child] == NodeKind::Block)
    }

    /// The `Next` connector under a block, if it has a stacked successor.
    pub fn next_connector(&self, block_idx: usize) -> Option<usize> {
        self.children(block_idx)
            .find(|&child| self.kinds[child] == NodeKind::Next)
    }

    /// The first `Statement` connector under a block.
    pub fn first_statement(&self, block_idx: usize) -> Option<usize> {
        self.children(block_idx)
            .find(|&child| self.kinds[child] == NodeKind::Statement)
    }

    /// Find node index by block serial.
    pub fn find_serial(&self, serial: u32) -> Option<usize> {
        if serial == NONE_SERIAL {
            return None;
        }
        self.serials.iter().position(|&s| s == serial)
    }

    /// Find node index by permanent block identity.
    pub fn find_identity(&self, identity: u64) -> Option<usize> {
        if identity == crate::NONE_ID {
            return None;
        }
        self.identities.iter().position(|&id| id == identity)
    }

    /// Number of top-level containers.
    #[inline]
    pub fn container_count(&self) -> usize {
        self.roots.len()
    }

    /// Get the n-th container node index.
    #[inline]
    pub fn container(&self, n: usize) -> Option<usize> {
        self.roots.get(n).map(|&idx| idx as usize)
    }

    /// Iterate container node indices in document order.
    pub fn containers(&self) -> impl Iterator<Item = usize> + '_ {
        self.roots.iter().map(|&idx| idx as usize)
    }

    /// Walk up to the container holding a node.
    pub fn container_of(&self, idx: usize) -> Option<usize> {
        if idx >= self.node_count() {
            return None;
        }
        let mut current = idx;
        while let Some(parent) = self.parent_idx(current) {
            current = parent;
        }
        Some(current)
    }

    /// Iterate comments with their owning block and nesting depth.
    ///
    /// Depth counts `Statement` ancestors: a comment on a top-level block
    /// has depth 0, inside one statement sequence depth 1, and so on.
    pub fn comments(&self) -> impl Iterator<Item = CommentRef> + '_ {
        (0..self.node_count()).filter_map(move |idx| {
            if self.kinds[idx] != NodeKind::Comment {
                return None;
            }
            let owner = self.parent_idx(idx)?;
            let mut depth = 0;
            let mut current = owner;
            while let Some(parent) = self.parent_idx(current) {
                if self.kinds[parent] == NodeKind::Statement {
                    depth += 1;
                }
                current = parent;
            }
            Some(CommentRef {
                node: idx,
                owner,
                depth,
            })
        })
    }
}

/// A comment node with its owning block and statement-nesting depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommentRef {
    /// Comment node index.
    pub node: usize,

    /// Owning block node index.
    pub owner: usize,

    /// Number of `Statement` ancestors of the owner.
    pub depth: usize,
}

// =============================================================================
// NAVIGATION ITERATORS
// =============================================================================

/// Iterator over children of a node.
struct ChildrenIter<'a> {
    mirror: &'a MirrorSnapshot,
    next_idx: Option<u32>,
}

impl<'a> Iterator for ChildrenIter<'a> {
    type Item = usize;

    fn next(&mut self) -> Option<Self::Item> {
        let idx = self.next_idx?;
        if idx == NONE_IDX {
            return None;
        }

        let result = idx as usize;

        // Move to next sibling
        self.next_idx = self
            .mirror
            .next_sibling
            .get(result)
            .copied()
            .filter(|&ns| ns != NONE_IDX);

        Some(result)
    }
}
