//! Node kinds and identifier aliases for the mirror.

use serde::{Deserialize, Serialize};

/// Index of a node within one mirror snapshot.
///
/// Valid only for the snapshot it was obtained from; a resync produces a
/// fresh snapshot with fresh indices.
pub type NodeIdx = u32;

/// Per-snapshot positional identifier for block nodes.
///
/// Assigned in document order during flattening, starting at `FIRST_SERIAL`.
/// Unique within one snapshot, not stable across snapshots.
pub type BlockSerial = u32;

/// Permanent block identity assigned by the host at block creation.
///
/// Stable across snapshots for the lifetime of the block. Cursor remapping
/// after a rebuild is an exact lookup of this identity.
pub type StableId = u64;

// =============================================================================
// NODE KIND
// =============================================================================

/// Kind of a mirror node.
///
/// The mirror is a labeled tree over these six kinds. `Next`, `Statement`
/// and `Value` are connector nodes holding exactly one `Block` child;
/// `Field` and `Comment` are leaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum NodeKind {
    /// A block on the canvas.
    #[default]
    Block = 0,

    /// Link to the stacked successor of a block.
    Next = 1,

    /// Nested statement sequence input with a block attached.
    Statement = 2,

    /// Expression input with a block attached.
    Value = 3,

    /// Editable or labeled atom inside a block.
    Field = 4,

    /// Comment attached to a block.
    Comment = 5,
}

impl NodeKind {
    /// Kinds that hold exactly one `Block` child.
    #[inline]
    pub fn holds_block(self) -> bool {
        matches!(self, NodeKind::Next | NodeKind::Statement | NodeKind::Value)
    }

    /// Kinds that never have children.
    #[inline]
    pub fn is_leaf(self) -> bool {
        matches!(self, NodeKind::Field | NodeKind::Comment)
    }
}
