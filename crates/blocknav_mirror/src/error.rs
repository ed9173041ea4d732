//! Mirror error types.
//!
//! These are data-integrity errors: a failing flatten or validate means
//! the host broke its contract or the snapshot was corrupted in transit.
//! They are distinct from navigation faults, which are recoverable and
//! live in the engine crate.

use crate::NodeKind;
use thiserror::Error;

/// Error building, validating or (de)serializing a mirror snapshot.
#[derive(Debug, Clone, Error)]
pub enum MirrorError {
    /// Serialization to bytes failed.
    #[error("Serialization failed: {0}")]
    SerializationFailed(String),

    /// Deserialization from bytes failed.
    #[error("Deserialization failed: {0}")]
    DeserializationFailed(String),

    /// Parallel arrays have different lengths.
    #[error("Array length mismatch in {field}: expected {expected}, got {actual}")]
    ArrayLengthMismatch {
        expected: usize,
        actual: usize,
        field: &'static str,
    },

    /// A navigation index points outside the node arrays.
    #[error("Index {index} out of bounds (max {max}) in {field}")]
    IndexOutOfBounds {
        index: u32,
        max: usize,
        field: &'static str,
    },

    /// A label or detail references a string outside the table.
    #[error("String id {index} out of bounds (table size {size})")]
    InvalidStringId { index: u32, size: usize },

    /// Node count exceeds the sanity cap.
    #[error("Too many mirror nodes: {count} exceeds {max}")]
    TooManyNodes { count: usize, max: usize },

    /// Block serial zero, or serial on a non-block node.
    #[error("Node {index}: serial inconsistent with kind")]
    InvalidSerial { index: usize },

    /// Two block nodes share a serial.
    #[error("Duplicate block serial {serial}")]
    DuplicateSerial { serial: u32 },

    /// Block identity zero, or identity on a non-block node.
    #[error("Node {index}: identity inconsistent with kind")]
    InvalidIdentity { index: usize },

    /// Two block nodes share a permanent identity.
    #[error("Duplicate block identity {identity}")]
    DuplicateIdentity { identity: u64 },

    /// A connector node does not hold exactly one block child.
    #[error("Node {index}: {kind:?} must hold exactly one block child, found {children}")]
    BrokenConnector {
        index: usize,
        kind: NodeKind,
        children: usize,
    },

    /// A leaf kind has children.
    #[error("Node {index}: {kind:?} node cannot have children")]
    LeafWithChildren { index: usize, kind: NodeKind },

    /// Block children violate the canonical kind order.
    #[error("Node {index}: children violate canonical kind order")]
    ChildOrder { index: usize },

    /// A root entry is not a parentless block.
    #[error("Root {index} must be a parentless block")]
    InvalidRoot { index: u32 },

    /// Parent and child link arrays disagree.
    #[error("Node {index}: parent/child links disagree")]
    LinkMismatch { index: usize },

    /// A node is unreachable from the roots, or linked more than once.
    #[error("Unreachable or multiply-linked node {index}")]
    OrphanNode { index: usize },
}
