//! Mirror format for block-canvas navigation.
//!
//! This crate defines the two representations the navigation engine
//! consumes: the `BlockTree` interchange tree produced by the host, and
//! the flat `MirrorSnapshot` the cursor traverses.
//!
//! # Architecture
//!
//! The snapshot uses Structure-of-Arrays (SoA) layout for cache-friendly
//! iteration and O(1) navigation via precomputed indices. Snapshots are
//! immutable: every structural mutation of the live graph flattens a
//! whole new snapshot.
//!
//! ```text
//! live graph ──serialize──► BlockTree ──flatten──► MirrorSnapshot
//!                            (host)                 (navigable)
//! ```
//!
//! # Sentinel Constants
//!
//! SoA arrays use sentinel values instead of `Option<T>` to avoid branching:
//! - `NONE_IDX` (u32::MAX) - No navigation link / no detail string
//! - `NONE_ID` (0) - No permanent identity (non-block nodes)
//! - `NONE_SERIAL` (0) - No positional serial (non-block nodes)

mod error;
mod flatten;
mod node;
mod snapshot;
mod tree;
mod validate;

pub use error::MirrorError;
pub use flatten::flatten;
pub use node::{BlockSerial, NodeIdx, NodeKind, StableId};
pub use snapshot::{CommentRef, MirrorSnapshot};
pub use tree::{BlockNode, BlockTree, FieldStub};
pub use validate::Validate;

// =============================================================================
// SENTINEL CONSTANTS
// =============================================================================

/// Navigation index sentinel: no link exists.
///
/// Used in `parent`, `first_child`, `next_sibling` arrays to indicate
/// that no navigation link exists at this position, and in `details` to
/// indicate that a node has no detail string.
///
/// # Example
///
/// ```
/// use blocknav_mirror::NONE_IDX;
///
/// let next_sibling = vec![1, 2, NONE_IDX]; // Node 2 has no next sibling
/// assert_eq!(next_sibling[2], u32::MAX);
/// ```
pub const NONE_IDX: u32 = u32::MAX;

/// Permanent identity sentinel: no identity.
///
/// Only `Block` nodes carry identities; all other kinds store `NONE_ID`.
///
/// # Important
///
/// All block identities MUST be non-zero. Zero is reserved as the
/// sentinel value; the host contract forbids assigning it.
pub const NONE_ID: u64 = 0;

/// Positional serial sentinel: no serial (non-block nodes).
pub const NONE_SERIAL: u32 = 0;

/// First serial assigned during flattening.
pub const FIRST_SERIAL: u32 = 1;

/// Maximum nodes per snapshot (sanity check).
pub const MAX_MIRROR_NODES: usize = 1_000_000;

// =============================================================================
// SERIALIZATION
// =============================================================================

/// Content digest of a snapshot's serialized form.
pub type MirrorDigest = u64;

impl MirrorSnapshot {
    /// Serialize to bytes using bincode.
    ///
    /// Bincode produces compact binary output and is deterministic, so
    /// equal snapshots always serialize to equal bytes.
    pub fn serialize(&self) -> Result<Vec<u8>, MirrorError> {
        bincode::serialize(self).map_err(|e| MirrorError::SerializationFailed(e.to_string()))
    }

    /// Deserialize from bytes.
    pub fn deserialize(bytes: &[u8]) -> Result<Self, MirrorError> {
        bincode::deserialize(bytes).map_err(|e| MirrorError::DeserializationFailed(e.to_string()))
    }

    /// Content digest for rebuild deduplication.
    ///
    /// Two snapshots with equal digests flattened from equal trees; the
    /// resync path uses this to recognize a rebuild that changed nothing
    /// and skip cursor remapping.
    pub fn digest(&self) -> Result<MirrorDigest, MirrorError> {
        let bytes = self.serialize()?;
        let hash = blake3::hash(&bytes);
        let mut prefix = [0u8; 8];
        prefix.copy_from_slice(&hash.as_bytes()[..8]);
        Ok(u64::from_le_bytes(prefix))
    }
}
