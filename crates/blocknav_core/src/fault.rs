//! Fault types for navigation errors.
//!
//! Faults are recoverable errors that occur during command execution.
//! They don't crash the session but indicate the command couldn't be
//! executed; the session stays consistent and the next command starts
//! clean. Nothing here propagates past the command boundary.

use blocknav_mirror::StableId;
use std::fmt;
use thiserror::Error;

/// Edge of a stack, for boundary faults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Top,
    Bottom,
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Edge::Top => write!(f, "top"),
            Edge::Bottom => write!(f, "bottom"),
        }
    }
}

/// Navigation fault - a recoverable error during command execution.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Fault {
    /// Command requires a selected block but the cursor is empty.
    #[error("No selection: command requires a selected block")]
    NoSelection,

    /// Vertical move hit the end of the stack with cycling off.
    #[error("Boundary reached at the {edge} of the stack")]
    BoundaryReached { edge: Edge },

    /// Current block has no nested statement sequence to enter.
    #[error("No inner sequence to enter")]
    NoInnerSequence,

    /// Current block is not nested inside any statement sequence.
    #[error("Already at the outermost level")]
    AtOutermostLevel,

    /// Referenced block doesn't exist in the mirror.
    #[error("Block {0} not found")]
    BlockNotFound(StableId),

    /// Referenced container doesn't exist.
    #[error("Container {0} not found")]
    ContainerNotFound(u32),

    /// Selected block exposes no selectable slots.
    #[error("Empty slot list: block has no selectable slots")]
    EmptySlotList,

    /// Slot command issued without an active slot session.
    #[error("No slot session: enter a block first")]
    NoSlotSession,

    /// Pairing requested on a slot that is not a connection.
    #[error("Current slot is not a connection")]
    SlotNotConnectable,

    /// Host refused to join the stored and selected endpoints.
    ///
    /// Stored state is already rolled back when this surfaces; the next
    /// pairing command starts fresh.
    #[error("Join rejected: {reason}")]
    JoinRejected { reason: String },

    /// Rebuild after a successful join failed.
    ///
    /// Indicates the host broke the serialize contract mid-command.
    #[error("Resync failed: {0}")]
    ResyncFailed(String),
}

impl Fault {
    /// Check if this fault marks the edge of navigable space.
    pub fn is_boundary(&self) -> bool {
        matches!(
            self,
            Fault::BoundaryReached { .. } | Fault::NoInnerSequence | Fault::AtOutermostLevel
        )
    }

    /// Check if this fault is recoverable by trying a different command.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Fault::ResyncFailed(_))
    }
}
