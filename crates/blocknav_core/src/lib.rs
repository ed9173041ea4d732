//! Keyboard navigation engine for block canvases.
//!
//! Everything a screen-reader-driven editor needs between key bindings
//! and the live canvas: a cursor over an immutable mirror of the block
//! graph, an in-node slot selector, two-phase connection pairing, and
//! the resync machinery that keeps all of it honest across canvas
//! mutations.
//!
//! # Architecture
//!
//! ```text
//! Command ──► NavSession::execute ──► Cursor / SlotSession / PendingConnection
//!                   │                        │
//!                   │ effects                │ reads
//!                   ▼                        ▼
//!              host announce           MirrorSnapshot
//!                                            ▲
//!                                            │ flatten + digest + remap
//! MutationEvent ──► NavSession::on_mutation ─┘
//! ```
//!
//! The engine holds no references into the host. State that names
//! blocks does so by permanent identity, which is what lets a stored
//! connection endpoint or a selection survive a full mirror rebuild.
//! All faults in [`Fault`] are session-recoverable: the host reports
//! them and keeps going.

pub mod command;
pub mod cursor;
pub mod effect;
pub mod fault;
pub mod host;
pub mod pairing;
pub mod replay;
pub mod session;
pub mod slots;

#[cfg(test)]
pub(crate) mod fixtures;

pub use blocknav_mirror::{BlockSerial, StableId};
pub use command::{Command, ParseCommandError};
pub use cursor::{find_bottom, find_top, Cursor};
pub use effect::EffectSet;
pub use fault::{Edge, Fault};
pub use host::{
    BlockFacets, EndpointLoc, EndpointRef, FieldEditor, FieldFacet, FieldRef, HostGraph,
    InputConnFacet, InputFacet, JoinRejection, MutationEvent,
};
pub use pairing::PendingConnection;
pub use replay::{replay, LogEntry, NavLog, TimestampedEvent};
pub use session::{NavConfig, NavSession};
pub use slots::{Slot, SlotSession};
