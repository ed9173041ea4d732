//! The host canvas contract.
//!
//! The engine never touches live editor objects. Everything it learns
//! about the canvas arrives through [`HostGraph`]: a full serialization
//! for rebuilding the mirror, per-block facets for slot construction,
//! and three narrow mutators (join, split, open editor) for the
//! operations the engine itself triggers.

use blocknav_mirror::{BlockTree, StableId};
use serde::{Deserialize, Serialize};

// =============================================================================
// FIELD FACETS
// =============================================================================

/// Editor widget behind a field.
///
/// `Label` and `Image` are static decorations; every other kind opens
/// an editor and earns a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldEditor {
    Label,
    Image,
    Text,
    Dropdown,
    Checkbox,
    Colour,
    Date,
    Variable,
}

impl FieldEditor {
    /// True for decoration-only fields that never open an editor.
    #[inline]
    pub fn is_static(&self) -> bool {
        matches!(self, FieldEditor::Label | FieldEditor::Image)
    }
}

/// One field on an input row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldFacet {
    pub name: String,
    pub editor: FieldEditor,
}

impl FieldFacet {
    pub fn new(name: impl Into<String>, editor: FieldEditor) -> Self {
        Self { name: name.into(), editor }
    }
}

// =============================================================================
// INPUT FACETS
// =============================================================================

/// Connection point at the end of an input row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputConnFacet {
    /// Identity of the attached block, if any.
    pub attached: Option<StableId>,
}

/// One input row: its fields in declaration order, then an optional
/// connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputFacet {
    pub name: String,
    pub fields: Vec<FieldFacet>,
    pub connection: Option<InputConnFacet>,
}

/// Everything the slot builder needs to know about one block.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BlockFacets {
    pub has_previous_connection: bool,
    pub has_next_connection: bool,
    pub inputs: Vec<InputFacet>,
}

// =============================================================================
// ENDPOINT ADDRESSING
// =============================================================================

/// Which connection point on a block an endpoint names.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EndpointLoc {
    /// The block's previous (top) connection.
    Previous,
    /// The block's next (bottom) connection.
    Next,
    /// The connection at the end of the named input row.
    Input(String),
}

/// A connection endpoint, addressed by block identity and location.
///
/// Identities survive resyncs, so a stored endpoint stays valid across
/// canvas mutations as long as its block does.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EndpointRef {
    pub block: StableId,
    pub loc: EndpointLoc,
}

impl EndpointRef {
    pub fn previous(block: StableId) -> Self {
        Self { block, loc: EndpointLoc::Previous }
    }

    pub fn next(block: StableId) -> Self {
        Self { block, loc: EndpointLoc::Next }
    }

    pub fn input(block: StableId, name: impl Into<String>) -> Self {
        Self { block, loc: EndpointLoc::Input(name.into()) }
    }
}

/// A field, addressed by block identity, input name, and field name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldRef {
    pub block: StableId,
    pub input: String,
    pub field: String,
}

impl FieldRef {
    pub fn new(block: StableId, input: impl Into<String>, field: impl Into<String>) -> Self {
        Self { block, input: input.into(), field: field.into() }
    }
}

// =============================================================================
// MUTATION EVENTS
// =============================================================================

/// Canvas change notifications the host forwards to the session.
///
/// Every event triggers a rebuild; only `BlockDisposed` abandons the
/// selection instead of remapping it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MutationEvent {
    BlockCreated { block: StableId },
    BlockDisposed { block: StableId },
    ConnectionJoined,
    ConnectionSplit,
    FieldChanged { block: StableId },
}

impl MutationEvent {
    /// Whether the cursor should be remapped across the rebuild.
    #[inline]
    pub fn preserves_selection(&self) -> bool {
        !matches!(self, MutationEvent::BlockDisposed { .. })
    }

    /// Log rendering, e.g. `block-disposed 7`.
    pub fn as_dsl(&self) -> String {
        match self {
            MutationEvent::BlockCreated { block } => format!("block-created {block}"),
            MutationEvent::BlockDisposed { block } => format!("block-disposed {block}"),
            MutationEvent::ConnectionJoined => "connection-joined".to_string(),
            MutationEvent::ConnectionSplit => "connection-split".to_string(),
            MutationEvent::FieldChanged { block } => format!("field-changed {block}"),
        }
    }
}

// =============================================================================
// JOIN OUTCOME
// =============================================================================

/// Host-side refusal of an attempted join.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinRejection {
    pub reason: String,
}

impl JoinRejection {
    pub fn new(reason: impl Into<String>) -> Self {
        Self { reason: reason.into() }
    }
}

// =============================================================================
// HOST TRAIT
// =============================================================================

/// The canvas as the engine sees it.
///
/// `serialize` must produce a [`BlockTree`] whose identities are stable
/// across calls for blocks that survive a mutation; the whole engine's
/// remap story rests on that.
pub trait HostGraph {
    /// Full structural serialization of the canvas.
    fn serialize(&self) -> BlockTree;

    /// Connection and field facets for one block, `None` if it is gone.
    fn describe_block(&self, block: StableId) -> Option<BlockFacets>;

    /// The host's own current selection, if it has one.
    fn selected_block(&self) -> Option<StableId>;

    /// Try to join two endpoints. On success the host has already
    /// rewired the canvas (and may have fired its own change hooks).
    fn attempt_join(
        &mut self,
        a: &EndpointRef,
        b: &EndpointRef,
    ) -> Result<(), JoinRejection>;

    /// Disconnect whatever is attached at the endpoint, if anything.
    fn split(&mut self, endpoint: &EndpointRef);

    /// Open the field's editor widget.
    fn open_editor(&mut self, field: &FieldRef);
}
