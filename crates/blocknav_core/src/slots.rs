//! The in-node selector.
//!
//! Entering a block flattens its interaction points into a slot list:
//! bottom connection, top connection, then per input row the editable
//! fields followed by the input's connection. A wrapping index steps
//! through the list; activating a slot dispatches on its kind.

use crate::{BlockFacets, Fault, FieldRef, StableId};
use crate::host::FieldEditor;

// =============================================================================
// SLOTS
// =============================================================================

/// One interaction point inside a block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Slot {
    /// The block's next (bottom) connection.
    BottomConnection,
    /// The block's previous (top) connection.
    TopConnection,
    /// An editable field.
    Field { field: FieldRef, editor: FieldEditor },
    /// The connection at the end of an input row.
    InputConnection {
        input: String,
        attached: Option<StableId>,
    },
}

// =============================================================================
// SLOT SESSION
// =============================================================================

/// An active in-node selection: the slot list of one block plus the
/// wrapping index into it.
///
/// The list is a point-in-time snapshot of the block's facets; any
/// mirror rebuild on a different block drops the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotSession {
    block: StableId,
    slots: Vec<Slot>,
    index: usize,
}

impl SlotSession {
    /// Build the slot list for a block. Faults if the block has no
    /// interaction points at all.
    pub fn enter(block: StableId, facets: &BlockFacets) -> Result<Self, Fault> {
        let mut slots = Vec::new();

        if facets.has_next_connection {
            slots.push(Slot::BottomConnection);
        }
        if facets.has_previous_connection {
            slots.push(Slot::TopConnection);
        }
        for input in &facets.inputs {
            for field in &input.fields {
                if field.editor.is_static() {
                    continue;
                }
                slots.push(Slot::Field {
                    field: FieldRef::new(block, input.name.clone(), field.name.clone()),
                    editor: field.editor,
                });
            }
            if let Some(conn) = &input.connection {
                slots.push(Slot::InputConnection {
                    input: input.name.clone(),
                    attached: conn.attached,
                });
            }
        }

        if slots.is_empty() {
            return Err(Fault::EmptySlotList);
        }
        Ok(Self { block, slots, index: 0 })
    }

    /// Identity of the entered block.
    #[inline]
    pub fn block(&self) -> StableId {
        self.block
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Current position in the slot list.
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    /// The slot under the selector.
    pub fn current(&self) -> &Slot {
        &self.slots[self.index]
    }

    /// Step forward, wrapping past the end.
    pub fn next(&mut self) {
        self.index = (self.index + 1) % self.slots.len();
    }

    /// Step backward, wrapping past the start.
    pub fn prev(&mut self) {
        self.index = (self.index + self.slots.len() - 1) % self.slots.len();
    }
}
