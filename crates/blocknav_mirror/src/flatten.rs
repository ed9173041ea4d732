//! Flattening - building a snapshot from the interchange tree.
//!
//! Flattening is deterministic: the same `BlockTree` always produces the
//! same snapshot, byte for byte. Serials are assigned in document order
//! (containers left to right, depth-first within each), so the serial of
//! a block is its position in a full reading of the canvas.

use crate::tree::{BlockNode, BlockTree};
use crate::{
    MirrorError, MirrorSnapshot, NodeKind, Validate, MAX_MIRROR_NODES, NONE_ID, NONE_IDX,
    NONE_SERIAL,
};
use std::collections::{HashMap, HashSet};

/// Build a navigable snapshot from the host's interchange tree.
///
/// Fails if the tree violates the host contract: zero or duplicate block
/// identities, or more nodes than `MAX_MIRROR_NODES`.
pub fn flatten(tree: &BlockTree) -> Result<MirrorSnapshot, MirrorError> {
    let mut state = FlattenState::new();

    for root in &tree.roots {
        let idx = state.push_block(root, NONE_IDX)?;
        state.mirror.roots.push(idx);
    }

    let FlattenState {
        mut mirror,
        interner,
        ..
    } = state;
    mirror.string_table = interner.into_table();

    mirror.debug_validate()?;
    Ok(mirror)
}

struct FlattenState {
    mirror: MirrorSnapshot,
    interner: Interner,
    next_serial: u32,
    seen_identities: HashSet<u64>,
}

impl FlattenState {
    fn new() -> Self {
        Self {
            mirror: MirrorSnapshot::default(),
            interner: Interner::new(),
            next_serial: crate::FIRST_SERIAL,
            seen_identities: HashSet::new(),
        }
    }

    /// Append one node to the arrays, returning its index.
    fn push_node(
        &mut self,
        kind: NodeKind,
        serial: u32,
        identity: u64,
        label: u32,
        detail: u32,
        parent: u32,
    ) -> Result<u32, MirrorError> {
        let idx = self.mirror.node_count();
        if idx >= MAX_MIRROR_NODES {
            return Err(MirrorError::TooManyNodes {
                count: idx + 1,
                max: MAX_MIRROR_NODES,
            });
        }

        self.mirror.kinds.push(kind);
        self.mirror.serials.push(serial);
        self.mirror.identities.push(identity);
        self.mirror.labels.push(label);
        self.mirror.details.push(detail);
        self.mirror.parent.push(parent);
        self.mirror.first_child.push(NONE_IDX);
        self.mirror.next_sibling.push(NONE_IDX);

        Ok(idx as u32)
    }

    /// Link a freshly pushed child under its parent.
    ///
    /// Children are pushed in canonical order, so linking appends to the
    /// end of the sibling chain tracked via `last_child`.
    fn link_child(&mut self, parent: u32, child: u32, last_child: &mut u32) {
        if *last_child == NONE_IDX {
            self.mirror.first_child[parent as usize] = child;
        } else {
            self.mirror.next_sibling[*last_child as usize] = child;
        }
        *last_child = child;
    }

    /// Flatten one block and everything under it.
    fn push_block(&mut self, block: &BlockNode, parent: u32) -> Result<u32, MirrorError> {
        if block.identity == NONE_ID {
            return Err(MirrorError::InvalidIdentity {
                index: self.mirror.node_count(),
            });
        }
        if !self.seen_identities.insert(block.identity) {
            return Err(MirrorError::DuplicateIdentity {
                identity: block.identity,
            });
        }

        let serial = self.next_serial;
        self.next_serial += 1;

        let label = self.interner.intern(&block.kind_name);
        let idx = self.push_node(NodeKind::Block, serial, block.identity, label, NONE_IDX, parent)?;

        let mut last_child = NONE_IDX;

        // Canonical child order: fields, values, statements, comment, next
        for field in &block.fields {
            let name = self.interner.intern(&field.name);
            let value = self.interner.intern(&field.value);
            let field_idx =
                self.push_node(NodeKind::Field, NONE_SERIAL, NONE_ID, name, value, idx)?;
            self.link_child(idx, field_idx, &mut last_child);
        }

        for (input, child) in &block.values {
            let name = self.interner.intern(input);
            let value_idx =
                self.push_node(NodeKind::Value, NONE_SERIAL, NONE_ID, name, NONE_IDX, idx)?;
            self.link_child(idx, value_idx, &mut last_child);

            let mut inner_last = NONE_IDX;
            let child_idx = self.push_block(child, value_idx)?;
            self.link_child(value_idx, child_idx, &mut inner_last);
        }

        for (input, child) in &block.statements {
            let name = self.interner.intern(input);
            let stmt_idx =
                self.push_node(NodeKind::Statement, NONE_SERIAL, NONE_ID, name, NONE_IDX, idx)?;
            self.link_child(idx, stmt_idx, &mut last_child);

            let mut inner_last = NONE_IDX;
            let child_idx = self.push_block(child, stmt_idx)?;
            self.link_child(stmt_idx, child_idx, &mut inner_last);
        }

        if let Some(text) = &block.comment {
            let empty = self.interner.intern("");
            let detail = self.interner.intern(text);
            let comment_idx =
                self.push_node(NodeKind::Comment, NONE_SERIAL, NONE_ID, empty, detail, idx)?;
            self.link_child(idx, comment_idx, &mut last_child);
        }

        if let Some(next) = &block.next {
            let empty = self.interner.intern("");
            let next_idx =
                self.push_node(NodeKind::Next, NONE_SERIAL, NONE_ID, empty, NONE_IDX, idx)?;
            self.link_child(idx, next_idx, &mut last_child);

            let mut inner_last = NONE_IDX;
            let child_idx = self.push_block(next, next_idx)?;
            self.link_child(next_idx, child_idx, &mut inner_last);
        }

        Ok(idx)
    }
}

/// Deduplicating string interner backing the snapshot string table.
struct Interner {
    index: HashMap<String, u32>,
}

impl Interner {
    fn new() -> Self {
        Self {
            index: HashMap::new(),
        }
    }

    fn intern(&mut self, s: &str) -> u32 {
        if let Some(&id) = self.index.get(s) {
            return id;
        }
        let id = self.index.len() as u32;
        self.index.insert(s.to_string(), id);
        id
    }

    fn into_table(self) -> Vec<String> {
        let mut table = vec![String::new(); self.index.len()];
        for (s, id) in self.index {
            table[id as usize] = s;
        }
        table
    }
}
