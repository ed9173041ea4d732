//! An in-memory canvas for tests.
//!
//! A miniature block editor holding real structure: blocks with stack
//! connections, named inputs carrying fields and value or statement
//! connections. It implements [`HostGraph`] the way a production
//! adapter would, including join validation and rewiring, so session
//! tests drive the whole engine against honest host behaviour.

use crate::host::{
    BlockFacets, EndpointLoc, EndpointRef, FieldEditor, FieldFacet, FieldRef, HostGraph,
    InputConnFacet, InputFacet, JoinRejection,
};
use blocknav_mirror::{BlockNode, BlockTree, StableId};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnKind {
    Value,
    Statement,
}

#[derive(Debug, Clone)]
pub struct FixtureConnection {
    pub kind: ConnKind,
    pub attached: Option<StableId>,
}

#[derive(Debug, Clone)]
pub struct FixtureField {
    pub name: String,
    pub editor: FieldEditor,
    pub value: String,
}

#[derive(Debug, Clone)]
pub struct FixtureInput {
    pub name: String,
    pub fields: Vec<FixtureField>,
    pub connection: Option<FixtureConnection>,
}

#[derive(Debug, Clone)]
pub struct FixtureBlock {
    pub kind_name: String,
    pub inputs: Vec<FixtureInput>,
    pub has_previous: bool,
    pub has_next: bool,
    pub comment: Option<String>,
    pub next: Option<StableId>,
}

/// The canvas: blocks by identity plus the root order.
#[derive(Debug, Clone, Default)]
pub struct CanvasFixture {
    blocks: HashMap<StableId, FixtureBlock>,
    roots: Vec<StableId>,
    selected: Option<StableId>,
    opened: Vec<FieldRef>,
    next_id: StableId,
}

impl CanvasFixture {
    pub fn new() -> Self {
        Self::default()
    }

    fn fresh_block(&mut self, kind: &str) -> StableId {
        self.next_id += 1;
        let id = self.next_id;
        self.blocks.insert(
            id,
            FixtureBlock {
                kind_name: kind.to_string(),
                inputs: Vec::new(),
                has_previous: true,
                has_next: true,
                comment: None,
                next: None,
            },
        );
        id
    }

    fn block_mut(&mut self, id: StableId) -> &mut FixtureBlock {
        self.blocks.get_mut(&id).expect("block exists")
    }

    fn input_mut(&mut self, block: StableId, name: &str) -> &mut FixtureInput {
        let owner = self.block_mut(block);
        let pos = owner.inputs.iter().position(|input| input.name == name);
        match pos {
            Some(pos) => &mut owner.inputs[pos],
            None => {
                owner.inputs.push(FixtureInput {
                    name: name.to_string(),
                    fields: Vec::new(),
                    connection: None,
                });
                owner.inputs.last_mut().expect("just pushed")
            }
        }
    }

    // =========================================================================
    // CANVAS EDITING
    // =========================================================================

    /// Append a new top-level block.
    pub fn add_container(&mut self, kind: &str) -> StableId {
        let id = self.fresh_block(kind);
        self.roots.push(id);
        id
    }

    /// Insert a new top-level block at root position `at`.
    pub fn insert_container(&mut self, at: usize, kind: &str) -> StableId {
        let id = self.fresh_block(kind);
        self.roots.insert(at, id);
        id
    }

    /// Create a block and attach it directly below `after`.
    pub fn append_next(&mut self, after: StableId, kind: &str) -> StableId {
        let id = self.fresh_block(kind);
        self.block_mut(after).next = Some(id);
        id
    }

    /// Create a sequence head under a statement input of `parent`.
    pub fn add_statement_child(&mut self, parent: StableId, input: &str, kind: &str) -> StableId {
        let id = self.fresh_block(kind);
        self.input_mut(parent, input).connection = Some(FixtureConnection {
            kind: ConnKind::Statement,
            attached: Some(id),
        });
        id
    }

    /// Create a value block and plug it into an input of `parent`.
    pub fn add_value_child(&mut self, parent: StableId, input: &str, kind: &str) -> StableId {
        let id = self.fresh_block(kind);
        {
            let child = self.block_mut(id);
            child.has_previous = false;
            child.has_next = false;
        }
        self.input_mut(parent, input).connection = Some(FixtureConnection {
            kind: ConnKind::Value,
            attached: Some(id),
        });
        id
    }

    /// Give `block` an unattached value connection.
    pub fn open_value_input(&mut self, block: StableId, input: &str) {
        self.input_mut(block, input).connection = Some(FixtureConnection {
            kind: ConnKind::Value,
            attached: None,
        });
    }

    /// Give `block` an unattached statement connection.
    pub fn open_statement_input(&mut self, block: StableId, input: &str) {
        self.input_mut(block, input).connection = Some(FixtureConnection {
            kind: ConnKind::Statement,
            attached: None,
        });
    }

    pub fn add_field(&mut self, block: StableId, input: &str, field: &str, editor: FieldEditor) {
        self.input_mut(block, input).fields.push(FixtureField {
            name: field.to_string(),
            editor,
            value: String::new(),
        });
    }

    pub fn set_connections(&mut self, block: StableId, has_previous: bool, has_next: bool) {
        let owner = self.block_mut(block);
        owner.has_previous = has_previous;
        owner.has_next = has_next;
    }

    pub fn set_comment(&mut self, block: StableId, text: &str) {
        self.block_mut(block).comment = Some(text.to_string());
    }

    pub fn select(&mut self, block: Option<StableId>) {
        self.selected = block;
    }

    /// Remove a block and everything hanging off it.
    pub fn dispose(&mut self, block: StableId) {
        self.detach(block);
        self.remove_subtree(block);
    }

    fn detach(&mut self, block: StableId) {
        self.roots.retain(|&id| id != block);
        for owner in self.blocks.values_mut() {
            if owner.next == Some(block) {
                owner.next = None;
            }
            for input in &mut owner.inputs {
                if let Some(conn) = &mut input.connection {
                    if conn.attached == Some(block) {
                        conn.attached = None;
                    }
                }
            }
        }
    }

    fn remove_subtree(&mut self, block: StableId) {
        let removed = match self.blocks.remove(&block) {
            Some(removed) => removed,
            None => return,
        };
        if self.selected == Some(block) {
            self.selected = None;
        }
        if let Some(next) = removed.next {
            self.remove_subtree(next);
        }
        for input in removed.inputs {
            if let Some(conn) = input.connection {
                if let Some(child) = conn.attached {
                    self.remove_subtree(child);
                }
            }
        }
    }

    // =========================================================================
    // INSPECTION
    // =========================================================================

    pub fn next_of(&self, block: StableId) -> Option<StableId> {
        self.blocks.get(&block).and_then(|owner| owner.next)
    }

    pub fn attached(&self, block: StableId, input: &str) -> Option<StableId> {
        self.blocks
            .get(&block)?
            .inputs
            .iter()
            .find(|candidate| candidate.name == input)?
            .connection
            .as_ref()?
            .attached
    }

    pub fn opened_editors(&self) -> &[FieldRef] {
        &self.opened
    }

    fn build_node(&self, id: StableId) -> BlockNode {
        let block = &self.blocks[&id];
        let mut node = BlockNode::new(id, &block.kind_name);
        for input in &block.inputs {
            for field in &input.fields {
                node = node.with_field(&field.name, &field.value);
            }
        }
        for input in &block.inputs {
            if let Some(conn) = &input.connection {
                if let Some(child) = conn.attached {
                    node = match conn.kind {
                        ConnKind::Value => node.with_value(&input.name, self.build_node(child)),
                        ConnKind::Statement => {
                            node.with_statement(&input.name, self.build_node(child))
                        }
                    };
                }
            }
        }
        if let Some(comment) = &block.comment {
            node = node.with_comment(comment);
        }
        if let Some(next) = block.next {
            node = node.with_next(self.build_node(next));
        }
        node
    }
}

impl HostGraph for CanvasFixture {
    fn serialize(&self) -> BlockTree {
        BlockTree::with_roots(self.roots.iter().map(|&id| self.build_node(id)).collect())
    }

    fn describe_block(&self, block: StableId) -> Option<BlockFacets> {
        let owner = self.blocks.get(&block)?;
        Some(BlockFacets {
            has_previous_connection: owner.has_previous,
            has_next_connection: owner.has_next,
            inputs: owner
                .inputs
                .iter()
                .map(|input| InputFacet {
                    name: input.name.clone(),
                    fields: input
                        .fields
                        .iter()
                        .map(|field| FieldFacet::new(&field.name, field.editor))
                        .collect(),
                    connection: input
                        .connection
                        .as_ref()
                        .map(|conn| InputConnFacet { attached: conn.attached }),
                })
                .collect(),
        })
    }

    fn selected_block(&self) -> Option<StableId> {
        self.selected
    }

    fn attempt_join(&mut self, a: &EndpointRef, b: &EndpointRef) -> Result<(), JoinRejection> {
        // One side must be a plug (a previous connection), the other a
        // socket (a next or input connection).
        let (plug, socket) = if a.loc == EndpointLoc::Previous {
            (a, b)
        } else if b.loc == EndpointLoc::Previous {
            (b, a)
        } else {
            return Err(JoinRejection::new("no previous endpoint in the pair"));
        };

        if plug.block == socket.block {
            return Err(JoinRejection::new("cannot join a block to itself"));
        }
        if !self.blocks.contains_key(&plug.block) || !self.blocks.contains_key(&socket.block) {
            return Err(JoinRejection::new("endpoint block is gone"));
        }
        if !self.blocks[&plug.block].has_previous {
            return Err(JoinRejection::new("plug block has no previous connection"));
        }
        if !self.roots.contains(&plug.block) {
            return Err(JoinRejection::new("plug block is already connected"));
        }

        match &socket.loc {
            EndpointLoc::Previous => Err(JoinRejection::new("two previous endpoints")),
            EndpointLoc::Next => {
                let owner = &self.blocks[&socket.block];
                if !owner.has_next {
                    return Err(JoinRejection::new("socket block has no next connection"));
                }
                if owner.next.is_some() {
                    return Err(JoinRejection::new("socket already occupied"));
                }
                self.block_mut(socket.block).next = Some(plug.block);
                self.roots.retain(|&id| id != plug.block);
                Ok(())
            }
            EndpointLoc::Input(name) => {
                let existing = self.blocks[&socket.block]
                    .inputs
                    .iter()
                    .find(|input| input.name == *name)
                    .and_then(|input| input.connection.as_ref());
                match existing {
                    None => return Err(JoinRejection::new("no such input connection")),
                    Some(conn) if conn.attached.is_some() => {
                        return Err(JoinRejection::new("socket already occupied"));
                    }
                    Some(_) => {}
                }
                let name = name.clone();
                let conn = self
                    .input_mut(socket.block, &name)
                    .connection
                    .as_mut()
                    .expect("checked above");
                conn.attached = Some(plug.block);
                self.roots.retain(|&id| id != plug.block);
                Ok(())
            }
        }
    }

    fn split(&mut self, endpoint: &EndpointRef) {
        match &endpoint.loc {
            EndpointLoc::Previous => {
                if self.blocks.contains_key(&endpoint.block)
                    && !self.roots.contains(&endpoint.block)
                {
                    self.detach(endpoint.block);
                    self.roots.push(endpoint.block);
                }
            }
            EndpointLoc::Next => {
                let freed = self
                    .blocks
                    .get_mut(&endpoint.block)
                    .and_then(|owner| owner.next.take());
                if let Some(freed) = freed {
                    self.roots.push(freed);
                }
            }
            EndpointLoc::Input(name) => {
                let freed = self
                    .blocks
                    .get_mut(&endpoint.block)
                    .and_then(|owner| owner.inputs.iter_mut().find(|input| input.name == *name))
                    .and_then(|input| input.connection.as_mut())
                    .and_then(|conn| conn.attached.take());
                if let Some(freed) = freed {
                    self.roots.push(freed);
                }
            }
        }
    }

    fn open_editor(&mut self, field: &FieldRef) {
        self.opened.push(field.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blocknav_mirror::flatten;

    #[test]
    fn serialize_round_trips_through_flatten() {
        let mut canvas = CanvasFixture::new();
        let a = canvas.add_container("alpha");
        let b = canvas.append_next(a, "beta");
        canvas.add_statement_child(b, "DO", "inner");
        canvas.set_comment(a, "top of the file");

        let tree = canvas.serialize();
        assert_eq!(tree.block_count(), 3);
        let mirror = flatten(&tree).expect("flatten");
        assert_eq!(mirror.container_count(), 1);
        assert!(mirror.find_identity(a).is_some());
        assert!(mirror.find_identity(b).is_some());
    }

    #[test]
    fn join_then_split_restores_two_roots() {
        let mut canvas = CanvasFixture::new();
        let a = canvas.add_container("alpha");
        let b = canvas.add_container("beta");

        canvas
            .attempt_join(&EndpointRef::next(a), &EndpointRef::previous(b))
            .expect("join");
        assert_eq!(canvas.next_of(a), Some(b));
        assert_eq!(canvas.serialize().roots.len(), 1);

        canvas.split(&EndpointRef::next(a));
        assert_eq!(canvas.next_of(a), None);
        assert_eq!(canvas.serialize().roots.len(), 2);
    }

    #[test]
    fn join_refuses_occupied_socket() {
        let mut canvas = CanvasFixture::new();
        let a = canvas.add_container("alpha");
        let b = canvas.append_next(a, "beta");
        let c = canvas.add_container("gamma");

        let result = canvas.attempt_join(&EndpointRef::next(a), &EndpointRef::previous(c));
        assert!(result.is_err());
        assert_eq!(canvas.next_of(a), Some(b));
    }

    #[test]
    fn join_plugs_into_value_input() {
        let mut canvas = CanvasFixture::new();
        let a = canvas.add_container("alpha");
        canvas.open_value_input(a, "VALUE");
        let b = canvas.add_container("beta");

        canvas
            .attempt_join(&EndpointRef::previous(b), &EndpointRef::input(a, "VALUE"))
            .expect("join");
        assert_eq!(canvas.attached(a, "VALUE"), Some(b));
        assert_eq!(canvas.serialize().roots.len(), 1);
    }

    #[test]
    fn dispose_removes_whole_subtree() {
        let mut canvas = CanvasFixture::new();
        let a = canvas.add_container("alpha");
        let b = canvas.append_next(a, "beta");
        let c = canvas.add_statement_child(b, "DO", "inner");
        canvas.select(Some(c));

        canvas.dispose(b);
        assert_eq!(canvas.next_of(a), None);
        assert_eq!(canvas.serialize().block_count(), 1);
        assert_eq!(canvas.selected_block(), None);
    }
}
