//! Snapshot validation.
//!
//! All snapshots MUST be validated before navigation. Validation enforces
//! the SoA invariants the traversal primitives depend on; a snapshot that
//! passes cannot send the cursor out of bounds or into a cycle.

use crate::{
    MirrorError, MirrorSnapshot, NodeKind, MAX_MIRROR_NODES, NONE_ID, NONE_IDX, NONE_SERIAL,
};
use std::collections::HashSet;

/// Trait for validatable types.
pub trait Validate {
    /// Validate the object, returning an error if invalid.
    fn validate(&self) -> Result<(), MirrorError>;

    /// Validate in debug builds only (for performance).
    #[cfg(debug_assertions)]
    fn debug_validate(&self) -> Result<(), MirrorError> {
        self.validate()
    }

    #[cfg(not(debug_assertions))]
    fn debug_validate(&self) -> Result<(), MirrorError> {
        Ok(())
    }
}

impl Validate for MirrorSnapshot {
    fn validate(&self) -> Result<(), MirrorError> {
        let n = self.kinds.len();

        // Check node count limit
        if n > MAX_MIRROR_NODES {
            return Err(MirrorError::TooManyNodes {
                count: n,
                max: MAX_MIRROR_NODES,
            });
        }

        // Check all parallel arrays have same length
        check_array_len(n, self.serials.len(), "serials")?;
        check_array_len(n, self.identities.len(), "identities")?;
        check_array_len(n, self.labels.len(), "labels")?;
        check_array_len(n, self.details.len(), "details")?;
        check_array_len(n, self.parent.len(), "parent")?;
        check_array_len(n, self.first_child.len(), "first_child")?;
        check_array_len(n, self.next_sibling.len(), "next_sibling")?;

        // Validate navigation indices
        check_nav_indices(n, &self.parent, "parent")?;
        check_nav_indices(n, &self.first_child, "first_child")?;
        check_nav_indices(n, &self.next_sibling, "next_sibling")?;

        // Validate string table references
        let table_len = self.string_table.len();
        for &label_id in self.labels.iter() {
            if label_id as usize >= table_len {
                return Err(MirrorError::InvalidStringId {
                    index: label_id,
                    size: table_len,
                });
            }
        }
        for &detail_id in self.details.iter() {
            if detail_id != NONE_IDX && detail_id as usize >= table_len {
                return Err(MirrorError::InvalidStringId {
                    index: detail_id,
                    size: table_len,
                });
            }
        }

        self.validate_block_ids()?;
        self.validate_roots()?;
        self.validate_reachability()?;
        self.validate_shapes()?;

        Ok(())
    }
}

impl MirrorSnapshot {
    /// Serials and identities are non-zero and unique on blocks, zero
    /// everywhere else.
    fn validate_block_ids(&self) -> Result<(), MirrorError> {
        let mut serials = HashSet::new();
        let mut identities = HashSet::new();

        for (idx, &kind) in self.kinds.iter().enumerate() {
            let serial = self.serials[idx];
            let identity = self.identities[idx];

            if kind == NodeKind::Block {
                if serial == NONE_SERIAL {
                    return Err(MirrorError::InvalidSerial { index: idx });
                }
                if !serials.insert(serial) {
                    return Err(MirrorError::DuplicateSerial { serial });
                }
                if identity == NONE_ID {
                    return Err(MirrorError::InvalidIdentity { index: idx });
                }
                if !identities.insert(identity) {
                    return Err(MirrorError::DuplicateIdentity { identity });
                }
            } else {
                if serial != NONE_SERIAL {
                    return Err(MirrorError::InvalidSerial { index: idx });
                }
                if identity != NONE_ID {
                    return Err(MirrorError::InvalidIdentity { index: idx });
                }
            }
        }

        Ok(())
    }

    /// Roots are in-bounds, parentless blocks.
    fn validate_roots(&self) -> Result<(), MirrorError> {
        let n = self.kinds.len();
        for &root in &self.roots {
            if root as usize >= n {
                return Err(MirrorError::IndexOutOfBounds {
                    index: root,
                    max: n,
                    field: "roots",
                });
            }
            if self.kinds[root as usize] != NodeKind::Block
                || self.parent[root as usize] != NONE_IDX
            {
                return Err(MirrorError::InvalidRoot { index: root });
            }
        }
        Ok(())
    }

    /// Every node is reached exactly once from the roots, with parent
    /// links agreeing with the child chains.
    fn validate_reachability(&self) -> Result<(), MirrorError> {
        let n = self.kinds.len();
        let mut visits = vec![0u32; n];
        let mut stack: Vec<usize> = Vec::new();

        for &root in &self.roots {
            let root = root as usize;
            visits[root] += 1;
            if visits[root] > 1 {
                return Err(MirrorError::OrphanNode { index: root });
            }
            stack.push(root);
        }

        while let Some(node) = stack.pop() {
            let mut child = self.first_child[node];
            while child != NONE_IDX {
                let c = child as usize;
                if self.parent[c] != node as u32 {
                    return Err(MirrorError::LinkMismatch { index: c });
                }
                visits[c] += 1;
                if visits[c] > 1 {
                    return Err(MirrorError::OrphanNode { index: c });
                }
                stack.push(c);
                child = self.next_sibling[c];
            }
        }

        if let Some(orphan) = visits.iter().position(|&v| v == 0) {
            return Err(MirrorError::OrphanNode { index: orphan });
        }

        Ok(())
    }

    /// Per-kind child shape and the canonical order under blocks.
    fn validate_shapes(&self) -> Result<(), MirrorError> {
        for (idx, &kind) in self.kinds.iter().enumerate() {
            match kind {
                NodeKind::Next | NodeKind::Statement | NodeKind::Value => {
                    let children: Vec<usize> = self.children(idx).collect();
                    let holds_one_block =
                        children.len() == 1 && self.kinds[children[0]] == NodeKind::Block;
                    if !holds_one_block {
                        return Err(MirrorError::BrokenConnector {
                            index: idx,
                            kind,
                            children: children.len(),
                        });
                    }
                }
                NodeKind::Field | NodeKind::Comment => {
                    if self.first_child[idx] != NONE_IDX {
                        return Err(MirrorError::LeafWithChildren { index: idx, kind });
                    }
                }
                NodeKind::Block => {
                    self.validate_block_children(idx)?;
                }
            }
        }
        Ok(())
    }

    /// Canonical order: fields, values, statements, at most one comment,
    /// at most one next, in that order. No block directly under a block.
    fn validate_block_children(&self, idx: usize) -> Result<(), MirrorError> {
        fn rank(kind: NodeKind) -> Option<u8> {
            match kind {
                NodeKind::Field => Some(0),
                NodeKind::Value => Some(1),
                NodeKind::Statement => Some(2),
                NodeKind::Comment => Some(3),
                NodeKind::Next => Some(4),
                NodeKind::Block => None,
            }
        }

        let mut last_rank = 0u8;
        let mut comments = 0usize;
        let mut nexts = 0usize;

        for child in self.children(idx) {
            let child_kind = self.kinds[child];
            let child_rank = rank(child_kind).ok_or(MirrorError::ChildOrder { index: idx })?;
            if child_rank < last_rank {
                return Err(MirrorError::ChildOrder { index: idx });
            }
            last_rank = child_rank;

            match child_kind {
                NodeKind::Comment => comments += 1,
                NodeKind::Next => nexts += 1,
                _ => {}
            }
        }

        if comments > 1 || nexts > 1 {
            return Err(MirrorError::ChildOrder { index: idx });
        }

        Ok(())
    }
}

fn check_array_len(expected: usize, actual: usize, field: &'static str) -> Result<(), MirrorError> {
    if actual != expected {
        Err(MirrorError::ArrayLengthMismatch {
            expected,
            actual,
            field,
        })
    } else {
        Ok(())
    }
}

fn check_nav_indices(n: usize, indices: &[u32], field: &'static str) -> Result<(), MirrorError> {
    for &idx in indices.iter() {
        if idx != NONE_IDX && idx as usize >= n {
            return Err(MirrorError::IndexOutOfBounds {
                index: idx,
                max: n,
                field,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flatten;
    use crate::tree::{BlockNode, BlockTree};

    fn make_valid_mirror() -> MirrorSnapshot {
        flatten(&BlockTree::with_roots(vec![
            BlockNode::new(100, "event_start")
                .with_field("NAME", "go")
                .with_next(BlockNode::new(200, "move_forward").with_comment("second")),
            BlockNode::new(300, "event_click"),
        ]))
        .expect("flatten")
    }

    #[test]
    fn valid_mirror_passes() {
        let mirror = make_valid_mirror();
        assert!(mirror.validate().is_ok());
    }

    #[test]
    fn empty_mirror_passes() {
        let mirror = MirrorSnapshot::default();
        assert!(mirror.validate().is_ok());
    }

    #[test]
    fn array_length_mismatch_fails() {
        let mut mirror = make_valid_mirror();
        mirror.serials.push(0); // One longer than kinds

        let result = mirror.validate();
        assert!(matches!(
            result,
            Err(MirrorError::ArrayLengthMismatch {
                field: "serials",
                ..
            })
        ));
    }

    #[test]
    fn out_of_bounds_nav_index_fails() {
        let mut mirror = make_valid_mirror();
        mirror.next_sibling[0] = 99;

        let result = mirror.validate();
        assert!(matches!(
            result,
            Err(MirrorError::IndexOutOfBounds {
                field: "next_sibling",
                ..
            })
        ));
    }

    #[test]
    fn zero_block_serial_fails() {
        let mut mirror = make_valid_mirror();
        let block = mirror.find_identity(100).expect("block");
        mirror.serials[block] = NONE_SERIAL;

        let result = mirror.validate();
        assert!(matches!(result, Err(MirrorError::InvalidSerial { .. })));
    }

    #[test]
    fn duplicate_identity_fails() {
        let mut mirror = make_valid_mirror();
        let a = mirror.find_identity(100).expect("a");
        let b = mirror.find_identity(200).expect("b");
        mirror.identities[b] = mirror.identities[a];

        let result = mirror.validate();
        assert!(matches!(
            result,
            Err(MirrorError::DuplicateIdentity { identity: 100 })
        ));
    }

    #[test]
    fn serial_on_non_block_fails() {
        let mut mirror = make_valid_mirror();
        let field = mirror
            .kinds
            .iter()
            .position(|&k| k == NodeKind::Field)
            .expect("field node");
        mirror.serials[field] = 42;

        let result = mirror.validate();
        assert!(matches!(
            result,
            Err(MirrorError::InvalidSerial { index }) if index == field
        ));
    }

    #[test]
    fn invalid_string_id_fails() {
        let mut mirror = make_valid_mirror();
        mirror.labels[0] = 999;

        let result = mirror.validate();
        assert!(matches!(
            result,
            Err(MirrorError::InvalidStringId { index: 999, .. })
        ));
    }

    #[test]
    fn root_with_parent_fails() {
        let mut mirror = make_valid_mirror();
        let root = mirror.roots[0] as usize;
        mirror.parent[root] = mirror.roots[1];

        let result = mirror.validate();
        assert!(matches!(result, Err(MirrorError::InvalidRoot { .. })));
    }

    #[test]
    fn parent_link_disagreement_fails() {
        let mut mirror = make_valid_mirror();
        // Point a child's parent somewhere else than the linking node
        let next = mirror
            .kinds
            .iter()
            .position(|&k| k == NodeKind::Next)
            .expect("next node");
        let held = mirror.block_child(next).expect("held block");
        mirror.parent[held] = mirror.roots[1];

        let result = mirror.validate();
        assert!(matches!(result, Err(MirrorError::LinkMismatch { .. })));
    }

    #[test]
    fn unreachable_node_fails() {
        let mut mirror = make_valid_mirror();
        // Detach the second container from the roots list
        mirror.roots.pop();

        let result = mirror.validate();
        assert!(matches!(result, Err(MirrorError::OrphanNode { .. })));
    }

    #[test]
    fn connector_without_block_fails() {
        let mut mirror = make_valid_mirror();
        let next = mirror
            .kinds
            .iter()
            .position(|&k| k == NodeKind::Next)
            .expect("next node");
        mirror.first_child[next] = NONE_IDX;

        let result = mirror.validate();
        // The empty connector is hit either as a broken connector or as
        // the orphaned subtree it leaves behind.
        assert!(result.is_err());
    }

    #[test]
    fn leaf_with_children_fails() {
        let mut mirror = make_valid_mirror();
        let comment = mirror
            .kinds
            .iter()
            .position(|&k| k == NodeKind::Comment)
            .expect("comment node");
        // Re-linking under the comment breaks reachability as well, so
        // target the shape check directly on a self-consistent mutation:
        // give the comment a child that also keeps its old parent link.
        mirror.first_child[comment] = mirror.roots[1];

        let result = mirror.validate();
        assert!(result.is_err());
    }

    #[test]
    fn child_order_violation_fails() {
        let mirror = flatten(&BlockTree::with_roots(vec![BlockNode::new(1, "if_then")
            .with_field("LBL", "if")
            .with_value("COND", BlockNode::new(2, "logic_true"))]))
        .expect("flatten");

        // Swap the field and value connectors in the sibling chain
        let mut broken = mirror.clone();
        let root = broken.roots[0] as usize;
        let field = broken.first_child[root] as usize;
        let value = broken.next_sibling[field] as usize;
        broken.first_child[root] = value as u32;
        broken.next_sibling[value] = field as u32;
        broken.next_sibling[field] = NONE_IDX;

        let result = broken.validate();
        assert!(matches!(result, Err(MirrorError::ChildOrder { .. })));
    }

    #[test]
    fn debug_validate_matches_validate_in_debug_builds() {
        let mirror = make_valid_mirror();
        assert!(mirror.debug_validate().is_ok());
    }
}
