//! Arena of hierarchical transform nodes.
//!
//! The [`TransformTree`] resource owns every [`TransformNode`] and hands out
//! generational [`NodeId`] handles. Parent and child links are plain handles
//! into the same arena: they never keep a node alive, and
//! [`destroy`](TransformTree::destroy) prunes them eagerly so no live node
//! ever refers to a destroyed one.
//!
//! # Local vs. world space
//!
//! Each node stores only its *local* transform. The *world* transform is the
//! local transform accumulated with every ancestor's local transform
//! (see [`Transform2D::compose`]) and is recomputed by walking up the chain on
//! every read. Nothing is cached, so world values are always consistent with
//! the current hierarchy.
//!
//! # Reparenting
//!
//! - [`set_parent`](TransformTree::set_parent) keeps the local transform; the
//!   world transform follows the new parent.
//! - [`set_parent_keep_world_transform`](TransformTree::set_parent_keep_world_transform)
//!   rewrites the local transform so the world transform stays where it was.
//!
//! Both reject a parent that is the node itself or one of its descendants with
//! [`HierarchyError::CyclicParent`] and leave the tree untouched.
//!
//! # Usage
//!
//! ```ignore
//! let mut tree = TransformTree::new();
//! let ship = tree.create_node();
//! let turret = tree.create_node();
//! tree.set_parent(turret, Some(ship))?;
//!
//! tree.world_mut(ship).unwrap().position().set(Vector2::new(10.0, 10.0));
//! let turret_world = tree.world(turret).unwrap().position(); // (10, 10)
//! ```

mod error;
mod proxy;

pub use error::HierarchyError;
pub use proxy::{PositionMut, RotationMut, Space, TransformMut, TransformRef};

use std::fmt;

use bevy_ecs::prelude::*;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::components::transform2d::Transform2D;

/// Handle to a node in a [`TransformTree`].
///
/// The generation makes handles to destroyed nodes detectably stale, even
/// after their slot has been reused. A slot is retired once its generation
/// reaches `u32::MAX`, so a stale handle can never match again.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId {
    index: u32,
    generation: u32,
}

impl NodeId {
    /// Slot index inside the arena.
    pub fn index(&self) -> u32 {
        self.index
    }

    /// Generation of the slot when this handle was issued.
    pub fn generation(&self) -> u32 {
        self.generation
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}v{}", self.index, self.generation)
    }
}

/// One node of the hierarchy.
///
/// Nodes live inside a [`TransformTree`] and are only reachable through it;
/// they are intentionally neither `Clone` nor `Copy`.
#[derive(Debug)]
pub struct TransformNode {
    local: Transform2D,
    parent: Option<NodeId>,
    children: SmallVec<[NodeId; 4]>,
}

impl TransformNode {
    fn new(local: Transform2D) -> Self {
        Self {
            local,
            parent: None,
            children: SmallVec::new(),
        }
    }

    /// Transform relative to the parent (absolute for roots).
    pub fn local(&self) -> Transform2D {
        self.local
    }

    /// Current parent, `None` for roots.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Children in insertion order.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

#[derive(Debug)]
struct Slot {
    generation: u32,
    node: Option<TransformNode>,
}

/// Arena owning every transform node of a scene.
#[derive(Resource, Debug, Default)]
pub struct TransformTree {
    slots: Vec<Slot>,
    free_list: Vec<u32>,
    len: usize,
}

impl TransformTree {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the tree holds no live nodes.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns `true` if `id` refers to a live node.
    pub fn contains(&self, id: NodeId) -> bool {
        self.node(id).is_some()
    }

    /// Create a root node with the identity transform.
    pub fn create_node(&mut self) -> NodeId {
        self.create_node_with(Transform2D::identity())
    }

    /// Create a root node with the given local transform.
    pub fn create_node_with(&mut self, local: Transform2D) -> NodeId {
        let node = TransformNode::new(local);
        let id = if let Some(index) = self.free_list.pop() {
            let slot = &mut self.slots[index as usize];
            slot.node = Some(node);
            NodeId {
                index,
                generation: slot.generation,
            }
        } else {
            let index = self.slots.len() as u32;
            self.slots.push(Slot {
                generation: 0,
                node: Some(node),
            });
            NodeId {
                index,
                generation: 0,
            }
        };
        self.len += 1;
        debug!("Created transform node {}", id);
        id
    }

    /// Create a node and attach it under `parent` with the given local transform.
    pub fn create_child(
        &mut self,
        parent: NodeId,
        local: Transform2D,
    ) -> Result<NodeId, HierarchyError> {
        if !self.contains(parent) {
            return Err(HierarchyError::StaleNode(parent));
        }
        let id = self.create_node_with(local);
        self.relink(id, Some(parent));
        Ok(id)
    }

    /// Destroy a node and unlink it from the hierarchy.
    ///
    /// The node is removed from its parent's children, and each of its own
    /// children becomes a root (they are not reattached to the grandparent).
    /// Children keep their local transforms.
    ///
    /// Returns `false` if `id` was already stale.
    pub fn destroy(&mut self, id: NodeId) -> bool {
        let Some(node) = self.take_node(id) else {
            return false;
        };

        if let Some(parent) = node.parent
            && let Some(parent_node) = self.node_mut(parent)
        {
            parent_node.children.retain(|c| *c != id);
        }
        for child in &node.children {
            if let Some(child_node) = self.node_mut(*child) {
                child_node.parent = None;
            }
        }

        debug!(
            "Destroyed transform node {} ({} children detached)",
            id,
            node.children.len()
        );
        true
    }

    /// Borrow a node.
    pub fn node(&self, id: NodeId) -> Option<&TransformNode> {
        self.slots
            .get(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_ref())
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut TransformNode> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_mut())
    }

    fn take_node(&mut self, id: NodeId) -> Option<TransformNode> {
        let slot = self
            .slots
            .get_mut(id.index as usize)
            .filter(|slot| slot.generation == id.generation)?;
        let node = slot.node.take()?;
        // A slot whose generation is exhausted is retired, never reused.
        if let Some(next) = slot.generation.checked_add(1) {
            slot.generation = next;
            self.free_list.push(id.index);
        }
        self.len -= 1;
        Some(node)
    }

    /// Current parent of `id`, `None` for roots and stale handles.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(|n| n.parent)
    }

    /// Children of `id` in insertion order; empty for stale handles.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map(|n| n.children()).unwrap_or(&[])
    }

    /// Iterate over the strict ancestors of `id`, nearest first.
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            tree: self,
            next: self.parent(id),
        }
    }

    /// Number of ancestors of `id` (0 for roots and stale handles).
    pub fn depth(&self, id: NodeId) -> usize {
        self.ancestors(id).count()
    }

    /// Iterate over every live node handle, in slot order.
    pub fn iter(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            slot.node.as_ref().map(|_| NodeId {
                index: index as u32,
                generation: slot.generation,
            })
        })
    }

    /// Iterate over live nodes without a parent.
    pub fn roots(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.iter().filter(|id| self.parent(*id).is_none())
    }

    /// Read view of the node's local transform.
    pub fn local(&self, id: NodeId) -> Option<TransformRef<'_>> {
        self.view(id, Space::Local)
    }

    /// Read view of the node's world transform.
    pub fn world(&self, id: NodeId) -> Option<TransformRef<'_>> {
        self.view(id, Space::World)
    }

    /// Write view of the node's local transform.
    pub fn local_mut(&mut self, id: NodeId) -> Option<TransformMut<'_>> {
        self.view_mut(id, Space::Local)
    }

    /// Write view of the node's world transform.
    ///
    /// Writes through this view are converted into the equivalent change of
    /// the stored local transform.
    pub fn world_mut(&mut self, id: NodeId) -> Option<TransformMut<'_>> {
        self.view_mut(id, Space::World)
    }

    /// Read view in the requested space.
    pub fn view(&self, id: NodeId, space: Space) -> Option<TransformRef<'_>> {
        self.contains(id).then(|| TransformRef::new(self, id, space))
    }

    /// Write view in the requested space.
    pub fn view_mut(&mut self, id: NodeId, space: Space) -> Option<TransformMut<'_>> {
        if self.contains(id) {
            Some(TransformMut::new(self, id, space))
        } else {
            None
        }
    }

    /// Reparent `id` under `new_parent` (or detach it with `None`), keeping
    /// its local transform.
    ///
    /// The world transform changes to "local offset from the new parent".
    /// Reparenting to the current parent moves the node to the end of the
    /// parent's children.
    pub fn set_parent(
        &mut self,
        id: NodeId,
        new_parent: Option<NodeId>,
    ) -> Result<(), HierarchyError> {
        self.check_reparent(id, new_parent)?;
        self.relink(id, new_parent);
        debug!("Reparented {} to {:?} (kept local)", id, new_parent);
        Ok(())
    }

    /// Reparent `id` under `new_parent` (or detach it with `None`), keeping
    /// its world transform.
    ///
    /// The local transform is rewritten to the old world transform minus the
    /// new parent's world transform, so the node does not visibly move.
    pub fn set_parent_keep_world_transform(
        &mut self,
        id: NodeId,
        new_parent: Option<NodeId>,
    ) -> Result<(), HierarchyError> {
        self.check_reparent(id, new_parent)?;

        let old_world = self.world_transform(id);
        self.relink(id, new_parent);
        let local = match new_parent {
            None => old_world,
            Some(parent) => old_world.relative_to(self.world_transform(parent)),
        };
        if let Some(node) = self.node_mut(id) {
            node.local = local;
        }

        debug!("Reparented {} to {:?} (kept world)", id, new_parent);
        Ok(())
    }

    /// Walk up from `new_parent`; meeting `id` on the way means a cycle.
    fn check_reparent(&self, id: NodeId, new_parent: Option<NodeId>) -> Result<(), HierarchyError> {
        if !self.contains(id) {
            return Err(HierarchyError::StaleNode(id));
        }
        let Some(parent) = new_parent else {
            return Ok(());
        };
        if !self.contains(parent) {
            return Err(HierarchyError::StaleNode(parent));
        }
        if parent == id || self.ancestors(parent).any(|a| a == id) {
            warn!("Rejected cyclic reparent of {} under {}", id, parent);
            return Err(HierarchyError::CyclicParent { node: id, parent });
        }
        Ok(())
    }

    /// Move `id` from its current parent's children to `new_parent`'s.
    /// Callers have already validated both handles.
    fn relink(&mut self, id: NodeId, new_parent: Option<NodeId>) {
        if let Some(old_parent) = self.parent(id)
            && let Some(old_node) = self.node_mut(old_parent)
        {
            old_node.children.retain(|c| *c != id);
        }
        if let Some(parent) = new_parent
            && let Some(parent_node) = self.node_mut(parent)
        {
            parent_node.children.push(id);
        }
        if let Some(node) = self.node_mut(id) {
            node.parent = new_parent;
        }
    }

    /// Local transform of `id`, identity for stale handles.
    pub(crate) fn local_transform(&self, id: NodeId) -> Transform2D {
        self.node(id).map(|n| n.local).unwrap_or_default()
    }

    /// World transform of `id`: its local transform accumulated with every
    /// ancestor's. Identity for stale handles.
    pub(crate) fn world_transform(&self, id: NodeId) -> Transform2D {
        self.ancestors(id)
            .fold(self.local_transform(id), |acc, ancestor| {
                acc.compose(self.local_transform(ancestor))
            })
    }

    /// World transform of the parent of `id`, identity for roots.
    pub(crate) fn parent_world_transform(&self, id: NodeId) -> Transform2D {
        self.parent(id)
            .map(|p| self.world_transform(p))
            .unwrap_or_default()
    }

    pub(crate) fn set_local_transform(&mut self, id: NodeId, local: Transform2D) {
        if let Some(node) = self.node_mut(id) {
            node.local = local;
        }
    }
}

/// Iterator over the ancestors of a node, nearest first.
///
/// Returned by [`TransformTree::ancestors`].
pub struct Ancestors<'a> {
    tree: &'a TransformTree,
    next: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.tree.parent(current);
        Some(current)
    }
}
