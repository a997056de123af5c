//! Local/world space views over a node's transform.
//!
//! Views are not stored state: they borrow the [`TransformTree`] and are
//! created on demand by [`TransformTree::local`], [`TransformTree::world`] and
//! their `_mut` counterparts. Reads in world space walk the ancestor chain;
//! writes in world space subtract the parent's accumulated value and store
//! the result as the node's local transform.
//!
//! Position and rotation are written independently: setting one never
//! touches the other.

use std::ops::{AddAssign, SubAssign};

use nalgebra::Vector2;

use super::{NodeId, TransformTree};
use crate::components::transform2d::Transform2D;

/// Coordinate space a view reads and writes in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Space {
    /// Relative to the parent (absolute for roots).
    Local,
    /// Accumulated through every ancestor.
    World,
}

/// Read-only view of a node's transform in one [`Space`].
#[derive(Clone, Copy)]
pub struct TransformRef<'a> {
    tree: &'a TransformTree,
    id: NodeId,
    space: Space,
}

impl<'a> TransformRef<'a> {
    pub(super) fn new(tree: &'a TransformTree, id: NodeId, space: Space) -> Self {
        Self { tree, id, space }
    }

    /// The node this view is bound to.
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn space(&self) -> Space {
        self.space
    }

    /// Whole transform in this view's space.
    pub fn transform(&self) -> Transform2D {
        read(self.tree, self.id, self.space)
    }

    pub fn position(&self) -> Vector2<f32> {
        self.transform().position
    }

    /// Rotation in degrees.
    pub fn rotation(&self) -> f32 {
        self.transform().rotation_degrees
    }
}

/// Writable view of a node's transform in one [`Space`].
///
/// Hands out [`PositionMut`] and [`RotationMut`] sub-views:
///
/// ```ignore
/// let mut world = tree.world_mut(node).unwrap();
/// world.position().set(Vector2::new(10.0, 10.0));
/// let mut rotation = world.rotation();
/// rotation += 45.0;
/// ```
pub struct TransformMut<'a> {
    tree: &'a mut TransformTree,
    id: NodeId,
    space: Space,
}

impl<'a> TransformMut<'a> {
    pub(super) fn new(tree: &'a mut TransformTree, id: NodeId, space: Space) -> Self {
        Self { tree, id, space }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn space(&self) -> Space {
        self.space
    }

    /// Whole transform in this view's space.
    pub fn transform(&self) -> Transform2D {
        read(self.tree, self.id, self.space)
    }

    /// Set both position and rotation in this view's space.
    pub fn set_transform(&mut self, transform: Transform2D) {
        let local = match self.space {
            Space::Local => transform,
            Space::World => transform.relative_to(self.tree.parent_world_transform(self.id)),
        };
        self.tree.set_local_transform(self.id, local);
    }

    pub fn position(&mut self) -> PositionMut<'_> {
        PositionMut {
            tree: &mut *self.tree,
            id: self.id,
            space: self.space,
        }
    }

    pub fn rotation(&mut self) -> RotationMut<'_> {
        RotationMut {
            tree: &mut *self.tree,
            id: self.id,
            space: self.space,
        }
    }
}

/// Position component of a [`TransformMut`].
///
/// Supports `get`, `set`, `+=` and `-=`. In world space, `+=`/`-=` read the
/// current world position and assign the shifted value.
pub struct PositionMut<'a> {
    tree: &'a mut TransformTree,
    id: NodeId,
    space: Space,
}

impl PositionMut<'_> {
    pub fn get(&self) -> Vector2<f32> {
        read(self.tree, self.id, self.space).position
    }

    pub fn set(&mut self, position: Vector2<f32>) {
        let mut local = self.tree.local_transform(self.id);
        local.position = match self.space {
            Space::Local => position,
            Space::World => position - self.tree.parent_world_transform(self.id).position,
        };
        self.tree.set_local_transform(self.id, local);
    }
}

impl AddAssign<Vector2<f32>> for PositionMut<'_> {
    fn add_assign(&mut self, delta: Vector2<f32>) {
        let current = self.get();
        self.set(current + delta);
    }
}

impl SubAssign<Vector2<f32>> for PositionMut<'_> {
    fn sub_assign(&mut self, delta: Vector2<f32>) {
        let current = self.get();
        self.set(current - delta);
    }
}

/// Rotation component (degrees) of a [`TransformMut`].
pub struct RotationMut<'a> {
    tree: &'a mut TransformTree,
    id: NodeId,
    space: Space,
}

impl RotationMut<'_> {
    pub fn get(&self) -> f32 {
        read(self.tree, self.id, self.space).rotation_degrees
    }

    pub fn set(&mut self, degrees: f32) {
        let mut local = self.tree.local_transform(self.id);
        local.rotation_degrees = match self.space {
            Space::Local => degrees,
            Space::World => {
                degrees - self.tree.parent_world_transform(self.id).rotation_degrees
            }
        };
        self.tree.set_local_transform(self.id, local);
    }
}

impl AddAssign<f32> for RotationMut<'_> {
    fn add_assign(&mut self, delta: f32) {
        let current = self.get();
        self.set(current + delta);
    }
}

impl SubAssign<f32> for RotationMut<'_> {
    fn sub_assign(&mut self, delta: f32) {
        let current = self.get();
        self.set(current - delta);
    }
}

fn read(tree: &TransformTree, id: NodeId, space: Space) -> Transform2D {
    match space {
        Space::Local => tree.local_transform(id),
        Space::World => tree.world_transform(id),
    }
}
