//! World-space transform snapshot for entities linked to a scene node.
//!
//! An entity carrying a [`SceneNode`](super::scenenode::SceneNode) has its
//! placement stored in the [`TransformTree`](crate::resources::transformtree::TransformTree)
//! resource. The [`sync_world_transforms`](crate::systems::worldtransform::sync_world_transforms)
//! system copies the node's world transform here once per frame so renderers
//! can read it without touching the tree.

use bevy_ecs::prelude::*;
use nalgebra::Vector2;

use super::transform2d::Transform2D;

/// World-space transform of an entity, refreshed every frame.
///
/// This component is managed by the sync system; writing to it has no effect
/// on the hierarchy. Use the tree's world views to move a node.
#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct GlobalTransform2D {
    /// World-space position.
    pub position: Vector2<f32>,
    /// World-space rotation in degrees.
    pub rotation_degrees: f32,
}

impl Default for GlobalTransform2D {
    fn default() -> Self {
        Self {
            position: Vector2::zeros(),
            rotation_degrees: 0.0,
        }
    }
}

impl From<Transform2D> for GlobalTransform2D {
    fn from(t: Transform2D) -> Self {
        Self {
            position: t.position,
            rotation_degrees: t.rotation_degrees,
        }
    }
}
