//! Link between an ECS entity and a node of the transform hierarchy.
//!
//! Removing the component (or despawning the entity) destroys the linked node
//! through the [`release_scene_node`](crate::systems::scenenode::release_scene_node)
//! observer, so each node is destroyed exactly once by its owner.

use bevy_ecs::prelude::Component;

use crate::resources::transformtree::NodeId;

/// Component owning one node of the [`TransformTree`](crate::resources::transformtree::TransformTree).
#[derive(Component, Clone, Copy, Debug, PartialEq, Eq)]
pub struct SceneNode(pub NodeId);

impl SceneNode {
    pub fn id(&self) -> NodeId {
        self.0
    }
}
