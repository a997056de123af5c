//! Observer tying node destruction to the owning entity.
//!
//! Register once per world:
//!
//! ```ignore
//! world.add_observer(release_scene_node);
//! ```

use bevy_ecs::observer::On;
use bevy_ecs::prelude::*;
use log::debug;

use crate::components::scenenode::SceneNode;
use crate::resources::transformtree::TransformTree;

/// Destroys the linked node when a [`SceneNode`] is removed.
///
/// Runs for explicit removal and for despawn. The node's children become
/// roots; their entities keep their own `SceneNode` links.
pub fn release_scene_node(
    trigger: On<Remove, SceneNode>,
    nodes: Query<&SceneNode>,
    tree: Option<ResMut<TransformTree>>,
) {
    let entity = trigger.event().entity;
    let Some(mut tree) = tree else {
        return;
    };
    let Ok(node) = nodes.get(entity) else {
        return;
    };
    if tree.destroy(node.id()) {
        debug!("Released transform node {} of {:?}", node.id(), entity);
    }
}
