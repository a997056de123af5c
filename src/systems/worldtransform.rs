//! World transform sync for entities linked to the transform hierarchy.
//!
//! Copies each linked node's world transform into its entity's
//! [`GlobalTransform2D`].
//!
//! # Schedule position
//!
//! Should run **after** all systems that edit the [`TransformTree`] (movement,
//! reparenting) and **before** rendering so that the renderer sees this
//! frame's world placement.

use bevy_ecs::prelude::*;
use log::warn;

use crate::components::globaltransform2d::GlobalTransform2D;
use crate::components::scenenode::SceneNode;
use crate::resources::transformtree::TransformTree;

/// Refresh [`GlobalTransform2D`] from the tree for every linked entity.
///
/// The tree is only read. Entities whose node has already been destroyed are
/// skipped with a warning and keep their last snapshot.
pub fn sync_world_transforms(
    tree: Res<TransformTree>,
    mut query: Query<(Entity, &SceneNode, &mut GlobalTransform2D)>,
) {
    for (entity, node, mut global) in query.iter_mut() {
        let Some(world) = tree.world(node.id()) else {
            warn!(
                "Entity {:?} links to destroyed transform node {}",
                entity,
                node.id()
            );
            continue;
        };
        let snapshot = GlobalTransform2D::from(world.transform());
        if *global != snapshot {
            *global = snapshot;
        }
    }
}
