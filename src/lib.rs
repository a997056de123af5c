//! Hierarchical 2D transform nodes.
//!
//! A [`TransformTree`](resources::transformtree::TransformTree) owns a forest
//! of nodes, each with a local position and rotation. Nodes can be nested,
//! reparented (keeping either their local or their world transform) and
//! destroyed; parent and child links are kept consistent throughout.
//!
//! The `bevy_ecs` glue links entities to nodes with
//! [`SceneNode`](components::scenenode::SceneNode) and publishes world
//! placement to renderers through
//! [`GlobalTransform2D`](components::globaltransform2d::GlobalTransform2D).

pub mod components;
pub mod resources;
pub mod systems;
