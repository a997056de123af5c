//! ECS components and value types.
//!
//! Submodules overview:
//! - [`globaltransform2d`] – per-frame world-space snapshot read by renderers
//! - [`scenenode`] – links an entity to a node of the transform hierarchy
//! - [`transform2d`] – position + rotation value type shared by local and world space

pub mod globaltransform2d;
pub mod scenenode;
pub mod transform2d;
