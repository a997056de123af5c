//! ECS systems and observers.
//!
//! Submodules overview:
//! - [`scenenode`] – observer destroying a node when its owning entity lets go of it
//! - [`worldtransform`] – copies world transforms into [`GlobalTransform2D`](crate::components::globaltransform2d::GlobalTransform2D)

pub mod scenenode;
pub mod worldtransform;
