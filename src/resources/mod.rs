//! ECS resources and scene data.
//!
//! Submodules overview:
//! - [`scenedescription`] – INI scene files describing named nodes and their parents
//! - [`snapshot`] – serializable dump of a hierarchy for inspection
//! - [`transformtree`] – arena of transform nodes with local/world views

pub mod scenedescription;
pub mod snapshot;
pub mod transformtree;
