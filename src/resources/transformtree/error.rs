use std::fmt;

use super::NodeId;

/// Errors returned by hierarchy-editing operations on a
/// [`TransformTree`](super::TransformTree).
///
/// Every error is raised before the tree is touched, so a failed call leaves
/// the hierarchy exactly as it was.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HierarchyError {
    /// `parent` is `node` itself or one of its descendants.
    CyclicParent { node: NodeId, parent: NodeId },
    /// The handle refers to a node that has been destroyed.
    StaleNode(NodeId),
}

impl fmt::Display for HierarchyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HierarchyError::CyclicParent { node, parent } => write!(
                f,
                "cannot parent {} to {}: {} is the node itself or one of its descendants",
                node, parent, parent
            ),
            HierarchyError::StaleNode(id) => write!(f, "node {} has been destroyed", id),
        }
    }
}

impl std::error::Error for HierarchyError {}
