//! Serializable dump of a transform hierarchy.
//!
//! A [`TreeSnapshot`] lists every live node depth-first from the roots with
//! its parent, local and world transform. It is what the CLI prints, either as
//! an indented outline or as JSON.

use std::fmt::Write as _;

use rustc_hash::FxHashMap;
use serde::Serialize;

use crate::components::transform2d::Transform2D;
use crate::resources::scenedescription::SceneNodes;
use crate::resources::transformtree::{NodeId, TransformTree};

/// One node in a [`TreeSnapshot`].
#[derive(Debug, Clone, Serialize)]
pub struct NodeSnapshot {
    pub name: String,
    pub id: NodeId,
    pub parent: Option<String>,
    pub depth: usize,
    pub local: Transform2D,
    pub world: Transform2D,
}

/// Every live node of a tree, depth-first from the roots.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TreeSnapshot {
    pub nodes: Vec<NodeSnapshot>,
}

impl TreeSnapshot {
    /// Capture `tree`, naming nodes from `names`. Unnamed nodes are labelled
    /// with their handle.
    pub fn capture(tree: &TransformTree, names: &SceneNodes) -> Self {
        let labels: FxHashMap<NodeId, String> = tree
            .iter()
            .map(|id| {
                let label = names
                    .name_of(id)
                    .map(str::to_string)
                    .unwrap_or_else(|| id.to_string());
                (id, label)
            })
            .collect();

        let mut snapshot = Self::default();
        let mut stack: Vec<NodeId> = tree.roots().collect();
        stack.reverse();
        while let Some(id) = stack.pop() {
            let (Some(local), Some(world)) = (tree.local(id), tree.world(id)) else {
                continue;
            };
            snapshot.nodes.push(NodeSnapshot {
                name: labels[&id].clone(),
                id,
                parent: tree.parent(id).map(|p| labels[&p].clone()),
                depth: tree.depth(id),
                local: local.transform(),
                world: world.transform(),
            });
            stack.extend(tree.children(id).iter().rev().copied());
        }
        snapshot
    }

    /// Look up a captured node by name.
    pub fn get(&self, name: &str) -> Option<&NodeSnapshot> {
        self.nodes.iter().find(|n| n.name == name)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Indented outline, one node per line.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for node in &self.nodes {
            let _ = writeln!(
                out,
                "{:indent$}{} local=({:.3}, {:.3}) {:.3}deg world=({:.3}, {:.3}) {:.3}deg",
                "",
                node.name,
                node.local.position.x,
                node.local.position.y,
                node.local.rotation_degrees,
                node.world.position.x,
                node.world.position.y,
                node.world.rotation_degrees,
                indent = node.depth * 2
            );
        }
        out
    }
}
