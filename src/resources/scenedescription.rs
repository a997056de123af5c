//! Scene description loaded from an INI file.
//!
//! Each section describes one named node. All keys are optional.
//!
//! # File Format
//!
//! ```ini
//! [ship]
//! x = 10
//! y = 10
//!
//! [turret]
//! parent = ship
//! rotation = 45
//!
//! [marker]
//! x = -40
//! y = 100
//!
//! [cargo]
//! parent = marker
//! keep_world = true
//! ```
//!
//! - `parent` – section name of the parent node (root if absent)
//! - `x`, `y` – local position
//! - `rotation` – local rotation in degrees
//! - `keep_world` – attach with
//!   [`set_parent_keep_world_transform`](TransformTree::set_parent_keep_world_transform)
//!   instead of [`set_parent`](TransformTree::set_parent)
//!
//! Nodes are created first and then attached in file order, so a
//! `keep_world` node keeps the world transform it had as a root.

use std::fmt;
use std::path::{Path, PathBuf};

use configparser::ini::Ini;
use log::{debug, info};
use rustc_hash::FxHashMap;

use crate::components::transform2d::Transform2D;
use crate::resources::transformtree::{HierarchyError, NodeId, TransformTree};

/// Path used by the CLI when no scene file is given.
pub const DEFAULT_SCENE_PATH: &str = "./scene.ini";

/// Errors raised while loading or building a scene.
#[derive(Debug, Clone, PartialEq)]
pub enum SceneError {
    /// The file could not be read or parsed as INI.
    Io(String),
    /// A key holds a value of the wrong type.
    InvalidValue {
        node: String,
        key: String,
        value: String,
    },
    /// `parent` names a section that does not exist.
    UnknownParent { node: String, parent: String },
    /// Attaching the node was rejected by the hierarchy.
    Hierarchy {
        node: String,
        source: HierarchyError,
    },
}

impl fmt::Display for SceneError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SceneError::Io(msg) => write!(f, "failed to load scene: {}", msg),
            SceneError::InvalidValue { node, key, value } => {
                write!(f, "[{}] invalid value for '{}': {}", node, key, value)
            }
            SceneError::UnknownParent { node, parent } => {
                write!(f, "[{}] unknown parent '{}'", node, parent)
            }
            SceneError::Hierarchy { node, source } => write!(f, "[{}] {}", node, source),
        }
    }
}

impl std::error::Error for SceneError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SceneError::Hierarchy { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// One node entry of a scene file.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeDescription {
    pub name: String,
    pub parent: Option<String>,
    pub local: Transform2D,
    pub keep_world: bool,
}

/// Parsed scene file.
#[derive(Debug, Clone, Default)]
pub struct SceneDescription {
    /// Nodes in file order.
    pub nodes: Vec<NodeDescription>,
    /// File the description was loaded from, if any.
    pub source: Option<PathBuf>,
}

/// Handles of the nodes created by [`SceneDescription::build`].
#[derive(Debug, Clone, Default)]
pub struct SceneNodes {
    order: Vec<(String, NodeId)>,
    by_name: FxHashMap<String, NodeId>,
    by_id: FxHashMap<NodeId, String>,
}

impl SceneNodes {
    fn insert(&mut self, name: &str, id: NodeId) {
        self.order.push((name.to_string(), id));
        self.by_name.insert(name.to_string(), id);
        self.by_id.insert(id, name.to_string());
    }

    /// Look up a node by section name.
    pub fn get(&self, name: &str) -> Option<NodeId> {
        self.by_name.get(name).copied()
    }

    /// Name of the node with handle `id`.
    pub fn name_of(&self, id: NodeId) -> Option<&str> {
        self.by_id.get(&id).map(String::as_str)
    }

    /// `(name, id)` pairs in file order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, NodeId)> {
        self.order.iter().map(|(name, id)| (name.as_str(), *id))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl SceneDescription {
    /// Load and parse a scene file.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, SceneError> {
        let path = path.as_ref();
        let mut ini = Ini::new_cs();
        ini.load(path)
            .map_err(|e| SceneError::Io(format!("{}: {}", path.display(), e)))?;
        let mut scene = Self::from_ini(&ini)?;
        scene.source = Some(path.to_path_buf());
        info!(
            "Loaded scene {} with {} nodes",
            path.display(),
            scene.nodes.len()
        );
        Ok(scene)
    }

    /// Parse a scene from INI text.
    pub fn parse(text: &str) -> Result<Self, SceneError> {
        let mut ini = Ini::new_cs();
        ini.read(text.to_string()).map_err(SceneError::Io)?;
        Self::from_ini(&ini)
    }

    fn from_ini(ini: &Ini) -> Result<Self, SceneError> {
        let mut nodes = Vec::new();
        for name in ini.sections() {
            let x = get_float(ini, &name, "x")?.unwrap_or(0.0);
            let y = get_float(ini, &name, "y")?.unwrap_or(0.0);
            let rotation = get_float(ini, &name, "rotation")?.unwrap_or(0.0);
            let keep_world = ini
                .getbool(&name, "keep_world")
                .map_err(|_| invalid_value(ini, &name, "keep_world"))?
                .unwrap_or(false);
            let parent = ini
                .get(&name, "parent")
                .map(|p| p.trim().to_string())
                .filter(|p| !p.is_empty());

            nodes.push(NodeDescription {
                name,
                parent,
                local: Transform2D::new(x, y, rotation),
                keep_world,
            });
        }
        Ok(Self {
            nodes,
            source: None,
        })
    }

    /// Create every node in `tree` and attach them in file order.
    ///
    /// On error, all nodes created by this call are destroyed again and the
    /// tree is left as it was.
    pub fn build(&self, tree: &mut TransformTree) -> Result<SceneNodes, SceneError> {
        let mut created = SceneNodes::default();
        for node in &self.nodes {
            created.insert(&node.name, tree.create_node_with(node.local));
        }

        if let Err(e) = self.attach_all(tree, &created) {
            for (_, id) in created.iter() {
                tree.destroy(id);
            }
            return Err(e);
        }

        debug!("Built {} scene nodes", created.len());
        Ok(created)
    }

    fn attach_all(&self, tree: &mut TransformTree, created: &SceneNodes) -> Result<(), SceneError> {
        for node in &self.nodes {
            let Some(parent_name) = &node.parent else {
                continue;
            };
            let parent = created
                .get(parent_name)
                .ok_or_else(|| SceneError::UnknownParent {
                    node: node.name.clone(),
                    parent: parent_name.clone(),
                })?;
            let Some(id) = created.get(&node.name) else {
                continue;
            };

            let result = if node.keep_world {
                tree.set_parent_keep_world_transform(id, Some(parent))
            } else {
                tree.set_parent(id, Some(parent))
            };
            result.map_err(|source| SceneError::Hierarchy {
                node: node.name.clone(),
                source,
            })?;
        }
        Ok(())
    }
}

fn get_float(ini: &Ini, section: &str, key: &str) -> Result<Option<f32>, SceneError> {
    ini.getfloat(section, key)
        .map(|v| v.map(|f| f as f32))
        .map_err(|_| invalid_value(ini, section, key))
}

fn invalid_value(ini: &Ini, section: &str, key: &str) -> SceneError {
    SceneError::InvalidValue {
        node: section.to_string(),
        key: key.to_string(),
        value: ini.get(section, key).unwrap_or_default(),
    }
}
