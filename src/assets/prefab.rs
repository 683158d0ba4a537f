use std::sync::Arc;

use crate::animation::clip::AnimationClip;
use crate::scene::mesh::Mesh;
use crate::scene::transform::Transform;

/// Prefab node: plain data, children referenced by index.
#[derive(Debug, Clone, Default)]
pub struct PrefabNode {
    pub name: String,
    pub transform: Transform,
    /// Indices into [`Prefab::nodes`].
    pub children_indices: Vec<usize>,
    pub mesh: Option<Mesh>,
}

impl PrefabNode {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// Parsed model file, ready to be instantiated.
///
/// A prefab holds no scene handles, so it can be built on a worker thread
/// and handed to [`Scene::instantiate`](crate::scene::Scene::instantiate)
/// on the host thread.
#[derive(Debug, Clone, Default)]
pub struct Prefab {
    /// Flat list of every node in the file.
    pub nodes: Vec<PrefabNode>,
    /// Indices of the top-level nodes.
    pub root_indices: Vec<usize>,
    /// Named animation clips authored against this node hierarchy.
    pub animations: Vec<AnimationClip>,
}

impl Prefab {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a node and returns its index.
    pub fn push_node(&mut self, node: PrefabNode) -> usize {
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    #[must_use]
    pub fn animation(&self, name: &str) -> Option<&AnimationClip> {
        self.animations.iter().find(|clip| clip.name == name)
    }
}

pub type SharedPrefab = Arc<Prefab>;
