use glam::Affine3A;

use crate::scene::transform::Transform;
use crate::scene::{LightKey, MeshKey, NodeHandle};

/// A scene node.
///
/// Nodes only hold hierarchy, transform and visibility. Meshes and lights
/// live in the [`Scene`](crate::scene::Scene) component pools and are
/// referenced by key.
#[derive(Debug, Clone)]
pub struct Node {
    pub name: String,

    pub(crate) parent: Option<NodeHandle>,
    pub(crate) children: Vec<NodeHandle>,

    pub transform: Transform,
    pub visible: bool,

    pub mesh: Option<MeshKey>,
    pub light: Option<LightKey>,
}

impl Node {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            parent: None,
            children: Vec::new(),
            transform: Transform::new(),
            visible: true,
            mesh: None,
            light: None,
        }
    }

    #[inline]
    #[must_use]
    pub fn parent(&self) -> Option<NodeHandle> {
        self.parent
    }

    #[inline]
    #[must_use]
    pub fn children(&self) -> &[NodeHandle] {
        &self.children
    }

    /// World transformation matrix as of the last
    /// [`Scene::update_matrix_world`](crate::scene::Scene::update_matrix_world).
    #[inline]
    #[must_use]
    pub fn world_matrix(&self) -> &Affine3A {
        &self.transform.world_matrix
    }
}

impl Default for Node {
    fn default() -> Self {
        Self::new("")
    }
}
