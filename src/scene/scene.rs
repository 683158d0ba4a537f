use glam::Affine3A;
use slotmap::SlotMap;

use crate::assets::prefab::Prefab;
use crate::scene::light::Light;
use crate::scene::mesh::Mesh;
use crate::scene::node::Node;
use crate::scene::{LightKey, MeshKey, NodeHandle};

/// Scene graph container.
///
/// `Scene` is pure data: a node arena with a list of roots, plus component
/// pools for meshes and lights. It is mutated from the host thread only.
pub struct Scene {
    pub nodes: SlotMap<NodeHandle, Node>,
    pub root_nodes: Vec<NodeHandle>,

    pub meshes: SlotMap<MeshKey, Mesh>,
    pub lights: SlotMap<LightKey, Light>,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
            root_nodes: Vec::new(),
            meshes: SlotMap::with_key(),
            lights: SlotMap::with_key(),
        }
    }

    /// Adds a node as a scene root.
    pub fn add_node(&mut self, node: Node) -> NodeHandle {
        let handle = self.nodes.insert(node);
        self.root_nodes.push(handle);
        handle
    }

    pub fn add_to_parent(&mut self, mut child: Node, parent: NodeHandle) -> NodeHandle {
        if !self.nodes.contains_key(parent) {
            log::warn!("Parent node not found, adding '{}' as a root", child.name);
            return self.add_node(child);
        }
        child.parent = Some(parent);
        let handle = self.nodes.insert(child);
        if let Some(p) = self.nodes.get_mut(parent) {
            p.children.push(handle);
        }
        handle
    }

    pub fn add_mesh(&mut self, mesh: Mesh) -> NodeHandle {
        let mut node = Node::new(&mesh.name);
        node.mesh = Some(self.meshes.insert(mesh));
        self.add_node(node)
    }

    pub fn add_light(&mut self, name: &str, light: Light) -> NodeHandle {
        let mut node = Node::new(name);
        node.light = Some(self.lights.insert(light));
        self.add_node(node)
    }

    /// Re-parents `child` under `parent`.
    pub fn attach(&mut self, child: NodeHandle, parent: NodeHandle) {
        if child == parent {
            log::warn!("Cannot attach node to itself!");
            return;
        }
        if !self.nodes.contains_key(parent) || !self.nodes.contains_key(child) {
            log::error!("Node not found during attach!");
            return;
        }

        self.detach_from_parent(child);

        if let Some(p) = self.nodes.get_mut(parent) {
            p.children.push(child);
        }
        if let Some(c) = self.nodes.get_mut(child) {
            c.parent = Some(parent);
            c.transform.mark_dirty();
        }
    }

    fn detach_from_parent(&mut self, handle: NodeHandle) {
        let old_parent = self.nodes.get(handle).and_then(|n| n.parent);
        if let Some(p) = old_parent {
            if let Some(parent) = self.nodes.get_mut(p) {
                parent.children.retain(|&c| c != handle);
            }
        } else {
            self.root_nodes.retain(|&r| r != handle);
        }
    }

    /// Removes a node together with its whole subtree and components.
    pub fn remove_node(&mut self, handle: NodeHandle) {
        if !self.nodes.contains_key(handle) {
            return;
        }
        self.detach_from_parent(handle);

        let mut stack = vec![handle];
        while let Some(current) = stack.pop() {
            let Some(node) = self.nodes.remove(current) else {
                continue;
            };
            if let Some(mesh) = node.mesh {
                self.meshes.remove(mesh);
            }
            if let Some(light) = node.light {
                self.lights.remove(light);
            }
            stack.extend(node.children);
        }
    }

    #[must_use]
    pub fn get_node(&self, handle: NodeHandle) -> Option<&Node> {
        self.nodes.get(handle)
    }

    pub fn get_node_mut(&mut self, handle: NodeHandle) -> Option<&mut Node> {
        self.nodes.get_mut(handle)
    }

    #[must_use]
    pub fn contains(&self, handle: NodeHandle) -> bool {
        self.nodes.contains_key(handle)
    }

    /// Total number of nodes in the graph.
    #[must_use]
    pub fn object_count(&self) -> usize {
        self.nodes.len()
    }

    /// Depth-first search for a node named `name` in the subtree at `root`.
    #[must_use]
    pub fn find_by_name(&self, root: NodeHandle, name: &str) -> Option<NodeHandle> {
        let mut stack = vec![root];
        while let Some(current) = stack.pop() {
            let node = self.nodes.get(current)?;
            if node.name == name {
                return Some(current);
            }
            stack.extend(node.children.iter().rev().copied());
        }
        None
    }

    /// Instantiates a parsed model as a new subtree.
    ///
    /// The returned handle is a fresh group node whose children are the
    /// prefab roots. The subtree is built detached and only linked into the
    /// scene roots once complete.
    pub fn instantiate(&mut self, prefab: &Prefab, name: &str) -> NodeHandle {
        let root = self.nodes.insert(Node::new(name));

        let mut mapping = Vec::with_capacity(prefab.nodes.len());
        for prefab_node in &prefab.nodes {
            let mut node = Node::new(&prefab_node.name);
            node.transform = prefab_node.transform.clone();
            node.transform.mark_dirty();
            if let Some(mesh) = &prefab_node.mesh {
                node.mesh = Some(self.meshes.insert(mesh.clone()));
            }
            mapping.push(self.nodes.insert(node));
        }

        for (index, prefab_node) in prefab.nodes.iter().enumerate() {
            for &child_index in &prefab_node.children_indices {
                if let (Some(&parent), Some(&child)) = (mapping.get(index), mapping.get(child_index)) {
                    self.link(child, parent);
                }
            }
        }
        for &root_index in &prefab.root_indices {
            if let Some(&child) = mapping.get(root_index) {
                self.link(child, root);
            }
        }

        self.root_nodes.push(root);
        root
    }

    fn link(&mut self, child: NodeHandle, parent: NodeHandle) {
        if let Some(p) = self.nodes.get_mut(parent) {
            p.children.push(child);
        }
        if let Some(c) = self.nodes.get_mut(child) {
            c.parent = Some(parent);
        }
    }

    /// Recomputes world matrices for the whole graph.
    ///
    /// Iterative to stay safe on deep skeleton hierarchies.
    pub fn update_matrix_world(&mut self) {
        let mut stack: Vec<(NodeHandle, Affine3A, bool)> = self
            .root_nodes
            .iter()
            .rev()
            .map(|&root| (root, Affine3A::IDENTITY, false))
            .collect();

        while let Some((handle, parent_world, parent_changed)) = stack.pop() {
            let Some(node) = self.nodes.get_mut(handle) else {
                continue;
            };
            let local_changed = node.transform.update_local_matrix();
            let changed = local_changed || parent_changed;
            if changed {
                let world = parent_world * node.transform.local_matrix;
                node.transform.world_matrix = world;
            }
            let world = node.transform.world_matrix;
            for &child in node.children.iter().rev() {
                stack.push((child, world, changed));
            }
        }
    }
}
