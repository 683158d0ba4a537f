//! Scene Graph Tests
//!
//! Tests for:
//! - Node add / attach / recursive remove
//! - Component pools follow node lifetime
//! - Find-by-name and prefab instantiation
//! - World matrix propagation
//! - Camera aspect and projection

use glam::{Affine3A, Vec3};

use prowl::assets::{Prefab, PrefabNode};
use prowl::scene::{Camera, Geometry, Light, Material, Mesh, Node, Scene, color_from_hex};

const EPSILON: f32 = 1e-4;

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

fn approx_vec3(a: Vec3, b: Vec3) -> bool {
    approx(a.x, b.x) && approx(a.y, b.y) && approx(a.z, b.z)
}

// ============================================================================
// Hierarchy
// ============================================================================

#[test]
fn add_to_parent_links_both_ways() {
    let mut scene = Scene::new();
    let parent = scene.add_node(Node::new("parent"));
    let child = scene.add_to_parent(Node::new("child"), parent);

    assert_eq!(scene.get_node(child).unwrap().parent(), Some(parent));
    assert_eq!(scene.get_node(parent).unwrap().children(), &[child]);
    assert_eq!(scene.root_nodes, vec![parent]);
}

#[test]
fn attach_reparents_root_node() {
    let mut scene = Scene::new();
    let a = scene.add_node(Node::new("a"));
    let b = scene.add_node(Node::new("b"));
    scene.attach(b, a);

    assert_eq!(scene.root_nodes, vec![a]);
    assert_eq!(scene.get_node(b).unwrap().parent(), Some(a));
}

#[test]
fn attach_to_self_is_ignored() {
    let mut scene = Scene::new();
    let a = scene.add_node(Node::new("a"));
    scene.attach(a, a);
    assert!(scene.get_node(a).unwrap().parent().is_none());
}

#[test]
fn remove_node_drops_subtree_and_components() {
    let mut scene = Scene::new();
    let ground = scene.add_mesh(Mesh::new(
        "Ground",
        Geometry::Plane {
            width: 200.0,
            height: 200.0,
        },
        Material::new_phong(color_from_hex(0x808080)),
    ));
    let lamp = scene.add_light("lamp", Light::new_ambient(Vec3::ONE, 1.0));
    scene.attach(lamp, ground);
    let keep = scene.add_node(Node::new("keep"));

    scene.remove_node(ground);

    assert!(!scene.contains(ground));
    assert!(!scene.contains(lamp));
    assert!(scene.contains(keep));
    assert_eq!(scene.object_count(), 1);
    assert!(scene.meshes.is_empty());
    assert!(scene.lights.is_empty());
    assert_eq!(scene.root_nodes, vec![keep]);
}

#[test]
fn remove_missing_node_is_noop() {
    let mut scene = Scene::new();
    let a = scene.add_node(Node::new("a"));
    scene.remove_node(a);
    scene.remove_node(a);
    assert_eq!(scene.object_count(), 0);
}

#[test]
fn find_by_name_searches_subtree_only() {
    let mut scene = Scene::new();
    let wolf = scene.add_node(Node::new("wolf"));
    let spine = scene.add_to_parent(Node::new("Spine"), wolf);
    let head = scene.add_to_parent(Node::new("Head"), spine);
    let other = scene.add_node(Node::new("house"));
    scene.add_to_parent(Node::new("Door"), other);

    assert_eq!(scene.find_by_name(wolf, "Head"), Some(head));
    assert_eq!(scene.find_by_name(wolf, "wolf"), Some(wolf));
    assert!(scene.find_by_name(wolf, "Door").is_none());
}

// ============================================================================
// Instantiation
// ============================================================================

#[test]
fn instantiate_builds_group_with_prefab_roots() {
    let mut prefab = Prefab::new();
    let mut skeleton = PrefabNode::new("Wolf_Skeleton");
    skeleton.children_indices.push(1);
    skeleton.transform.position = Vec3::new(0.0, 1.0, 0.0);
    prefab.push_node(skeleton);
    prefab.push_node(PrefabNode::new("Spine"));
    prefab.push_node(PrefabNode::new("Stray"));
    prefab.root_indices = vec![0, 2];

    let mut scene = Scene::new();
    let root = scene.instantiate(&prefab, "models/wolf/Wolf.glb");

    assert_eq!(scene.object_count(), 4);
    assert_eq!(scene.root_nodes, vec![root]);
    let group = scene.get_node(root).unwrap();
    assert_eq!(group.name, "models/wolf/Wolf.glb");
    assert_eq!(group.children().len(), 2);

    let spine = scene.find_by_name(root, "Spine").unwrap();
    let skeleton = scene.get_node(spine).unwrap().parent().unwrap();
    assert_eq!(scene.get_node(skeleton).unwrap().name, "Wolf_Skeleton");
    assert!(approx_vec3(
        scene.get_node(skeleton).unwrap().transform.position,
        Vec3::Y
    ));
}

#[test]
fn instantiate_twice_creates_independent_copies() {
    let mut prefab = Prefab::new();
    prefab.push_node(PrefabNode::new("house"));
    prefab.root_indices.push(0);

    let mut scene = Scene::new();
    let a = scene.instantiate(&prefab, "a");
    let b = scene.instantiate(&prefab, "b");
    assert_ne!(scene.find_by_name(a, "house"), scene.find_by_name(b, "house"));
    assert_eq!(scene.object_count(), 4);
}

// ============================================================================
// Transforms
// ============================================================================

#[test]
fn world_matrix_propagates_to_children() {
    let mut scene = Scene::new();
    let parent = scene.add_node(Node::new("parent"));
    let child = scene.add_to_parent(Node::new("child"), parent);
    scene.get_node_mut(parent).unwrap().transform.position = Vec3::new(30.0, 0.0, 0.0);
    scene.get_node_mut(parent).unwrap().transform.scale = Vec3::splat(0.5);
    scene.get_node_mut(child).unwrap().transform.position = Vec3::new(2.0, 0.0, 0.0);

    scene.update_matrix_world();
    let world = scene.get_node(child).unwrap().world_matrix().translation;
    assert!(approx_vec3(world.into(), Vec3::new(31.0, 0.0, 0.0)));

    // Moving the parent later updates the child on the next pass
    scene.get_node_mut(parent).unwrap().transform.position.z = 4.0;
    scene.update_matrix_world();
    let world = scene.get_node(child).unwrap().world_matrix().translation;
    assert!(approx_vec3(world.into(), Vec3::new(31.0, 0.0, 4.0)));
}

#[test]
fn rotation_euler_round_trips_yaw() {
    let mut scene = Scene::new();
    let node = scene.add_node(Node::new("n"));
    let t = &mut scene.get_node_mut(node).unwrap().transform;
    t.set_rotation_euler(0.0, std::f32::consts::FRAC_PI_2, 0.0);
    assert!(approx(t.rotation_euler().y, std::f32::consts::FRAC_PI_2));
}

#[test]
fn instanced_mesh_counts_instances() {
    let mesh = Mesh::new_instanced(
        "Stars",
        Geometry::Sphere {
            radius: 0.1,
            width_segments: 8,
            height_segments: 8,
        },
        Material::new_basic(Vec3::ONE),
        vec![Affine3A::IDENTITY; 3],
    );
    assert_eq!(mesh.instance_count(), 3);
    assert_eq!(mesh.geometry.vertex_count(), 0);
}

// ============================================================================
// Camera
// ============================================================================

#[test]
fn camera_set_aspect_updates_projection() {
    let mut camera = Camera::new_perspective(75.0, 1.0, 0.1, 1000.0);
    let before = camera.projection_matrix();
    camera.set_aspect(2.0);

    assert!(approx(camera.aspect, 2.0));
    assert_ne!(before, camera.projection_matrix());
    assert!(approx(camera.fov, 75.0_f32.to_radians()));
}

#[test]
fn camera_rejects_degenerate_aspect() {
    let mut camera = Camera::new_perspective(75.0, 1.5, 0.1, 1000.0);
    camera.set_aspect(0.0);
    camera.set_aspect(f32::NAN);
    assert!(approx(camera.aspect, 1.5));
}

#[test]
fn color_from_hex_unpacks_channels() {
    assert!(approx_vec3(color_from_hex(0xff0000), Vec3::X));
    assert!(approx_vec3(color_from_hex(0x404040), Vec3::splat(64.0 / 255.0)));
}
