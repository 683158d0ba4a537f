//! Scene graph module
//!
//! Manages the node hierarchy and its components:
//! - Node: a scene node (hierarchy, transform, component keys)
//! - Transform: TRS with cached matrices
//! - Scene: node arena plus mesh and light pools
//! - Camera: perspective camera
//! - Light / Mesh: components referenced by nodes

pub mod camera;
pub mod light;
pub mod mesh;
pub mod node;
#[allow(clippy::module_inception)]
pub mod scene;
pub mod transform;

pub use camera::Camera;
pub use light::{Light, LightKind, color_from_hex};
pub use mesh::{Geometry, Material, Mesh, Shading};
pub use node::Node;
pub use scene::Scene;
pub use transform::Transform;

use slotmap::new_key_type;

new_key_type! {
    pub struct NodeHandle;
    pub struct MeshKey;
    pub struct LightKey;
}
