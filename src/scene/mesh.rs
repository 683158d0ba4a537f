//! Mesh, geometry and material descriptors.
//!
//! These are plain data: tessellation and GPU upload are the renderer's job.

use glam::{Affine3A, Vec3};

/// Geometry description of a mesh.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Sphere {
        radius: f32,
        width_segments: u32,
        height_segments: u32,
    },
    /// Plane in the local XY plane.
    Plane { width: f32, height: f32 },
    /// Line grid in the XZ plane.
    GridHelper { size: f32, divisions: u32 },
    /// Three coloured axis lines of the given length.
    AxesHelper { size: f32 },
    /// Triangle data read from a model file.
    Imported {
        positions: Vec<Vec3>,
        indices: Option<Vec<u32>>,
    },
}

impl Geometry {
    /// Number of vertices the geometry carries (0 for procedural shapes).
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        match self {
            Geometry::Imported { positions, .. } => positions.len(),
            _ => 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shading {
    /// Unlit, flat colour.
    Basic,
    /// Lit with diffuse + specular.
    Phong,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub color: Vec3,
    pub shading: Shading,
}

impl Material {
    #[must_use]
    pub fn new_basic(color: Vec3) -> Self {
        Self {
            color,
            shading: Shading::Basic,
        }
    }

    #[must_use]
    pub fn new_phong(color: Vec3) -> Self {
        Self {
            color,
            shading: Shading::Phong,
        }
    }
}

/// Mesh component.
///
/// When `instances` is set the geometry is drawn once per matrix in a
/// single batch, relative to the owning node.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    pub name: String,
    pub geometry: Geometry,
    pub material: Material,
    pub instances: Option<Vec<Affine3A>>,
}

impl Mesh {
    #[must_use]
    pub fn new(name: &str, geometry: Geometry, material: Material) -> Self {
        Self {
            name: name.to_string(),
            geometry,
            material,
            instances: None,
        }
    }

    #[must_use]
    pub fn new_instanced(
        name: &str,
        geometry: Geometry,
        material: Material,
        instances: Vec<Affine3A>,
    ) -> Self {
        Self {
            name: name.to_string(),
            geometry,
            material,
            instances: Some(instances),
        }
    }

    #[must_use]
    pub fn instance_count(&self) -> usize {
        self.instances.as_ref().map_or(1, Vec::len)
    }
}
