use glam::{Affine3A, Mat4};

use crate::scene::transform::Transform;

/// Perspective camera.
///
/// The camera is not part of the scene graph; it carries its own
/// [`Transform`] and is handed to the renderer together with the scene.
#[derive(Debug, Clone)]
pub struct Camera {
    pub transform: Transform,

    /// Vertical field of view in radians.
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,

    pub(crate) view_matrix: Mat4,
    pub(crate) projection_matrix: Mat4,
}

impl Camera {
    /// `fov` is given in degrees.
    #[must_use]
    pub fn new_perspective(fov: f32, aspect: f32, near: f32, far: f32) -> Self {
        let mut cam = Self {
            transform: Transform::new(),
            fov: fov.to_radians(),
            aspect,
            near,
            far,
            view_matrix: Mat4::IDENTITY,
            projection_matrix: Mat4::IDENTITY,
        };
        cam.update_projection_matrix();
        cam
    }

    pub fn update_projection_matrix(&mut self) {
        // glam's perspective_rh targets a [0, 1] depth range
        self.projection_matrix = Mat4::perspective_rh(self.fov, self.aspect, self.near, self.far);
    }

    /// Updates the aspect ratio and the projection that depends on it.
    pub fn set_aspect(&mut self, aspect: f32) {
        if !aspect.is_finite() || aspect <= 0.0 {
            log::warn!("Ignoring invalid camera aspect ratio {aspect}");
            return;
        }
        self.aspect = aspect;
        self.update_projection_matrix();
    }

    /// Refreshes the view matrix from the camera transform.
    pub fn update_view_matrix(&mut self) {
        self.transform.update_local_matrix();
        let world = *self.transform.local_matrix();
        self.transform.set_world_matrix(world);
        self.view_matrix = Mat4::from(world).inverse();
    }

    #[must_use]
    pub fn world_matrix(&self) -> &Affine3A {
        self.transform.world_matrix()
    }

    #[must_use]
    pub fn view_matrix(&self) -> Mat4 {
        self.view_matrix
    }

    #[must_use]
    pub fn projection_matrix(&self) -> Mat4 {
        self.projection_matrix
    }

    #[must_use]
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix * self.view_matrix
    }
}
