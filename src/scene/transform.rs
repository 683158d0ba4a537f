use glam::{Affine3A, EulerRot, Mat3, Quat, Vec3};

/// Transform component.
///
/// Holds a node's local position, rotation and scale (TRS) together with
/// the cached local and world matrices. The local matrix is only rebuilt
/// when one of the TRS fields changed since the last update.
#[derive(Debug, Clone)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,

    pub(crate) local_matrix: Affine3A,
    pub(crate) world_matrix: Affine3A,

    // Shadow state for change detection
    last_position: Vec3,
    last_rotation: Quat,
    last_scale: Vec3,
    force_update: bool,
}

impl Transform {
    #[must_use]
    pub fn new() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,

            local_matrix: Affine3A::IDENTITY,
            world_matrix: Affine3A::IDENTITY,

            last_position: Vec3::ZERO,
            last_rotation: Quat::IDENTITY,
            last_scale: Vec3::ONE,
            force_update: true,
        }
    }

    /// Rebuilds the local matrix if the TRS fields changed.
    ///
    /// Returns `true` when the matrix was recomputed.
    pub fn update_local_matrix(&mut self) -> bool {
        let changed = self.position != self.last_position
            || self.rotation != self.last_rotation
            || self.scale != self.last_scale
            || self.force_update;

        if changed {
            self.local_matrix =
                Affine3A::from_scale_rotation_translation(self.scale, self.rotation, self.position);

            self.last_position = self.position;
            self.last_rotation = self.rotation;
            self.last_scale = self.scale;
            self.force_update = false;
        }

        changed
    }

    /// Sets the rotation from Euler angles in XYZ order (radians).
    pub fn set_rotation_euler(&mut self, x: f32, y: f32, z: f32) {
        self.rotation = Quat::from_euler(EulerRot::XYZ, x, y, z);
    }

    /// Current rotation as XYZ Euler angles (radians).
    #[must_use]
    pub fn rotation_euler(&self) -> Vec3 {
        let (x, y, z) = self.rotation.to_euler(EulerRot::XYZ);
        Vec3::new(x, y, z)
    }

    /// Sets the rotation to a pure yaw about +Y.
    pub fn set_yaw(&mut self, yaw: f32) {
        self.rotation = Quat::from_rotation_y(yaw);
    }

    #[inline]
    #[must_use]
    pub fn local_matrix(&self) -> &Affine3A {
        &self.local_matrix
    }

    #[inline]
    #[must_use]
    pub fn world_matrix(&self) -> &Affine3A {
        &self.world_matrix
    }

    pub fn set_world_matrix(&mut self, mat: Affine3A) {
        self.world_matrix = mat;
    }

    /// Applies a full set of TRS values at once.
    pub fn set_trs(&mut self, position: Vec3, rotation: Quat, scale: Vec3) {
        self.position = position;
        self.rotation = rotation;
        self.scale = scale;
    }

    /// Orients -Z towards `target`.
    ///
    /// `target` and `up` are expressed in the parent's space. Degenerate
    /// configurations (target on the up axis) leave the rotation untouched.
    pub fn look_at(&mut self, target: Vec3, up: Vec3) {
        let forward = (target - self.position).normalize_or_zero();
        if forward.cross(up).length_squared() < 1e-4 {
            return;
        }

        let right = forward.cross(up).normalize();
        let new_up = right.cross(forward).normalize();

        let rot_mat = Mat3::from_cols(right, new_up, -forward);
        self.rotation = Quat::from_mat3(&rot_mat);
    }

    /// Forces the next [`Transform::update_local_matrix`] to recompute.
    pub fn mark_dirty(&mut self) {
        self.force_update = true;
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::new()
    }
}
