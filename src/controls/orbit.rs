use std::f32::consts::{FRAC_PI_2, FRAC_PI_6, PI};

use glam::{Vec2, Vec3};

use crate::input::pointer::{PointerButton, PointerState};
use crate::scene::transform::Transform;

/// Orbit camera manipulator.
///
/// The camera sits on a sphere around `center`: `theta` is the azimuth about
/// +Y and `phi` the polar angle measured from +Y. Dragging with the primary
/// button rotates, the secondary button pans and the wheel zooms.
#[derive(Debug, Clone)]
pub struct OrbitControls {
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub pan_speed: f32,
    /// Share of the pending rotation dropped per 60 Hz frame.
    pub damping_factor: f32,
    pub enable_damping: bool,
    pub enable_zoom: bool,
    pub min_distance: f32,
    pub max_distance: f32,
    pub min_polar_angle: f32,
    pub max_polar_angle: f32,

    pub center: Vec3,
    pub radius: f32,
    pub theta: f32,
    pub phi: f32,

    rotate_delta: Vec2,
}

impl OrbitControls {
    #[must_use]
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self {
            rotate_speed: 1.0,
            zoom_speed: 0.05,
            pan_speed: 1.0,
            damping_factor: 0.25,
            enable_damping: true,
            enable_zoom: true,
            min_distance: 1.0,
            max_distance: 1000.0,
            min_polar_angle: FRAC_PI_6,
            max_polar_angle: FRAC_PI_2,

            center,
            radius,
            theta: 0.0,
            phi: FRAC_PI_2,

            rotate_delta: Vec2::ZERO,
        }
    }

    /// Starts orbiting `center` from the camera's current position.
    #[must_use]
    pub fn from_position(position: Vec3, center: Vec3) -> Self {
        let mut controls = Self::new(center, 1.0);
        let offset = position - center;
        let radius = offset.length();
        if radius > f32::EPSILON {
            controls.radius = radius;
            controls.theta = offset.x.atan2(offset.z);
            controls.phi = (offset.y / radius).clamp(-1.0, 1.0).acos();
        }
        controls
    }

    /// Sets the allowed polar range. Angles are clamped to `[0, PI]`.
    pub fn set_polar_range(&mut self, min: f32, max: f32) {
        let min = min.clamp(0.0, PI);
        let max = max.clamp(0.0, PI);
        self.min_polar_angle = min.min(max);
        self.max_polar_angle = max.max(min);
    }

    /// Applies pointer input and damping, then places `transform` on the
    /// orbit looking at `center`.
    pub fn update(&mut self, transform: &mut Transform, pointer: &PointerState, fov_degrees: f32, dt: f32) {
        let screen_height = pointer.screen_size.y.max(1.0);

        if pointer.is_pressed(PointerButton::Primary) {
            let rotate_per_pixel = 2.0 * PI / screen_height;
            self.rotate_delta -= pointer.cursor_delta * rotate_per_pixel * self.rotate_speed;
        }

        if self.enable_damping {
            // Frame-rate independent retention, tuned for 60 Hz
            let retention = (1.0 - self.damping_factor.clamp(0.0, 1.0)).powf(dt.max(0.0) * 60.0);
            let delta_apply = self.rotate_delta * (1.0 - retention);
            self.theta += delta_apply.x;
            self.phi += delta_apply.y;
            self.rotate_delta *= retention;
        } else {
            self.theta += self.rotate_delta.x;
            self.phi += self.rotate_delta.y;
            self.rotate_delta = Vec2::ZERO;
        }

        const EPS: f32 = 0.0001;
        self.phi = self
            .phi
            .clamp(self.min_polar_angle, self.max_polar_angle)
            .clamp(EPS, PI - EPS);

        if self.enable_zoom && pointer.scroll_delta.y != 0.0 {
            let scale = (1.0 - self.zoom_speed).powf(pointer.scroll_delta.y.abs());
            if pointer.scroll_delta.y > 0.0 {
                self.radius *= scale;
            } else {
                self.radius /= scale;
            }
        }
        self.radius = self.radius.clamp(self.min_distance, self.max_distance);

        let direction = self.direction();

        if pointer.is_pressed(PointerButton::Secondary) {
            let half_fov = fov_degrees.to_radians() / 2.0;
            let world_height = 2.0 * self.radius * half_fov.tan();
            let pixels_to_world = world_height / screen_height;

            let forward = -direction;
            let right = forward.cross(Vec3::Y).normalize_or_zero();
            let up = right.cross(forward).normalize_or_zero();

            self.center += (right * -pointer.cursor_delta.x + up * pointer.cursor_delta.y)
                * pixels_to_world
                * self.pan_speed;
        }

        transform.position = self.center + direction * self.radius;
        transform.look_at(self.center, Vec3::Y);
    }

    /// Unit vector from `center` towards the camera.
    fn direction(&self) -> Vec3 {
        let (sin_phi, cos_phi) = self.phi.sin_cos();
        let (sin_theta, cos_theta) = self.theta.sin_cos();
        Vec3::new(sin_phi * sin_theta, cos_phi, sin_phi * cos_theta)
    }
}
