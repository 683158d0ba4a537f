//! Renderer seam.
//!
//! Drawing is delegated to an embedder-supplied [`Renderer`]. The crate
//! ships [`HeadlessRenderer`], which records what it was asked to do and is
//! used for tests and windowless sessions.

use std::sync::Arc;

use glam::Vec3;
use parking_lot::Mutex;

use crate::scene::{Camera, Scene};

/// Draws a (scene, camera) pair into a surface.
pub trait Renderer {
    fn draw(&mut self, scene: &Scene, camera: &Camera);

    /// Resizes the drawing surface, in logical pixels.
    fn resize(&mut self, width: u32, height: u32);

    fn set_pixel_ratio(&mut self, ratio: f32);

    fn set_clear_color(&mut self, color: Vec3);

    /// Releases GPU or window resources. Called once on unmount.
    fn dispose(&mut self) {}
}

/// Snapshot of one draw call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawRecord {
    pub viewport: (u32, u32),
    pub camera_aspect: f32,
    pub object_count: usize,
}

/// Everything a [`HeadlessRenderer`] has been asked to do.
#[derive(Debug, Clone, Default)]
pub struct HeadlessState {
    pub draw_count: u64,
    pub width: u32,
    pub height: u32,
    pub pixel_ratio: f32,
    pub clear_color: Vec3,
    pub last_draw: Option<DrawRecord>,
    pub disposed: bool,
}

impl HeadlessState {
    /// Physical size of the drawing buffer.
    #[must_use]
    pub fn drawing_buffer_size(&self) -> (u32, u32) {
        (
            (self.width as f32 * self.pixel_ratio).round() as u32,
            (self.height as f32 * self.pixel_ratio).round() as u32,
        )
    }
}

/// A renderer that draws nothing and remembers every call.
///
/// Clones share the same state, so a caller can keep one to inspect after
/// handing the other to a host.
#[derive(Debug, Clone, Default)]
pub struct HeadlessRenderer {
    state: Arc<Mutex<HeadlessState>>,
}

impl HeadlessRenderer {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            state: Arc::new(Mutex::new(HeadlessState {
                width,
                height,
                pixel_ratio: 1.0,
                ..HeadlessState::default()
            })),
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> HeadlessState {
        self.state.lock().clone()
    }

    #[must_use]
    pub fn draw_count(&self) -> u64 {
        self.state.lock().draw_count
    }
}

impl Renderer for HeadlessRenderer {
    fn draw(&mut self, scene: &Scene, camera: &Camera) {
        let mut state = self.state.lock();
        state.draw_count += 1;
        state.last_draw = Some(DrawRecord {
            viewport: (state.width, state.height),
            camera_aspect: camera.aspect,
            object_count: scene.object_count(),
        });
        log::trace!("Headless draw #{}", state.draw_count);
    }

    fn resize(&mut self, width: u32, height: u32) {
        let mut state = self.state.lock();
        state.width = width;
        state.height = height;
    }

    fn set_pixel_ratio(&mut self, ratio: f32) {
        self.state.lock().pixel_ratio = ratio;
    }

    fn set_clear_color(&mut self, color: Vec3) {
        self.state.lock().clear_color = color;
    }

    fn dispose(&mut self) {
        self.state.lock().disposed = true;
    }
}

impl<R: Renderer + ?Sized> Renderer for Box<R> {
    fn draw(&mut self, scene: &Scene, camera: &Camera) {
        (**self).draw(scene, camera);
    }

    fn resize(&mut self, width: u32, height: u32) {
        (**self).resize(width, height);
    }

    fn set_pixel_ratio(&mut self, ratio: f32) {
        (**self).set_pixel_ratio(ratio);
    }

    fn set_clear_color(&mut self, color: Vec3) {
        (**self).set_clear_color(color);
    }

    fn dispose(&mut self) {
        (**self).dispose();
    }
}
