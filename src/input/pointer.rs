use glam::Vec2;
use smallvec::SmallVec;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
}

/// Pointer state accumulated between frames, consumed by the orbit controls.
#[derive(Default, Debug, Clone)]
pub struct PointerState {
    /// Current cursor position inside the mount target
    pub cursor_position: Vec2,
    /// Cursor movement since the last frame
    pub cursor_delta: Vec2,
    /// Wheel movement since the last frame, in lines
    pub scroll_delta: Vec2,
    pub screen_size: Vec2,
    buttons: SmallVec<[PointerButton; 3]>,
    has_cursor: bool,
}

impl PointerState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears per-frame deltas.
    pub fn end_frame(&mut self) {
        self.cursor_delta = Vec2::ZERO;
        self.scroll_delta = Vec2::ZERO;
    }

    pub fn handle_resize(&mut self, width: u32, height: u32) {
        self.screen_size = Vec2::new(width as f32, height as f32);
    }

    pub fn handle_cursor_move(&mut self, x: f32, y: f32) {
        let new_pos = Vec2::new(x, y);
        // No delta for the first sample after entering
        if self.has_cursor {
            self.cursor_delta += new_pos - self.cursor_position;
        }
        self.cursor_position = new_pos;
        self.has_cursor = true;
    }

    pub fn handle_cursor_left(&mut self) {
        self.has_cursor = false;
    }

    pub fn handle_button(&mut self, button: PointerButton, pressed: bool) {
        if pressed {
            if !self.buttons.contains(&button) {
                self.buttons.push(button);
            }
        } else {
            self.buttons.retain(|b| *b != button);
        }
    }

    /// `lines` is positive when scrolling away from the user.
    pub fn handle_wheel(&mut self, lines: Vec2) {
        self.scroll_delta += lines;
    }

    #[must_use]
    pub fn is_pressed(&self, button: PointerButton) -> bool {
        self.buttons.contains(&button)
    }

    /// Releases every button, e.g. when focus is lost.
    pub fn reset(&mut self) {
        self.buttons.clear();
        self.end_frame();
        self.has_cursor = false;
    }
}
