//! Winit input adapter
//!
//! Translates winit events into the host's platform-independent inputs:
//! keys become DOM-style identifiers, pointer events become
//! [`PointerButton`]s and wheel lines.

use glam::Vec2;
use winit::event::{MouseButton, MouseScrollDelta};
use winit::keyboard::{Key as WinitKey, NamedKey};

use crate::input::PointerButton;

/// Maps a logical winit key to the identifier the host expects
/// (`"ArrowUp"`, `"Shift"`, `" "`, `"a"`).
///
/// Every key yields an identifier. Named keys without a special case use
/// their winit name, which matches the DOM one (`"F1"`, `"Backspace"`).
#[must_use]
pub fn translate_key(key: &WinitKey) -> String {
    match key {
        WinitKey::Named(NamedKey::Space) => " ".to_string(),
        WinitKey::Named(named) => format!("{named:?}"),
        WinitKey::Character(text) => text.to_string(),
        WinitKey::Dead(_) => "Dead".to_string(),
        WinitKey::Unidentified(_) => "Unidentified".to_string(),
    }
}

#[must_use]
pub fn translate_button(button: MouseButton) -> Option<PointerButton> {
    match button {
        MouseButton::Left => Some(PointerButton::Primary),
        MouseButton::Right => Some(PointerButton::Secondary),
        MouseButton::Middle => Some(PointerButton::Middle),
        _ => None,
    }
}

/// Wheel movement in lines.
#[must_use]
pub fn translate_wheel(delta: MouseScrollDelta) -> Vec2 {
    match delta {
        MouseScrollDelta::LineDelta(x, y) => Vec2::new(x, y),
        MouseScrollDelta::PixelDelta(pos) => {
            const PIXEL_SCALE: f32 = 0.01;
            Vec2::new(pos.x as f32, pos.y as f32) * PIXEL_SCALE
        }
    }
}
