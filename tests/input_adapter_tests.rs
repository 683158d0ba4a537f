//! Winit Input Adapter Tests
//!
//! Tests for:
//! - Logical keys become DOM-style identifiers
//! - Named keys without a special case still reach the locomotion table
//! - Pointer button and wheel translation

#![cfg(feature = "winit")]

use glam::Vec2;
use winit::event::{MouseButton, MouseScrollDelta};
use winit::keyboard::{Key as WinitKey, NamedKey};

use prowl::app::winit::input_adapter::{translate_button, translate_key, translate_wheel};
use prowl::config::{ClipNames, SceneConfig};
use prowl::input::{Key, PointerButton};
use prowl::locomotion::LocomotionController;

const EPSILON: f32 = 1e-5;

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

// ============================================================================
// Keys
// ============================================================================

#[test]
fn movement_keys_use_dom_identifiers() {
    assert_eq!(translate_key(&WinitKey::Named(NamedKey::ArrowUp)), "ArrowUp");
    assert_eq!(translate_key(&WinitKey::Named(NamedKey::ArrowLeft)), "ArrowLeft");
    assert_eq!(translate_key(&WinitKey::Named(NamedKey::Shift)), "Shift");
    assert_eq!(translate_key(&WinitKey::Named(NamedKey::Space)), " ");
    assert_eq!(translate_key(&WinitKey::Character("a".into())), "a");
}

#[test]
fn other_named_keys_are_forwarded() {
    assert_eq!(translate_key(&WinitKey::Named(NamedKey::F1)), "F1");
    assert_eq!(translate_key(&WinitKey::Named(NamedKey::Backspace)), "Backspace");
    assert_eq!(translate_key(&WinitKey::Named(NamedKey::Home)), "Home");
    assert_eq!(translate_key(&WinitKey::Dead(None)), "Dead");
}

#[test]
fn function_key_selects_idle() {
    let config = SceneConfig::default();
    let clips = ClipNames::default();
    let mut locomotion = LocomotionController::new(config.locomotion, clips.clone());

    let walk = locomotion.key_down(&Key::parse("ArrowDown"), true);
    assert_eq!(walk.animation.unwrap().clip, clips.walk);

    let id = translate_key(&WinitKey::Named(NamedKey::F5));
    let intent = locomotion.key_down(&Key::parse(&id), true);
    assert!(intent.movement.is_none());
    let request = intent.animation.unwrap();
    assert_eq!(request.clip, clips.idle);
    assert!(request.looping);
}

// ============================================================================
// Pointer
// ============================================================================

#[test]
fn mouse_buttons_map_to_pointer_buttons() {
    assert_eq!(translate_button(MouseButton::Left), Some(PointerButton::Primary));
    assert_eq!(translate_button(MouseButton::Right), Some(PointerButton::Secondary));
    assert_eq!(translate_button(MouseButton::Back), None);
}

#[test]
fn wheel_pixels_scale_to_lines() {
    let lines = translate_wheel(MouseScrollDelta::LineDelta(0.0, -2.0));
    assert_eq!(lines, Vec2::new(0.0, -2.0));

    let pixels = translate_wheel(MouseScrollDelta::PixelDelta(
        winit::dpi::PhysicalPosition::new(0.0, 120.0),
    ));
    assert!(approx(pixels.y, 1.2));
}
