//! Keyboard-driven locomotion.
//!
//! [`LocomotionController`] turns discrete key events into [`Intent`]s: a
//! movement step with a facing direction and/or an animation request. It
//! never touches the scene itself; the host applies each intent to the
//! [`Actor`](crate::actor::Actor) in the same call that received the key.

use std::f32::consts::{FRAC_PI_2, PI};

use glam::Vec3;

use crate::config::{ClipNames, LocomotionSettings};
use crate::input::{InputState, Key};

/// A single movement step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Movement {
    /// World-space translation to add to the actor position.
    pub delta: Vec3,
    /// Absolute yaw (radians about +Y) the actor snaps to.
    pub yaw: f32,
}

/// Request to crossfade to a named clip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnimationRequest {
    pub clip: String,
    pub looping: bool,
}

/// What a key event asks the actor to do.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Intent {
    pub movement: Option<Movement>,
    pub animation: Option<AnimationRequest>,
}

impl Intent {
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.movement.is_none() && self.animation.is_none()
    }
}

/// Unit direction and facing yaw for an arrow key.
fn arrow_direction(key: &Key) -> Option<(Vec3, f32)> {
    match key {
        Key::ArrowDown => Some((Vec3::Z, 0.0)),
        Key::ArrowUp => Some((Vec3::NEG_Z, PI)),
        Key::ArrowLeft => Some((Vec3::NEG_X, -FRAC_PI_2)),
        Key::ArrowRight => Some((Vec3::X, FRAC_PI_2)),
        _ => None,
    }
}

#[derive(Debug, Clone, Default)]
pub struct LocomotionController {
    state: InputState,
    settings: LocomotionSettings,
    clips: ClipNames,
}

impl LocomotionController {
    #[must_use]
    pub fn new(settings: LocomotionSettings, clips: ClipNames) -> Self {
        Self {
            state: InputState::new(),
            settings,
            clips,
        }
    }

    #[must_use]
    pub fn state(&self) -> &InputState {
        &self.state
    }

    #[must_use]
    pub fn settings(&self) -> &LocomotionSettings {
        &self.settings
    }

    #[must_use]
    pub fn clips(&self) -> &ClipNames {
        &self.clips
    }

    /// Speed for a press made right now.
    #[must_use]
    pub fn current_speed(&self) -> f32 {
        if self.state.shift_held {
            self.settings.fast_speed
        } else {
            self.settings.normal_speed
        }
    }

    fn locomotion_clip(&self) -> &str {
        if self.state.shift_held {
            &self.clips.run
        } else {
            &self.clips.walk
        }
    }

    /// Handles a key press.
    ///
    /// `actor_ready` is false until the actor has loaded. Shift and the
    /// Space guard are tracked regardless, but every other effect is
    /// dropped while there is no actor to apply it to.
    pub fn key_down(&mut self, key: &Key, actor_ready: bool) -> Intent {
        match key {
            Key::Shift => {
                self.state.shift_held = true;
                Intent::none()
            }
            Key::Space => {
                if self.state.space_held {
                    return Intent::none();
                }
                self.state.space_held = true;
                if !actor_ready {
                    return Intent::none();
                }
                self.state.sitting = !self.state.sitting;
                let request = if self.state.sitting {
                    AnimationRequest {
                        clip: self.clips.seat.clone(),
                        looping: false,
                    }
                } else {
                    self.idle_request()
                };
                log::debug!("Sitting: {}", self.state.sitting);
                Intent {
                    movement: None,
                    animation: Some(request),
                }
            }
            _ if !actor_ready => Intent::none(),
            arrow if arrow.is_arrow() => {
                let Some((direction, yaw)) = arrow_direction(arrow) else {
                    return Intent::none();
                };
                Intent {
                    movement: Some(Movement {
                        delta: direction * self.current_speed(),
                        yaw,
                    }),
                    animation: Some(AnimationRequest {
                        clip: self.locomotion_clip().to_string(),
                        looping: true,
                    }),
                }
            }
            // Any other key falls back to idle
            _ => Intent {
                movement: None,
                animation: Some(self.idle_request()),
            },
        }
    }

    /// Handles a key release. Only Shift and Space carry release state.
    pub fn key_up(&mut self, key: &Key) {
        match key {
            Key::Shift => self.state.shift_held = false,
            Key::Space => self.state.space_held = false,
            _ => {}
        }
    }

    fn idle_request(&self) -> AnimationRequest {
        AnimationRequest {
            clip: self.clips.idle.clone(),
            looping: true,
        }
    }

    /// Clears every flag; called when the session ends.
    pub fn reset(&mut self) {
        self.state.reset();
    }
}
