//! Named-clip state machine on top of [`AnimationMixer`].
//!
//! One controller is bound to one actor subtree. Clips are registered by
//! name, and [`AnimationController::activate`] crossfades from the current
//! action to the requested one.

use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::animation::action::LoopMode;
use crate::animation::binder::Binder;
use crate::animation::clip::AnimationClip;
use crate::animation::mixer::{ActionKey, AnimationMixer};
use crate::scene::{NodeHandle, Scene};

/// Default crossfade interval between two actions, in seconds.
pub const CROSSFADE_DURATION: f32 = 0.2;

pub struct AnimationController {
    root: NodeHandle,
    mixer: AnimationMixer,
    actions: FxHashMap<String, ActionKey>,
    current: Option<ActionKey>,
    crossfade: f32,
}

impl AnimationController {
    /// Binds a fresh controller to the subtree rooted at `root`.
    #[must_use]
    pub fn new(root: NodeHandle) -> Self {
        Self::with_crossfade(root, CROSSFADE_DURATION)
    }

    #[must_use]
    pub fn with_crossfade(root: NodeHandle, crossfade: f32) -> Self {
        Self {
            root,
            mixer: AnimationMixer::new(),
            actions: FxHashMap::default(),
            current: None,
            crossfade: crossfade.max(0.0),
        }
    }

    #[must_use]
    pub fn root(&self) -> NodeHandle {
        self.root
    }

    #[must_use]
    pub fn crossfade(&self) -> f32 {
        self.crossfade
    }

    /// Registers `clip` as a playable action under `name`.
    ///
    /// Registering an existing name replaces the previous action. If the
    /// replaced action was active, the controller is left with no active
    /// action.
    pub fn register_clip(
        &mut self,
        name: impl Into<String>,
        clip: impl Into<Arc<AnimationClip>>,
        scene: &Scene,
    ) -> ActionKey {
        let name = name.into();
        let clip = clip.into();
        let bindings = Binder::bind(scene, self.root, &clip);
        let key = self.mixer.clip_action(clip, bindings, scene);

        if let Some(old) = self.actions.insert(name.clone(), key) {
            log::debug!("Clip '{name}' re-registered, replacing previous action");
            self.mixer.remove_action(old);
            if self.current == Some(old) {
                self.current = None;
            }
        }
        key
    }

    /// Crossfades to the action registered under `name`.
    ///
    /// Unknown names return `None` and leave the state untouched. Activating
    /// the action that is already active restarts it with a fresh fade-in.
    pub fn activate(&mut self, name: &str, looping: bool) -> Option<ActionKey> {
        let Some(&key) = self.actions.get(name) else {
            log::debug!("No animation registered as '{name}', ignoring");
            return None;
        };

        let (mode, clamp) = if looping {
            (LoopMode::Loop, false)
        } else {
            (LoopMode::Once, true)
        };

        if let Some(previous) = self
            .current
            .filter(|&k| k != key)
            .and_then(|k| self.mixer.action_mut(k))
        {
            previous.fade_out(self.crossfade);
        }

        let action = self.mixer.action_mut(key)?;
        action.set_loop(mode).clamp_when_finished = clamp;
        action.reset().fade_in(self.crossfade).play();

        log::debug!("Animation -> '{name}' (loop: {looping})");
        self.current = Some(key);
        Some(key)
    }

    /// Steps playback by `dt` seconds and writes the pose into `scene`.
    ///
    /// Negative or non-finite deltas are treated as zero.
    pub fn advance(&mut self, dt: f32, scene: &mut Scene) {
        let dt = if dt.is_finite() && dt > 0.0 { dt } else { 0.0 };
        self.mixer.update(dt, scene);
    }

    #[must_use]
    pub fn current_action(&self) -> Option<ActionKey> {
        self.current
    }

    /// Name the active action was registered under.
    #[must_use]
    pub fn current_name(&self) -> Option<&str> {
        let current = self.current?;
        self.actions
            .iter()
            .find(|&(_, &k)| k == current)
            .map(|(name, _)| name.as_str())
    }

    /// Loop mode of the active action.
    #[must_use]
    pub fn current_loop_mode(&self) -> Option<LoopMode> {
        self.current
            .and_then(|k| self.mixer.action(k))
            .map(|a| a.loop_mode)
    }

    #[must_use]
    pub fn has_clip(&self, name: &str) -> bool {
        self.actions.contains_key(name)
    }

    pub fn clip_names(&self) -> impl Iterator<Item = &str> {
        self.actions.keys().map(String::as_str)
    }

    #[must_use]
    pub fn mixer(&self) -> &AnimationMixer {
        &self.mixer
    }

    pub fn mixer_mut(&mut self) -> &mut AnimationMixer {
        &mut self.mixer
    }

    /// Stops every action and forgets the active one.
    pub fn stop_all(&mut self) {
        self.mixer.stop_all();
        self.current = None;
    }
}
