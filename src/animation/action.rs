use std::sync::Arc;

use glam::{Quat, Vec3};

use crate::animation::{
    binding::PropertyBinding,
    clip::{AnimationClip, TrackData},
    tracks::KeyframeCursor,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopMode {
    /// Play to the end, then either hold (clamp) or disable.
    Once,
    /// Wrap around at the end.
    Loop,
}

/// Scheduled linear weight ramp.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Fade {
    from: f32,
    to: f32,
    duration: f32,
    elapsed: f32,
}

impl Fade {
    fn current(&self) -> f32 {
        if self.duration <= 0.0 {
            return self.to;
        }
        let t = (self.elapsed / self.duration).clamp(0.0, 1.0);
        self.from + (self.to - self.from) * t
    }

    fn finished(&self) -> bool {
        self.elapsed >= self.duration
    }
}

/// Playback state of one clip on one rig.
#[derive(Debug, Clone)]
pub struct AnimationAction {
    clip: Arc<AnimationClip>,

    pub time: f32,
    pub time_scale: f32,
    pub weight: f32,
    pub loop_mode: LoopMode,
    /// With [`LoopMode::Once`], hold the final pose instead of disabling.
    pub clamp_when_finished: bool,
    pub paused: bool,
    pub enabled: bool,

    pub bindings: Vec<PropertyBinding>,

    fade: Option<Fade>,
    pub(crate) track_cursors: Vec<KeyframeCursor>,
}

impl AnimationAction {
    /// A new action starts disabled; call [`play`](Self::play) to run it.
    #[must_use]
    pub fn new(clip: Arc<AnimationClip>) -> Self {
        let track_count = clip.tracks.len();
        Self {
            clip,
            time: 0.0,
            time_scale: 1.0,
            weight: 1.0,
            loop_mode: LoopMode::Loop,
            clamp_when_finished: false,
            paused: false,
            enabled: false,
            bindings: Vec::new(),
            fade: None,
            track_cursors: vec![KeyframeCursor::default(); track_count],
        }
    }

    #[must_use]
    pub fn clip(&self) -> &Arc<AnimationClip> {
        &self.clip
    }

    pub fn play(&mut self) -> &mut Self {
        self.enabled = true;
        self.paused = false;
        self
    }

    pub fn stop(&mut self) -> &mut Self {
        self.enabled = false;
        self.fade = None;
        self.reset_time();
        self
    }

    /// Rewinds to the start and cancels any pending fade.
    pub fn reset(&mut self) -> &mut Self {
        self.enabled = true;
        self.paused = false;
        self.fade = None;
        self.reset_time();
        self
    }

    pub fn set_loop(&mut self, mode: LoopMode) -> &mut Self {
        self.loop_mode = mode;
        self
    }

    /// Ramps the weight from 0 to 1 over `duration` seconds.
    pub fn fade_in(&mut self, duration: f32) -> &mut Self {
        self.schedule_fade(0.0, 1.0, duration);
        self
    }

    /// Ramps the weight from its current value to 0, then disables the action.
    pub fn fade_out(&mut self, duration: f32) -> &mut Self {
        self.schedule_fade(self.weight, 0.0, duration);
        self
    }

    fn schedule_fade(&mut self, from: f32, to: f32, duration: f32) {
        let duration = duration.max(0.0);
        self.weight = from;
        self.fade = Some(Fade {
            from,
            to,
            duration,
            elapsed: 0.0,
        });
        if duration == 0.0 {
            self.apply_fade(0.0);
        }
    }

    #[must_use]
    pub fn is_fading(&self) -> bool {
        self.fade.is_some()
    }

    /// Whether the fade in progress (if any) is heading to zero.
    #[must_use]
    pub fn is_fading_out(&self) -> bool {
        self.fade.is_some_and(|f| f.to == 0.0)
    }

    /// Enabled with a non-zero weight, i.e. contributing to the pose.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.enabled && self.weight > 0.0
    }

    fn reset_time(&mut self) {
        self.time = 0.0;
        for cursor in &mut self.track_cursors {
            cursor.last_index = 0;
        }
    }

    fn apply_fade(&mut self, dt: f32) {
        let Some(mut fade) = self.fade else {
            return;
        };
        fade.elapsed += dt;
        self.weight = fade.current();
        if fade.finished() {
            self.fade = None;
            if fade.to <= 0.0 {
                self.enabled = false;
            }
        } else {
            self.fade = Some(fade);
        }
    }

    /// Advances the fade weight and playback time by `dt` seconds.
    pub fn update(&mut self, dt: f32) {
        if !self.enabled {
            return;
        }

        // Fades run on wall time even while the clip is held on its last frame
        self.apply_fade(dt);
        if !self.enabled || self.paused {
            return;
        }

        let duration = self.clip.duration;
        if duration <= 0.0 {
            return;
        }

        self.time += dt * self.time_scale;

        match self.loop_mode {
            LoopMode::Once => {
                if self.time >= duration {
                    self.time = duration;
                    if self.clamp_when_finished {
                        self.paused = true;
                    } else {
                        self.enabled = false;
                    }
                } else if self.time < 0.0 {
                    self.time = 0.0;
                    self.paused = true;
                }
            }
            LoopMode::Loop => {
                if self.time >= duration {
                    self.time %= duration;
                } else if self.time < 0.0 {
                    self.time = duration + (self.time % duration);
                }
            }
        }
    }

    /// Samples track `track_index` at the current time.
    pub fn sample_track(&mut self, track_index: usize) -> Option<TrackValue> {
        let track = self.clip.tracks.get(track_index)?;
        let cursor = self.track_cursors.get_mut(track_index)?;

        match &track.data {
            TrackData::Vector3(t) => t.sample_with_cursor(self.time, cursor).map(TrackValue::Vector3),
            TrackData::Quaternion(t) => t
                .sample_with_cursor(self.time, cursor)
                .map(TrackValue::Quaternion),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TrackValue {
    Vector3(Vec3),
    Quaternion(Quat),
}
