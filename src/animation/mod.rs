pub mod action;
pub mod binder;
pub mod binding;
pub mod clip;
pub mod controller;
pub mod mixer;
pub mod tracks;
pub mod values;

pub use action::{AnimationAction, LoopMode, TrackValue};
pub use binder::Binder;
pub use binding::{PropertyBinding, TargetPath};
pub use clip::{AnimationClip, Track, TrackData, TrackMeta};
pub use controller::{AnimationController, CROSSFADE_DURATION};
pub use mixer::{ActionKey, AnimationMixer};
pub use tracks::{InterpolationMode, KeyframeCursor, KeyframeTrack};
pub use values::Interpolatable;
