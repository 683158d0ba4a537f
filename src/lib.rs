#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

//! A keyboard-driven animated creature in a 3D scene.
//!
//! A [`SceneHost`] mounts a session: it builds the stage, loads models
//! asynchronously through the [`AssetLoader`], hands the creature's clips
//! to an [`AnimationController`] and turns key presses into movement and
//! crossfades via the [`LocomotionController`]. Frames are driven by a
//! [`RenderLoop`] that can be cancelled for good on unmount.

pub mod actor;
pub mod animation;
#[cfg(feature = "winit")]
pub mod app;
pub mod assets;
pub mod config;
pub mod controls;
pub mod errors;
pub mod host;
pub mod input;
pub mod locomotion;
pub mod render;
pub mod render_loop;
pub mod scene;
pub mod utils;

pub use actor::Actor;
pub use animation::{
    AnimationAction, AnimationClip, AnimationController, AnimationMixer, Binder, LoopMode,
};
#[cfg(feature = "winit")]
pub use app::App;
pub use assets::{AssetLoader, LoadEvent, LoadRequest, ModelSource};
pub use config::SceneConfig;
pub use controls::OrbitControls;
pub use errors::{ProwlError, Result};
pub use host::{MountTarget, SceneHost};
pub use input::{InputState, Key};
pub use locomotion::{Intent, LocomotionController};
pub use render::{HeadlessRenderer, Renderer};
pub use render_loop::{FrameScheduler, ManualScheduler, RenderLoop};
pub use scene::{Camera, Node, NodeHandle, Scene};
