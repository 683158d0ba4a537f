//! Windowing shells that drive a [`SceneHost`](crate::host::SceneHost).

pub mod winit;

pub use self::winit::App;
