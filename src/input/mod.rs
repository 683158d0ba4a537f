//! Input module
//!
//! - [`Key`]: key identifiers as delivered by the host
//! - [`InputState`]: per-session keyboard flags
//! - [`PointerState`]: pointer state for the camera controls

pub mod key;
pub mod pointer;
pub mod state;

pub use key::Key;
pub use pointer::{PointerButton, PointerState};
pub use state::InputState;
