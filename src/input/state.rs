/// Keyboard state carried across events for one session.
///
/// Created on mount and reset on unmount, so no flag outlives the session
/// that set it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputState {
    /// Shift is held: movement uses the fast speed and the run clip.
    pub shift_held: bool,
    /// Space is held. Guards the sit toggle against key auto-repeat.
    pub space_held: bool,
    pub sitting: bool,
}

impl InputState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
