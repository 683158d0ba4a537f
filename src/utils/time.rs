use std::time::{Duration, Instant};

/// Measures the time between consecutive frames.
///
/// Frame timestamps are supplied by the caller so a scheduler can drive the
/// clock with synthetic time.
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    start_time: Option<Instant>,
    last_update: Option<Instant>,
    /// Time since the previous tick
    pub delta: Duration,
    /// Total elapsed time since the first tick
    pub elapsed: Duration,
    pub frame_count: u64,
}

impl FrameClock {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a frame at `now` and returns the delta in seconds.
    ///
    /// The first tick yields zero, and a timestamp earlier than the previous
    /// one also yields zero rather than a negative delta.
    pub fn tick(&mut self, now: Instant) -> f32 {
        let start = *self.start_time.get_or_insert(now);
        self.delta = self
            .last_update
            .map_or(Duration::ZERO, |last| now.saturating_duration_since(last));
        self.elapsed = now.saturating_duration_since(start);
        self.last_update = Some(now);
        self.frame_count += 1;
        self.delta.as_secs_f32()
    }

    /// Forgets the previous frame so the next tick yields zero.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    #[must_use]
    pub fn dt_seconds(&self) -> f32 {
        self.delta.as_secs_f32()
    }
}
