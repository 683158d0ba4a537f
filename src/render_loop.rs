//! Cancellable per-frame loop.
//!
//! The loop never runs on its own: a [`FrameScheduler`] delivers frame
//! tokens (one per display refresh) and the loop runs a step only for the
//! token it is currently waiting on. After [`RenderLoop::stop`] there is no
//! such token, so a frame the host had already queued is ignored even if the
//! scheduler could not retract it.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Instant;

use parking_lot::Mutex;

use crate::utils::time::FrameClock;

/// Identifies one requested frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameToken(pub u64);

/// Per-frame scheduling primitive with a matching cancellation primitive.
pub trait FrameScheduler {
    /// Requests a callback on the next display refresh.
    fn request_frame(&mut self) -> FrameToken;

    /// Cancels a previously requested frame, if the host still can.
    fn cancel_frame(&mut self, token: FrameToken);

    /// Next frame that is due, if any.
    fn take_due(&mut self) -> Option<FrameToken>;
}

impl<S: FrameScheduler + ?Sized> FrameScheduler for Box<S> {
    fn request_frame(&mut self) -> FrameToken {
        (**self).request_frame()
    }

    fn cancel_frame(&mut self, token: FrameToken) {
        (**self).cancel_frame(token);
    }

    fn take_due(&mut self) -> Option<FrameToken> {
        (**self).take_due()
    }
}

#[derive(Debug, Default)]
struct ManualQueue {
    next_token: u64,
    queued: VecDeque<FrameToken>,
    requested: u64,
    cancelled: u64,
}

/// Deterministic scheduler: frames become due only when taken.
///
/// Clones share one queue. With [`ManualScheduler::without_retraction`],
/// cancelled frames stay queued and are still delivered, like a host that
/// cannot retract a frame it already queued.
#[derive(Debug, Clone, Default)]
pub struct ManualScheduler {
    queue: Arc<Mutex<ManualQueue>>,
    retract_on_cancel: bool,
}

impl ManualScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self {
            queue: Arc::default(),
            retract_on_cancel: true,
        }
    }

    #[must_use]
    pub fn without_retraction() -> Self {
        Self {
            queue: Arc::default(),
            retract_on_cancel: false,
        }
    }

    /// Frames requested and not yet taken.
    #[must_use]
    pub fn queued(&self) -> usize {
        self.queue.lock().queued.len()
    }

    #[must_use]
    pub fn requested(&self) -> u64 {
        self.queue.lock().requested
    }

    #[must_use]
    pub fn cancelled(&self) -> u64 {
        self.queue.lock().cancelled
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&mut self) -> FrameToken {
        let mut queue = self.queue.lock();
        let token = FrameToken(queue.next_token);
        queue.next_token += 1;
        queue.requested += 1;
        queue.queued.push_back(token);
        token
    }

    fn cancel_frame(&mut self, token: FrameToken) {
        let mut queue = self.queue.lock();
        queue.cancelled += 1;
        if self.retract_on_cancel {
            queue.queued.retain(|t| *t != token);
        }
    }

    fn take_due(&mut self) -> Option<FrameToken> {
        self.queue.lock().queued.pop_front()
    }
}

/// Returned by [`RenderLoop::start`]; required to stop that run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LoopHandle(u64);

#[derive(Debug, Default)]
pub struct RenderLoop {
    running: Option<LoopHandle>,
    pending: Option<FrameToken>,
    generation: u64,
    clock: FrameClock,
    steps: u64,
}

impl RenderLoop {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts the loop and requests the first frame.
    ///
    /// Starting a running loop returns the existing handle and schedules
    /// nothing new.
    pub fn start(&mut self, scheduler: &mut dyn FrameScheduler) -> LoopHandle {
        if let Some(handle) = self.running {
            log::debug!("Render loop already running");
            return handle;
        }
        self.generation += 1;
        let handle = LoopHandle(self.generation);
        self.running = Some(handle);
        self.clock.reset();
        self.pending = Some(scheduler.request_frame());
        log::debug!("Render loop started");
        handle
    }

    /// Stops the run identified by `handle`. No step executes afterwards.
    ///
    /// Returns `false` if `handle` does not belong to the current run.
    pub fn stop(&mut self, handle: LoopHandle, scheduler: &mut dyn FrameScheduler) -> bool {
        if self.running != Some(handle) {
            return false;
        }
        if let Some(token) = self.pending.take() {
            scheduler.cancel_frame(token);
        }
        self.running = None;
        log::debug!("Render loop stopped after {} steps", self.steps);
        true
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running.is_some()
    }

    /// Total steps executed over the loop's lifetime.
    #[must_use]
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Runs one step for `token` if it is the frame the loop is waiting on,
    /// then requests the next frame.
    ///
    /// `step` receives the seconds elapsed since the previous step (zero on
    /// the first). Returns whether a step ran.
    pub fn on_frame(
        &mut self,
        token: FrameToken,
        now: Instant,
        scheduler: &mut dyn FrameScheduler,
        step: impl FnOnce(f32),
    ) -> bool {
        if self.running.is_none() || self.pending != Some(token) {
            log::trace!("Ignoring stale frame {token:?}");
            return false;
        }
        self.pending = None;

        let dt = self.clock.tick(now);
        step(dt);
        self.steps += 1;

        self.pending = Some(scheduler.request_frame());
        true
    }
}
