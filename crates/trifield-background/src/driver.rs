//! Frame-driven animation loop with an explicit start/stop lifecycle.
//!
//! The driver never sleeps or spawns anything. It asks a [`FrameScheduler`]
//! for the next frame and paints when the host hands that frame back. A
//! stopped driver has no outstanding request, so nothing can paint after
//! teardown.

use std::time::{Duration, Instant};

use log::{debug, warn};

/// Monotonic time source.
pub trait Clock {
    /// Time since an arbitrary fixed origin. Never goes backwards.
    fn now(&self) -> Duration;
}

/// [`Clock`] backed by [`Instant`].
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Handle of a requested frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameId(pub u64);

/// Host side of the repaint signal.
pub trait FrameScheduler {
    /// Ask for one more frame.
    fn request_frame(&mut self) -> FrameId;
    /// Withdraw a request. Unknown or already delivered ids are ignored.
    fn cancel_frame(&mut self, id: FrameId);
}

/// Schedules frames at a fixed display rate for a polling event loop.
///
/// The host waits at most [`time_until_due`](Self::time_until_due) for
/// input, then collects the frame with [`take_due`](Self::take_due).
#[derive(Debug)]
pub struct RepaintScheduler<C: Clock = MonotonicClock> {
    clock: C,
    interval: Duration,
    next_id: u64,
    pending: Option<(FrameId, Duration)>,
    last_fired: Option<Duration>,
}

impl RepaintScheduler<MonotonicClock> {
    /// Scheduler running at `frame_rate` frames per second.
    pub fn with_frame_rate(frame_rate: u32) -> Self {
        Self::new(MonotonicClock::new(), frame_rate)
    }
}

impl<C: Clock> RepaintScheduler<C> {
    pub fn new(clock: C, frame_rate: u32) -> Self {
        Self {
            clock,
            interval: Duration::from_secs(1) / frame_rate.max(1),
            next_id: 0,
            pending: None,
            last_fired: None,
        }
    }

    /// Time between two frames.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Whether a frame is requested and not yet delivered.
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// How long until the pending frame is due, if any.
    pub fn time_until_due(&self) -> Option<Duration> {
        let now = self.clock.now();
        self.pending
            .map(|(_, deadline)| deadline.saturating_sub(now))
    }

    /// Hand out the pending frame once its deadline has passed.
    pub fn take_due(&mut self) -> Option<FrameId> {
        let now = self.clock.now();
        match self.pending {
            Some((id, deadline)) if deadline <= now => {
                self.pending = None;
                self.last_fired = Some(now);
                Some(id)
            }
            _ => None,
        }
    }
}

impl<C: Clock> FrameScheduler for RepaintScheduler<C> {
    fn request_frame(&mut self) -> FrameId {
        let now = self.clock.now();
        let deadline = self
            .last_fired
            .map(|fired| fired + self.interval)
            .unwrap_or(now)
            .max(now);

        let id = FrameId(self.next_id);
        self.next_id += 1;
        // Only one frame is ever outstanding; a new request replaces it.
        self.pending = Some((id, deadline));
        id
    }

    fn cancel_frame(&mut self, id: FrameId) {
        if matches!(self.pending, Some((pending, _)) if pending == id) {
            self.pending = None;
        }
    }
}

/// Lifecycle of an [`AnimationDriver`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    Stopped,
    Running,
}

#[derive(Debug)]
enum Lifecycle {
    Stopped,
    Running {
        /// Clock reading when the driver started.
        origin: Duration,
        /// Elapsed time carried over from a previous run.
        offset: Duration,
        /// Outstanding frame request.
        pending: Option<FrameId>,
    },
}

/// Repaints on every frame the scheduler delivers while running.
///
/// Dropping the driver stops it, which cancels any pending frame.
#[derive(Debug)]
pub struct AnimationDriver<C: Clock, S: FrameScheduler> {
    clock: C,
    scheduler: S,
    lifecycle: Lifecycle,
    /// Time of the last painted frame.
    last_elapsed: Duration,
    /// Frames painted since construction.
    frames: u64,
}

impl<C: Clock, S: FrameScheduler> AnimationDriver<C, S> {
    pub fn new(clock: C, scheduler: S) -> Self {
        Self {
            clock,
            scheduler,
            lifecycle: Lifecycle::Stopped,
            last_elapsed: Duration::ZERO,
            frames: 0,
        }
    }

    pub fn state(&self) -> DriverState {
        match self.lifecycle {
            Lifecycle::Stopped => DriverState::Stopped,
            Lifecycle::Running { .. } => DriverState::Running,
        }
    }

    pub fn is_running(&self) -> bool {
        self.state() == DriverState::Running
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    /// Number of frames painted so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Seconds since start, or of the last painted frame when stopped.
    pub fn elapsed(&self) -> f64 {
        match self.lifecycle {
            Lifecycle::Running { origin, offset, .. } => {
                (self.clock.now().saturating_sub(origin) + offset).as_secs_f64()
            }
            Lifecycle::Stopped => self.last_elapsed.as_secs_f64(),
        }
    }

    /// Start with the clock at zero.
    pub fn start(&mut self) {
        self.start_from(Duration::ZERO);
    }

    /// Start with the clock already at `elapsed`. No-op while running.
    pub fn start_from(&mut self, elapsed: Duration) {
        if self.is_running() {
            return;
        }
        let pending = self.scheduler.request_frame();
        self.last_elapsed = elapsed;
        self.lifecycle = Lifecycle::Running {
            origin: self.clock.now(),
            offset: elapsed,
            pending: Some(pending),
        };
        debug!("animation started at {:.3}s", elapsed.as_secs_f64());
    }

    /// Stop painting and withdraw the pending frame.
    ///
    /// [`elapsed`](Self::elapsed) then reports the time of the last painted
    /// frame, so a redraw of the stopped field matches the screen.
    pub fn stop(&mut self) {
        if let Lifecycle::Running { pending, .. } = self.lifecycle {
            if let Some(id) = pending {
                self.scheduler.cancel_frame(id);
            }
            self.lifecycle = Lifecycle::Stopped;
            debug!("animation stopped after {} frames", self.frames);
        }
    }

    /// Deliver frame `id`.
    ///
    /// Paints with the elapsed seconds and requests the next frame when `id`
    /// is the outstanding request of a running driver. Anything else is
    /// ignored. Returns whether `paint` ran.
    ///
    /// A failed paint stops the driver; [`start_from`](Self::start_from)
    /// resumes it.
    pub fn on_frame<F, E>(&mut self, id: FrameId, paint: F) -> Result<bool, E>
    where
        F: FnOnce(f64) -> Result<(), E>,
    {
        let (origin, offset) = match &mut self.lifecycle {
            Lifecycle::Running {
                origin,
                offset,
                pending,
            } if *pending == Some(id) => {
                *pending = None;
                (*origin, *offset)
            }
            _ => return Ok(false),
        };

        let elapsed = self.clock.now().saturating_sub(origin) + offset;
        if let Err(err) = paint(elapsed.as_secs_f64()) {
            self.lifecycle = Lifecycle::Stopped;
            warn!("paint failed, animation stopped after {} frames", self.frames);
            return Err(err);
        }
        self.last_elapsed = elapsed;
        self.frames += 1;

        let next = self.scheduler.request_frame();
        if let Lifecycle::Running { pending, .. } = &mut self.lifecycle {
            *pending = Some(next);
        }
        Ok(true)
    }
}

impl<C: Clock, S: FrameScheduler> Drop for AnimationDriver<C, S> {
    fn drop(&mut self) {
        self.stop();
    }
}
