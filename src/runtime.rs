//! Scheduler contract and the effect state machine
//!
//! All effect work happens inside callbacks delivered by a host: one frame
//! callback in flight at a time plus an optional periodic timer. Effects never
//! capture closures. They ask the host for a token and the host later calls
//! `Effect::on_frame` / `Effect::on_timer` with that token. A callback whose
//! token is not the one the effect is waiting for is ignored, which is what
//! makes `cleanup` final.
//!
//! Switching effects: the owner must call `cleanup` on the previous handle
//! before starting the next one. Effects do not coordinate with each other.

use crate::canvas::Canvas;

/// Identifies a requested animation frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameToken(pub u64);

/// Identifies a periodic timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerToken(pub u64);

/// Display-refresh scheduler (requestAnimationFrame)
pub trait FrameScheduler {
    /// Request one frame callback
    fn schedule_frame(&mut self) -> FrameToken;
    /// Cancel a pending frame; unknown or spent tokens are a no-op
    fn cancel_frame(&mut self, token: FrameToken);
}

/// Fixed-period timer (setInterval)
pub trait PeriodicTimer {
    /// Start a timer firing every `interval_ms`
    fn schedule_periodic(&mut self, interval_ms: u32) -> TimerToken;
    /// Stop a timer; unknown or stopped tokens are a no-op
    fn cancel_periodic(&mut self, token: TimerToken);
}

/// A host provides both kinds of scheduling
pub trait Scheduler: FrameScheduler + PeriodicTimer {}

impl<T: FrameScheduler + PeriodicTimer> Scheduler for T {}

/// Everything an effect may touch during a callback
pub struct Runtime<'a> {
    pub canvas: &'a mut dyn Canvas,
    pub scheduler: &'a mut dyn Scheduler,
}

impl<'a> Runtime<'a> {
    pub fn new(canvas: &'a mut dyn Canvas, scheduler: &'a mut dyn Scheduler) -> Self {
        Self { canvas, scheduler }
    }
}

/// A running effect
pub trait Effect {
    /// Registry name
    fn name(&self) -> &'static str;

    /// Frame callback; `timestamp_ms` is the host's monotonic clock
    fn on_frame(&mut self, token: FrameToken, timestamp_ms: f64, rt: &mut Runtime<'_>);

    /// Periodic timer callback
    fn on_timer(&mut self, _token: TimerToken, _rt: &mut Runtime<'_>) {}

    /// Cancel all pending callbacks and clear the surface.
    ///
    /// Safe to call any number of times.
    fn cleanup(&mut self, rt: &mut Runtime<'_>);

    /// False once the effect has finished or been cleaned up
    fn is_active(&self) -> bool;
}

/// Opaque handle returned by an effect start call
pub type EffectHandle = Box<dyn Effect>;

/// Pending callback slot: at most one token of each kind per effect
#[derive(Debug)]
pub(crate) struct Pending<T> {
    token: Option<T>,
}

impl<T> Default for Pending<T> {
    fn default() -> Self {
        Self { token: None }
    }
}

impl<T: Copy + PartialEq> Pending<T> {
    pub(crate) fn set(&mut self, token: T) {
        self.token = Some(token);
    }

    /// Consume the slot if `token` is the one being waited for
    pub(crate) fn accept(&mut self, token: T) -> bool {
        if self.token == Some(token) {
            self.token = None;
            true
        } else {
            false
        }
    }

    pub(crate) fn matches(&self, token: T) -> bool {
        self.token == Some(token)
    }

    pub(crate) fn take(&mut self) -> Option<T> {
        self.token.take()
    }

    pub(crate) fn is_set(&self) -> bool {
        self.token.is_some()
    }
}
