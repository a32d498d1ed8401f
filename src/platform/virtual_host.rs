//! Deterministic host: virtual clock, frame/timer queues, recording canvas
//!
//! Frames are delivered on a fixed vsync grid (60 Hz by default). Timers
//! fire at their own period. Events are processed strictly in timestamp
//! order; a timer due at the same instant as a vsync fires first.

use crate::canvas::RecordingCanvas;
use crate::runtime::{Effect, FrameScheduler, FrameToken, PeriodicTimer, Runtime, TimerToken};

/// Default display refresh interval (60 Hz)
pub const DEFAULT_FRAME_INTERVAL_MS: f64 = 1000.0 / 60.0;

#[derive(Debug, Clone)]
struct VirtualTimer {
    token: TimerToken,
    interval_ms: f64,
    next_fire_ms: f64,
}

/// Scheduler backed by a virtual clock
#[derive(Debug, Default)]
pub struct VirtualScheduler {
    now_ms: f64,
    next_id: u64,
    frames: Vec<FrameToken>,
    timers: Vec<VirtualTimer>,
}

impl VirtualScheduler {
    pub fn now_ms(&self) -> f64 {
        self.now_ms
    }

    /// Frame callbacks waiting for the next vsync
    pub fn pending_frames(&self) -> usize {
        self.frames.len()
    }

    /// Running periodic timers
    pub fn active_timers(&self) -> usize {
        self.timers.len()
    }

    pub fn is_idle(&self) -> bool {
        self.frames.is_empty() && self.timers.is_empty()
    }

    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

impl FrameScheduler for VirtualScheduler {
    fn schedule_frame(&mut self) -> FrameToken {
        let token = FrameToken(self.next_id());
        self.frames.push(token);
        token
    }

    fn cancel_frame(&mut self, token: FrameToken) {
        self.frames.retain(|t| *t != token);
    }
}

impl PeriodicTimer for VirtualScheduler {
    fn schedule_periodic(&mut self, interval_ms: u32) -> TimerToken {
        let token = TimerToken(self.next_id());
        // A zero period would never let the clock move
        let interval_ms = f64::from(interval_ms.max(1));
        self.timers.push(VirtualTimer {
            token,
            interval_ms,
            next_fire_ms: self.now_ms + interval_ms,
        });
        token
    }

    fn cancel_periodic(&mut self, token: TimerToken) {
        self.timers.retain(|t| t.token != token);
    }
}

/// What a `step` delivered
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HostEvent {
    /// A vsync delivered `count` frame callbacks
    Frame { at_ms: f64, count: usize },
    /// A periodic timer fired
    Timer { at_ms: f64, token: TimerToken },
}

impl HostEvent {
    pub fn at_ms(&self) -> f64 {
        match *self {
            HostEvent::Frame { at_ms, .. } | HostEvent::Timer { at_ms, .. } => at_ms,
        }
    }
}

/// Headless host for one effect at a time
#[derive(Debug)]
pub struct VirtualHost {
    pub canvas: RecordingCanvas,
    pub scheduler: VirtualScheduler,
    frame_interval_ms: f64,
    frames_delivered: u64,
}

impl VirtualHost {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            canvas: RecordingCanvas::new(width, height),
            scheduler: VirtualScheduler::default(),
            frame_interval_ms: DEFAULT_FRAME_INTERVAL_MS,
            frames_delivered: 0,
        }
    }

    /// Use a different vsync period (e.g. to simulate a slow display)
    pub fn with_frame_interval(mut self, interval_ms: f64) -> Self {
        self.frame_interval_ms = interval_ms.max(f64::EPSILON);
        self
    }

    /// Borrow the canvas and scheduler as a runtime for starting effects
    pub fn runtime(&mut self) -> Runtime<'_> {
        Runtime::new(&mut self.canvas, &mut self.scheduler)
    }

    pub fn now_ms(&self) -> f64 {
        self.scheduler.now_ms
    }

    pub fn frames_delivered(&self) -> u64 {
        self.frames_delivered
    }

    fn next_vsync_ms(&self) -> f64 {
        let now = self.scheduler.now_ms;
        let iv = self.frame_interval_ms;
        let mut next = ((now / iv).floor() + 1.0) * iv;
        if next <= now {
            next += iv;
        }
        next
    }

    /// Timestamp of the next event, if anything is scheduled
    pub fn next_event_ms(&self) -> Option<f64> {
        let frame = (!self.scheduler.frames.is_empty()).then(|| self.next_vsync_ms());
        let timer = self
            .scheduler
            .timers
            .iter()
            .map(|t| t.next_fire_ms)
            .min_by(|a, b| a.total_cmp(b));

        match (frame, timer) {
            (Some(f), Some(t)) => Some(f.min(t)),
            (f, t) => f.or(t),
        }
    }

    /// Deliver the next event to `effect`
    pub fn step(&mut self, effect: &mut dyn Effect) -> Option<HostEvent> {
        let due_timer = self
            .scheduler
            .timers
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| a.next_fire_ms.total_cmp(&b.next_fire_ms))
            .map(|(i, t)| (i, t.next_fire_ms));
        let vsync = (!self.scheduler.frames.is_empty()).then(|| self.next_vsync_ms());

        match (due_timer, vsync) {
            (Some((i, fire_at)), v) if v.is_none_or(|v| fire_at <= v) => {
                let timer = &mut self.scheduler.timers[i];
                let token = timer.token;
                timer.next_fire_ms += timer.interval_ms;
                self.scheduler.now_ms = fire_at;

                let mut rt = Runtime::new(&mut self.canvas, &mut self.scheduler);
                effect.on_timer(token, &mut rt);
                Some(HostEvent::Timer { at_ms: fire_at, token })
            }
            (_, Some(at_ms)) => {
                self.scheduler.now_ms = at_ms;
                let tokens = std::mem::take(&mut self.scheduler.frames);
                let count = tokens.len();
                for token in tokens {
                    let mut rt = Runtime::new(&mut self.canvas, &mut self.scheduler);
                    effect.on_frame(token, at_ms, &mut rt);
                }
                self.frames_delivered += count as u64;
                Some(HostEvent::Frame { at_ms, count })
            }
            _ => None,
        }
    }

    /// Deliver every event up to `now + duration_ms`, then move the clock there
    pub fn advance(&mut self, effect: &mut dyn Effect, duration_ms: f64) {
        let target = self.scheduler.now_ms + duration_ms;
        while self.next_event_ms().is_some_and(|t| t <= target) {
            self.step(effect);
        }
        self.scheduler.now_ms = target;
    }

    /// Run until nothing is scheduled. Returns false if `limit_ms` (absolute
    /// virtual time) is reached first.
    pub fn run_until_idle(&mut self, effect: &mut dyn Effect, limit_ms: f64) -> bool {
        loop {
            match self.next_event_ms() {
                None => return true,
                Some(t) if t > limit_ms => return false,
                Some(_) => {
                    self.step(effect);
                }
            }
        }
    }
}
