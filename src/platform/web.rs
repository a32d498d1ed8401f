//! Browser host pieces: a 2D-context canvas and a request-queue scheduler
//!
//! Effects run inside callbacks that already hold the app state, so the
//! scheduler cannot touch `requestAnimationFrame` / `setInterval` directly.
//! It hands out tokens and queues requests; the entry point drains the queue
//! after every callback and wires up the closures.

use std::f64::consts::TAU;

use glam::Vec2;
use wasm_bindgen::JsCast;
use web_sys::{CanvasGradient, CanvasRenderingContext2d, HtmlCanvasElement};

use crate::canvas::{Canvas, Paint, Path, PathCommand, RadialGradient};
use crate::runtime::{FrameScheduler, FrameToken, PeriodicTimer, TimerToken};

/// Canvas backed by a `CanvasRenderingContext2d`
pub struct WebCanvas {
    element: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl WebCanvas {
    /// Wrap a canvas element; `None` if it has no 2D context
    pub fn new(element: HtmlCanvasElement) -> Option<Self> {
        let ctx = element
            .get_context("2d")
            .ok()
            .flatten()?
            .dyn_into::<CanvasRenderingContext2d>()
            .ok()?;
        Some(Self { element, ctx })
    }

    pub fn element(&self) -> &HtmlCanvasElement {
        &self.element
    }

    fn gradient(&self, g: &RadialGradient) -> Option<CanvasGradient> {
        let gradient = self
            .ctx
            .create_radial_gradient(
                g.inner_center.x as f64,
                g.inner_center.y as f64,
                g.inner_radius as f64,
                g.outer_center.x as f64,
                g.outer_center.y as f64,
                g.outer_radius as f64,
            )
            .map_err(|e| log::warn!("createRadialGradient failed: {:?}", e))
            .ok()?;
        for stop in &g.stops {
            if let Err(e) = gradient.add_color_stop(stop.offset, &stop.color.to_css()) {
                log::warn!("addColorStop failed: {:?}", e);
            }
        }
        Some(gradient)
    }

    fn set_paint(&self, paint: &Paint) {
        match paint {
            Paint::Solid(color) => self.ctx.set_fill_style_str(&color.to_css()),
            Paint::Radial(g) => {
                if let Some(gradient) = self.gradient(g) {
                    self.ctx.set_fill_style_canvas_gradient(&gradient);
                }
            }
        }
    }
}

impl Canvas for WebCanvas {
    fn width(&self) -> u32 {
        self.element.width()
    }

    fn height(&self) -> u32 {
        self.element.height()
    }

    fn clear_rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        self.ctx
            .clear_rect(x as f64, y as f64, width as f64, height as f64);
    }

    fn fill_path(&mut self, path: &Path, paint: &Paint) {
        self.set_paint(paint);
        self.ctx.begin_path();
        for cmd in path.commands() {
            match *cmd {
                PathCommand::MoveTo(p) => self.ctx.move_to(p.x as f64, p.y as f64),
                PathCommand::QuadTo { ctrl, to } => self.ctx.quadratic_curve_to(
                    ctrl.x as f64,
                    ctrl.y as f64,
                    to.x as f64,
                    to.y as f64,
                ),
                PathCommand::Close => self.ctx.close_path(),
            }
        }
        self.ctx.fill();
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, paint: &Paint) {
        self.set_paint(paint);
        self.ctx.begin_path();
        if let Err(e) = self
            .ctx
            .arc(center.x as f64, center.y as f64, radius as f64, 0.0, TAU)
        {
            log::warn!("arc failed: {:?}", e);
            return;
        }
        self.ctx.fill();
    }
}

/// A scheduling request waiting to be handed to the browser
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Request {
    Frame(FrameToken),
    CancelFrame(FrameToken),
    Periodic { token: TimerToken, interval_ms: u32 },
    CancelPeriodic(TimerToken),
}

#[derive(Debug, Default)]
pub struct WebScheduler {
    next_id: u64,
    requests: Vec<Request>,
}

impl WebScheduler {
    /// Requests queued since the last drain, in call order
    pub fn drain(&mut self) -> Vec<Request> {
        std::mem::take(&mut self.requests)
    }

    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

impl FrameScheduler for WebScheduler {
    fn schedule_frame(&mut self) -> FrameToken {
        let token = FrameToken(self.next_id());
        self.requests.push(Request::Frame(token));
        token
    }

    fn cancel_frame(&mut self, token: FrameToken) {
        self.requests.push(Request::CancelFrame(token));
    }
}

impl PeriodicTimer for WebScheduler {
    fn schedule_periodic(&mut self, interval_ms: u32) -> TimerToken {
        let token = TimerToken(self.next_id());
        self.requests.push(Request::Periodic { token, interval_ms });
        token
    }

    fn cancel_periodic(&mut self, token: TimerToken) {
        self.requests.push(Request::CancelPeriodic(token));
    }
}
