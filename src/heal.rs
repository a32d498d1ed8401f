//! Heal effect: soft white particles rising and fading from the center
//!
//! A periodic timer spawns bursts; every frame draws, moves, fades and culls.
//! With a finite duration the timer stops once the duration has elapsed and
//! the effect terminates itself after the last particle fades out.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::canvas::{Canvas, Paint, RadialGradient, Rgba};
use crate::consts::*;
use crate::error::Result;
use crate::runtime::{Effect, FrameToken, Pending, Runtime, TimerToken};
use crate::settings::HealSettings;

const GLOW: Rgba = Rgba::rgb(0xffffff);

/// A glowing particle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub pos: Vec2,
    pub radius: f32,
    pub opacity: f32,
    /// Vertical velocity (px/frame, negative is up)
    pub vy: f32,
}

impl Particle {
    /// White core fading to transparent at the rim
    pub fn paint(&self) -> Paint {
        Paint::Radial(
            RadialGradient::concentric(self.pos, 0.0, self.radius)
                .stop(0.0, GLOW.with_alpha(self.opacity))
                .stop(1.0, GLOW.with_alpha(0.0)),
        )
    }
}

/// Live particle set
#[derive(Debug, Clone)]
pub struct ParticleSystem {
    particles: Vec<Particle>,
    origin: Vec2,
    spread: f32,
    fade_per_frame: f32,
    rng: Pcg32,
}

impl ParticleSystem {
    pub fn new(origin: Vec2, spread: f32, fade_per_frame: f32, rng: Pcg32) -> Self {
        Self {
            particles: Vec::new(),
            origin,
            spread,
            fade_per_frame,
            rng,
        }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Add `count` particles around the origin
    pub fn spawn_burst(&mut self, count: usize) {
        for _ in 0..count {
            let jitter = Vec2::new(self.rng.random::<f32>(), self.rng.random::<f32>())
                * (2.0 * self.spread)
                - Vec2::splat(self.spread);
            self.particles.push(Particle {
                pos: self.origin + jitter,
                radius: self.rng.random_range(HEAL_RADIUS_MIN..HEAL_RADIUS_MAX),
                opacity: 1.0,
                vy: self.rng.random_range(HEAL_VY_MIN..HEAL_VY_MAX),
            });
        }
    }

    pub fn draw(&self, canvas: &mut dyn Canvas) {
        for p in &self.particles {
            canvas.fill_circle(p.pos, p.radius, &p.paint());
        }
    }

    /// Rise, fade, and drop fully transparent particles
    pub fn update(&mut self) {
        for p in &mut self.particles {
            p.pos.y += p.vy;
            p.opacity -= self.fade_per_frame;
        }
        self.particles.retain(|p| p.opacity > 0.0);
    }
}

/// Heal particle effect
pub struct HealEffect {
    system: ParticleSystem,
    duration_ms: u64,
    burst_size: usize,
    frame: Pending<FrameToken>,
    timer: Pending<TimerToken>,
    start_ms: Option<f64>,
    active: bool,
}

impl HealEffect {
    pub const NAME: &'static str = "heal";

    /// Start the spawn timer and request the first frame
    pub fn start(rt: &mut Runtime<'_>, settings: &HealSettings, seed: u64) -> Result<Self> {
        settings.validate()?;
        let surface = rt.canvas.surface()?;

        let system = ParticleSystem::new(
            surface.center(),
            settings.spawn_spread,
            settings.fade_per_frame,
            Pcg32::seed_from_u64(seed),
        );
        let mut effect = Self {
            system,
            duration_ms: settings.duration_ms,
            burst_size: settings.burst_size,
            frame: Pending::default(),
            timer: Pending::default(),
            start_ms: None,
            active: true,
        };
        effect
            .timer
            .set(rt.scheduler.schedule_periodic(settings.spawn_interval_ms));
        effect.frame.set(rt.scheduler.schedule_frame());

        if effect.duration_ms == 0 {
            log::info!("heal effect started (unbounded, seed {})", seed);
        } else {
            log::info!("heal effect started ({}ms, seed {})", effect.duration_ms, seed);
        }
        Ok(effect)
    }

    pub fn particle_count(&self) -> usize {
        self.system.len()
    }

    pub fn particles(&self) -> &[Particle] {
        self.system.particles()
    }

    /// Whether the spawn timer is still running
    pub fn is_spawning(&self) -> bool {
        self.timer.is_set()
    }
}

impl Effect for HealEffect {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn on_timer(&mut self, token: TimerToken, _rt: &mut Runtime<'_>) {
        if !self.timer.matches(token) {
            log::trace!("heal: ignoring stale timer {:?}", token);
            return;
        }
        self.system.spawn_burst(self.burst_size);
    }

    fn on_frame(&mut self, token: FrameToken, timestamp_ms: f64, rt: &mut Runtime<'_>) {
        if !self.frame.accept(token) {
            log::trace!("heal: ignoring stale frame {:?}", token);
            return;
        }

        let start_ms = *self.start_ms.get_or_insert(timestamp_ms);
        let elapsed_ms = timestamp_ms - start_ms;

        rt.canvas.clear();
        self.system.draw(&mut *rt.canvas);
        self.system.update();

        let unbounded = self.duration_ms == 0;
        if unbounded || elapsed_ms < self.duration_ms as f64 {
            self.frame.set(rt.scheduler.schedule_frame());
        } else if !self.system.is_empty() {
            // Out of time: no new particles, let the rest fade out
            if let Some(timer) = self.timer.take() {
                rt.scheduler.cancel_periodic(timer);
                log::info!("heal spawning stopped after {:.0}ms", elapsed_ms);
            }
            self.frame.set(rt.scheduler.schedule_frame());
        } else {
            log::info!("heal effect finished after {:.0}ms", elapsed_ms);
            self.cleanup(rt);
        }
    }

    fn cleanup(&mut self, rt: &mut Runtime<'_>) {
        if let Some(timer) = self.timer.take() {
            rt.scheduler.cancel_periodic(timer);
        }
        if let Some(frame) = self.frame.take() {
            rt.scheduler.cancel_frame(frame);
        }
        if self.active {
            log::info!("heal effect stopped");
        }
        self.active = false;
        rt.canvas.clear();
    }

    fn is_active(&self) -> bool {
        self.active
    }
}
