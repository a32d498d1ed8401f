//! Splatter FX - procedural canvas effects
//!
//! Core modules:
//! - `splat`: Blood splatter decal (shape generation, outline, growth, decoration)
//! - `heal`: Rising, fading glow particles
//! - `canvas`: Drawing surface contract and a recording implementation
//! - `runtime`: Frame/timer scheduler contract and the `Effect` state machine
//! - `controller`: Effect registry and active-effect switching
//! - `platform`: Virtual (deterministic) host and browser host

pub mod canvas;
pub mod controller;
pub mod error;
pub mod geom;
pub mod heal;
pub mod platform;
pub mod runtime;
pub mod settings;
pub mod splat;
pub mod vector;

pub use controller::{EffectController, EffectKind};
pub use error::{EffectError, Result};
pub use runtime::{Effect, EffectHandle, Runtime};
pub use settings::Settings;

use glam::Vec2;
use std::f32::consts::{PI, TAU};

/// Effect tuning constants
pub mod consts {
    use crate::canvas::Rgba;
    use std::f32::consts::TAU;

    /// Blood stain growth duration (ms)
    pub const GROWTH_DURATION_MS: f64 = 300.0;
    /// Base radius as a fraction of the surface width
    pub const BASE_RADIUS_RATIO: f32 = 1.0 / 6.0;

    /// Angular step between consecutive bumps (radians)
    pub const BUMP_STEP_MIN: f32 = TAU / 16.0;
    pub const BUMP_STEP_MAX: f32 = TAU / 10.0;
    /// Ordinary bump radius band (multiples of base radius)
    pub const BUMP_RADIUS_MIN: f32 = 1.15;
    pub const BUMP_RADIUS_MAX: f32 = 1.35;
    /// Spike radius band (multiples of base radius)
    pub const SPIKE_RADIUS_MIN: f32 = 1.8;
    pub const SPIKE_RADIUS_MAX: f32 = 2.0;
    /// Spike count is floor(uniform(3, 5))
    pub const SPIKE_COUNT_MIN: f32 = 3.0;
    pub const SPIKE_COUNT_MAX: f32 = 5.0;

    /// Valley control point radius (multiples of base radius)
    pub const VALLEY_RADIUS_SHALLOW: f32 = 0.88;
    pub const VALLEY_RADIUS_DEEP: f32 = 0.62;
    /// Transition point blend factor bounds
    pub const BLEND_MIN: f32 = 0.3;
    pub const BLEND_MAX: f32 = 0.75;

    /// Decoration
    pub const SPECKLE_COUNT: usize = 200;
    pub const SPECKLE_RADIUS_MIN: f32 = 1.0;
    pub const SPECKLE_RADIUS_MAX: f32 = 3.0;
    /// Speckles at least this large get a gradient fill
    pub const SPECKLE_GRADIENT_RADIUS: f32 = 1.8;
    pub const DROPLET_OFFSET_MIN: f32 = 10.0;
    pub const DROPLET_OFFSET_MAX: f32 = 40.0;
    pub const DROPLET_LENGTH_MIN: f32 = 5.0;
    pub const DROPLET_LENGTH_MAX: f32 = 50.0;
    pub const DROPLET_HALF_WIDTH_MIN: f32 = 2.0;
    pub const DROPLET_HALF_WIDTH_MAX: f32 = 5.0;

    /// Heal particles
    pub const HEAL_SPAWN_INTERVAL_MS: u32 = 100;
    pub const HEAL_BURST_SIZE: usize = 5;
    pub const HEAL_SPAWN_SPREAD: f32 = 15.0;
    pub const HEAL_RADIUS_MIN: f32 = 2.0;
    pub const HEAL_RADIUS_MAX: f32 = 5.0;
    /// Upward velocity band (px/frame, negative is up)
    pub const HEAL_VY_MIN: f32 = -2.0;
    pub const HEAL_VY_MAX: f32 = -0.5;
    pub const HEAL_FADE_PER_FRAME: f32 = 0.01;

    /// Palette
    pub const STAIN_CORE: Rgba = Rgba::rgb(0x4d0000);
    pub const STAIN_BODY: Rgba = Rgba::rgb(0x880000);
    pub const STAIN_RIM: Rgba = Rgba::rgb(0xc20000);
    pub const DROPLET_INNER: Rgba = Rgba::rgb(0x4b0000);
    pub const DROPLET_MID: Rgba = Rgba::rgb(0x830000);
    pub const DROPLET_OUTER: Rgba = Rgba::rgb(0xb00000);
    pub const SPECKLE_CORE: Rgba = Rgba::rgb(0x8b0000);
    pub const SPECKLE_MID: Rgba = Rgba::rgb(0xc20000);
    pub const SPECKLE_FLAT: Rgba = Rgba::rgb(0xba0000);
}

/// Normalized angle to [0, 2π)
#[inline]
pub fn normalize_angle(angle: f32) -> f32 {
    let a = angle.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if a >= TAU { 0.0 } else { a }
}

/// Signed minimal difference `b - a`, in (-π, π]
#[inline]
pub fn shortest_angle_delta(a: f32, b: f32) -> f32 {
    let delta = normalize_angle(b - a);
    if delta > PI { delta - TAU } else { delta }
}

/// Convert polar (angle, radius) around `center` to cartesian
#[inline]
pub fn polar_to_cartesian(center: Vec2, angle: f32, radius: f32) -> Vec2 {
    center + Vec2::new(angle.cos(), angle.sin()) * radius
}

/// Convert cartesian to polar (radius, angle) around `center`
#[inline]
pub fn cartesian_to_polar(center: Vec2, pos: Vec2) -> (f32, f32) {
    let d = pos - center;
    (d.length(), normalize_angle(d.y.atan2(d.x)))
}
