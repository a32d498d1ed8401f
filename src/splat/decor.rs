//! One-shot decoration drawn after the stain has grown: teardrop droplets
//! flung from the bumps and speckle dots scattered around the stain.

use glam::Vec2;
use rand::Rng;
use std::f32::consts::FRAC_PI_2;

use super::shape::SplatShape;
use crate::canvas::{Canvas, Paint, Path, RadialGradient, Surface};
use crate::consts::*;
use crate::geom::{circle_line_intersections, lerp, log_normal_sample, pick_point_in_angle_range};
use crate::polar_to_cartesian;

/// Heading jitter of a droplet around its bump (±1°)
const DROPLET_JITTER: f32 = std::f32::consts::PI / 180.0;

/// Speckle radius distribution: log-normal with a 2px median, resampled
/// until it lands inside the radius band
const SPECKLE_LOG_MU: f32 = std::f32::consts::LN_2;
const SPECKLE_LOG_SIGMA: f32 = 0.35;
/// Draws before falling back to a uniform radius (acceptance is ~85%)
const SPECKLE_MAX_DRAWS: usize = 16;

/// A teardrop from `start` (blunt end) to `end` (tail)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Droplet {
    pub start: Vec2,
    pub end: Vec2,
    pub half_width: f32,
}

impl Droplet {
    /// Two quadratics sharing both endpoints, bulging to either side of the
    /// travel direction.
    pub fn path(&self) -> Path {
        let dir = (self.end - self.start).normalize_or_zero();
        let normal = Vec2::new(dir.y, -dir.x);
        let left = self.end + normal * self.half_width;
        let right = self.end - normal * self.half_width;

        let mut path = Path::with_capacity(4);
        path.move_to(self.start);
        path.quad_to(left, self.end);
        path.quad_to(right, self.start);
        path.close();
        path
    }

    /// Dark-to-light gradient centred 40% of the way toward the tail
    pub fn paint(&self) -> Paint {
        let mid = self.start * 0.6 + self.end * 0.4;
        let length = self.start.distance(self.end);
        Paint::Radial(
            RadialGradient::concentric(mid, 0.0, length * 0.8)
                .stop(0.0, DROPLET_INNER)
                .stop(0.75, DROPLET_MID)
                .stop(1.0, DROPLET_OUTER),
        )
    }
}

/// Where a bump sits between the lowest ordinary bump (0) and the tallest
/// spike (1)
fn protrusion(radius: f32, base_radius: f32) -> f32 {
    ((radius / base_radius - BUMP_RADIUS_MIN) / (SPIKE_RADIUS_MAX - BUMP_RADIUS_MIN)).clamp(0.0, 1.0)
}

/// Roll droplets for every bump: spikes always throw one, ordinary bumps
/// throw zero or one.
pub fn droplets<R: Rng + ?Sized>(shape: &SplatShape, center: Vec2, rng: &mut R) -> Vec<Droplet> {
    let base = shape.base_radius();
    let mut out = Vec::new();

    for bump in shape.bumps() {
        let count = if shape.is_spike(bump) {
            1
        } else {
            usize::from(rng.random_bool(0.5))
        };

        for _ in 0..count {
            let tip = polar_to_cartesian(center, bump.angle, bump.radius);
            let heading = bump.angle + rng.random_range(-DROPLET_JITTER..DROPLET_JITTER);
            let dir = Vec2::new(heading.cos(), heading.sin());

            // Launch from where the jittered heading leaves the offset ring;
            // further out for taller bumps.
            let reach = (bump.radius / (base * 2.0)).clamp(0.0, 1.0);
            let ring = bump.radius + lerp(DROPLET_OFFSET_MIN, DROPLET_OFFSET_MAX, reach);
            let start = circle_line_intersections(center, ring, tip, tip + dir)
                .map(|[p1, p2]| {
                    pick_point_in_angle_range(
                        center,
                        p1,
                        p2,
                        bump.angle - FRAC_PI_2,
                        bump.angle + FRAC_PI_2,
                    )
                })
                .unwrap_or_else(|| polar_to_cartesian(center, heading, ring));

            let travel = (start - tip).try_normalize().unwrap_or(dir);
            let length = lerp(DROPLET_LENGTH_MIN, DROPLET_LENGTH_MAX, protrusion(bump.radius, base));
            let half_width = rng.random_range(DROPLET_HALF_WIDTH_MIN..DROPLET_HALF_WIDTH_MAX);

            out.push(Droplet {
                start,
                end: start + travel * length,
                half_width,
            });
        }
    }

    out
}

/// A speckle dot
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Speckle {
    pub center: Vec2,
    pub radius: f32,
}

impl Speckle {
    pub fn paint(&self) -> Paint {
        if self.radius < SPECKLE_GRADIENT_RADIUS {
            Paint::Solid(SPECKLE_FLAT)
        } else {
            Paint::Radial(
                RadialGradient::concentric(self.center, 0.0, self.radius * 1.2)
                    .stop(0.0, SPECKLE_CORE)
                    .stop(0.65, SPECKLE_MID)
                    .stop(1.0, SPECKLE_FLAT),
            )
        }
    }
}

/// Whether `p` falls in the square covering the base circle
pub fn in_stain_square(p: Vec2, center: Vec2, base_radius: f32) -> bool {
    (p.x - center.x).abs() < base_radius && (p.y - center.y).abs() < base_radius
}

/// Scatter up to `count` dots uniformly over the surface, skipping the square
/// around the stain.
pub fn speckles<R: Rng + ?Sized>(
    surface: Surface,
    base_radius: f32,
    count: usize,
    rng: &mut R,
) -> Vec<Speckle> {
    let center = surface.center();
    let size = surface.size();

    (0..count)
        .filter_map(|_| {
            let p = Vec2::new(rng.random_range(0.0..size.x), rng.random_range(0.0..size.y));
            if in_stain_square(p, center, base_radius) {
                return None;
            }
            Some(Speckle {
                center: p,
                radius: speckle_radius(rng),
            })
        })
        .collect()
}

/// Speckle radius in `[SPECKLE_RADIUS_MIN, SPECKLE_RADIUS_MAX)`
fn speckle_radius<R: Rng + ?Sized>(rng: &mut R) -> f32 {
    let band = SPECKLE_RADIUS_MIN..SPECKLE_RADIUS_MAX;
    for _ in 0..SPECKLE_MAX_DRAWS {
        let r = log_normal_sample(rng, SPECKLE_LOG_MU, SPECKLE_LOG_SIGMA);
        if band.contains(&r) {
            return r;
        }
    }
    rng.random_range(band)
}

/// Draw droplets, then speckles
pub fn draw(canvas: &mut dyn Canvas, droplets: &[Droplet], speckles: &[Speckle]) {
    for drop in droplets {
        canvas.fill_path(&drop.path(), &drop.paint());
    }
    for dot in speckles {
        canvas.fill_circle(dot.center, dot.radius, &dot.paint());
    }
}
