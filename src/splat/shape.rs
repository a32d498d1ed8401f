//! Randomized splat outline: a ring of radial bumps with a few spikes
//!
//! Bumps are placed by walking the circle in irregular steps, so the result
//! never reads as a regular polygon.

use rand::Rng;
use std::f32::consts::TAU;

use crate::consts::*;
use crate::geom::lerp;

/// One radial control point of the outline
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bump {
    /// Angle from the stain center (radians)
    pub angle: f32,
    /// Distance from the stain center (px)
    pub radius: f32,
}

/// Final bump layout of one splat
#[derive(Debug, Clone)]
pub struct SplatShape {
    base_radius: f32,
    bumps: Vec<Bump>,
    spike_count: usize,
}

impl SplatShape {
    /// Generate a new random shape around `base_radius`
    pub fn generate<R: Rng + ?Sized>(base_radius: f32, rng: &mut R) -> Self {
        let mut bumps = Vec::with_capacity(16);
        let mut angle = rng.random_range(BUMP_STEP_MIN..BUMP_STEP_MAX);

        loop {
            let radius = base_radius * rng.random_range(BUMP_RADIUS_MIN..BUMP_RADIUS_MAX);
            log::debug!(
                "bump {}: angle {:.0}°, radius {:.0}px",
                bumps.len(),
                angle.to_degrees(),
                radius
            );
            bumps.push(Bump { angle, radius });

            angle += rng.random_range(BUMP_STEP_MIN..BUMP_STEP_MAX);
            if angle > TAU {
                break;
            }
        }

        let spike_count = rng.random_range(SPIKE_COUNT_MIN..SPIKE_COUNT_MAX).floor() as usize;
        let len = bumps.len();
        let stride = len as f32 / spike_count as f32;

        // Stride through the ring with ±1 jitter. Every access wraps, so two
        // strides may land on the same bump; that just yields fewer spikes.
        let mut index = rng.random_range(0.0..stride).floor() as usize;
        for i in 0..spike_count {
            if i > 0 {
                index += (stride + rng.random_range(-1.0..2.0)).floor().max(0.0) as usize;
            }
            bumps[index % len].radius =
                base_radius * rng.random_range(SPIKE_RADIUS_MIN..SPIKE_RADIUS_MAX);
        }

        log::debug!("generated splat: {} bumps, {} spikes requested", len, spike_count);

        Self {
            base_radius,
            bumps,
            spike_count,
        }
    }

    pub fn base_radius(&self) -> f32 {
        self.base_radius
    }

    pub fn bumps(&self) -> &[Bump] {
        &self.bumps
    }

    /// Number of spike assignments made (distinct spikes may be fewer)
    pub fn spike_count(&self) -> usize {
        self.spike_count
    }

    /// Whether a bump protrudes past the ordinary bump band
    pub fn is_spike(&self, bump: &Bump) -> bool {
        bump.radius > self.base_radius * BUMP_RADIUS_MAX
    }

    /// Bumps with radii eased from the base circle (`t = 0`) to the final
    /// shape (`t = 1`). Always a fresh copy; the shape itself never changes.
    pub fn interpolated(&self, t: f32) -> Vec<Bump> {
        self.bumps
            .iter()
            .map(|b| Bump {
                angle: b.angle,
                radius: lerp(self.base_radius, b.radius, t),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn shape(seed: u64) -> SplatShape {
        SplatShape::generate(100.0, &mut Pcg32::seed_from_u64(seed))
    }

    #[test]
    fn test_generate_covers_circle() {
        let s = shape(42);
        let bumps = s.bumps();
        assert!(bumps.len() >= 10 && bumps.len() <= 16, "len {}", bumps.len());
        assert!(bumps[0].angle >= BUMP_STEP_MIN);
        assert!(bumps.last().is_some_and(|b| b.angle <= TAU));
        // Last gap to a full turn is at most one step
        assert!(TAU - bumps[bumps.len() - 1].angle < BUMP_STEP_MAX);
    }

    #[test]
    fn test_spike_count_band() {
        for seed in 0..50 {
            let s = shape(seed);
            assert!((3..=4).contains(&s.spike_count()));
        }
    }

    #[test]
    fn test_interpolated_endpoints() {
        let s = shape(7);
        for b in s.interpolated(0.0) {
            assert!((b.radius - 100.0).abs() < 1e-4);
        }
        for (a, b) in s.interpolated(1.0).iter().zip(s.bumps()) {
            assert!((a.radius - b.radius).abs() < 1e-4);
            assert_eq!(a.angle, b.angle);
        }
    }

    #[test]
    fn test_interpolated_is_monotonic_in_t() {
        let s = shape(11);
        let mut prev = s.interpolated(0.0);
        for step in 1..=20 {
            let next = s.interpolated(crate::geom::ease_out_cubic(step as f32 / 20.0));
            for (p, n) in prev.iter().zip(&next) {
                assert!(n.radius >= p.radius - 1e-4);
            }
            prev = next;
        }
    }

    proptest! {
        #[test]
        fn angles_strictly_increase(seed in any::<u64>()) {
            let s = shape(seed);
            prop_assert!(!s.bumps().is_empty());
            for pair in s.bumps().windows(2) {
                prop_assert!(pair[1].angle > pair[0].angle);
            }
        }

        #[test]
        fn radii_stay_in_bands(seed in any::<u64>()) {
            let s = shape(seed);
            let base = s.base_radius();
            for b in s.bumps() {
                prop_assert!(b.radius >= base * BUMP_RADIUS_MIN - 1e-3);
                prop_assert!(b.radius <= base * SPIKE_RADIUS_MAX + 1e-3);
                let ordinary = b.radius <= base * BUMP_RADIUS_MAX + 1e-3;
                let spike = b.radius >= base * SPIKE_RADIUS_MIN - 1e-3;
                prop_assert!(ordinary || spike);
            }
        }

        #[test]
        fn spikes_never_exceed_assignments(seed in any::<u64>()) {
            let s = shape(seed);
            let base = s.base_radius();
            let spikes = s.bumps().iter().filter(|b| b.radius >= base * SPIKE_RADIUS_MIN).count();
            // Colliding strides may merge assignments
            prop_assert!(spikes >= 1);
            prop_assert!(spikes <= s.spike_count());
        }
    }
}
