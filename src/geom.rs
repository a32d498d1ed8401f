//! Geometry and sampling helpers shared by the effects

use glam::Vec2;
use rand::Rng;
use std::f32::consts::TAU;

use crate::vector::Vec2Ext;
use crate::{cartesian_to_polar, normalize_angle};

/// Linear interpolation
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Cubic ease-out: `1 - (1 - t)^3` (fast start, slow finish)
#[inline]
pub fn ease_out_cubic(t: f32) -> f32 {
    1.0 - (1.0 - t).powi(3)
}

/// Intersect the infinite line through `seg_start`/`seg_end` with a circle.
///
/// Projects the center onto the line, then steps half a chord either way.
/// Returns `None` when the line misses the circle (or the two line points
/// coincide). A tangent line yields the same point twice. Points are ordered
/// along `seg_start -> seg_end`.
pub fn circle_line_intersections(
    center: Vec2,
    radius: f32,
    seg_start: Vec2,
    seg_end: Vec2,
) -> Option<[Vec2; 2]> {
    let d = seg_end - seg_start;
    if d.length2() == 0.0 {
        return None;
    }

    let foot = seg_start + d.proj(center - seg_start);
    let half_chord2 = radius * radius - (center - foot).length2();
    if half_chord2 < 0.0 {
        return None;
    }

    let offset = d.normalize() * half_chord2.sqrt();
    Some([foot - offset, foot + offset])
}

/// Whether `angle` lies in the half-open interval `[from, to)`, walking
/// counter-clockwise from `from`. Handles wraparound.
pub fn angle_in_range(angle: f32, from: f32, to: f32) -> bool {
    if to - from >= TAU {
        return true;
    }
    let span = normalize_angle(to - from);
    normalize_angle(angle - from) < span
}

/// Pick whichever of `p1`/`p2` is seen from `center` inside `[from, to)`.
///
/// When both or neither qualify, the point closer to `center` wins.
pub fn pick_point_in_angle_range(center: Vec2, p1: Vec2, p2: Vec2, from: f32, to: f32) -> Vec2 {
    let (r1, a1) = cartesian_to_polar(center, p1);
    let (r2, a2) = cartesian_to_polar(center, p2);

    match (angle_in_range(a1, from, to), angle_in_range(a2, from, to)) {
        (true, false) => p1,
        (false, true) => p2,
        _ => {
            if r1 <= r2 {
                p1
            } else {
                p2
            }
        }
    }
}

/// Log-normal variate via Box-Muller: `exp(mu + sigma·z)`, `z ~ N(0, 1)`
pub fn log_normal_sample<R: Rng + ?Sized>(rng: &mut R, mu: f32, sigma: f32) -> f32 {
    // Shift into (0, 1] so ln() stays finite
    let u1 = 1.0 - rng.random::<f32>();
    let u2 = rng.random::<f32>();
    let z = (-2.0 * u1.ln()).sqrt() * (TAU * u2).cos();
    (mu + sigma * z).exp()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;
    use std::f32::consts::PI;

    #[test]
    fn test_ease_out_cubic_endpoints() {
        assert_eq!(ease_out_cubic(0.0), 0.0);
        assert_eq!(ease_out_cubic(1.0), 1.0);
        // Fast start: more than half done at the midpoint
        assert!(ease_out_cubic(0.5) > 0.8);
    }

    #[test]
    fn test_circle_line_through_center() {
        let center = Vec2::new(10.0, 10.0);
        let [p1, p2] =
            circle_line_intersections(center, 5.0, Vec2::new(0.0, 10.0), Vec2::new(1.0, 10.0))
                .expect("line through center must hit");
        assert!((p1.distance(p2) - 10.0).abs() < 1e-4);
        assert!(((p1 + p2) * 0.5 - center).length() < 1e-4);
    }

    #[test]
    fn test_circle_line_miss() {
        let hit = circle_line_intersections(
            Vec2::ZERO,
            1.0,
            Vec2::new(-5.0, 3.0),
            Vec2::new(5.0, 3.0),
        );
        assert!(hit.is_none());
    }

    #[test]
    fn test_circle_line_tangent() {
        let [p1, p2] =
            circle_line_intersections(Vec2::ZERO, 2.0, Vec2::new(-5.0, 2.0), Vec2::new(5.0, 2.0))
                .expect("tangent line touches");
        assert!(p1.distance(p2) < 1e-3);
        assert!((p1 - Vec2::new(0.0, 2.0)).length() < 1e-3);
    }

    #[test]
    fn test_circle_line_degenerate_segment() {
        let p = Vec2::new(1.0, 1.0);
        assert!(circle_line_intersections(Vec2::ZERO, 3.0, p, p).is_none());
    }

    #[test]
    fn test_angle_in_range_wraparound() {
        assert!(angle_in_range(0.1, TAU - 0.2, 0.2));
        assert!(angle_in_range(TAU - 0.1, TAU - 0.2, 0.2));
        assert!(!angle_in_range(PI, TAU - 0.2, 0.2));
        // Half-open: `to` itself is excluded
        assert!(angle_in_range(1.0, 1.0, 2.0));
        assert!(!angle_in_range(2.0, 1.0, 2.0));
    }

    #[test]
    fn test_pick_point_prefers_in_range() {
        let c = Vec2::ZERO;
        let right = Vec2::new(10.0, 0.0);
        let left = Vec2::new(-1.0, 0.0);
        assert_eq!(pick_point_in_angle_range(c, right, left, -0.5, 0.5), right);
        assert_eq!(pick_point_in_angle_range(c, left, right, -0.5, 0.5), right);
    }

    #[test]
    fn test_pick_point_falls_back_to_nearest() {
        let c = Vec2::ZERO;
        let near = Vec2::new(0.0, 1.0);
        let far = Vec2::new(0.0, -9.0);
        // Neither is in range
        assert_eq!(pick_point_in_angle_range(c, far, near, 0.0, 0.1), near);
        // Both are in range
        assert_eq!(pick_point_in_angle_range(c, far, near, 0.0, TAU), near);
    }

    #[test]
    fn test_log_normal_is_positive_and_centered() {
        let mut rng = Pcg32::seed_from_u64(7);
        let samples: Vec<f32> = (0..2000).map(|_| log_normal_sample(&mut rng, 0.0, 0.25)).collect();
        assert!(samples.iter().all(|s| *s > 0.0 && s.is_finite()));
        let mut sorted = samples.clone();
        sorted.sort_by(|a, b| a.total_cmp(b));
        let median = sorted[sorted.len() / 2];
        // Median of a log-normal is exp(mu)
        assert!((median - 1.0).abs() < 0.1, "median {median}");
    }

    proptest! {
        #[test]
        fn circle_line_yields_points_on_circle(
            cx in -100.0f32..100.0, cy in -100.0f32..100.0, r in 1.0f32..80.0,
            ax in -200.0f32..200.0, ay in -200.0f32..200.0,
            bx in -200.0f32..200.0, by in -200.0f32..200.0,
        ) {
            let center = Vec2::new(cx, cy);
            let a = Vec2::new(ax, ay);
            let b = Vec2::new(bx, by);
            prop_assume!(a.distance(b) > 1.0);
            let d = (b - a).normalize();
            let line_dist = d.perp_dot(center - a).abs();
            if line_dist > r * 1.05 {
                prop_assert!(circle_line_intersections(center, r, a, b).is_none());
            } else if line_dist < r * 0.5 {
                let points = circle_line_intersections(center, r, a, b);
                prop_assert!(points.is_some());
                for p in points.unwrap_or_default() {
                    prop_assert!((p.distance(center) - r).abs() < r * 1e-2 + 0.05);
                }
            }
        }

        #[test]
        fn lines_through_center_hit_diametrically(
            r in 1.0f32..100.0, angle in 0.0f32..TAU,
        ) {
            let center = Vec2::new(3.0, -4.0);
            let dir = Vec2::new(angle.cos(), angle.sin());
            let hit = circle_line_intersections(center, r, center - dir * 7.0, center + dir * 3.0);
            let [p1, p2] = hit.expect("must intersect");
            prop_assert!((p1.distance(p2) - 2.0 * r).abs() < r * 1e-3 + 1e-3);
        }
    }
}
