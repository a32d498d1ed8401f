//! Smooth closed outline through a ring of bumps
//!
//! Each bump pair gets three control points: a "mountain" point per bump
//! (pushed outward by the bump's deviation, which sharpens peaks) and a shared
//! "valley" point between them. Quadratic curves alternate peak / valley.
//!
//! Two quadratics join smoothly when the joint lies on the segment between
//! their control points: the outgoing tangent of one (ctrl -> end) and the
//! incoming tangent of the next (start -> ctrl) are then collinear. Every
//! transition point below is placed on such a segment.

use glam::Vec2;

use super::shape::Bump;
use crate::canvas::Path;
use crate::consts::*;
use crate::geom::lerp;
use crate::{normalize_angle, polar_to_cartesian};

/// Control and transition points for one bump and the valley after it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BumpArc {
    /// Mountain control point of this bump
    pub peak: Vec2,
    /// Valley control point between this bump and the next
    pub valley: Vec2,
    /// Transition point on `peak -> valley`; the peak curve ends here
    pub exit: Vec2,
    /// Transition point on `next.peak -> valley`; the valley curve ends here
    pub entry: Vec2,
}

/// How far along `mountain -> valley` the transition sits.
/// Taller bumps transition later, giving fuller peaks.
#[inline]
fn transition_blend(deviation: f32, base_radius: f32) -> f32 {
    (0.35 + 0.5 * (deviation / (deviation + base_radius))).clamp(BLEND_MIN, BLEND_MAX)
}

/// Compute the arc geometry for every bump (wrapping at the end)
pub fn bump_arcs(center: Vec2, base_radius: f32, bumps: &[Bump]) -> Vec<BumpArc> {
    let n = bumps.len();
    let mut arcs = Vec::with_capacity(n);

    for i in 0..n {
        let b0 = bumps[i];
        let b1 = bumps[(i + 1) % n];

        let d0 = (b0.radius - base_radius).abs();
        let d1 = (b1.radius - base_radius).abs();
        let peak0 = polar_to_cartesian(center, b0.angle, b0.radius + d0);
        let peak1 = polar_to_cartesian(center, b1.angle, b1.radius + d1);

        // Valley leans toward the taller neighbour and digs deeper next to it.
        // With no deviation at all (start of growth) it sits midway.
        let total = d0 + d1;
        let t = if total > f32::EPSILON * base_radius {
            d1 / total
        } else {
            0.5
        };
        let span = normalize_angle(b1.angle - b0.angle);
        let valley_angle = normalize_angle(b0.angle + span * t);
        let valley_radius = lerp(
            base_radius * VALLEY_RADIUS_SHALLOW,
            base_radius * VALLEY_RADIUS_DEEP,
            t,
        );
        let valley = polar_to_cartesian(center, valley_angle, valley_radius);

        let exit = peak0.lerp(valley, transition_blend(d0, base_radius));
        let entry = peak1.lerp(valley, transition_blend(d1, base_radius));

        arcs.push(BumpArc {
            peak: peak0,
            valley,
            exit,
            entry,
        });
    }

    arcs
}

/// Build the closed outline path.
///
/// Starts at the first exit point, then per bump: valley curve to the entry
/// point, peak curve (through the next mountain point) to the next exit.
/// The final peak curve returns to the first exit point.
pub fn build_outline(center: Vec2, base_radius: f32, bumps: &[Bump]) -> Path {
    let arcs = bump_arcs(center, base_radius, bumps);
    let mut path = Path::with_capacity(arcs.len() * 2 + 2);

    let Some(first) = arcs.first() else {
        return path;
    };

    path.move_to(first.exit);
    for (i, arc) in arcs.iter().enumerate() {
        if i > 0 {
            path.quad_to(arc.peak, arc.exit);
        }
        path.quad_to(arc.valley, arc.entry);
    }
    path.quad_to(first.peak, first.exit);
    path.close();

    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::PathCommand;
    use crate::splat::shape::SplatShape;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    const CENTER: Vec2 = Vec2::new(300.0, 200.0);

    fn shape(seed: u64) -> SplatShape {
        SplatShape::generate(100.0, &mut Pcg32::seed_from_u64(seed))
    }

    /// (start, ctrl, end) for every quadratic in the path
    fn quads(path: &Path) -> Vec<(Vec2, Vec2, Vec2)> {
        let mut out = Vec::new();
        let mut cursor = Vec2::ZERO;
        for cmd in path.commands() {
            match *cmd {
                PathCommand::MoveTo(p) => cursor = p,
                PathCommand::QuadTo { ctrl, to } => {
                    out.push((cursor, ctrl, to));
                    cursor = to;
                }
                PathCommand::Close => {}
            }
        }
        out
    }

    #[test]
    fn test_path_structure() {
        let s = shape(3);
        let path = build_outline(CENTER, 100.0, s.bumps());
        let n = s.bumps().len();

        assert!(matches!(path.commands()[0], PathCommand::MoveTo(_)));
        assert_eq!(path.quad_count(), 2 * n);
        assert_eq!(path.commands().last(), Some(&PathCommand::Close));

        // Closes exactly on the starting point
        let q = quads(&path);
        let PathCommand::MoveTo(start) = path.commands()[0] else {
            unreachable!()
        };
        assert_eq!(q[q.len() - 1].2, start);
    }

    #[test]
    fn test_joints_are_tangent_continuous() {
        for seed in 0..20 {
            let s = shape(seed);
            let q = quads(&build_outline(CENTER, 100.0, s.bumps()));
            for i in 0..q.len() {
                let (_, c_in, joint) = q[i];
                let (start, c_out, _) = q[(i + 1) % q.len()];
                assert!(joint.distance(start) < 1e-3);

                let incoming = joint - c_in;
                let outgoing = c_out - joint;
                let cross = incoming.perp_dot(outgoing) / (incoming.length() * outgoing.length());
                assert!(cross.abs() < 1e-3, "seed {seed} joint {i}: cross {cross}");
                assert!(incoming.dot(outgoing) > 0.0, "seed {seed} joint {i} reverses");
            }
        }
    }

    #[test]
    fn test_transitions_within_blend_band() {
        let s = shape(5);
        for arc in bump_arcs(CENTER, 100.0, s.bumps()) {
            let full = arc.peak.distance(arc.valley);
            let part = arc.peak.distance(arc.exit);
            let blend = part / full;
            assert!(blend >= BLEND_MIN - 1e-4 && blend <= BLEND_MAX + 1e-4);
        }
    }

    #[test]
    fn test_valley_leans_toward_taller_bump() {
        let bumps = [
            Bump { angle: 0.0, radius: 115.0 },
            Bump { angle: 1.0, radius: 190.0 },
            Bump { angle: 3.0, radius: 120.0 },
        ];
        let arcs = bump_arcs(Vec2::ZERO, 100.0, &bumps);
        let (r, angle) = crate::cartesian_to_polar(Vec2::ZERO, arcs[0].valley);
        // d0 = 15, d1 = 90: weight 90/105 toward the spike
        assert!((angle - 90.0 / 105.0).abs() < 1e-3);
        assert!(r < 100.0 * 0.7);
    }

    #[test]
    fn test_base_circle_has_no_nan() {
        let s = shape(9);
        let path = build_outline(CENTER, 100.0, &s.interpolated(0.0));
        assert!(path.points().all(|p| p.is_finite()));
    }

    #[test]
    fn test_single_bump_ring() {
        let bumps = [Bump { angle: 1.0, radius: 130.0 }];
        let path = build_outline(CENTER, 100.0, &bumps);
        assert_eq!(path.quad_count(), 2);
        assert!(path.points().all(|p| p.is_finite()));
    }

    #[test]
    fn test_empty_ring_gives_empty_path() {
        assert!(build_outline(CENTER, 100.0, &[]).is_empty());
    }
}
