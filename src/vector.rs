//! 2D vector helpers
//!
//! `glam::Vec2` already covers add/sub/scale/dot/length as plain value
//! operations. This adds the two operations it lacks in the form the
//! geometry code needs.

use glam::Vec2;

/// Extra vector operations on top of glam
pub trait Vec2Ext {
    /// Squared length
    fn length2(self) -> f32;

    /// Projection of `v` onto `self` (`self * (self·v / |self|²)`).
    ///
    /// Returns zero when `self` has zero length.
    fn proj(self, v: Vec2) -> Vec2;
}

impl Vec2Ext for Vec2 {
    #[inline]
    fn length2(self) -> f32 {
        self.x * self.x + self.y * self.y
    }

    #[inline]
    fn proj(self, v: Vec2) -> Vec2 {
        let d = self.length2();
        if d == 0.0 {
            return Vec2::ZERO;
        }
        self * (self.dot(v) / d)
    }
}
