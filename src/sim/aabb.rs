//! Axis-aligned bounding boxes
//!
//! Every collider in the world is an AABB stored as centre + half extents.
//! Positions use screen convention: +x right, +y down.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::CONTACT_EPSILON;

/// An axis-aligned box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub center: Vec2,
    pub half: Vec2,
}

impl Aabb {
    pub fn new(center: Vec2, size: Vec2) -> Self {
        Self {
            center,
            half: size * 0.5,
        }
    }

    pub fn from_min_max(min: Vec2, max: Vec2) -> Self {
        Self {
            center: (min + max) * 0.5,
            half: (max - min) * 0.5,
        }
    }

    #[inline]
    pub fn min(&self) -> Vec2 {
        self.center - self.half
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.center + self.half
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        self.half * 2.0
    }

    /// Same box moved to a new centre
    #[inline]
    pub fn at(&self, center: Vec2) -> Self {
        Self {
            center,
            half: self.half,
        }
    }

    /// Per-axis overlap depth (negative on an axis means separated)
    #[inline]
    pub fn overlap(&self, other: &Aabb) -> Vec2 {
        (self.half + other.half) - (self.center - other.center).abs()
    }

    /// True if the boxes interpenetrate by more than the contact epsilon.
    /// Boxes that merely touch along a face do not overlap.
    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        let o = self.overlap(other);
        o.x > CONTACT_EPSILON && o.y > CONTACT_EPSILON
    }

    /// Minimum translation vector that moves `self` out of `other`
    ///
    /// Picks the axis of least penetration; the sign points from `other`
    /// toward `self`. Returns `None` when the boxes do not overlap.
    pub fn minimum_translation(&self, other: &Aabb) -> Option<Vec2> {
        if !self.overlaps(other) {
            return None;
        }
        let o = self.overlap(other);
        let d = self.center - other.center;
        if o.x <= o.y {
            let sign = if d.x >= 0.0 { 1.0 } else { -1.0 };
            Some(Vec2::new(o.x * sign, 0.0))
        } else {
            let sign = if d.y >= 0.0 { 1.0 } else { -1.0 };
            Some(Vec2::new(0.0, o.y * sign))
        }
    }

    /// Clamp `self` so it lies fully inside `bounds`
    ///
    /// Returns the clamped centre. A box larger than the bounds on some axis
    /// is centred on that axis.
    pub fn clamp_center_within(&self, bounds: &Aabb) -> Vec2 {
        let lo = bounds.min() + self.half;
        let hi = bounds.max() - self.half;
        let x = if lo.x <= hi.x {
            self.center.x.clamp(lo.x, hi.x)
        } else {
            bounds.center.x
        };
        let y = if lo.y <= hi.y {
            self.center.y.clamp(lo.y, hi.y)
        } else {
            bounds.center.y
        };
        Vec2::new(x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_touching_faces_do_not_overlap() {
        let a = Aabb::new(Vec2::new(24.0, 24.0), Vec2::splat(48.0));
        let b = Aabb::new(Vec2::new(72.0, 24.0), Vec2::splat(48.0));
        assert!(!a.overlaps(&b));
        assert!(a.minimum_translation(&b).is_none());
    }

    #[test]
    fn test_mtv_picks_shallow_axis() {
        let wall = Aabb::new(Vec2::new(24.0, 24.0), Vec2::splat(48.0));
        // Poke 3 units into the wall's right face
        let actor = Aabb::new(Vec2::new(65.0, 30.0), Vec2::new(40.0, 24.0));
        let mtv = actor.minimum_translation(&wall).unwrap();
        assert!((mtv.x - 3.0).abs() < 1e-4);
        assert_eq!(mtv.y, 0.0);

        let moved = actor.at(actor.center + mtv);
        assert!(!moved.overlaps(&wall));
    }

    #[test]
    fn test_mtv_vertical() {
        let wall = Aabb::new(Vec2::new(24.0, 24.0), Vec2::splat(48.0));
        let actor = Aabb::new(Vec2::new(24.0, 58.0), Vec2::new(40.0, 24.0));
        let mtv = actor.minimum_translation(&wall).unwrap();
        assert_eq!(mtv.x, 0.0);
        assert!((mtv.y - 2.0).abs() < 1e-4);
    }

    #[test]
    fn test_clamp_within_bounds() {
        let bounds = Aabb::from_min_max(Vec2::ZERO, Vec2::new(528.0, 432.0));
        let actor = Aabb::new(Vec2::new(-10.0, 500.0), Vec2::new(40.0, 24.0));
        let c = actor.clamp_center_within(&bounds);
        assert_eq!(c, Vec2::new(20.0, 420.0));
    }
}
