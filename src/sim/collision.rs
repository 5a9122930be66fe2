//! Rotated bounding boxes and the overlap tests the game needs
//!
//! Every entity exposes a box; the player balloon is a circle. Boxes rotate
//! around their center.

use glam::Vec2;

/// Rectangle positioned by its unrotated top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BoundingBox {
    pub pos: Vec2,
    pub size: Vec2,
    /// Degrees, counter-clockwise around the center
    pub rotation: f32,
}

impl BoundingBox {
    pub fn new(pos: Vec2, size: Vec2, rotation: f32) -> Self {
        Self {
            pos,
            size,
            rotation,
        }
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    #[inline]
    fn half_extents(&self) -> Vec2 {
        self.size * 0.5
    }

    /// World → box-local (box center at origin, axis-aligned)
    fn to_local(&self, p: Vec2) -> Vec2 {
        let rel = p - self.center();
        if self.rotation == 0.0 {
            return rel;
        }
        Vec2::from_angle(-self.rotation.to_radians()).rotate(rel)
    }

    /// Corners in world space, counter-clockwise from top-left
    pub fn corners(&self) -> [Vec2; 4] {
        let h = self.half_extents();
        let rot = Vec2::from_angle(self.rotation.to_radians());
        let c = self.center();
        [
            Vec2::new(-h.x, -h.y),
            Vec2::new(h.x, -h.y),
            Vec2::new(h.x, h.y),
            Vec2::new(-h.x, h.y),
        ]
        .map(|p| c + rot.rotate(p))
    }

    pub fn contains_point(&self, p: Vec2) -> bool {
        let local = self.to_local(p);
        let h = self.half_extents();
        local.x.abs() <= h.x && local.y.abs() <= h.y
    }

    /// Circle/box overlap: closest point on the box to the circle center
    pub fn intersects_circle(&self, center: Vec2, radius: f32) -> bool {
        let local = self.to_local(center);
        let h = self.half_extents();
        let closest = local.clamp(-h, h);
        local.distance_squared(closest) <= radius * radius
    }

    /// Box/box overlap by separating axes
    pub fn intersects(&self, other: &BoundingBox) -> bool {
        let a = self.corners();
        let b = other.corners();
        let axes = [a[1] - a[0], a[3] - a[0], b[1] - b[0], b[3] - b[0]];

        axes.iter().all(|axis| {
            if axis.length_squared() == 0.0 {
                return true;
            }
            let project = |pts: &[Vec2; 4]| {
                pts.iter().fold((f32::MAX, f32::MIN), |(lo, hi), p| {
                    let d = p.dot(*axis);
                    (lo.min(d), hi.max(d))
                })
            };
            let (a_lo, a_hi) = project(&a);
            let (b_lo, b_hi) = project(&b);
            a_lo <= b_hi && b_lo <= a_hi
        })
    }
}
