//! Line-segment obstacle geometry
//!
//! A segment is stored as an origin point, a unit direction and a length;
//! the far endpoint is derived. The hit test is capsule-vs-circle: the
//! segment itself has zero thickness, padded by the body's radius, with
//! explicit endpoint caps.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// A line-segment obstacle that deflects bodies
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Segment {
    /// Origin endpoint
    pub p0: Vec2,
    /// Unit direction from p0 toward p1
    pub dir: Vec2,
    /// Length of the segment
    pub len: f32,
}

impl Segment {
    /// Build a segment from its origin, an angle and a length
    pub fn from_angle(p0: Vec2, theta: f32, len: f32) -> Self {
        Self {
            p0,
            dir: Vec2::new(theta.cos(), theta.sin()),
            len,
        }
    }

    /// Far endpoint
    #[inline]
    pub fn p1(&self) -> Vec2 {
        self.p0 + self.dir * self.len
    }

    /// Perpendicular distance from a point to the infinite line through
    /// the segment
    #[inline]
    pub fn line_distance(&self, p: Vec2) -> f32 {
        self.dir.perp_dot(p - self.p0).abs()
    }

    /// Capsule-vs-circle test against a body of radius `r` centered at `p`.
    ///
    /// Hits when the perpendicular distance is within `r` and the point's
    /// projection lies between the endpoints, or when either endpoint cap
    /// is within `r` of the center.
    pub fn hits_circle(&self, p: Vec2, r: f32) -> bool {
        let d = self.line_distance(p);
        if d > r {
            return false;
        }

        let to_p0 = p - self.p0;
        let to_p1 = p - self.p1();

        // Along-track distances from each endpoint to the foot of the
        // perpendicular; both within the length means the foot is inside
        // the span.
        let within_span = (to_p0.length_squared() - d * d).max(0.0).sqrt() <= self.len
            && (to_p1.length_squared() - d * d).max(0.0).sqrt() <= self.len;

        let cap0 = to_p0.length() <= r;
        let cap1 = to_p1.length() <= r;

        within_span || cap0 || cap1
    }
}
