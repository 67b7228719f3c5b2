//! Collision response against segment obstacles
//!
//! A free body deflects off either the segment's perpendicular normal or,
//! near an endpoint, the segment direction used as a cap normal. The
//! choice is made by comparing each candidate's component along the
//! center-to-endpoint delta and is a pure function of the approach
//! geometry, so the same contact always picks the same normal.

use glam::Vec2;

use super::segment::Segment;
use crate::consts::PUSH_OUT_MARGIN;

/// How a free body deflects off a segment it overlaps
#[derive(Debug, Clone, Copy)]
pub struct Deflection {
    /// Unit surface normal to reflect off
    pub normal: Vec2,
    /// Endpoint whose cap was struck, when the cap normal applies
    pub cap: Option<Vec2>,
}

/// Pick the deflection normal for a body of radius `r` centered at `pos`
/// overlapping `seg`.
///
/// `n1` is the segment's perpendicular, `n2` its direction. The cap normal
/// `n2` wins when the center is within radius of an endpoint and `n2`'s
/// component along the center-to-endpoint delta dominates `n1`'s.
pub fn deflection_for(seg: &Segment, pos: Vec2, r: f32) -> Deflection {
    let n1 = Vec2::new(-seg.dir.y, seg.dir.x);
    let n2 = seg.dir;

    for endpoint in [seg.p0, seg.p1()] {
        let to_center = pos - endpoint;
        if to_center.length() <= r && n2.dot(to_center).abs() > n1.dot(to_center).abs() {
            return Deflection {
                normal: n2,
                cap: Some(endpoint),
            };
        }
    }

    Deflection {
        normal: n1,
        cap: None,
    }
}

/// Move a penetrating body back along its own (reversed) velocity until it
/// sits exactly `r + PUSH_OUT_MARGIN` from `endpoint`.
///
/// The back-off distance comes from the right triangle formed by the
/// endpoint distance and its projection onto the travel direction. A body
/// with zero velocity has no travel direction to back out along and is
/// left in place.
pub fn push_out_of_endpoint(pos: Vec2, vel: Vec2, endpoint: Vec2, r: f32) -> Vec2 {
    let dir = vel.normalize_or_zero();
    if dir == Vec2::ZERO {
        return pos;
    }

    let to_center = pos - endpoint;
    let along = to_center.dot(dir);
    let lateral_sq = (to_center.length_squared() - along * along).max(0.0);
    let clearance = r + PUSH_OUT_MARGIN;
    let back_sq = clearance * clearance - lateral_sq;
    if back_sq <= 0.0 {
        // Lateral offset already exceeds the clearance circle; the overlap
        // is resolved by reflection alone.
        return pos;
    }

    let depth = along + back_sq.sqrt();
    pos - dir * depth
}

/// Specular reflection off a unit normal: `v' = v + 2n(-v·n)`
#[inline]
pub fn reflect_velocity(velocity: Vec2, normal: Vec2) -> Vec2 {
    velocity + 2.0 * (-velocity).dot(normal) * normal
}
