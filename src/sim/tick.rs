//! Per-body simulation step
//!
//! One call advances a single body by `dt` against the active fixture
//! lists. The central design idea is the energy invariant: speed is
//! re-derived from the mechanical energy budget every step instead of
//! trusting the integrator, so conservative motion cannot drift
//! numerically. `dt` must already be clamped by the caller; no
//! sub-stepping or continuous collision detection is performed.

use glam::Vec2;

use super::collision::{deflection_for, push_out_of_endpoint, reflect_velocity};
use super::segment::Segment;
use super::state::{Body, HazardDot, ScoreDot};
use crate::consts::*;
use crate::{polar_to_cartesian, tangent_of};

/// Advance one body by one clamped timestep.
///
/// Step order: lethal checks, score pickups, first-hit segment deflection,
/// motion integration with the energy clamp, boost decay, trail shift.
/// Returns true when the body died this step (it is already respawned).
pub fn step_body(
    body: &mut Body,
    segments: &[Segment],
    hazards: &[HazardDot],
    score_dots: &mut [&mut ScoreDot],
    dt: f32,
) -> bool {
    // Lethal checks: fell out of bounds, or touched a hazard
    let fell = body.pos.y < KILL_Y;
    let struck = hazards
        .iter()
        .any(|h| (body.pos - h.pos).length() <= body.radius + h.radius);
    if fell || struck {
        body.die();
        return true;
    }

    // One-shot score pickups
    for dot in score_dots.iter_mut() {
        if !dot.hidden && (body.pos - dot.pos).length() <= body.radius + dot.radius {
            dot.hidden = true;
            body.score += dot.score as u64;
        }
    }

    // Segment deflection, first hit wins in list order
    for seg in segments {
        if !seg.hits_circle(body.pos, body.radius) {
            continue;
        }
        if body.tether.is_some() {
            // While tethered a hit simply reverses the swing; position is
            // left to the tether reconstruction below.
            body.vel = -body.vel;
        } else {
            let deflection = deflection_for(seg, body.pos, body.radius);
            if let Some(endpoint) = deflection.cap {
                body.pos = push_out_of_endpoint(body.pos, body.vel, endpoint, body.radius);
            }
            body.vel = reflect_velocity(body.vel, deflection.normal);
        }
        break;
    }

    // Motion integration
    if let Some(mut tether) = body.tether {
        // Gravity projected onto the radial direction toward the anchor,
        // minus global gravity
        let accel = (tether.anchor - body.pos).normalize_or_zero() * GRAVITY
            - Vec2::new(0.0, GRAVITY);

        let tangent = tangent_of(tether.theta);
        body.vel = tangent * signed_speed(tangent, body.vel);
        body.vel += accel * dt;

        tether.angular_rate = signed_speed(tangent, body.vel) / tether.len;
        tether.theta += tether.angular_rate * dt;

        // Energy clamp uses the pre-rebuild height
        body.enforce_energy_budget();

        // Position is reconstructed from the angle, never integrated, so
        // the tether length cannot drift
        body.pos = polar_to_cartesian(tether.len, tether.theta) + tether.anchor;
        body.tether = Some(tether);
    } else {
        body.vel += Vec2::new(0.0, -GRAVITY) * dt;
        body.pos += body.vel * dt;
        body.enforce_energy_budget();
    }

    body.decay_boost();
    body.record_trail();
    false
}

/// Speed along the tangent, keeping the tangential sign
#[inline]
fn signed_speed(tangent: Vec2, vel: Vec2) -> f32 {
    if tangent.dot(vel) < 0.0 {
        -vel.length()
    } else {
        vel.length()
    }
}
