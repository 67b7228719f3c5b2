//! Simulation entities: fixtures and the swinging body
//!
//! Fixtures (anchors, hazard dots, score dots) are plain data owned by the
//! chunk that generated them; nothing here depends on a rendering type.
//! `Body` owns all dynamic state: position, velocity, the tether, the
//! mechanical energy baseline and the transient boost pool.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::{polar_to_cartesian, tangent_of};

/// A fixed point a tether can attach to
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Anchor {
    pub pos: Vec2,
}

/// A static circular zone that kills a body on contact
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct HazardDot {
    pub pos: Vec2,
    pub radius: f32,
}

/// A static circular zone that awards score once, then disappears
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ScoreDot {
    pub pos: Vec2,
    pub radius: f32,
    pub score: u32,
    /// Set exactly once on pickup; collected dots never reappear
    pub hidden: bool,
}

impl ScoreDot {
    /// Radius is derived from the score value
    pub fn new(pos: Vec2, score: u32) -> Self {
        Self {
            pos,
            radius: score as f32 / 200.0,
            score,
            hidden: false,
        }
    }
}

/// Pendulum state while a body hangs from an anchor.
///
/// Position is never integrated directly while attached; it is rebuilt
/// from `(theta, len)` around the anchor every step, so the tether length
/// cannot drift.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Tether {
    /// Anchor point the body swings around
    pub anchor: Vec2,
    /// Current angle of the body around the anchor
    pub theta: f32,
    /// Tether length, fixed at attach time
    pub len: f32,
    /// Signed angular rate (positive = counter-clockwise)
    pub angular_rate: f32,
}

/// The stateful dynamic entity: the ball
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Body {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub mass: f32,
    /// Present while swinging from an anchor
    pub tether: Option<Tether>,
    /// Baseline mechanical energy, re-captured at spawn and attach time
    pub energy: f32,
    /// Transient boost pool added on top of the baseline, drained per tick
    pub boost: f32,
    pub score: u64,
    /// Display identifier for remote bodies
    pub id: Option<String>,
    /// Afterimage history, newest first (cosmetic)
    #[serde(skip)]
    pub trail: Vec<Vec2>,
}

impl Body {
    pub fn new(pos: Vec2, vel: Vec2) -> Self {
        let mut body = Self {
            pos,
            vel,
            radius: BALL_RADIUS,
            mass: BALL_MASS,
            tether: None,
            energy: 0.0,
            boost: 0.0,
            score: 0,
            id: None,
            trail: Vec::with_capacity(TRAIL_LENGTH),
        };
        body.rebase_energy();
        body
    }

    /// Spawn at the session start point
    pub fn spawn(id: Option<String>) -> Self {
        let mut body = Self::new(Vec2::new(SPAWN_X, SPAWN_Y), Vec2::ZERO);
        body.id = id;
        body
    }

    /// Re-capture the baseline mechanical energy from the current state
    pub fn rebase_energy(&mut self) {
        self.energy =
            self.mass * GRAVITY * self.pos.y + 0.5 * self.mass * self.vel.length_squared();
    }

    /// Kinetic energy the budget allows at the current height, never
    /// negative
    #[inline]
    pub fn kinetic_budget(&self) -> f32 {
        (self.boost + self.energy - self.mass * GRAVITY * self.pos.y).max(0.0)
    }

    /// Rescale velocity so speed matches the energy budget exactly.
    ///
    /// Direction is preserved; a zero velocity has no direction and stays
    /// zero rather than propagating NaN.
    pub fn enforce_energy_budget(&mut self) {
        let speed = (2.0 * self.kinetic_budget() / self.mass).sqrt();
        self.vel = self.vel.normalize_or_zero() * speed;
    }

    /// Attach the body to an anchor.
    ///
    /// Snaps the position onto the tether circle (resolving any pre-attach
    /// positional error) and re-projects the velocity onto the tangential
    /// direction, keeping speed and tangential sign. The radial component
    /// is discarded: all post-attach motion is circular.
    pub fn attach(&mut self, anchor: &Anchor) {
        let delta = self.pos - anchor.pos;
        let theta = delta.y.atan2(delta.x);
        let len = delta.length().max(MIN_TETHER_LEN);

        self.pos = polar_to_cartesian(len, theta) + anchor.pos;

        let tangent = tangent_of(theta);
        let signed_speed = if tangent.dot(self.vel) < 0.0 {
            -self.vel.length()
        } else {
            self.vel.length()
        };
        self.vel = tangent * signed_speed;

        self.tether = Some(Tether {
            anchor: anchor.pos,
            theta,
            len,
            angular_rate: signed_speed / len,
        });
        self.rebase_energy();
    }

    /// Release the tether
    pub fn detach(&mut self) {
        self.tether = None;
    }

    /// Fill the boost pool; no-op while a previous boost is still draining
    pub fn dash(&mut self) {
        if self.boost == 0.0 {
            self.boost = BOOST_ENERGY;
        }
    }

    /// Drain the boost pool by one tick's worth.
    ///
    /// The drain only commits while the baseline alone keeps the kinetic
    /// budget non-negative, so boost never decays through energy the body
    /// has not banked yet.
    pub fn decay_boost(&mut self) {
        if self.boost > 0.0 {
            let next = (self.boost - BOOST_DECAY).max(0.0);
            if self.energy - self.mass * GRAVITY * self.pos.y >= 0.0 {
                self.boost = next;
            }
        }
    }

    /// Death: snap back to spawn, shed the tether and all transient state
    pub fn die(&mut self) {
        self.pos = Vec2::new(SPAWN_X, SPAWN_Y);
        self.vel = Vec2::ZERO;
        self.tether = None;
        self.boost = 0.0;
        self.rebase_energy();
    }

    /// Record current position to the afterimage ring (newest first)
    pub fn record_trail(&mut self) {
        self.trail.insert(0, self.pos);
        if self.trail.len() > TRAIL_LENGTH {
            self.trail.pop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attach_math() {
        // Anchor at origin, body at (3,0) moving straight down
        let mut body = Body::new(Vec2::new(3.0, 0.0), Vec2::new(0.0, -2.0));
        body.attach(&Anchor { pos: Vec2::ZERO });

        let tether = body.tether.expect("attached");
        assert!(tether.theta.abs() < 1e-6);
        assert!((tether.len - 3.0).abs() < 1e-6);
        // Tangent at theta=0 is (0,1); v points down, so the projection
        // keeps the downward sign at the original speed
        assert!((body.vel - Vec2::new(0.0, -2.0)).length() < 1e-5);
        assert!((tether.angular_rate - (-2.0 / 3.0)).abs() < 1e-5);
    }

    #[test]
    fn test_attach_snaps_onto_circle() {
        let anchor = Anchor {
            pos: Vec2::new(1.0, 2.0),
        };
        let mut body = Body::new(Vec2::new(4.3, 2.1), Vec2::new(1.0, 1.0));
        body.attach(&anchor);
        let tether = body.tether.unwrap();
        assert!(((body.pos - anchor.pos).length() - tether.len).abs() < 1e-5);
    }

    #[test]
    fn test_attach_zero_length_clamped() {
        let anchor = Anchor { pos: Vec2::ZERO };
        let mut body = Body::new(Vec2::ZERO, Vec2::ZERO);
        body.attach(&anchor);
        assert!((body.tether.unwrap().len - MIN_TETHER_LEN).abs() < 1e-7);
    }

    #[test]
    fn test_dash_noop_while_boosting() {
        let mut body = Body::spawn(None);
        body.dash();
        assert_eq!(body.boost, BOOST_ENERGY);
        body.decay_boost();
        let drained = body.boost;
        body.dash();
        assert_eq!(body.boost, drained);
    }

    #[test]
    fn test_energy_budget_zero_velocity_stays_zero() {
        let mut body = Body::spawn(None);
        // At spawn with zero velocity the kinetic budget is exactly zero
        body.enforce_energy_budget();
        assert_eq!(body.vel, Vec2::ZERO);
        assert!(!body.vel.x.is_nan());
    }

    #[test]
    fn test_score_dot_radius_from_score() {
        let dot = ScoreDot::new(Vec2::ZERO, 180);
        assert!((dot.radius - 0.9).abs() < 1e-6);
        assert!(!dot.hidden);
    }

    #[test]
    fn test_die_resets_transient_state() {
        let mut body = Body::new(Vec2::new(40.0, -5.0), Vec2::new(3.0, 1.0));
        body.dash();
        body.attach(&Anchor {
            pos: Vec2::new(41.0, -3.0),
        });
        body.die();
        assert_eq!(body.pos, Vec2::new(SPAWN_X, SPAWN_Y));
        assert_eq!(body.vel, Vec2::ZERO);
        assert!(body.tether.is_none());
        assert_eq!(body.boost, 0.0);
        // Baseline holds exactly the potential energy at spawn
        assert!((body.energy - BALL_MASS * GRAVITY * SPAWN_Y).abs() < 1e-4);
    }

    #[test]
    fn test_trail_is_bounded() {
        let mut body = Body::spawn(None);
        for i in 0..(TRAIL_LENGTH * 2) {
            body.pos = Vec2::new(i as f32, 0.0);
            body.record_trail();
        }
        assert_eq!(body.trail.len(), TRAIL_LENGTH);
        // Newest first
        assert_eq!(body.trail[0].x, (TRAIL_LENGTH * 2 - 1) as f32);
    }
}
