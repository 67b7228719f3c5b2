//! Swingfall - simulation core for a 2D swing-physics runner
//!
//! A ball swings on pendulum tethers anchored to fixed points, bounces off
//! line segments, collects score dots and dies on hazard contact. The world
//! is generated in horizontal chunks streamed in and out as the ball moves.
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, collisions, chunk streaming)
//!
//! Rendering, input plumbing and the network protocol live outside this
//! crate; they consume `sim::World` through its public surface.

pub mod sim;

pub use sim::{Body, Chunk, World};

use glam::Vec2;

/// Simulation constants (world units, not pixels)
pub mod consts {
    /// Horizontal width of one world chunk
    pub const CHUNK_WIDTH: f32 = 100.0;

    /// Gravitational acceleration (world units / s²)
    pub const GRAVITY: f32 = 9.8;

    /// Ball radius
    pub const BALL_RADIUS: f32 = 1.0 / 3.0;
    /// Ball mass
    pub const BALL_MASS: f32 = 1.0;

    /// Maximum timestep per update; larger frame deltas are clamped.
    /// Bounds per-step displacement so thin segments are not tunneled
    /// through (no sub-stepping is performed).
    pub const MAX_DT: f32 = 0.05;

    /// Falling below this height kills the body
    pub const KILL_Y: f32 = -10.0;

    /// Respawn position after death
    pub const SPAWN_X: f32 = 0.0;
    /// Respawn height
    pub const SPAWN_Y: f32 = 25.0;

    /// Energy granted to the boost pool by a dash
    pub const BOOST_ENERGY: f32 = 10.0;
    /// Boost pool drain per tick
    pub const BOOST_DECAY: f32 = 0.1;

    /// Minimum tether length accepted at attach time
    pub const MIN_TETHER_LEN: f32 = 0.01;

    /// Margin added to the body radius when pushing out of an endpoint
    pub const PUSH_OUT_MARGIN: f32 = 0.01;

    /// Afterimage trail slots per body
    pub const TRAIL_LENGTH: usize = 10;

    /// Match duration in seconds
    pub const MATCH_DURATION: f32 = 100.0;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

/// Unit tangent of the circle at angle theta, counter-clockwise
#[inline]
pub fn tangent_of(theta: f32) -> Vec2 {
    Vec2::new(-theta.sin(), theta.cos())
}
