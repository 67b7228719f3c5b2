//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and
//! deterministic:
//! - Caller-clamped timestep only
//! - Seeded RNG only (chunk layout is a function of session seed + index)
//! - No rendering or platform dependencies
//!
//! Stepping is single-threaded and synchronous: one `World::update(dt)`
//! call per frame, every state transition completes before it returns.

pub mod chunk;
pub mod collision;
pub mod segment;
pub mod state;
pub mod tick;
pub mod world;

pub use chunk::Chunk;
pub use collision::{Deflection, deflection_for, push_out_of_endpoint, reflect_velocity};
pub use segment::Segment;
pub use state::{Anchor, Body, HazardDot, ScoreDot, Tether};
pub use tick::step_body;
pub use world::{World, chunk_index};
