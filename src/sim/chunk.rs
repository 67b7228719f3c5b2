//! Procedurally generated world chunks
//!
//! A chunk is a one-chunk-wide slice of world keyed by an integer index.
//! Layout is drawn from a per-chunk `Pcg32` seeded from the session seed
//! and the index, so the same session always produces the same world and
//! a revisited chunk regenerates identically even if it were dropped from
//! the cache.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::segment::Segment;
use super::state::{Anchor, HazardDot, ScoreDot};
use crate::consts::CHUNK_WIDTH;

/// A cached, generated slice of the world
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    /// Index in chunk-width units
    pub n: i32,
    /// Whether the chunk's fixtures are in the active window
    pub shown: bool,
    pub anchors: Vec<Anchor>,
    pub segments: Vec<Segment>,
    pub hazards: Vec<HazardDot>,
    pub score_dots: Vec<ScoreDot>,
}

/// Per-chunk RNG seed: golden-ratio style hash of the index mixed with the
/// session seed
fn chunk_seed(n: i32, session_seed: u64) -> u64 {
    (n as i64 as u64)
        .wrapping_mul(2654435761)
        .wrapping_add(session_seed)
}

impl Chunk {
    /// Generate the chunk at index `n` for a session
    pub fn generate(n: i32, session_seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(chunk_seed(n, session_seed));
        let offset = Vec2::new(n as f32 * CHUNK_WIDTH, 0.0);

        // Scattered anchors anywhere in the chunk's width
        let scattered_n = rng.random_range(4..=6);
        let mut anchors = Vec::new();
        for _ in 0..scattered_n {
            anchors.push(Anchor {
                pos: Vec2::new(
                    (rng.random::<f32>() - 0.5) * CHUNK_WIDTH,
                    rng.random::<f32>() * 25.0,
                ) + offset,
            });
        }

        // A roughly even row of anchors forming the main traversal path
        let row_n = rng.random_range(4..=6);
        for i in 0..row_n {
            let jitter = 0.02 * rng.random::<f32>();
            anchors.push(Anchor {
                pos: Vec2::new(
                    (i as f32 / (row_n + 1) as f32 - 0.5 + jitter) * CHUNK_WIDTH,
                    rng.random::<f32>() * 20.0 + 5.0,
                ) + offset,
            });
        }

        let hazards_n = rng.random_range(3..=5);
        let mut hazards = Vec::new();
        for _ in 0..hazards_n {
            hazards.push(HazardDot {
                pos: scatter_point(&mut rng) + offset,
                radius: rng.random::<f32>() * 0.2 + 0.4,
            });
        }

        let score_n = rng.random_range(5..=7);
        let mut score_dots = Vec::new();
        for _ in 0..score_n {
            let pos = scatter_point(&mut rng) + offset;
            let score = (rng.random::<f32>() * 150.0 + 100.0).floor() as u32;
            score_dots.push(ScoreDot::new(pos, score));
        }

        let segments_n = rng.random_range(4..=6);
        let mut segments = Vec::new();
        for _ in 0..segments_n {
            let p0 = scatter_point(&mut rng) + offset;
            let theta = rng.random::<f32>() * std::f32::consts::TAU;
            let len = rng.random::<f32>() * 8.0 + 4.0;
            segments.push(Segment::from_angle(p0, theta, len));
        }

        log::debug!(
            "generated chunk {n}: {} anchors, {} segments, {} hazards, {} score dots",
            anchors.len(),
            segments.len(),
            hazards.len(),
            score_dots.len()
        );

        Self {
            n,
            shown: false,
            anchors,
            segments,
            hazards,
            score_dots,
        }
    }

    /// Mark the chunk visible; idempotent
    pub fn show(&mut self) {
        self.shown = true;
    }

    /// Retire the chunk from the active window without discarding it;
    /// idempotent
    pub fn hide(&mut self) {
        self.shown = false;
    }
}

/// Placement used by dots and segments: left or right of the chunk center
/// at a randomized distance, random height
fn scatter_point(rng: &mut Pcg32) -> Vec2 {
    let side = if rng.random::<f32>() < 0.5 { -1.0 } else { 1.0 };
    Vec2::new(
        side * (rng.random::<f32>() + 0.5) * CHUNK_WIDTH / 3.0,
        rng.random::<f32>() * 25.0,
    )
}
