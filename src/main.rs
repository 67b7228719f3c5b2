//! Headless demo driver
//!
//! Runs a scripted session against the simulation core and prints the
//! final score. Useful for profiling and for eyeballing world generation
//! without a renderer attached.

use swingfall::World;

const FRAME_DT: f32 = 1.0 / 60.0;

fn main() {
    env_logger::init();

    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(0xC0FFEE);

    let mut world = World::new(seed);
    world.start(None);

    // Scripted input: swing on the nearest anchor for two seconds, let go
    // for one, dash on every release
    let mut frame: u64 = 0;
    while world.started {
        match frame % 180 {
            0 => {
                world.grab();
            }
            120 => {
                world.detach();
                world.dash();
            }
            _ => {}
        }
        world.update(FRAME_DT);
        frame += 1;
    }

    log::info!("simulated {frame} frames");
    println!(
        "final score: {} (seed {seed}, x = {:.1})",
        world.score(),
        world.ball.pos.x
    );
}
