use anyhow::{Context, Result};
use log::info;
use std::time::Duration;

use rigid2d::{Mass, PhysicsWorld, RigidBody, SimulationClock, Vector2D};

/// Headless demo parameters
#[derive(Debug, Clone)]
struct DemoConfig {
    /// Simulated region (width, height); bodies leaving it are removed
    region: (f64, f64),
    /// Size of the immovable blocks near each corner
    block_size: f64,
    /// Size of launched bodies
    body_size: f64,
    /// Launch speed toward the current target
    launch_speed: f64,
    /// Frames between launches
    launch_interval: u64,
    /// Total frames to simulate
    frames: u64,
    /// Host frame time fed to the clock
    frame_time: Duration,
}

const DEMO: DemoConfig = DemoConfig {
    region: (1280.0, 768.0),
    block_size: 100.0,
    body_size: 50.0,
    launch_speed: 400.0,
    launch_interval: 20,
    frames: 1200,
    frame_time: Duration::from_micros(16_667),
};

fn main() -> Result<()> {
    // Initialize logger
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    info!("Starting rigid2d demo...");

    let (width, height) = DEMO.region;
    let block = DEMO.block_size;
    let mut world = PhysicsWorld::new();
    for (x, y) in [
        (block, block),
        (width - block, block),
        (width - block, height - block),
        (block, height - block),
    ] {
        let body = RigidBody::builder(block, block)
            .position(x, y)
            .mass(Mass::Infinite)
            .build()
            .context("building corner block")?;
        world.add(body);
    }

    let center = Vector2D::new(width / 2.0, height / 2.0);
    let mut clock = SimulationClock::default();
    let mut launched = 0u64;

    for frame in 0..DEMO.frames {
        if frame % DEMO.launch_interval == 0 {
            // Sweep the launch direction around the center, like a mouse circling it
            let heading = Vector2D::new(DEMO.launch_speed, 0.0).rotate(launched as f64 * 23.0);
            let body = RigidBody::builder(DEMO.body_size, DEMO.body_size)
                .position(center.x(), center.y())
                .angle((launched * 37 % 91) as f64)
                .velocity(heading)
                .build()
                .context("building launched body")?;
            world.add(body);
            launched += 1;
        }

        for _ in 0..clock.advance(DEMO.frame_time) {
            world.step(clock.dt()).context("stepping world")?;
        }

        let removed = world.cull(|body| {
            let p = body.position();
            p.x() < 0.0 || p.x() > width || p.y() < 0.0 || p.y() > height
        });
        if !removed.is_empty() {
            info!("Frame {}: {} bodies left the region", frame, removed.len());
        }

        if frame % 60 == 0 {
            info!(
                "Frame {}: {} bodies, {} contacts, {:.2}s simulated",
                frame,
                world.len(),
                world.contacts().len(),
                clock.simulated_secs()
            );
        }
    }

    info!(
        "Done: {} launched, {} remaining after {} steps",
        launched,
        world.len(),
        clock.step_count()
    );

    Ok(())
}
