//! Octal testbed
//!
//! Runs the particle layer headless for a bounded number of frames.
//! Pass a path to an `engine.toml` to override the user config.

use std::path::PathBuf;

use anyhow::{Context, Result};
use octal_core::{Application, EngineConfig};
use tracing::info;

mod testbed;

use testbed::ParticleLayer;

/// Frames to run when the config does not set `app.max_frames`
const DEFAULT_FRAMES: u64 = 300;

/// Particles spawned per second
const SPAWN_RATE: f64 = 120.0;

fn load_config() -> Result<EngineConfig> {
    match std::env::args().nth(1).map(PathBuf::from) {
        Some(path) => EngineConfig::load(&path)
            .with_context(|| format!("Failed to load config from {}", path.display())),
        None => Ok(EngineConfig::load_or_default()),
    }
}

fn main() -> Result<()> {
    let mut config = load_config()?;
    octal_core::logging::init(&config.log).context("Failed to initialize logging")?;

    info!("Starting Octal testbed...");
    if config.app.max_frames.is_none() {
        config.app.max_frames = Some(DEFAULT_FRAMES);
    }

    let mut app = Application::new(&config);
    app.push_layer(ParticleLayer::new(config.ecs.max_entities, SPAWN_RATE));
    app.run();

    info!("Goodbye");
    Ok(())
}
