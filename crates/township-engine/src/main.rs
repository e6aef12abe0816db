//! Engine binary for the Township simulation.
//!
//! Wires configuration, logging, and the tick scheduler together and runs
//! until interrupted.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `township-config.yaml` (defaults if absent)
//! 2. Initialize structured logging (tracing)
//! 3. Load or synthesize the world snapshot
//! 4. Start the scheduler; the first tick fires immediately
//! 5. Wait for Ctrl-C, then let the in-flight tick finish and exit

mod error;

use std::path::Path;

use township_core::config::{LoggingConfig, SimulationConfig};
use township_core::engine::Engine;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;

/// Configuration file read from the working directory.
const CONFIG_PATH: &str = "township-config.yaml";

/// Application entry point.
///
/// # Errors
///
/// Returns an error if configuration, the initial load, or signal handling
/// fails.
#[tokio::main]
async fn main() -> Result<(), EngineError> {
    let config = SimulationConfig::load(Path::new(CONFIG_PATH))?;
    init_logging(&config.logging);

    info!(
        world_name = config.world.name,
        seed = config.world.seed,
        tick_interval_ms = config.world.tick_interval_ms,
        snapshot_path = %config.world.snapshot_path.display(),
        "township-engine starting"
    );

    let engine = Engine::from_config(config);
    let snapshot = engine.snapshot().await?;
    info!(
        epoch = snapshot.epoch,
        residents = snapshot.residents.len(),
        "World loaded"
    );

    engine.start().await;
    tokio::signal::ctrl_c().await?;
    info!("Shutdown requested");
    engine.stop().await;

    info!("township-engine stopped");
    Ok(())
}

/// Install the global subscriber. `RUST_LOG` wins over the configured level.
fn init_logging(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    if logging.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .init();
    }
}
