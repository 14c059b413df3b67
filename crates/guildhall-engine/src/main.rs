//! Guildhall engine binary.
//!
//! Wires the world generator, the persistence backend, and the world
//! governance service together, then keeps occupancy flushed until the
//! process is asked to stop.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `guildhall-config.yaml`
//! 2. Initialize structured logging (tracing)
//! 3. Generate the reference world map
//! 4. Export the world artifact, if configured
//! 5. Open the persistence backend and restore occupancy
//! 6. Flush occupancy periodically until Ctrl-C
//! 7. Flush once more and exit

mod error;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use guildhall_db::ConfiguredStore;
use guildhall_governance::{GuildhallConfig, LoggingConfig, WorldGovernanceService};
use guildhall_world::WorldMap;
use tokio::sync::watch;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;

/// Configuration file, relative to the working directory.
const CONFIG_PATH: &str = "guildhall-config.yaml";

/// Application entry point for the Guildhall engine.
///
/// # Errors
///
/// Returns an error if configuration, export, or the persistence backend
/// fails during startup.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load configuration.
    let config_path = Path::new(CONFIG_PATH);
    let config_found = config_path.exists();
    let config = load_config(config_path)?;

    // 2. Initialize structured logging.
    init_tracing(&config.logging);
    info!("guildhall-engine starting");
    if config_found {
        info!(path = CONFIG_PATH, "Configuration loaded");
    } else {
        info!("Config file not found, using defaults");
    }
    info!(
        min_spacing = config.governance.min_spacing,
        density_cap = %config.governance.density_cap,
        backend = ?config.persistence.backend,
        flush_interval_secs = config.flush_interval_secs,
        "Allocation rules and persistence settings"
    );

    // 3. Generate the world.
    let world = Arc::new(WorldMap::generate());

    // 4. Export the artifact for the renderer.
    if let Some(path) = &config.world.export_path {
        export_world(&world, path)?;
        info!(path = %path.display(), "World artifact exported");
    }

    // 5. Restore occupancy.
    let persistence = &config.persistence;
    let store = ConfiguredStore::open(
        persistence.backend,
        &persistence.data_dir,
        &persistence.dragonfly_url,
    )
    .await
    .map_err(EngineError::from)?;
    let service = Arc::new(
        WorldGovernanceService::load(
            Arc::clone(&world),
            config.governance.clone(),
            store,
            persistence.key.clone(),
        )
        .await,
    );
    for stats in service.district_stats().await {
        info!(
            district = %stats.category,
            tiles = stats.tile_count,
            buildings = stats.building_count,
            density = %stats.density,
            "District ready"
        );
    }

    // 6. Flush periodically until shutdown.
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let period = Duration::from_secs(config.flush_interval_secs);
    let flusher = {
        let service = Arc::clone(&service);
        tokio::spawn(async move { service.flush_periodically(period, shutdown_rx).await })
    };
    info!("Governance service running, press Ctrl-C to stop");

    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for Ctrl-C, shutting down");
    }

    // 7. Final flush.
    info!("Shutdown requested");
    if shutdown_tx.send(true).is_err() {
        warn!("flush task already stopped");
    }
    flusher.await.map_err(|e| EngineError::FlushTask {
        message: e.to_string(),
    })?;

    info!("guildhall-engine shutdown complete");
    Ok(())
}

/// Install the global subscriber. `RUST_LOG` takes precedence over the
/// configured level.
fn init_tracing(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);
    if logging.json {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// Load configuration from `path`, or defaults if the file is absent.
fn load_config(path: &Path) -> Result<GuildhallConfig, EngineError> {
    if path.exists() {
        Ok(GuildhallConfig::from_file(path)?)
    } else {
        Ok(GuildhallConfig::default())
    }
}

/// Write `world` as a JSON artifact to `path`, creating parent directories.
fn export_world(world: &WorldMap, path: &Path) -> Result<(), EngineError> {
    let export_err = |source| EngineError::Export {
        path: path.display().to_string(),
        source,
    };
    let json = world.to_artifact().to_json()?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(export_err)?;
    }
    std::fs::write(path, json).map_err(export_err)?;
    Ok(())
}
