use reefhop_engine::{LoopConfig, Scene};
use tracing::info;
use tracing_subscriber::EnvFilter;

use super::gameplay::ReefScene;
use super::level::{Level, LevelError, REEF_LEVEL_JSON};

pub(crate) struct AppWiring {
    pub(crate) config: LoopConfig,
    pub(crate) scene: Box<dyn Scene>,
}

pub(crate) fn build_app() -> Result<AppWiring, LevelError> {
    init_tracing();
    info!(version = env!("CARGO_PKG_VERSION"), "=== Reefhop Startup ===");

    let level = Level::parse(REEF_LEVEL_JSON)?;
    let (rows, cols) = level.grid.dimensions();
    let config = LoopConfig {
        window_width: cols as u32 * level.grid.tile_size() as u32,
        window_height: rows as u32 * level.grid.tile_size() as u32,
        ..LoopConfig::default()
    };

    Ok(AppWiring {
        config,
        scene: Box::new(ReefScene::new(level)),
    })
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_names(true)
        .compact()
        .init();
}
