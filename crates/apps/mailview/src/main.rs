//! Mailview - a terminal host for the mail search controller
//!
//! Stands in for the browser page: commands typed on stdin become searches,
//! clicks and back/forward navigation, and rendered regions are printed.

use anyhow::{Context, Result};
use log::{error, info};
use mailview::ViewerConfig;

mod shell;

fn main() -> Result<()> {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    // Bootstrap config directory and a default file to edit
    match config::write_default::<ViewerConfig>() {
        Ok(Some(path)) => info!("Wrote default config to {}", path.display()),
        Ok(None) => {}
        Err(e) => error!("Failed to write default config: {}", e),
    }

    let (viewer_config, source) = ViewerConfig::load().context("Failed to load viewer config")?;
    match source {
        config::Source::File(path) => info!("Loaded config from {}", path.display()),
        config::Source::Defaults => info!("No config file, using defaults"),
    }
    let location = shell::initial_location(std::env::args().nth(1));

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start event loop")?;
    let local = tokio::task::LocalSet::new();

    info!("Mailview started against {}", describe_backend(&viewer_config));
    local.block_on(&runtime, shell::run(viewer_config, location))
}

fn describe_backend(config: &ViewerConfig) -> String {
    match &config.fixtures {
        Some(path) => format!("fixtures {}", path.display()),
        None => config.api_base_url.clone(),
    }
}
