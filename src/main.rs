//! DoodlePad - Freehand sketch canvas with remote doodle recognition
//!
//! Draw on a persistent raster canvas; a background scheduler sends the
//! drawing to a classification service every few seconds (or on demand)
//! and shows the ranked guesses.

mod app;
mod canvas;
mod config;
mod notices;
mod recognition;
mod shared;
mod ui;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use crossbeam_channel::unbounded;
use parking_lot::RwLock;
use tracing::{error, info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use crate::config::AppConfig;
use crate::recognition::RecognitionScheduler;
use crate::shared::SharedSketchState;

/// DoodlePad - sketch canvas with remote doodle recognition
#[derive(Parser, Debug)]
#[command(name = "doodlepad")]
#[command(about = "Freehand sketch canvas with periodic doodle recognition")]
struct Args {
    /// Base URL of the recognition service (overrides the config file)
    #[arg(long)]
    endpoint: Option<String>,

    /// Milliseconds between automatic recognition attempts
    #[arg(long)]
    interval_ms: Option<u64>,

    /// Path to a TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();

    info!("DoodlePad starting...");

    // Load configuration, then apply CLI overrides
    let mut config = load_or_create_config(args.config.as_deref());
    if let Some(endpoint) = args.endpoint {
        config.recognition.endpoint = Some(endpoint);
    }
    if let Some(interval_ms) = args.interval_ms {
        config.recognition.interval_ms = interval_ms;
    }

    match &config.recognition.endpoint {
        Some(endpoint) => info!("Recognition endpoint: {}", endpoint),
        None => warn!("No recognition endpoint configured; attempts will fail until one is set"),
    }

    // Create shared state
    let shared = Arc::new(RwLock::new(SharedSketchState::new(config.clone())));

    // Start the recognition scheduler
    let (events_tx, events_rx) = unbounded();
    let scheduler = RecognitionScheduler::start(&config.recognition, shared.clone(), events_tx)?;

    // Run the window (blocking)
    if let Err(e) = app::run_sketchpad(shared, scheduler, events_rx) {
        error!("Window error: {}", e);
    }

    info!("DoodlePad shutdown complete");

    Ok(())
}

/// Load configuration from an explicit path, the default location, or
/// fall back to defaults. A missing default file is written out so the
/// user has something to edit.
fn load_or_create_config(path: Option<&Path>) -> AppConfig {
    if let Some(path) = path {
        match config::load_config(path) {
            Ok(config) => {
                info!("Loaded configuration from {:?}", path);
                return config;
            }
            Err(e) => {
                warn!("Failed to load {:?}: {}; using defaults", path, e);
                return AppConfig::default();
            }
        }
    }

    if let Ok(config_dir) = config::get_config_dir() {
        let config_path = config_dir.join("config.toml");
        if config_path.exists() {
            if let Ok(config) = config::load_config(&config_path) {
                info!("Loaded configuration from {:?}", config_path);
                return config;
            }
        } else {
            let default = AppConfig::default();
            match config::save_config(&default, &config_path) {
                Ok(()) => info!("Wrote default configuration to {:?}", config_path),
                Err(e) => warn!("Could not write default configuration: {}", e),
            }
            return default;
        }
    }

    info!("Using default configuration");
    AppConfig::default()
}
