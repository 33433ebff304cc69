use anyhow::{Context, Result};
use std::process::ExitCode;
use tracing::{error, info};

use blocklist_fetch::config::Config;
use blocklist_fetch::init::{build_coordinator, setup_logging};
use blocklist_fetch::source::{load_name_map, load_sources, validate_and_shuffle};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // 1. Load Config
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or("blocklist-fetch.toml".to_string());
    let config_exists = std::path::Path::new(&config_path).exists();
    let config = if config_exists {
        Config::load(&config_path).await?
    } else {
        Config::default()
    };
    let config = config.with_env_overrides();

    // 2. Setup Logging
    setup_logging(&config);
    info!("Starting blocklist-fetch...");
    if !config_exists {
        info!("Config file not found, using defaults.");
    }

    // 3. Load and validate sources
    let raw = load_sources(&config.sources)
        .await
        .context("Error loading config, download aborted")?;
    let name_map = match &config.name_map {
        Some(path) => load_name_map(path).await?,
        None => Default::default(),
    };

    let entries = match validate_and_shuffle(&raw, &mut rand::rng()) {
        Ok(entries) => entries,
        Err(e) => {
            error!("Validation Error: {}", e);
            return Ok(ExitCode::FAILURE);
        }
    };
    info!("Validated {} blocklist entries", entries.len());

    // 4. Download, with retry passes
    let coordinator = build_coordinator(&config, name_map)?;
    let report = coordinator.run(&entries).await;

    // 5. Report
    report.log_summary();
    if report.is_success() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}
