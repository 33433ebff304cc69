//! Startup helpers: logging and pipeline assembly.

use crate::config::Config;
use crate::engine::{HttpFetcher, Orchestrator, RetryCoordinator, SourceProcessor};
use anyhow::{Context, Result};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

/// Sets up the tracing subscriber. `RUST_LOG` wins over the configured level.
pub fn setup_logging(config: &Config) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let mut filter = config.logging.level.clone();

        // reqwest/hyper connection chatter is rarely useful
        if !filter.contains("hyper") {
            filter.push_str(",hyper=warn,hyper_util=warn");
        }
        if !filter.contains("reqwest") {
            filter.push_str(",reqwest=warn");
        }

        tracing_subscriber::EnvFilter::new(filter)
    });

    tracing_subscriber::fmt().with_env_filter(env_filter).init();
}

/// Builds the shared HTTP fetcher and wires processor, orchestrator and retry passes.
pub fn build_coordinator(
    config: &Config,
    name_map: HashMap<usize, String>,
) -> Result<RetryCoordinator> {
    let fetcher = HttpFetcher::new(&config.fetch).context("Failed to build HTTP client")?;

    info!(
        "Output directory: {} (connect {}s, read {}s, total {}s, {} attempts, {} retry passes)",
        config.output_dir.display(),
        config.fetch.connect_timeout_secs,
        config.fetch.read_timeout_secs,
        config.fetch.total_timeout_secs,
        config.fetch.attempts,
        config.fetch.retry_passes
    );

    let processor = SourceProcessor::new(Arc::new(fetcher), &config.output_dir, &config.fetch)
        .with_name_map(name_map);
    let orchestrator = Orchestrator::new(processor, config.fetch.concurrency);
    Ok(RetryCoordinator::new(orchestrator, config.fetch.retry_passes))
}
