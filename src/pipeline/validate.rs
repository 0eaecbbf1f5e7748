// src/pipeline/validate.rs

use crate::error::Result;
use crate::models::{Board, Config};

/// Validate a loaded configuration and log what it would watch.
pub fn run_validate(config: &Config) -> Result<()> {
    log::info!("Validating configuration...");

    if let Err(e) = config.validate() {
        log::error!("Config validation failed: {}", e);
        return Err(e);
    }

    log::info!("Config OK");
    log::info!("  user agent: {}", config.crawler.user_agent);
    log::info!("  timeout: {}s", config.crawler.timeout_secs);
    log::info!("  max concurrent: {}", config.crawler.max_concurrent);
    log::info!(
        "  anchors: {}, scan depth: {}, interval: {}s",
        config.scan.anchor_width,
        config.scan.max_scan_count,
        config.scan.interval_secs
    );
    match &config.scan.state_dir {
        Some(dir) => log::info!("  anchors persisted under {}", dir.display()),
        None => log::info!("  anchors kept in memory only"),
    }

    for entry in &config.boards {
        let board = Board::from_config(entry, &config.listing);
        let subscribers: usize = board.rules.iter().map(|r| r.subscribers.len()).sum();
        log::info!(
            "  board {}: {} rules, {} subscriptions, {}",
            board.name,
            board.rules.len(),
            subscribers,
            board.url
        );
    }

    Ok(())
}
