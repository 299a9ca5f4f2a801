use std::fs::OpenOptions;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

/// Environment variable selecting the log file. Without it, logs go to
/// stderr, which the TUI owns; set it when debugging the demo.
const LOG_FILE_ENV: &str = "GRID_LOG_FILE";

/// Initialize tracing for the grid binaries.
///
/// The filter comes from RUST_LOG (default "info"). Per-module targets
/// ("viewport_manager", "navigation", "grouping", "grid_manager") can be
/// raised individually, e.g. RUST_LOG=navigation=debug.
pub fn init_tracing() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_ansi(false)
        .compact();

    match std::env::var(LOG_FILE_ENV) {
        Ok(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .with_context(|| format!("Failed to open log file {}", path))?;
            builder.with_writer(file).init();
        }
        Err(_) => builder.with_writer(std::io::stderr).init(),
    }

    tracing::info!(target: "system", "Tracing initialized");
    Ok(())
}
