//! Logging init: file under the user state dir. The TUI owns the terminal,
//! so nothing may write to stdout/stderr while it runs.

use std::fs;
use std::sync::Arc;

use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

/// Initialize structured logging to `{state_dir}/estateforge/assistant.log`.
/// Returns Err if the log directory cannot be created or opened; the caller
/// may continue without logging.
pub fn init() -> Result<()> {
    let state_dir = dirs::state_dir()
        .or_else(dirs::cache_dir)
        .ok_or_else(|| anyhow!("Could not determine state directory"))?;

    let log_dir = state_dir.join("estateforge");
    fs::create_dir_all(&log_dir)?;

    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_dir.join("assistant.log"))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Arc::new(file))
        .with_ansi(false)
        .init();

    Ok(())
}
