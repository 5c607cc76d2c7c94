//! File logging. The terminal belongs to the TUI, so log lines only ever go to
//! the log file inside the data directory.

use std::fs;

use anyhow::{Context, Result};
use chrono::Local;
use fern::Dispatch;
use log::info;

use crate::config::Config;

/// Install the global logger. Call once, before the TUI takes the terminal.
pub fn init(config: &Config) -> Result<()> {
    fs::create_dir_all(&config.data_dir).context("failed to create data directory")?;
    let log_path = config.log_path();
    let log_file = fern::log_file(&log_path)
        .with_context(|| format!("failed to open log file {}", log_path.display()))?;

    Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{}][{}][{}] {}",
                Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
                record.level(),
                record.target(),
                message
            ))
        })
        .level(config.log_level)
        .chain(log_file)
        .apply()
        .context("failed to install logger")?;

    info!("logging to {}", log_path.display());
    Ok(())
}
