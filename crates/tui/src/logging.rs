//! Tracing subscribers for the interactive and one-shot surfaces.

use std::fs::OpenOptions;
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing_subscriber::filter::Directive;
use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;

fn env_filter(default: &str) -> Result<EnvFilter> {
    let directive: Directive = default.parse()?;
    Ok(EnvFilter::builder()
        .with_default_directive(directive)
        .from_env_lossy())
}

/// The TUI owns the terminal, so its events go to `courier.log` in the data
/// directory.
pub fn init_file(config: &AppConfig) -> Result<()> {
    let path = config.log_path();
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to open log file at {}", path.display()))?;

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter("info")?)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init();
    Ok(())
}

/// One-shot CLI commands log to stderr, quiet unless something goes wrong.
pub fn init_stderr() -> Result<()> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter("warn")?)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .try_init();
    Ok(())
}
