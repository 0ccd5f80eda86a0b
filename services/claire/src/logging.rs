//! Tracing subscriber setup: stderr plus an append-only log file.

use anyhow::{Context, Result};
use claire_core::config::LoggingSettings;
use std::{fs::OpenOptions, sync::Mutex};
use tracing_subscriber::{EnvFilter, fmt, fmt::time::ChronoLocal, prelude::*};

/// Builds the level filter, preferring `RUST_LOG` over the configured level.
fn env_filter(level: &str) -> Result<EnvFilter> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(level.to_lowercase())
            .with_context(|| format!("'{level}' is not a valid log level")),
    }
}

/// Installs the global subscriber. Call once, before the assistant starts.
pub fn init(settings: &LoggingSettings) -> Result<()> {
    if let Some(parent) = settings.file.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create log directory {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&settings.file)
        .with_context(|| format!("Failed to open log file {}", settings.file.display()))?;

    tracing_subscriber::registry()
        .with(env_filter(&settings.level)?)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_timer(ChronoLocal::rfc_3339()),
        )
        .with(
            fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .with_timer(ChronoLocal::rfc_3339()),
        )
        .try_init()
        .context("Failed to install tracing subscriber")?;
    Ok(())
}
