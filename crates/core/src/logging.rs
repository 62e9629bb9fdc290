//! File logging
//!
//! Anything written to stderr lands in the Neovim UI, so `tracing` output
//! goes to `<state_dir>/logs/prompt-deck.log` through a non-blocking
//! appender. The first successful [`init`] wins; later calls are no-ops.

use std::path::Path;

use anyhow::Context;
use once_cell::sync::OnceCell;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::{config::PluginConfig, errors::Result};

/// Environment variable overriding the configured filter
pub const LOG_ENV: &str = "PROMPT_DECK_LOG";

pub const LOG_FILE: &str = "prompt-deck.log";

// Dropping the guard stops the writer thread, so it lives for the process.
static GUARD: OnceCell<WorkerGuard> = OnceCell::new();

pub fn init(config: &PluginConfig) -> Result<()> {
    if GUARD.get().is_some() {
        return Ok(());
    }

    let (writer, guard) = create_log_writer(&config.log_dir())?;
    let filter = build_filter(std::env::var(LOG_ENV).ok().as_deref(), &config.log_level);

    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(writer).with_ansi(false))
        .try_init()
        .is_ok();

    // A subscriber installed elsewhere (tests, another plugin) keeps priority.
    if installed {
        let _ = GUARD.set(guard);
        tracing::info!(dir = %config.log_dir().display(), "logging initialised");
    }
    Ok(())
}

/// Non-blocking writer for `<log_dir>/prompt-deck.log`
pub fn create_log_writer(
    log_dir: &Path,
) -> Result<(tracing_appender::non_blocking::NonBlocking, WorkerGuard)> {
    std::fs::create_dir_all(log_dir)
        .with_context(|| format!("creating log directory {}", log_dir.display()))?;

    let appender = tracing_appender::rolling::never(log_dir, LOG_FILE);
    Ok(tracing_appender::non_blocking(appender))
}

/// `env` wins over `configured`; anything unparsable falls back to `info`
fn build_filter(env: Option<&str>, configured: &str) -> EnvFilter {
    env.filter(|s| !s.trim().is_empty())
        .and_then(|s| EnvFilter::try_new(s).ok())
        .or_else(|| EnvFilter::try_new(configured).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}
