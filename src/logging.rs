// src/logging.rs

//! Logging setup for `ghostwriter` using `tracing` + `tracing-subscriber`.
//!
//! Filter resolution:
//! 1. `--log-level` CLI flag, applied to this crate only
//! 2. `GHOSTWRITER_LOG`, a full `EnvFilter` directive string
//!    (e.g. `"debug"` or `"ghostwriter::watch=trace,info"`)
//! 3. `info`
//!
//! Logs go to stderr; stdout carries the observer's transition lines and
//! whatever rule commands print.

use anyhow::{anyhow, Result};
use tracing_subscriber::{fmt, EnvFilter};

use crate::cli::LogLevel;

pub const LOG_ENV: &str = "GHOSTWRITER_LOG";

/// Install the global subscriber. Fails if one is already installed.
pub fn init_logging(cli_level: Option<LogLevel>) -> Result<()> {
    let filter = build_filter(cli_level, std::env::var(LOG_ENV).ok().as_deref());

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow!("installing log subscriber: {e}"))
}

/// Resolve the filter from the CLI level and the raw env value.
///
/// An env value that does not parse falls back to `info` rather than
/// silencing everything.
pub fn build_filter(cli_level: Option<LogLevel>, env_value: Option<&str>) -> EnvFilter {
    if let Some(level) = cli_level {
        return EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), directive(level)));
    }
    env_value
        .and_then(|s| EnvFilter::try_new(s.trim()).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}

fn directive(level: LogLevel) -> &'static str {
    match level {
        LogLevel::Error => "error",
        LogLevel::Warn => "warn",
        LogLevel::Info => "info",
        LogLevel::Debug => "debug",
        LogLevel::Trace => "trace",
    }
}
