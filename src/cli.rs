// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

use crate::types::{DriverMode, TrackingPolicy};

/// Command-line arguments for `ghostwriter`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "ghostwriter",
    version,
    about = "Run pattern-matched commands for files that change under a directory tree.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    ///
    /// Default: `Ghostwriter.toml` in the current working directory.
    #[arg(long, value_name = "PATH", default_value = "Ghostwriter.toml")]
    pub config: String,

    /// Build everything matching `[watch].initial` once, then exit.
    #[arg(long)]
    pub once: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `GHOSTWRITER_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Parse + validate, print the rules, but don't run anything.
    #[arg(long)]
    pub dry_run: bool,

    /// Override `[watch].mode` (`polling` or `event`).
    #[arg(long, value_name = "MODE")]
    pub mode: Option<DriverMode>,

    /// Override `[watch].tracking` (`registry_gated` or `unconditional`).
    #[arg(long, value_name = "POLICY")]
    pub tracking: Option<TrackingPolicy>,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
