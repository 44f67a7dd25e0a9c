// src/lib.rs

//! Pattern-matched handlers for files that change under a directory tree.
//!
//! Register handlers against regular expressions, declare what is dirty,
//! and let a [`Session`] dispatch: once for a full build, or continuously
//! while watching the tree.
//!
//! ```no_run
//! use ghostwriter::{FileState, Session, SessionOptions};
//!
//! # async fn demo() -> ghostwriter::errors::Result<()> {
//! let mut session = Session::new(SessionOptions::with_root("."));
//! session.register_ignore(r"^build/")?;
//! session.register_handler(r"^content/.*\.md$", |_t, path, state| {
//!     println!("render {path} ({state})");
//!     Ok(())
//! })?;
//! session.register_handler(r"^design/.*\.html$", |t, _path, _state| {
//!     t.trigger(r"^content/.*\.md$", false)?;
//!     Ok(())
//! })?;
//!
//! session.set_states_matching(".*", FileState::Changed)?;
//! session.dispatch()?;
//! session.watch().await
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod logging;
pub mod registry;
pub mod tracker;
pub mod types;
pub mod watch;

pub use engine::{Session, SessionOptions};
pub use types::{DriverMode, FileState, TrackingPolicy};

use std::path::PathBuf;

use anyhow::Result;
use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::{config_dir, load_and_validate, ConfigFile};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading
/// - session construction (ignores + command rules)
/// - the initial full-tree build
/// - the watch loop, stopped by Ctrl-C
pub async fn run(args: CliArgs) -> Result<()> {
    let config_path = PathBuf::from(&args.config);
    let cfg = load_and_validate(&config_path)?;

    if args.dry_run {
        print_dry_run(&cfg);
        return Ok(());
    }

    let mut options = SessionOptions::from_config(&cfg, &config_dir(&config_path));
    if let Some(mode) = args.mode {
        options.mode = mode;
    }
    if let Some(tracking) = args.tracking {
        options.tracking = tracking;
    }
    let mut session = Session::from_config_with(options, &cfg)?;

    let initial = &cfg.watch_section().initial;
    if !initial.is_empty() {
        let marked = session.set_states_matching(initial, FileState::Changed)?;
        info!(pattern = %initial, marked, "initial build");
        session.dispatch()?;
    }

    if args.once {
        debug!("--once: skipping watch loop");
        return Ok(());
    }

    session
        .watch_until(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                eprintln!("failed to listen for Ctrl+C: {e}");
                std::future::pending::<()>().await;
            }
        })
        .await?;
    Ok(())
}

/// Simple dry-run output: print watch settings and rules.
fn print_dry_run(cfg: &ConfigFile) {
    let watch = cfg.watch_section();
    println!("ghostwriter dry-run");
    println!("  watch.root = {}", watch.root);
    println!("  watch.mode = {:?}", watch.mode);
    println!("  watch.poll_interval_ms = {}", watch.poll_interval_ms);
    println!("  watch.tracking = {:?}", watch.tracking);
    println!("  watch.initial = {:?}", watch.initial);
    if !watch.ignore.is_empty() {
        println!("  watch.ignore = {:?}", watch.ignore);
    }
    println!();

    println!("rules ({}):", cfg.rules().len());
    for rule in cfg.rules() {
        println!("  - {}", rule.pattern);
        if let Some(ref cmd) = rule.cmd {
            println!("      cmd: {cmd}");
        }
        if let Some(ref trigger) = rule.trigger {
            println!("      trigger: {trigger}");
        }
    }

    debug!("dry-run complete (nothing executed)");
}
