// src/exec/command.rs

use std::path::Path;
use std::process::{Command, Stdio};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use tracing::{debug, info};

use crate::config::RuleConfig;
use crate::registry::Handler;
use crate::tracker::Trigger;
use crate::types::FileState;

pub const PATH_ENV: &str = "GHOSTWRITER_PATH";
pub const STATE_ENV: &str = "GHOSTWRITER_STATE";

/// A rule declared in configuration.
#[derive(Debug, Clone)]
pub struct CommandRule {
    pattern: String,
    cmd: Option<String>,
    trigger: Option<String>,
}

impl CommandRule {
    pub fn new(pattern: impl Into<String>, cmd: Option<String>, trigger: Option<String>) -> Self {
        Self {
            pattern: pattern.into(),
            cmd,
            trigger,
        }
    }

    pub fn from_config(rule: &RuleConfig) -> Self {
        Self::new(rule.pattern.clone(), rule.cmd.clone(), rule.trigger.clone())
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Run the rule for one path: command first, then the trigger pattern.
    pub fn run(&self, t: &mut Trigger<'_>, path: &str, state: FileState) -> Result<()> {
        if let Some(cmd) = &self.cmd {
            run_command(cmd, t.root(), path, state)?;
        }
        if let Some(pattern) = &self.trigger {
            let marked = t
                .trigger(pattern, false)
                .with_context(|| format!("triggering {pattern:?} from {path:?}"))?;
            debug!(from = %path, pattern = %pattern, marked, "rule triggered paths");
        }
        Ok(())
    }

    pub fn into_handler(self) -> Handler {
        let rule = Arc::new(self);
        Arc::new(move |t: &mut Trigger<'_>, path: &str, state: FileState| rule.run(t, path, state))
    }
}

/// Run `cmd` through the platform shell in `root`, blocking until it exits.
///
/// stdout/stderr are inherited so converter output shows up as-is.
fn run_command(cmd: &str, root: &Path, path: &str, state: FileState) -> Result<()> {
    info!(path = %path, %state, cmd = %cmd, "running rule command");

    let mut command = if cfg!(windows) {
        let mut c = Command::new("cmd");
        c.arg("/C").arg(cmd);
        c
    } else {
        let mut c = Command::new("sh");
        c.arg("-c").arg(cmd);
        c
    };

    let status = command
        .current_dir(root)
        .env(PATH_ENV, path)
        .env(STATE_ENV, state.as_str())
        .stdin(Stdio::null())
        .status()
        .with_context(|| format!("spawning `{cmd}` for {path:?}"))?;

    if !status.success() {
        match status.code() {
            Some(code) => bail!("`{cmd}` exited with status {code}"),
            None => bail!("`{cmd}` was terminated by a signal"),
        }
    }
    Ok(())
}
