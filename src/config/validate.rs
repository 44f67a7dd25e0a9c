// src/config/validate.rs

use regex::Regex;

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{GhostwriterError, Result};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = crate::errors::GhostwriterError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(ConfigFile::new_unchecked(raw.watch, raw.rule))
    }
}

/// Checks:
/// - `poll_interval_ms` is non-zero
/// - every ignore, rule and trigger pattern compiles
/// - every rule does something (`cmd` and/or `trigger`)
fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    validate_watch_section(cfg)?;
    validate_rules(cfg)?;
    Ok(())
}

fn validate_watch_section(cfg: &RawConfigFile) -> Result<()> {
    let watch = &cfg.watch;

    if watch.poll_interval_ms == 0 {
        return Err(GhostwriterError::ConfigError(
            "[watch].poll_interval_ms must be >= 1 (got 0)".to_string(),
        ));
    }
    if !watch.initial.is_empty() {
        check_pattern("[watch].initial", &watch.initial)?;
    }
    for pattern in &watch.ignore {
        check_pattern("[watch].ignore", pattern)?;
    }
    Ok(())
}

fn validate_rules(cfg: &RawConfigFile) -> Result<()> {
    for (index, rule) in cfg.rule.iter().enumerate() {
        let location = format!("rule #{} ({:?})", index + 1, rule.pattern);
        check_pattern(&location, &rule.pattern)?;

        if rule.cmd.is_none() && rule.trigger.is_none() {
            return Err(GhostwriterError::ConfigError(format!(
                "{location} needs `cmd`, `trigger`, or both"
            )));
        }
        if let Some(trigger) = &rule.trigger {
            check_pattern(&format!("{location} trigger"), trigger)?;
        }
    }
    Ok(())
}

fn check_pattern(location: &str, pattern: &str) -> Result<()> {
    Regex::new(pattern).map(|_| ()).map_err(|e| {
        GhostwriterError::ConfigError(format!("{location}: invalid pattern {pattern:?}: {e}"))
    })
}
