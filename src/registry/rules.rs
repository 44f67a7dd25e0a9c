// src/registry/rules.rs

use std::fmt;
use std::sync::Arc;

use regex::Regex;

use crate::errors::{GhostwriterError, Result};
use crate::tracker::Trigger;
use crate::types::FileState;

/// User callback invoked with a relative path and its pending state.
///
/// The [`Trigger`] lets the handler mark other paths dirty; those are picked
/// up by the same dispatch pass.
pub type Handler =
    Arc<dyn Fn(&mut Trigger<'_>, &str, FileState) -> anyhow::Result<()> + Send + Sync>;

pub(crate) fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|e| GhostwriterError::invalid_pattern(pattern, e))
}

/// A compiled pattern paired with the handler it selects.
#[derive(Clone)]
pub struct MatchRule {
    pattern: Regex,
    handler: Handler,
}

impl fmt::Debug for MatchRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MatchRule")
            .field("pattern", &self.pattern.as_str())
            .finish_non_exhaustive()
    }
}

impl MatchRule {
    pub fn new(pattern: &str, handler: Handler) -> Result<Self> {
        Ok(Self {
            pattern: compile(pattern)?,
            handler,
        })
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    pub fn handler(&self) -> &Handler {
        &self.handler
    }

    pub fn matches(&self, path: &str) -> bool {
        self.pattern.is_match(path)
    }
}

#[derive(Debug, Clone)]
pub struct IgnoreRule {
    pattern: Regex,
}

impl IgnoreRule {
    pub fn new(pattern: &str) -> Result<Self> {
        Ok(Self {
            pattern: compile(pattern)?,
        })
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    pub fn matches(&self, path: &str) -> bool {
        self.pattern.is_match(path)
    }
}
