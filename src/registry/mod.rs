// src/registry/mod.rs

//! Pattern registry: ordered handler rules and ignore rules.
//!
//! Patterns are regular expressions matched anywhere in the relative path
//! (`Regex::is_match`), so `\.md$` matches `content/a.md`. Anchor with `^` and
//! `$` when an exact path is meant. This is not silently tightened.
//!
//! Registration must finish before a session starts dispatching. The session
//! API takes `&mut self` for registration, which enforces this.

pub mod rules;

pub use rules::{Handler, IgnoreRule, MatchRule};

use std::sync::Arc;

use tracing::debug;

use crate::errors::Result;
use crate::tracker::Trigger;
use crate::types::FileState;

#[derive(Debug, Default)]
pub struct PatternRegistry {
    rules: Vec<MatchRule>,
    ignores: Vec<IgnoreRule>,
}

impl PatternRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compile `pattern` and append a handler rule for it.
    pub fn register_handler<F>(&mut self, pattern: &str, handler: F) -> Result<()>
    where
        F: Fn(&mut Trigger<'_>, &str, FileState) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.register_shared(pattern, Arc::new(handler))
    }

    /// Same as [`register_handler`](Self::register_handler) for an
    /// already shared handler.
    pub fn register_shared(&mut self, pattern: &str, handler: Handler) -> Result<()> {
        let rule = MatchRule::new(pattern, handler)?;
        debug!(pattern = %pattern, index = self.rules.len(), "registered handler");
        self.rules.push(rule);
        Ok(())
    }

    pub fn register_ignore(&mut self, pattern: &str) -> Result<()> {
        let rule = IgnoreRule::new(pattern)?;
        debug!(pattern = %pattern, "registered ignore pattern");
        self.ignores.push(rule);
        Ok(())
    }

    pub fn matches_any_rule(&self, path: &str) -> bool {
        self.rules.iter().any(|r| r.matches(path))
    }

    pub fn is_ignored(&self, path: &str) -> bool {
        self.ignores.iter().any(|r| r.matches(path))
    }

    /// Handlers whose pattern matches `path`, in registration order.
    pub fn handlers_for(&self, path: &str) -> Vec<Handler> {
        self.rules
            .iter()
            .filter(|r| r.matches(path))
            .map(|r| Arc::clone(r.handler()))
            .collect()
    }

    pub fn rules(&self) -> &[MatchRule] {
        &self.rules
    }

    pub fn ignores(&self) -> &[IgnoreRule] {
        &self.ignores
    }
}
