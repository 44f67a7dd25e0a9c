#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;

use ghostwriter::config::{ConfigFile, RawConfigFile, RuleConfig};
use ghostwriter::fs::mock::MockFileSystem;
use ghostwriter::tracker::SilentObserver;
use ghostwriter::{DriverMode, Session, SessionOptions, TrackingPolicy};

/// Session over an in-memory tree rooted at `root`, with transition output
/// silenced. The returned mock shares state with the session.
pub fn mock_session(root: &str, tracking: TrackingPolicy) -> (Session, MockFileSystem) {
    let fs = MockFileSystem::new(root);
    let options = SessionOptions {
        tracking,
        ..SessionOptions::with_root(root)
    };
    let session = Session::with_fs(options, Arc::new(fs.clone())).with_observer(Arc::new(SilentObserver));
    (session, fs)
}

/// Session over a real directory (usually a `tempfile::TempDir`).
pub fn tree_session(root: &Path, mode: DriverMode) -> Session {
    let options = SessionOptions {
        mode,
        ..SessionOptions::with_root(root)
    };
    Session::new(options).with_observer(Arc::new(SilentObserver))
}

/// Builder for `ConfigFile` to simplify test setup.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        Self {
            config: RawConfigFile::default(),
        }
    }

    pub fn with_rule(mut self, rule: RuleConfig) -> Self {
        self.config.rule.push(rule);
        self
    }

    pub fn with_ignore(mut self, pattern: &str) -> Self {
        self.config.watch.ignore.push(pattern.to_string());
        self
    }

    pub fn with_root(mut self, root: &str) -> Self {
        self.config.watch.root = root.to_string();
        self
    }

    pub fn with_mode(mut self, mode: DriverMode) -> Self {
        self.config.watch.mode = mode;
        self
    }

    pub fn with_tracking(mut self, tracking: TrackingPolicy) -> Self {
        self.config.watch.tracking = tracking;
        self
    }

    pub fn with_poll_interval_ms(mut self, ms: u64) -> Self {
        self.config.watch.poll_interval_ms = ms;
        self
    }

    pub fn raw(self) -> RawConfigFile {
        self.config
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }
}

impl Default for ConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for `RuleConfig`.
pub struct RuleBuilder {
    rule: RuleConfig,
}

impl RuleBuilder {
    pub fn new(pattern: &str) -> Self {
        Self {
            rule: RuleConfig {
                pattern: pattern.to_string(),
                cmd: None,
                trigger: None,
            },
        }
    }

    pub fn cmd(mut self, cmd: &str) -> Self {
        self.rule.cmd = Some(cmd.to_string());
        self
    }

    pub fn trigger(mut self, pattern: &str) -> Self {
        self.rule.trigger = Some(pattern.to_string());
        self
    }

    pub fn build(self) -> RuleConfig {
        self.rule
    }
}
