// src/config/model.rs

use serde::Deserialize;

use crate::types::{DriverMode, TrackingPolicy};

/// Configuration as read from a TOML file, before validation.
///
/// ```toml
/// [watch]
/// root = "."
/// mode = "polling"
/// poll_interval_ms = 250
/// tracking = "registry_gated"
/// initial = ".*"
/// ignore = ['^build/', '~$']
///
/// [[rule]]
/// pattern = '^content/.*\.md$'
/// cmd = "./render.sh \"$GHOSTWRITER_PATH\""
///
/// [[rule]]
/// pattern = '^design/.*\.html$'
/// trigger = '^content/.*\.md$'
/// ```
///
/// All sections are optional and have reasonable defaults.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawConfigFile {
    #[serde(default)]
    pub watch: WatchSection,

    /// `[[rule]]` entries, registered in file order.
    #[serde(default)]
    pub rule: Vec<RuleConfig>,
}

/// Validated configuration. Only obtainable through `TryFrom<RawConfigFile>`.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    watch: WatchSection,
    rule: Vec<RuleConfig>,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(watch: WatchSection, rule: Vec<RuleConfig>) -> Self {
        Self { watch, rule }
    }

    pub fn watch_section(&self) -> &WatchSection {
        &self.watch
    }

    pub fn rules(&self) -> &[RuleConfig] {
        &self.rule
    }
}

/// `[watch]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct WatchSection {
    /// Tree to watch, relative to the directory holding the config file.
    #[serde(default = "default_root")]
    pub root: String,

    #[serde(default)]
    pub mode: DriverMode,

    /// Dispatch period for `mode = "polling"`.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    #[serde(default)]
    pub tracking: TrackingPolicy,

    /// Pattern declared changed once at startup. Empty disables the
    /// initial build.
    #[serde(default = "default_initial")]
    pub initial: String,

    /// Ignore patterns, checked before any handler pattern.
    #[serde(default)]
    pub ignore: Vec<String>,
}

fn default_root() -> String {
    ".".to_string()
}

fn default_poll_interval_ms() -> u64 {
    250
}

fn default_initial() -> String {
    ".*".to_string()
}

impl Default for WatchSection {
    fn default() -> Self {
        Self {
            root: default_root(),
            mode: DriverMode::default(),
            poll_interval_ms: default_poll_interval_ms(),
            tracking: TrackingPolicy::default(),
            initial: default_initial(),
            ignore: Vec::new(),
        }
    }
}

/// `[[rule]]` entry.
#[derive(Debug, Clone, Deserialize)]
pub struct RuleConfig {
    /// Regex selecting the paths this rule handles.
    pub pattern: String,

    /// Shell command run once per dirty path. `GHOSTWRITER_PATH` and
    /// `GHOSTWRITER_STATE` are set in its environment.
    #[serde(default)]
    pub cmd: Option<String>,

    /// Regex of further paths to mark changed whenever this rule fires
    /// (e.g. rebuild every page when a template changes).
    #[serde(default)]
    pub trigger: Option<String>,
}
