use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

/// Pending disposition of a path.
///
/// `Clean` is never stored: a clean path is simply absent from the dirty set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FileState {
    Clean,
    Changed,
    Deleted,
}

impl FileState {
    /// Two-state shorthand used by `trigger(pattern, deleted)`.
    pub fn from_deleted(deleted: bool) -> Self {
        if deleted {
            FileState::Deleted
        } else {
            FileState::Changed
        }
    }

    pub fn is_dirty(self) -> bool {
        !matches!(self, FileState::Clean)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FileState::Clean => "clean",
            FileState::Changed => "changed",
            FileState::Deleted => "deleted",
        }
    }
}

impl fmt::Display for FileState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Whether `set_state` records paths that no registered handler matches.
///
/// - `RegistryGated`: unmatched paths are dropped (default). Handlers
///   registered later will never see paths that were dropped earlier.
/// - `Unconditional`: every non-ignored path is recorded; dispatching a path
///   with no handler just clears it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TrackingPolicy {
    #[default]
    RegistryGated,
    Unconditional,
}

impl FromStr for TrackingPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "registry_gated" | "gated" => Ok(TrackingPolicy::RegistryGated),
            "unconditional" => Ok(TrackingPolicy::Unconditional),
            other => Err(format!(
                "invalid tracking policy: {other} (expected \"registry_gated\" or \"unconditional\")"
            )),
        }
    }
}

/// How the driver loop decides when to dispatch.
///
/// - `Polling`: dispatch after every translated event and on every tick of
///   the poll interval (default).
/// - `Event`: dispatch only after translated events, no periodic fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DriverMode {
    #[default]
    Polling,
    Event,
}

impl FromStr for DriverMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "polling" | "poll" => Ok(DriverMode::Polling),
            "event" => Ok(DriverMode::Event),
            other => Err(format!(
                "invalid driver mode: {other} (expected \"polling\" or \"event\")"
            )),
        }
    }
}
