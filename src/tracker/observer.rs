// src/tracker/observer.rs

//! Pluggable sink for state transitions.

use std::fmt;

use tracing::info;

use crate::types::FileState;

/// Called with `(path, state)` on every tracked transition, including a
/// `Clean` for a path that was not dirty.
pub trait StateObserver: Send + Sync {
    fn on_transition(&self, path: &str, state: FileState);
}

/// Default observer: one human-readable line per transition on stdout.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutObserver;

impl StateObserver for StdoutObserver {
    fn on_transition(&self, path: &str, state: FileState) {
        println!("[ghostwriter] {state:<7} {path}");
    }
}

/// Routes transitions into `tracing` instead of stdout.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl StateObserver for TracingObserver {
    fn on_transition(&self, path: &str, state: FileState) {
        info!(path = %path, %state, "state transition");
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SilentObserver;

impl StateObserver for SilentObserver {
    fn on_transition(&self, _path: &str, _state: FileState) {}
}

/// Adapts a closure into a [`StateObserver`].
pub struct FnObserver<F>(pub F);

impl<F> fmt::Debug for FnObserver<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnObserver").finish_non_exhaustive()
    }
}

impl<F> StateObserver for FnObserver<F>
where
    F: Fn(&str, FileState) + Send + Sync,
{
    fn on_transition(&self, path: &str, state: FileState) {
        (self.0)(path, state)
    }
}
