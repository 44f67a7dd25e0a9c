// src/tracker/trigger.rs

use std::fmt;
use std::path::Path;

use crate::errors::Result;
use crate::fs::FileSystem;
use crate::registry::PatternRegistry;
use crate::tracker::DirtyTracker;
use crate::types::FileState;

/// Borrowed view over a session's registry, tracker and filesystem.
///
/// Handlers receive one so they can mark further paths dirty while a
/// dispatch is running; the watcher uses one to translate events.
pub struct Trigger<'a> {
    registry: &'a PatternRegistry,
    tracker: &'a mut DirtyTracker,
    fs: &'a dyn FileSystem,
    root: &'a Path,
}

impl fmt::Debug for Trigger<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Trigger")
            .field("root", &self.root)
            .field("dirty", &self.tracker.len())
            .finish_non_exhaustive()
    }
}

impl<'a> Trigger<'a> {
    pub fn new(
        registry: &'a PatternRegistry,
        tracker: &'a mut DirtyTracker,
        fs: &'a dyn FileSystem,
        root: &'a Path,
    ) -> Self {
        Self {
            registry,
            tracker,
            fs,
            root,
        }
    }

    pub fn set_state(&mut self, path: &str, state: FileState) -> bool {
        self.tracker.set_state(self.registry, path, state)
    }

    pub fn set_states_matching(&mut self, pattern: &str, state: FileState) -> Result<usize> {
        self.tracker
            .set_states_matching(self.registry, self.fs, self.root, pattern, state)
    }

    /// Mark every existing path matching `pattern` as changed (or deleted).
    pub fn trigger(&mut self, pattern: &str, deleted: bool) -> Result<usize> {
        self.set_states_matching(pattern, FileState::from_deleted(deleted))
    }

    pub fn state_of(&self, path: &str) -> FileState {
        self.tracker.state_of(path)
    }

    pub fn registry(&self) -> &'a PatternRegistry {
        self.registry
    }

    pub fn fs(&self) -> &'a dyn FileSystem {
        self.fs
    }

    pub fn root(&self) -> &'a Path {
        self.root
    }
}
