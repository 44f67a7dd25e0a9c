// src/tracker/mod.rs

//! Dirty-state tracking.
//!
//! The [`DirtyTracker`] is the single source of truth for what still needs
//! dispatching. Both change sources feed it: the recursive "declare these
//! files dirty" walk and the live event stream.

pub mod dirty_set;
pub mod observer;
pub mod trigger;

pub use dirty_set::DirtySet;
pub use observer::{FnObserver, SilentObserver, StateObserver, StdoutObserver, TracingObserver};
pub use trigger::Trigger;

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use tracing::{debug, trace};

use crate::errors::Result;
use crate::fs::{walk, FileSystem};
use crate::registry::{rules, PatternRegistry};
use crate::types::{FileState, TrackingPolicy};

pub struct DirtyTracker {
    dirty: DirtySet,
    policy: TrackingPolicy,
    observer: Arc<dyn StateObserver>,
}

impl fmt::Debug for DirtyTracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DirtyTracker")
            .field("dirty", &self.dirty)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl Default for DirtyTracker {
    fn default() -> Self {
        Self::new(TrackingPolicy::default(), Arc::new(StdoutObserver))
    }
}

impl DirtyTracker {
    pub fn new(policy: TrackingPolicy, observer: Arc<dyn StateObserver>) -> Self {
        Self {
            dirty: DirtySet::new(),
            policy,
            observer,
        }
    }

    pub fn policy(&self) -> TrackingPolicy {
        self.policy
    }

    pub fn set_observer(&mut self, observer: Arc<dyn StateObserver>) {
        self.observer = observer;
    }

    /// Record `state` for `path`.
    ///
    /// `Clean` always removes (idempotent). `Changed`/`Deleted` are dropped
    /// for ignored paths and, under [`TrackingPolicy::RegistryGated`], for
    /// paths no handler matches. Returns true if the state was recorded.
    pub fn set_state(&mut self, registry: &PatternRegistry, path: &str, state: FileState) -> bool {
        if state.is_dirty() {
            if registry.is_ignored(path) {
                trace!(path = %path, %state, "ignored; not tracking");
                return false;
            }
            if self.policy == TrackingPolicy::RegistryGated && !registry.matches_any_rule(path) {
                trace!(path = %path, %state, "no matching handler; not tracking");
                return false;
            }
        }

        let previous = self.dirty.set(path, state);
        debug!(path = %path, from = %previous, to = %state, "state transition");
        self.observer.on_transition(path, state);
        true
    }

    /// Walk the whole tree under `root` and set `state` on every path that
    /// matches `pattern` and is not ignored.
    ///
    /// Stops at the first traversal error; states already set are kept.
    /// Returns the number of paths recorded.
    pub fn set_states_matching(
        &mut self,
        registry: &PatternRegistry,
        fs: &dyn FileSystem,
        root: &Path,
        pattern: &str,
        state: FileState,
    ) -> Result<usize> {
        let re = rules::compile(pattern)?;
        let mut recorded = 0;

        walk(fs, root, "", |entry| {
            if re.is_match(&entry.rel)
                && !registry.is_ignored(&entry.rel)
                && self.set_state(registry, &entry.rel, state)
            {
                recorded += 1;
            }
            Ok(())
        })?;

        debug!(pattern = %pattern, %state, recorded, "declared matching paths");
        Ok(recorded)
    }

    /// Remove and return an arbitrary dirty entry.
    pub fn next_dirty(&mut self) -> Option<(String, FileState)> {
        self.dirty.pop()
    }

    pub fn state_of(&self, path: &str) -> FileState {
        self.dirty.get(path)
    }

    pub fn len(&self) -> usize {
        self.dirty.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dirty.is_empty()
    }

    pub fn dirty(&self) -> &DirtySet {
        &self.dirty
    }
}
