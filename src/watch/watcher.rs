// src/watch/watcher.rs

use std::collections::BTreeSet;
use std::path::Path;

use notify::Event;
use tracing::{debug, info, trace, warn};

use crate::errors::{GhostwriterError, Result};
use crate::fs::walk;
use crate::tracker::Trigger;
use crate::types::FileState;
use crate::watch::event::{normalize, RawEvent, RawEventKind};
use crate::watch::path_utils::relative_str;
use crate::watch::subscriber::Subscriber;

/// Recursive directory watcher.
///
/// Owns the watch set: every directory subscribed so far, relative to the
/// session root (`""` is the root). The set only grows. The OS drops the
/// watch of a deleted directory, so a create event subscribes again whatever
/// the set says.
#[derive(Debug)]
pub struct FsWatcher<S: Subscriber> {
    subscriber: S,
    watched: BTreeSet<String>,
}

impl<S: Subscriber> FsWatcher<S> {
    pub fn new(subscriber: S) -> Self {
        Self {
            subscriber,
            watched: BTreeSet::new(),
        }
    }

    /// Subscribe `dir` (relative; `""` for the root) and every non-ignored
    /// directory below it, clearing any stale dirty state on those
    /// directories. Returns how many directories were newly subscribed.
    pub fn watch_recursive(&mut self, t: &mut Trigger<'_>, dir: &str) -> Result<usize> {
        self.subscribe_tree(t, dir, false)
    }

    pub fn is_watched(&self, dir: &str) -> bool {
        self.watched.contains(dir)
    }

    pub fn watched(&self) -> impl Iterator<Item = &str> {
        self.watched.iter().map(String::as_str)
    }

    /// Translate one notify event into dirty-state updates.
    pub fn handle_notify(&mut self, t: &mut Trigger<'_>, event: &Event) -> Result<()> {
        for raw in normalize(event, t.fs()) {
            self.handle_event(t, &raw)?;
        }
        Ok(())
    }

    /// Translate one normalised event.
    ///
    /// Only subscription failures are returned; a directory that vanished
    /// before it could be walked is logged and skipped.
    pub fn handle_event(&mut self, t: &mut Trigger<'_>, event: &RawEvent) -> Result<()> {
        let Some(rel) = relative_str(t.fs(), t.root(), &event.path) else {
            debug!(path = ?event.path, "event outside watch root; skipping");
            return Ok(());
        };

        if t.registry().is_ignored(&rel) {
            trace!(path = %rel, "ignored event");
            return Ok(());
        }

        match event.kind {
            RawEventKind::Created if t.fs().is_dir(&event.path) => {
                match self.subscribe_tree(t, &rel, true) {
                    Ok(_) => Ok(()),
                    Err(err) if !err.is_fatal_for_watch() => {
                        warn!(path = %rel, error = %err, "could not follow new directory");
                        Ok(())
                    }
                    Err(err) => Err(err),
                }
            }
            RawEventKind::Created | RawEventKind::Changed => {
                t.set_state(&rel, FileState::Changed);
                Ok(())
            }
            RawEventKind::Removed => {
                t.set_state(&rel, FileState::Deleted);
                Ok(())
            }
        }
    }

    /// Walk `dir`, subscribing directories.
    ///
    /// With `new_tree` the walk follows a create event: every directory is
    /// subscribed again even if the set still lists it, and files found on
    /// the way are marked changed since no event will ever be reported for them.
    fn subscribe_tree(&mut self, t: &mut Trigger<'_>, dir: &str, new_tree: bool) -> Result<usize> {
        let (fs, root) = (t.fs(), t.root());
        let mut added = 0;

        if dir.is_empty() && self.watched.insert(String::new()) {
            self.subscribe(root)?;
            added += 1;
        }

        walk(fs, root, dir, |entry| {
            if t.registry().is_ignored(&entry.rel) {
                return Ok(());
            }
            if !entry.is_dir {
                if new_tree {
                    t.set_state(&entry.rel, FileState::Changed);
                }
                return Ok(());
            }
            t.set_state(&entry.rel, FileState::Clean);
            if self.watched.insert(entry.rel.clone()) || new_tree {
                self.subscribe(&entry.abs)?;
                added += 1;
            }
            Ok(())
        })?;

        if added > 0 {
            let shown = if dir.is_empty() { "." } else { dir };
            info!(dir = %shown, added, "watching directories");
        }
        Ok(added)
    }

    fn subscribe(&mut self, abs: &Path) -> Result<()> {
        debug!(dir = ?abs, "subscribing");
        self.subscriber
            .subscribe(abs)
            .map_err(|source| GhostwriterError::Subscription {
                path: abs.to_path_buf(),
                source,
            })
    }
}
