// src/tracker/dirty_set.rs

use std::collections::HashMap;

use crate::types::FileState;

/// Paths with a pending non-clean state.
///
/// Each path appears at most once. `pop` hands entries out in hash order, so
/// no caller may rely on the order paths are dispatched in.
#[derive(Debug, Default)]
pub struct DirtySet {
    entries: HashMap<String, FileState>,
}

impl DirtySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite; `Clean` removes. Returns the previous state.
    pub fn set(&mut self, path: &str, state: FileState) -> FileState {
        let previous = if state.is_dirty() {
            self.entries.insert(path.to_string(), state)
        } else {
            self.entries.remove(path)
        };
        previous.unwrap_or(FileState::Clean)
    }

    pub fn get(&self, path: &str) -> FileState {
        self.entries.get(path).copied().unwrap_or(FileState::Clean)
    }

    /// Remove and return an arbitrary entry.
    pub fn pop(&mut self) -> Option<(String, FileState)> {
        let path = self.entries.keys().next()?.clone();
        let state = self.entries.remove(&path)?;
        Some((path, state))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, FileState)> {
        self.entries.iter().map(|(p, s)| (p.as_str(), *s))
    }
}
