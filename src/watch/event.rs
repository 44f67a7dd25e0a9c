// src/watch/event.rs

//! Normalisation of `notify` events into the three kinds the watcher acts on.

use std::path::PathBuf;

use notify::event::{ModifyKind, RenameMode};
use notify::{Event, EventKind};

use crate::fs::FileSystem;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawEventKind {
    /// Something appeared at the path (create or rename-into).
    Created,
    /// Contents or metadata changed.
    Changed,
    /// The path is gone (remove or rename-away).
    Removed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEvent {
    pub kind: RawEventKind,
    pub path: PathBuf,
}

impl RawEvent {
    pub fn new(kind: RawEventKind, path: impl Into<PathBuf>) -> Self {
        Self {
            kind,
            path: path.into(),
        }
    }
}

/// Split a notify event into one [`RawEvent`] per affected path.
///
/// Access events yield nothing. Renames whose direction the backend could
/// not tell are resolved by checking whether the path still exists.
pub fn normalize(event: &Event, fs: &dyn FileSystem) -> Vec<RawEvent> {
    let per_path = |kind: RawEventKind| -> Vec<RawEvent> {
        event
            .paths
            .iter()
            .map(|p| RawEvent::new(kind, p.clone()))
            .collect()
    };

    match event.kind {
        EventKind::Access(_) => Vec::new(),
        EventKind::Create(_) => per_path(RawEventKind::Created),
        EventKind::Remove(_) => per_path(RawEventKind::Removed),
        EventKind::Modify(ModifyKind::Name(RenameMode::From)) => per_path(RawEventKind::Removed),
        EventKind::Modify(ModifyKind::Name(RenameMode::To)) => per_path(RawEventKind::Created),
        EventKind::Modify(ModifyKind::Name(RenameMode::Both)) if event.paths.len() == 2 => vec![
            RawEvent::new(RawEventKind::Removed, event.paths[0].clone()),
            RawEvent::new(RawEventKind::Created, event.paths[1].clone()),
        ],
        EventKind::Modify(ModifyKind::Name(_)) => event
            .paths
            .iter()
            .map(|p| {
                let kind = if fs.exists(p) {
                    RawEventKind::Created
                } else {
                    RawEventKind::Removed
                };
                RawEvent::new(kind, p.clone())
            })
            .collect(),
        EventKind::Modify(_) | EventKind::Any | EventKind::Other => {
            per_path(RawEventKind::Changed)
        }
    }
}
