// src/fs/walk.rs

//! Recursive tree walk with a stable visit order.

use std::path::{Path, PathBuf};

use crate::errors::{GhostwriterError, Result};
use crate::fs::FileSystem;
use crate::watch::path_utils::join_rel;

/// One entry produced by [`walk`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkEntry {
    /// Path relative to the session root, `/`-separated.
    pub rel: String,
    pub abs: PathBuf,
    pub is_dir: bool,
}

/// Walk `root.join(start)`, calling `visit` for `start` itself (unless it is
/// the root) and for every descendant.
///
/// Each directory's entries are visited in sorted order before any of its
/// subdirectories are entered. The first
/// listing failure or visitor error aborts the walk; whatever `visit` already
/// did is kept.
pub fn walk<F>(fs: &dyn FileSystem, root: &Path, start: &str, mut visit: F) -> Result<()>
where
    F: FnMut(&WalkEntry) -> Result<()>,
{
    let start_abs = if start.is_empty() {
        root.to_path_buf()
    } else {
        root.join(start)
    };

    if !start.is_empty() {
        let entry = WalkEntry {
            rel: start.to_string(),
            is_dir: fs.is_dir(&start_abs),
            abs: start_abs.clone(),
        };
        visit(&entry)?;
        if !entry.is_dir {
            return Ok(());
        }
    }

    let mut stack = vec![(start.to_string(), start_abs)];

    while let Some((rel_dir, abs_dir)) = stack.pop() {
        let mut children = fs
            .read_dir(&abs_dir)
            .map_err(|source| GhostwriterError::Traversal {
                path: abs_dir.clone(),
                source,
            })?;
        children.sort();

        // Pushed in reverse so the stack pops them in lexical order.
        let mut subdirs = Vec::new();
        for abs in children {
            let Some(name) = abs.file_name().map(|n| n.to_string_lossy().into_owned()) else {
                continue;
            };
            let entry = WalkEntry {
                rel: join_rel(&rel_dir, &name),
                is_dir: fs.is_dir(&abs),
                abs,
            };
            visit(&entry)?;
            if entry.is_dir {
                subdirs.push((entry.rel, entry.abs));
            }
        }
        stack.extend(subdirs.into_iter().rev());
    }

    Ok(())
}
