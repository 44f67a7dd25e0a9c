// src/fs/mod.rs

use std::fmt::Debug;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

pub mod mock;
pub mod walk;

pub use walk::{walk, WalkEntry};

/// Read-only view of the tree a session watches.
///
/// Covers the tree walks behind `set_states_matching` and recursive
/// watching, the directory check on create events, and resolving renames
/// whose direction the backend did not report.
pub trait FileSystem: Send + Sync + Debug {
    /// True if anything (including a dangling symlink) is at `path`.
    fn exists(&self, path: &Path) -> bool;
    fn is_dir(&self, path: &Path) -> bool;
    fn canonicalize(&self, path: &Path) -> Result<PathBuf>;

    /// Full paths of the entries directly inside `path`, in no particular
    /// order.
    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>>;
}

/// Implementation that uses `std::fs`.
#[derive(Debug, Clone, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn exists(&self, path: &Path) -> bool {
        fs::symlink_metadata(path).is_ok()
    }

    // Symlinked directories are not followed, so a link loop cannot make a
    // walk run forever.
    fn is_dir(&self, path: &Path) -> bool {
        fs::symlink_metadata(path)
            .map(|m| m.is_dir())
            .unwrap_or(false)
    }

    fn canonicalize(&self, path: &Path) -> Result<PathBuf> {
        fs::canonicalize(path).with_context(|| format!("canonicalizing {:?}", path))
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>> {
        fs::read_dir(path)
            .with_context(|| format!("listing {:?}", path))?
            .map(|entry| {
                entry
                    .map(|e| e.path())
                    .with_context(|| format!("reading entry in {:?}", path))
            })
            .collect()
    }
}
