// src/watch/path_utils.rs

//! Utility functions for path handling in the watcher.

use std::path::Path;

use crate::fs::FileSystem;

/// Convert a path into a string relative to `root`, with forward slashes.
///
/// - First we try a direct `strip_prefix(root)`.
/// - If that fails (e.g. due to symlinks or different absolute prefixes),
///   we canonicalize both paths through `fs` and try again. Removed paths cannot be
///   canonicalized, so this only rescues paths that still exist.
///
/// Returns `None` if the path cannot be related to `root`, or if it is the
/// root itself.
pub fn relative_str(fs: &dyn FileSystem, root: &Path, path: &Path) -> Option<String> {
    if let Ok(rel) = path.strip_prefix(root) {
        return non_empty(rel);
    }

    // macOS reports /private/var/... for paths watched as /var/...
    if let (Ok(root_canon), Ok(path_canon)) = (fs.canonicalize(root), fs.canonicalize(path)) {
        if let Ok(rel) = path_canon.strip_prefix(&root_canon) {
            return non_empty(rel);
        }
    }

    None
}

fn non_empty(rel: &Path) -> Option<String> {
    let s = rel.to_string_lossy().replace('\\', "/");
    if s.is_empty() { None } else { Some(s) }
}

/// Append `name` to a relative directory path (`""` is the root).
pub fn join_rel(dir: &str, name: &str) -> String {
    if dir.is_empty() {
        name.to_string()
    } else {
        format!("{dir}/{name}")
    }
}
