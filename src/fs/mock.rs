// src/fs/mock.rs

use super::FileSystem;
use anyhow::{anyhow, Result};
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Clone)]
pub enum MockEntry {
    File,
    Dir(BTreeSet<String>), // child names
}

/// In-memory tree for exercising walks and event translation without
/// touching the disk.
///
/// Paths are stored exactly as given; use absolute paths under a fake root
/// (e.g. `/project`) so joins and `strip_prefix` behave like the real thing.
#[derive(Debug, Clone, Default)]
pub struct MockFileSystem {
    entries: Arc<Mutex<BTreeMap<PathBuf, MockEntry>>>,
    unreadable: Arc<Mutex<HashSet<PathBuf>>>,
    links: Arc<Mutex<BTreeMap<PathBuf, PathBuf>>>,
}

impl MockFileSystem {
    pub fn new(root: impl AsRef<Path>) -> Self {
        let fs = Self::default();
        fs.add_dir(root);
        fs
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<PathBuf, MockEntry>> {
        self.entries.lock().unwrap_or_else(|p| p.into_inner())
    }

    pub fn add_file(&self, path: impl AsRef<Path>) {
        let path = path.as_ref().to_path_buf();
        let mut entries = self.lock();
        Self::link_parent(&mut entries, &path);
        entries.insert(path, MockEntry::File);
    }

    pub fn add_dir(&self, path: impl AsRef<Path>) {
        let path = path.as_ref().to_path_buf();
        let mut entries = self.lock();
        Self::ensure_dir(&mut entries, &path);
    }

    /// Remove `path` and everything beneath it.
    pub fn remove(&self, path: impl AsRef<Path>) {
        let path = path.as_ref();
        let mut entries = self.lock();
        entries.retain(|p, _| !p.starts_with(path));
        if let (Some(parent), Some(name)) = (path.parent(), path.file_name()) {
            if let Some(MockEntry::Dir(children)) = entries.get_mut(parent) {
                children.remove(&name.to_string_lossy().into_owned());
            }
        }
    }

    /// Make `read_dir` on `path` fail, as a permission error would.
    pub fn deny_read(&self, path: impl AsRef<Path>) {
        self.unreadable
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .insert(path.as_ref().to_path_buf());
    }

    /// Make `link` resolve to `target` under `canonicalize`, like a symlinked
    /// directory prefix (`/var` -> `/private/var` on macOS).
    pub fn link(&self, link: impl AsRef<Path>, target: impl AsRef<Path>) {
        self.links
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .insert(link.as_ref().to_path_buf(), target.as_ref().to_path_buf());
    }

    fn ensure_dir(entries: &mut BTreeMap<PathBuf, MockEntry>, path: &Path) {
        if matches!(entries.get(path), Some(MockEntry::Dir(_))) {
            return;
        }
        Self::link_parent(entries, path);
        entries.insert(path.to_path_buf(), MockEntry::Dir(BTreeSet::new()));
    }

    fn link_parent(entries: &mut BTreeMap<PathBuf, MockEntry>, path: &Path) {
        let (Some(parent), Some(name)) = (path.parent(), path.file_name()) else {
            return;
        };
        if parent.as_os_str().is_empty() {
            return;
        }
        Self::ensure_dir(entries, parent);
        if let Some(MockEntry::Dir(children)) = entries.get_mut(parent) {
            children.insert(name.to_string_lossy().into_owned());
        }
    }
}

impl FileSystem for MockFileSystem {
    fn exists(&self, path: &Path) -> bool {
        self.lock().contains_key(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        matches!(self.lock().get(path), Some(MockEntry::Dir(_)))
    }

    fn canonicalize(&self, path: &Path) -> Result<PathBuf> {
        let resolved = self
            .links
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .iter()
            .find_map(|(link, target)| path.strip_prefix(link).ok().map(|rest| target.join(rest)))
            .unwrap_or_else(|| path.to_path_buf());
        if !self.exists(&resolved) {
            return Err(anyhow!("no such mock entry: {:?}", resolved));
        }
        Ok(resolved)
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>> {
        if self
            .unreadable
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .contains(path)
        {
            return Err(anyhow!("Permission denied: {:?}", path));
        }
        match self.lock().get(path) {
            Some(MockEntry::Dir(children)) => {
                Ok(children.iter().map(|name| path.join(name)).collect())
            }
            _ => Err(anyhow!("Not a directory or not found: {:?}", path)),
        }
    }
}
