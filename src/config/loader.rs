// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::engine::SessionOptions;
use crate::errors::Result;

/// Load a configuration file from a given path and return the raw `RawConfigFile`.
///
/// This only performs TOML deserialization; it does **not** perform semantic
/// validation. Use [`load_and_validate`] for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let config: RawConfigFile = toml::from_str(&contents)?;

    Ok(config)
}

/// Load a configuration file from path and run validation.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let raw_config = load_from_path(&path)?;
    let config = ConfigFile::try_from(raw_config)?;
    Ok(config)
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from("Ghostwriter.toml")
}

/// Directory a config file's relative paths are resolved against.
///
/// A bare filename like `Ghostwriter.toml` has an empty parent; that means
/// the current directory.
pub fn config_dir(config_path: &Path) -> PathBuf {
    match config_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

impl SessionOptions {
    /// Map `[watch]` onto session options, anchoring `root` at `config_dir`.
    pub fn from_config(cfg: &ConfigFile, config_dir: &Path) -> Self {
        let watch = cfg.watch_section();
        Self {
            root: config_dir.join(&watch.root),
            tracking: watch.tracking,
            mode: watch.mode,
            poll_interval: Duration::from_millis(watch.poll_interval_ms),
        }
    }
}
