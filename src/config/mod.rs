// src/config/mod.rs

//! Configuration loading and validation for the `ghostwriter` binary.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a config file from disk (`loader.rs`).
//! - Validate patterns and limits (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{config_dir, default_config_path, load_and_validate, load_from_path};
pub use model::{ConfigFile, RawConfigFile, RuleConfig, WatchSection};
