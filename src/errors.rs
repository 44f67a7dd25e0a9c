// src/errors.rs

//! Crate-wide error type.
//!
//! Nothing in the core retries. Whoever drives the session decides whether
//! to log-and-exit or start over.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GhostwriterError {
    #[error("invalid pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("walking {path:?} failed: {source:#}")]
    Traversal {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("subscribing to {path:?} failed: {source:#}")]
    Subscription {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("handler for {path:?} failed: {source:#}")]
    Handler {
        path: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("handler for {path:?} panicked: {message}")]
    HandlerPanicked { path: String, message: String },

    #[error("file watch error: {0}")]
    Notify(#[from] notify::Error),

    #[error("file event channel closed")]
    EventChannelClosed,

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl GhostwriterError {
    pub(crate) fn invalid_pattern(pattern: &str, source: regex::Error) -> Self {
        GhostwriterError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        }
    }

    /// True for errors that must stop a running watch loop.
    ///
    /// A traversal failure while following a freshly created directory is
    /// usually a race with a delete and is not fatal on its own.
    pub fn is_fatal_for_watch(&self) -> bool {
        !matches!(self, GhostwriterError::Traversal { .. })
    }
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, GhostwriterError>;
