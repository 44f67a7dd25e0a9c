// src/exec/mod.rs

//! Handlers built from configuration.
//!
//! A `[[rule]]` becomes a [`CommandRule`]: a shell command run once per
//! dirty path, optionally followed by marking other paths changed.

pub mod command;

pub use command::CommandRule;
