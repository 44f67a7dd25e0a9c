// src/engine/mod.rs

//! Orchestration for a watch session.
//!
//! This module ties together:
//! - the [`Session`] context object (registration, triggering, run APIs)
//! - the dispatcher that drains dirty paths into handlers
//! - the driver loop that interleaves filesystem events and a poll timer
//!
//! Dispatch is synchronous and runs on the caller's task. The only
//! concurrent producer is the notification backend feeding the event queue.

pub mod dispatch;
pub mod driver;
pub mod session;

pub use dispatch::dispatch;
pub use driver::Driver;
pub use session::{Session, SessionOptions};
