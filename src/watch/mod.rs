// src/watch/mod.rs

//! File watching and event translation.
//!
//! This module is responsible for:
//! - Subscribing directories one at a time through a [`Subscriber`]
//!   (`notify` in production), recursing itself so new subtrees are followed.
//! - Normalising raw `notify` events into created / changed / removed.
//! - Turning those into dirty-state updates on the tracker.
//!
//! Translation never runs handlers; they only run from dispatch.

pub mod event;
pub mod path_utils;
pub mod subscriber;
pub mod watcher;

pub use event::{normalize, RawEvent, RawEventKind};
pub use subscriber::{EventMessage, NotifySubscriber, Subscriber};
pub use watcher::FsWatcher;
