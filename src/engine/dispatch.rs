// src/engine/dispatch.rs

//! Draining the dirty set into handlers.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;

use tracing::{debug, error};

use crate::errors::{GhostwriterError, Result};
use crate::fs::FileSystem;
use crate::registry::{Handler, PatternRegistry};
use crate::tracker::{DirtyTracker, Trigger};
use crate::types::FileState;

/// Drain the tracker until it is empty, running every matching handler for
/// each dirty path in registration order.
///
/// A path is reset to clean before its handlers run, so a handler never sees
/// its own path as pending. Paths a handler marks dirty are picked up by this
/// same call. The first handler error (or panic) aborts the drain; whatever
/// is still dirty stays queued for the next call.
///
/// Returns the number of handler invocations.
pub fn dispatch(
    registry: &PatternRegistry,
    tracker: &mut DirtyTracker,
    fs: &dyn FileSystem,
    root: &Path,
) -> Result<usize> {
    let mut invoked = 0;

    while let Some((path, state)) = tracker.next_dirty() {
        tracker.set_state(registry, &path, FileState::Clean);

        let handlers = registry.handlers_for(&path);
        if handlers.is_empty() {
            debug!(path = %path, %state, "no handler matches; dropped");
            continue;
        }

        for handler in handlers {
            let mut trigger = Trigger::new(registry, tracker, fs, root);
            if let Err(err) = invoke(&handler, &mut trigger, &path, state) {
                error!(path = %path, %state, error = %err, "handler failed; stopping dispatch");
                return Err(err);
            }
            invoked += 1;
        }
    }

    if invoked > 0 {
        debug!(invoked, "dispatch drained");
    }
    Ok(invoked)
}

fn invoke(handler: &Handler, trigger: &mut Trigger<'_>, path: &str, state: FileState) -> Result<()> {
    match panic::catch_unwind(AssertUnwindSafe(|| handler(trigger, path, state))) {
        Ok(Ok(())) => Ok(()),
        Ok(Err(source)) => Err(GhostwriterError::Handler {
            path: path.to_string(),
            source,
        }),
        Err(payload) => Err(GhostwriterError::HandlerPanicked {
            path: path.to_string(),
            message: panic_message(payload.as_ref()),
        }),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
