// src/watch/subscriber.rs

use std::fmt;
use std::path::Path;

use anyhow::{Context, Result};
use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

/// What the notification backend delivers: an event or a fatal watch error.
pub type EventMessage = notify::Result<Event>;

/// Directory-level change subscriptions.
///
/// Implementations only ever subscribe to single directories; recursion is
/// handled by the watcher so newly created subtrees can be picked up.
pub trait Subscriber: Send {
    fn subscribe(&mut self, dir: &Path) -> Result<()>;
}

/// [`Subscriber`] backed by the platform watcher from `notify`.
///
/// Dropping this stops delivery; the event channel then reports closed.
pub struct NotifySubscriber {
    inner: RecommendedWatcher,
}

impl fmt::Debug for NotifySubscriber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotifySubscriber").finish()
    }
}

impl NotifySubscriber {
    /// Create the platform watcher, forwarding every event and error into
    /// `events`.
    ///
    /// The callback runs on notify's own thread and must never block it:
    /// `watch` on inotify waits for that thread, so a blocked callback and a
    /// subscription from the loop would wait on each other forever.
    pub fn new(events: mpsc::UnboundedSender<EventMessage>) -> Result<Self> {
        let inner = RecommendedWatcher::new(
            move |res: EventMessage| {
                if let Err(err) = events.send(res) {
                    // The receiving loop is gone; nothing left to tell via tracing.
                    eprintln!("ghostwriter: failed to forward notify event: {err}");
                }
            },
            Config::default(),
        )
        .context("creating platform file watcher")?;

        Ok(Self { inner })
    }
}

impl Subscriber for NotifySubscriber {
    fn subscribe(&mut self, dir: &Path) -> Result<()> {
        self.inner
            .watch(dir, RecursiveMode::NonRecursive)
            .with_context(|| format!("watching directory {:?}", dir))
    }
}
