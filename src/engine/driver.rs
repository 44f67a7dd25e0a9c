// src/engine/driver.rs

//! The blocking run loop.
//!
//! One control flow consumes the event queue, translates events into dirty
//! state and runs dispatch. Handlers therefore never overlap; a slow handler
//! holds up event processing until it returns.

use std::future::Future;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{self, Interval, MissedTickBehavior};
use tracing::{debug, error, info};

use crate::engine::Session;
use crate::errors::{GhostwriterError, Result};
use crate::types::DriverMode;
use crate::watch::{EventMessage, FsWatcher, Subscriber};

/// Couples a watcher with the queue its subscriber feeds.
#[derive(Debug)]
pub struct Driver<S: Subscriber> {
    watcher: FsWatcher<S>,
    events: mpsc::UnboundedReceiver<EventMessage>,
    mode: DriverMode,
    poll_interval: Duration,
}

impl<S: Subscriber> Driver<S> {
    pub fn new(
        subscriber: S,
        events: mpsc::UnboundedReceiver<EventMessage>,
        mode: DriverMode,
        poll_interval: Duration,
    ) -> Self {
        Self {
            watcher: FsWatcher::new(subscriber),
            events,
            mode,
            poll_interval,
        }
    }

    /// Subscribe the session root recursively, then loop until `shutdown`
    /// resolves or something fatal happens.
    ///
    /// Fatal: the event queue closing, a watch error from the backend, a
    /// failed subscription, or a handler error from dispatch.
    pub async fn run<F>(&mut self, session: &mut Session, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()>,
    {
        self.watcher.watch_recursive(&mut session.trigger_view(), "")?;
        info!(root = ?session.root(), mode = ?self.mode, "watch loop started");

        let mut ticker = match self.mode {
            DriverMode::Polling => {
                let mut interval = time::interval(self.poll_interval);
                interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
                Some(interval)
            }
            DriverMode::Event => None,
        };

        tokio::pin!(shutdown);

        let result = loop {
            tokio::select! {
                biased;

                _ = &mut shutdown => {
                    info!("shutdown requested; leaving watch loop");
                    break Ok(());
                }

                msg = self.events.recv() => {
                    let event = match msg {
                        Some(Ok(event)) => event,
                        Some(Err(err)) => break Err(GhostwriterError::Notify(err)),
                        None => break Err(GhostwriterError::EventChannelClosed),
                    };
                    debug!(?event, "received notify event");
                    if let Err(err) = self.watcher.handle_notify(&mut session.trigger_view(), &event) {
                        break Err(err);
                    }
                    if let Err(err) = session.dispatch() {
                        break Err(err);
                    }
                }

                _ = next_tick(&mut ticker) => {
                    if let Err(err) = session.dispatch() {
                        break Err(err);
                    }
                }
            }
        };

        if let Err(err) = &result {
            error!(error = %err, "watch loop stopped");
        }
        result
    }
}

async fn next_tick(ticker: &mut Option<Interval>) {
    match ticker {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending::<()>().await,
    }
}
