// src/engine/session.rs

use std::fmt;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::config::ConfigFile;
use crate::engine::dispatch::dispatch;
use crate::engine::driver::Driver;
use crate::errors::Result;
use crate::exec::CommandRule;
use crate::fs::{FileSystem, RealFileSystem};
use crate::registry::{Handler, PatternRegistry};
use crate::tracker::{DirtyTracker, StateObserver, StdoutObserver, Trigger};
use crate::types::{DriverMode, FileState, TrackingPolicy};
use crate::watch::{EventMessage, NotifySubscriber, Subscriber};

/// Knobs for a watch session.
#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// Directory all patterns are evaluated against.
    pub root: PathBuf,
    pub tracking: TrackingPolicy,
    pub mode: DriverMode,
    /// Dispatch period in [`DriverMode::Polling`].
    pub poll_interval: Duration,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            tracking: TrackingPolicy::default(),
            mode: DriverMode::default(),
            poll_interval: Duration::from_millis(250),
        }
    }
}

impl SessionOptions {
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }
}

/// One watch session: registry, dirty state and the tree they apply to.
///
/// Everything a session needs lives here instead of in process-wide state,
/// so independent sessions can coexist in one process.
///
/// Register handlers and ignores first, then declare initial state and call
/// [`dispatch`](Self::dispatch) or [`watch`](Self::watch). The run methods
/// hold `&mut self`, so registration cannot race with dispatch.
pub struct Session {
    registry: PatternRegistry,
    tracker: DirtyTracker,
    fs: Arc<dyn FileSystem>,
    root: PathBuf,
    options: SessionOptions,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("root", &self.root)
            .field("registry", &self.registry)
            .field("tracker", &self.tracker)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Session over the real filesystem.
    pub fn new(options: SessionOptions) -> Self {
        Self::with_fs(options, Arc::new(RealFileSystem))
    }

    pub fn with_fs(options: SessionOptions, fs: Arc<dyn FileSystem>) -> Self {
        // Canonicalize once so event paths relativize against a stable base.
        let root = fs
            .canonicalize(&options.root)
            .unwrap_or_else(|_| options.root.clone());
        let tracker = DirtyTracker::new(options.tracking, Arc::new(StdoutObserver));

        Self {
            registry: PatternRegistry::new(),
            tracker,
            fs,
            root,
            options,
        }
    }

    /// Build a session from a loaded config: ignores first, then one command
    /// rule per `[[rule]]` in file order.
    ///
    /// `config_dir` anchors a relative `[watch].root`.
    pub fn from_config(cfg: &ConfigFile, config_dir: &Path) -> Result<Self> {
        Self::from_config_with(SessionOptions::from_config(cfg, config_dir), cfg)
    }

    /// Like [`from_config`](Self::from_config) with options the caller has
    /// already adjusted (e.g. from command-line overrides).
    pub fn from_config_with(options: SessionOptions, cfg: &ConfigFile) -> Result<Self> {
        let mut session = Self::new(options);

        for pattern in &cfg.watch_section().ignore {
            session.register_ignore(pattern)?;
        }
        for rule in cfg.rules() {
            let rule = CommandRule::from_config(rule);
            let pattern = rule.pattern().to_string();
            session.register_shared(&pattern, rule.into_handler())?;
        }

        info!(
            root = ?session.root,
            rules = session.registry.rules().len(),
            ignores = session.registry.ignores().len(),
            "session configured"
        );
        Ok(session)
    }

    /// Replace the transition observer (stdout by default).
    pub fn with_observer(mut self, observer: Arc<dyn StateObserver>) -> Self {
        self.tracker.set_observer(observer);
        self
    }

    pub fn register_handler<F>(&mut self, pattern: &str, handler: F) -> Result<()>
    where
        F: Fn(&mut Trigger<'_>, &str, FileState) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.registry.register_handler(pattern, handler)
    }

    pub fn register_shared(&mut self, pattern: &str, handler: Handler) -> Result<()> {
        self.registry.register_shared(pattern, handler)
    }

    pub fn register_ignore(&mut self, pattern: &str) -> Result<()> {
        self.registry.register_ignore(pattern)
    }

    pub fn set_state(&mut self, path: &str, state: FileState) -> bool {
        self.tracker.set_state(&self.registry, path, state)
    }

    pub fn set_states_matching(&mut self, pattern: &str, state: FileState) -> Result<usize> {
        self.trigger_view().set_states_matching(pattern, state)
    }

    /// Two-state form of [`set_states_matching`](Self::set_states_matching).
    pub fn trigger(&mut self, pattern: &str, deleted: bool) -> Result<usize> {
        self.trigger_view().trigger(pattern, deleted)
    }

    pub fn next_dirty(&mut self) -> Option<(String, FileState)> {
        self.tracker.next_dirty()
    }

    pub fn state_of(&self, path: &str) -> FileState {
        self.tracker.state_of(path)
    }

    pub fn dirty_len(&self) -> usize {
        self.tracker.len()
    }

    pub fn is_clean(&self) -> bool {
        self.tracker.is_empty()
    }

    pub fn registry(&self) -> &PatternRegistry {
        &self.registry
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    /// Borrow the session as a [`Trigger`], the same view handlers get.
    pub fn trigger_view(&mut self) -> Trigger<'_> {
        Trigger::new(&self.registry, &mut self.tracker, self.fs.as_ref(), &self.root)
    }

    /// Drain all dirty paths into their handlers. See [`dispatch`].
    pub fn dispatch(&mut self) -> Result<usize> {
        dispatch(&self.registry, &mut self.tracker, self.fs.as_ref(), &self.root)
    }

    /// Watch the root until a fatal error. Never returns `Ok`.
    pub async fn watch(&mut self) -> Result<()> {
        self.watch_until(std::future::pending()).await
    }

    /// Watch the root with the platform watcher until `shutdown` resolves
    /// or a fatal error occurs.
    pub async fn watch_until<F>(&mut self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()>,
    {
        let (tx, rx) = mpsc::unbounded_channel::<EventMessage>();
        let subscriber = NotifySubscriber::new(tx)?;
        self.run_with(subscriber, rx, shutdown).await
    }

    /// Run the loop against any subscriber and event source.
    pub async fn run_with<S, F>(
        &mut self,
        subscriber: S,
        events: mpsc::UnboundedReceiver<EventMessage>,
        shutdown: F,
    ) -> Result<()>
    where
        S: Subscriber,
        F: Future<Output = ()>,
    {
        debug!(mode = ?self.options.mode, "starting driver");
        let mut driver = Driver::new(subscriber, events, self.options.mode, self.options.poll_interval);
        driver.run(self, shutdown).await
    }
}
