use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use ghostwriter::watch::Subscriber;

/// Subscriber that only remembers which directories it was asked to watch.
#[derive(Debug, Clone, Default)]
pub struct FakeSubscriber {
    subscribed: Arc<Mutex<Vec<PathBuf>>>,
    fail_on: Option<PathBuf>,
}

impl FakeSubscriber {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the subscription for exactly `path`.
    pub fn failing_on(path: impl Into<PathBuf>) -> Self {
        Self {
            fail_on: Some(path.into()),
            ..Self::default()
        }
    }

    pub fn subscribed(&self) -> Vec<PathBuf> {
        self.subscribed.lock().unwrap().clone()
    }

    pub fn is_subscribed(&self, path: impl AsRef<Path>) -> bool {
        self.subscribed
            .lock()
            .unwrap()
            .iter()
            .any(|p| p == path.as_ref())
    }
}

impl Subscriber for FakeSubscriber {
    fn subscribe(&mut self, dir: &Path) -> anyhow::Result<()> {
        if self.fail_on.as_deref() == Some(dir) {
            anyhow::bail!("too many watches: {:?}", dir);
        }
        self.subscribed.lock().unwrap().push(dir.to_path_buf());
        Ok(())
    }
}
