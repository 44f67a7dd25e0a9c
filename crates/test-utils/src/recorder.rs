use std::sync::{Arc, Mutex};

use ghostwriter::FileState;
use ghostwriter::registry::Handler;
use ghostwriter::tracker::Trigger;

/// Records every `(path, state)` a handler is invoked with.
#[derive(Debug, Clone, Default)]
pub struct CallRecorder {
    calls: Arc<Mutex<Vec<(String, FileState)>>>,
}

impl CallRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// A handler that only records.
    pub fn handler(&self) -> Handler {
        let calls = Arc::clone(&self.calls);
        Arc::new(move |_t: &mut Trigger<'_>, path: &str, state: FileState| {
            calls.lock().unwrap().push((path.to_string(), state));
            Ok(())
        })
    }

    /// A handler that records, then fails for `failing_path`.
    pub fn failing_handler(&self, failing_path: &str) -> Handler {
        let calls = Arc::clone(&self.calls);
        let failing_path = failing_path.to_string();
        Arc::new(move |_t: &mut Trigger<'_>, path: &str, state: FileState| {
            calls.lock().unwrap().push((path.to_string(), state));
            if path == failing_path {
                anyhow::bail!("refusing to handle {path}");
            }
            Ok(())
        })
    }

    pub fn calls(&self) -> Vec<(String, FileState)> {
        self.calls.lock().unwrap().clone()
    }

    /// Recorded paths, sorted, since dispatch order is unspecified.
    pub fn sorted_paths(&self) -> Vec<String> {
        let mut paths: Vec<String> = self.calls().into_iter().map(|(p, _)| p).collect();
        paths.sort();
        paths
    }

    pub fn count_for(&self, path: &str) -> usize {
        self.calls().iter().filter(|(p, _)| p == path).count()
    }

    pub fn state_for(&self, path: &str) -> Option<FileState> {
        self.calls()
            .into_iter()
            .rev()
            .find(|(p, _)| p == path)
            .map(|(_, s)| s)
    }

    pub fn len(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
