use std::error::Error;
use std::sync::{Arc, Mutex};

use ghostwriter::errors::GhostwriterError;
use ghostwriter::registry::PatternRegistry;
use ghostwriter::tracker::{DirtyTracker, SilentObserver, Trigger};
use ghostwriter::fs::mock::MockFileSystem;
use ghostwriter::{FileState, TrackingPolicy};

type TestResult = Result<(), Box<dyn Error>>;

fn noop(_t: &mut Trigger<'_>, _path: &str, _state: FileState) -> anyhow::Result<()> {
    Ok(())
}

#[test]
fn malformed_handler_pattern_is_rejected_without_registering() {
    let mut registry = PatternRegistry::new();

    let err = registry.register_handler("content/(.*\\.md", noop).unwrap_err();

    match err {
        GhostwriterError::InvalidPattern { pattern, .. } => assert_eq!(pattern, "content/(.*\\.md"),
        other => panic!("expected InvalidPattern, got {other:?}"),
    }
    assert!(registry.rules().is_empty());
}

#[test]
fn malformed_ignore_pattern_is_rejected() {
    let mut registry = PatternRegistry::new();
    assert!(matches!(
        registry.register_ignore("[unclosed"),
        Err(GhostwriterError::InvalidPattern { .. })
    ));
    assert!(registry.ignores().is_empty());
}

#[test]
fn patterns_match_anywhere_unless_anchored() -> TestResult {
    let mut registry = PatternRegistry::new();
    registry.register_handler(r"\.md", noop)?;
    registry.register_ignore(r"^build/")?;

    assert!(registry.matches_any_rule("content/index.md"));
    assert!(registry.matches_any_rule("notes.md.bak"));
    assert!(!registry.matches_any_rule("content/index.html"));

    assert!(registry.is_ignored("build/index.html"));
    assert!(!registry.is_ignored("src/build/index.html"));
    Ok(())
}

#[test]
fn handlers_for_returns_every_match_in_registration_order() -> TestResult {
    let order = Arc::new(Mutex::new(Vec::new()));
    let mut registry = PatternRegistry::new();

    for (label, pattern) in [("first", r"^content/"), ("never", r"^design/"), ("second", r"\.md$")] {
        let order = Arc::clone(&order);
        registry.register_handler(pattern, move |_t, _path, _state| {
            order.lock().unwrap().push(label);
            Ok(())
        })?;
    }

    let handlers = registry.handlers_for("content/a.md");
    assert_eq!(handlers.len(), 2);

    let fs = MockFileSystem::new("/project");
    let mut tracker = DirtyTracker::new(TrackingPolicy::RegistryGated, Arc::new(SilentObserver));
    let root = std::path::PathBuf::from("/project");
    for handler in handlers {
        let mut t = Trigger::new(&registry, &mut tracker, &fs, &root);
        handler(&mut t, "content/a.md", FileState::Changed)?;
    }

    assert_eq!(*order.lock().unwrap(), vec!["first", "second"]);
    Ok(())
}

#[test]
fn nothing_matches_an_empty_registry() {
    let registry = PatternRegistry::new();
    assert!(!registry.matches_any_rule("a.txt"));
    assert!(!registry.is_ignored("a.txt"));
    assert!(registry.handlers_for("a.txt").is_empty());
}
