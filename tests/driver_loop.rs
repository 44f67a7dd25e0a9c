use std::error::Error;
use std::fs;
use std::time::Duration;

use notify::event::{CreateKind, DataChange, ModifyKind};
use notify::{Event, EventKind};
use tempfile::TempDir;
use tokio::sync::mpsc;

use ghostwriter::errors::GhostwriterError;
use ghostwriter::watch::EventMessage;
use ghostwriter::{DriverMode, FileState};
use ghostwriter_test_utils::{init_tracing, tree_session, with_timeout, CallRecorder, FakeSubscriber};

type TestResult = Result<(), Box<dyn Error>>;

#[tokio::test]
async fn queued_events_are_processed_before_a_closed_queue_stops_the_loop() -> TestResult {
    init_tracing();
    let dir = TempDir::new()?;
    let mut session = tree_session(dir.path(), DriverMode::Event);
    let recorder = CallRecorder::new();
    session.register_shared(r"^drafts/.*\.md$", recorder.handler())?;

    let drafts = session.root().join("drafts");
    fs::create_dir(&drafts)?;
    fs::write(drafts.join("post.md"), "# hello")?;

    let (tx, rx) = mpsc::unbounded_channel::<EventMessage>();
    tx.send(Ok(Event::new(EventKind::Create(CreateKind::Folder)).add_path(drafts.clone())))?;
    tx.send(Ok(
        Event::new(EventKind::Modify(ModifyKind::Data(DataChange::Content))).add_path(drafts.join("post.md")),
    ))?;
    drop(tx);

    let subscriber = FakeSubscriber::new();
    let result = with_timeout(session.run_with(subscriber.clone(), rx, std::future::pending())).await;

    assert!(matches!(result, Err(GhostwriterError::EventChannelClosed)));
    assert!(subscriber.is_subscribed(session.root()));
    assert!(subscriber.is_subscribed(&drafts));
    // Once for the file found under the new directory, once for the write.
    assert_eq!(recorder.count_for("drafts/post.md"), 2);
    assert_eq!(recorder.state_for("drafts/post.md"), Some(FileState::Changed));
    assert!(session.is_clean());
    Ok(())
}

#[tokio::test]
async fn backend_error_is_fatal() -> TestResult {
    let dir = TempDir::new()?;
    let mut session = tree_session(dir.path(), DriverMode::Event);

    let (tx, rx) = mpsc::unbounded_channel::<EventMessage>();
    tx.send(Err(notify::Error::generic("inotify queue overflow")))?;

    let result = with_timeout(session.run_with(FakeSubscriber::new(), rx, std::future::pending())).await;

    match result {
        Err(GhostwriterError::Notify(err)) => assert!(err.to_string().contains("overflow")),
        other => panic!("expected Notify error, got {other:?}"),
    }
    drop(tx);
    Ok(())
}

#[tokio::test]
async fn resolved_shutdown_leaves_the_loop_cleanly() -> TestResult {
    let dir = TempDir::new()?;
    let mut session = tree_session(dir.path(), DriverMode::Polling);
    let (_tx, rx) = mpsc::unbounded_channel::<EventMessage>();

    let subscriber = FakeSubscriber::new();
    with_timeout(session.run_with(subscriber.clone(), rx, std::future::ready(()))).await?;

    // The root is subscribed before the loop starts.
    assert_eq!(subscriber.subscribed(), vec![session.root().to_path_buf()]);
    Ok(())
}

#[tokio::test]
async fn failing_subscription_aborts_before_the_loop() -> TestResult {
    let dir = TempDir::new()?;
    fs::create_dir(dir.path().join("nested"))?;
    let mut session = tree_session(dir.path(), DriverMode::Polling);
    let nested = session.root().join("nested");
    let (_tx, rx) = mpsc::unbounded_channel::<EventMessage>();

    let result = with_timeout(session.run_with(
        FakeSubscriber::failing_on(&nested),
        rx,
        std::future::pending(),
    ))
    .await;

    match result {
        Err(GhostwriterError::Subscription { path, .. }) => assert_eq!(path, nested),
        other => panic!("expected Subscription error, got {other:?}"),
    }
    Ok(())
}

#[tokio::test]
async fn polling_mode_dispatches_state_declared_before_the_loop() -> TestResult {
    let dir = TempDir::new()?;
    let mut session = tree_session(dir.path(), DriverMode::Polling);
    let recorder = CallRecorder::new();
    session.register_shared(r"\.css$", recorder.handler())?;
    session.set_state("site.css", FileState::Deleted);

    let (_tx, rx) = mpsc::unbounded_channel::<EventMessage>();
    let shutdown = tokio::time::sleep(Duration::from_millis(100));
    with_timeout(session.run_with(FakeSubscriber::new(), rx, shutdown)).await?;

    assert_eq!(recorder.calls(), vec![("site.css".to_string(), FileState::Deleted)]);
    assert!(session.is_clean());
    Ok(())
}

#[tokio::test]
async fn event_mode_only_dispatches_after_an_event() -> TestResult {
    let dir = TempDir::new()?;
    let mut session = tree_session(dir.path(), DriverMode::Event);
    let recorder = CallRecorder::new();
    session.register_shared(r"\.css$", recorder.handler())?;
    session.set_state("site.css", FileState::Changed);

    let (_tx, rx) = mpsc::unbounded_channel::<EventMessage>();
    let shutdown = tokio::time::sleep(Duration::from_millis(50));
    with_timeout(session.run_with(FakeSubscriber::new(), rx, shutdown)).await?;

    assert!(recorder.is_empty());
    assert_eq!(session.state_of("site.css"), FileState::Changed);
    Ok(())
}

#[tokio::test]
async fn handler_error_stops_the_loop() -> TestResult {
    let dir = TempDir::new()?;
    let mut session = tree_session(dir.path(), DriverMode::Polling);
    let recorder = CallRecorder::new();
    session.register_shared(r"^broken\.md$", recorder.failing_handler("broken.md"))?;
    session.set_state("broken.md", FileState::Changed);

    let (_tx, rx) = mpsc::unbounded_channel::<EventMessage>();
    let result = with_timeout(session.run_with(FakeSubscriber::new(), rx, std::future::pending())).await;

    match result {
        Err(GhostwriterError::Handler { path, .. }) => assert_eq!(path, "broken.md"),
        other => panic!("expected Handler error, got {other:?}"),
    }
    assert_eq!(recorder.count_for("broken.md"), 1);
    Ok(())
}
