use std::error::Error;
use std::path::PathBuf;

use notify::event::{AccessKind, CreateKind, DataChange, ModifyKind, RemoveKind, RenameMode};
use notify::{Event, EventKind};

use ghostwriter::errors::GhostwriterError;
use ghostwriter::watch::{normalize, FsWatcher, RawEvent, RawEventKind};
use ghostwriter::{FileState, TrackingPolicy};
use ghostwriter_test_utils::{mock_session, CallRecorder, FakeSubscriber};

type TestResult = Result<(), Box<dyn Error>>;

const ROOT: &str = "/project";

fn abs(rel: &str) -> PathBuf {
    PathBuf::from(ROOT).join(rel)
}

#[test]
fn watch_recursive_subscribes_every_non_ignored_directory() -> TestResult {
    let (mut session, fs) = mock_session(ROOT, TrackingPolicy::Unconditional);
    fs.add_file("/project/content/foo/bar.md");
    fs.add_file("/project/design/header.html");
    fs.add_file("/project/.git/HEAD");
    session.register_ignore(r"^\.git")?;

    let subscriber = FakeSubscriber::new();
    let mut watcher = FsWatcher::new(subscriber.clone());
    let added = watcher.watch_recursive(&mut session.trigger_view(), "")?;

    assert_eq!(added, 4);
    let mut subscribed = subscriber.subscribed();
    subscribed.sort();
    assert_eq!(
        subscribed,
        vec![PathBuf::from(ROOT), abs("content"), abs("content/foo"), abs("design")]
    );
    assert_eq!(
        watcher.watched().collect::<Vec<_>>(),
        vec!["", "content", "content/foo", "design"]
    );
    assert!(!watcher.is_watched(".git"));

    // A second pass finds nothing new.
    assert_eq!(watcher.watch_recursive(&mut session.trigger_view(), "")?, 0);
    assert_eq!(subscriber.subscribed().len(), 4);
    Ok(())
}

#[test]
fn watch_recursive_clears_stale_directory_state() -> TestResult {
    let (mut session, fs) = mock_session(ROOT, TrackingPolicy::Unconditional);
    fs.add_dir("/project/content");
    session.set_state("content", FileState::Changed);

    let mut watcher = FsWatcher::new(FakeSubscriber::new());
    watcher.watch_recursive(&mut session.trigger_view(), "")?;

    assert_eq!(session.state_of("content"), FileState::Clean);
    Ok(())
}

#[test]
fn new_directory_is_followed_and_later_writes_inside_it_are_tracked() -> TestResult {
    let (mut session, fs) = mock_session(ROOT, TrackingPolicy::RegistryGated);
    let recorder = CallRecorder::new();
    session.register_shared(r"^drafts/.*\.md$", recorder.handler())?;

    let subscriber = FakeSubscriber::new();
    let mut watcher = FsWatcher::new(subscriber.clone());
    watcher.watch_recursive(&mut session.trigger_view(), "")?;
    assert!(!subscriber.is_subscribed(abs("drafts")));

    fs.add_dir("/project/drafts");
    let created = Event::new(EventKind::Create(CreateKind::Folder)).add_path(abs("drafts"));
    watcher.handle_notify(&mut session.trigger_view(), &created)?;

    assert!(subscriber.is_subscribed(abs("drafts")));
    assert!(watcher.is_watched("drafts"));

    fs.add_file("/project/drafts/post.md");
    let written = Event::new(EventKind::Modify(ModifyKind::Data(DataChange::Content)))
        .add_path(abs("drafts/post.md"));
    watcher.handle_notify(&mut session.trigger_view(), &written)?;

    assert_eq!(session.state_of("drafts/post.md"), FileState::Changed);

    session.dispatch()?;
    assert_eq!(recorder.calls(), vec![("drafts/post.md".to_string(), FileState::Changed)]);
    Ok(())
}

#[test]
fn files_arriving_with_a_new_tree_are_marked_changed() -> TestResult {
    let (mut session, fs) = mock_session(ROOT, TrackingPolicy::Unconditional);
    let subscriber = FakeSubscriber::new();
    let mut watcher = FsWatcher::new(subscriber.clone());
    watcher.watch_recursive(&mut session.trigger_view(), "")?;

    fs.add_file("/project/moved/in/page.md");
    watcher.handle_event(
        &mut session.trigger_view(),
        &RawEvent::new(RawEventKind::Created, abs("moved")),
    )?;

    assert!(subscriber.is_subscribed(abs("moved")));
    assert!(subscriber.is_subscribed(abs("moved/in")));
    assert_eq!(session.state_of("moved/in/page.md"), FileState::Changed);
    assert_eq!(session.state_of("moved"), FileState::Clean);
    Ok(())
}

#[test]
fn removal_becomes_deleted_and_creation_of_a_file_becomes_changed() -> TestResult {
    let (mut session, fs) = mock_session(ROOT, TrackingPolicy::Unconditional);
    let mut watcher = FsWatcher::new(FakeSubscriber::new());

    fs.add_file("/project/new.txt");
    let created = Event::new(EventKind::Create(CreateKind::File)).add_path(abs("new.txt"));
    watcher.handle_notify(&mut session.trigger_view(), &created)?;

    let removed = Event::new(EventKind::Remove(RemoveKind::File)).add_path(abs("old.txt"));
    watcher.handle_notify(&mut session.trigger_view(), &removed)?;

    assert_eq!(session.state_of("new.txt"), FileState::Changed);
    assert_eq!(session.state_of("old.txt"), FileState::Deleted);
    Ok(())
}

#[test]
fn recreated_directory_is_subscribed_again() -> TestResult {
    let (mut session, fs) = mock_session(ROOT, TrackingPolicy::Unconditional);
    fs.add_file("/project/content/nested/a.md");
    let subscriber = FakeSubscriber::new();
    let mut watcher = FsWatcher::new(subscriber.clone());
    watcher.watch_recursive(&mut session.trigger_view(), "")?;

    fs.remove("/project/content");
    let removed = Event::new(EventKind::Remove(RemoveKind::Folder)).add_path(abs("content"));
    watcher.handle_notify(&mut session.trigger_view(), &removed)?;

    assert_eq!(session.state_of("content"), FileState::Deleted);

    fs.add_dir("/project/content/nested");
    let created = Event::new(EventKind::Create(CreateKind::Folder)).add_path(abs("content"));
    watcher.handle_notify(&mut session.trigger_view(), &created)?;

    let count = |path: PathBuf| subscriber.subscribed().iter().filter(|p| **p == path).count();
    assert_eq!(count(abs("content")), 2);
    assert_eq!(count(abs("content/nested")), 2);
    assert!(watcher.is_watched("content/nested"));

    fs.add_file("/project/content/nested/b.md");
    let written = Event::new(EventKind::Modify(ModifyKind::Data(DataChange::Content)))
        .add_path(abs("content/nested/b.md"));
    watcher.handle_notify(&mut session.trigger_view(), &written)?;
    assert_eq!(session.state_of("content/nested/b.md"), FileState::Changed);
    Ok(())
}

#[test]
fn create_event_resubscribes_a_directory_whose_removal_went_unreported() -> TestResult {
    let (mut session, fs) = mock_session(ROOT, TrackingPolicy::Unconditional);
    fs.add_dir("/project/drafts");
    let subscriber = FakeSubscriber::new();
    let mut watcher = FsWatcher::new(subscriber.clone());
    watcher.watch_recursive(&mut session.trigger_view(), "")?;
    assert!(watcher.is_watched("drafts"));

    // No Remove event arrives; the directory is simply created again.
    let created = Event::new(EventKind::Create(CreateKind::Folder)).add_path(abs("drafts"));
    watcher.handle_notify(&mut session.trigger_view(), &created)?;

    let drafts = subscriber.subscribed().into_iter().filter(|p| *p == abs("drafts")).count();
    assert_eq!(drafts, 2);
    Ok(())
}

#[test]
fn events_on_ignored_paths_are_discarded_before_tracking() -> TestResult {
    let (mut session, fs) = mock_session(ROOT, TrackingPolicy::Unconditional);
    session.register_ignore(r"^build")?;
    let subscriber = FakeSubscriber::new();
    let mut watcher = FsWatcher::new(subscriber.clone());

    fs.add_dir("/project/build/css");
    let created = Event::new(EventKind::Create(CreateKind::Folder)).add_path(abs("build"));
    watcher.handle_notify(&mut session.trigger_view(), &created)?;
    let written = Event::new(EventKind::Modify(ModifyKind::Any)).add_path(abs("build/index.html"));
    watcher.handle_notify(&mut session.trigger_view(), &written)?;

    assert!(session.is_clean());
    assert!(subscriber.subscribed().is_empty());
    Ok(())
}

#[test]
fn events_outside_the_root_are_skipped() -> TestResult {
    let (mut session, _fs) = mock_session(ROOT, TrackingPolicy::Unconditional);
    let mut watcher = FsWatcher::new(FakeSubscriber::new());

    let stray = Event::new(EventKind::Modify(ModifyKind::Any)).add_path(PathBuf::from("/elsewhere/a.txt"));
    watcher.handle_notify(&mut session.trigger_view(), &stray)?;

    assert!(session.is_clean());
    Ok(())
}

#[test]
fn events_through_a_linked_root_resolve_via_the_filesystem() -> TestResult {
    let (mut session, fs) = mock_session(ROOT, TrackingPolicy::Unconditional);
    fs.add_file("/project/notes.md");
    fs.link("/alias", ROOT);
    let mut watcher = FsWatcher::new(FakeSubscriber::new());

    let via_link = Event::new(EventKind::Modify(ModifyKind::Any)).add_path(PathBuf::from("/alias/notes.md"));
    watcher.handle_notify(&mut session.trigger_view(), &via_link)?;
    assert_eq!(session.state_of("notes.md"), FileState::Changed);

    // Gone paths cannot be resolved and are dropped.
    let gone = Event::new(EventKind::Remove(RemoveKind::File)).add_path(PathBuf::from("/alias/old.md"));
    watcher.handle_notify(&mut session.trigger_view(), &gone)?;
    assert_eq!(session.state_of("old.md"), FileState::Clean);
    Ok(())
}

#[test]
fn subscription_failure_is_fatal() -> TestResult {
    let (mut session, fs) = mock_session(ROOT, TrackingPolicy::Unconditional);
    fs.add_dir("/project/deep");
    let mut watcher = FsWatcher::new(FakeSubscriber::failing_on(abs("deep")));

    let err = watcher.watch_recursive(&mut session.trigger_view(), "").unwrap_err();

    match err {
        GhostwriterError::Subscription { path, .. } => assert_eq!(path, abs("deep")),
        other => panic!("expected Subscription, got {other:?}"),
    }
    Ok(())
}

#[test]
fn vanished_directory_is_not_fatal_during_translation() -> TestResult {
    let (mut session, fs) = mock_session(ROOT, TrackingPolicy::Unconditional);
    fs.add_dir("/project/flaky");
    fs.deny_read("/project/flaky");
    let subscriber = FakeSubscriber::new();
    let mut watcher = FsWatcher::new(subscriber.clone());

    let created = Event::new(EventKind::Create(CreateKind::Folder)).add_path(abs("flaky"));
    watcher.handle_notify(&mut session.trigger_view(), &created)?;

    // Subscribed before the listing failed; the failure itself is only logged.
    assert!(subscriber.is_subscribed(abs("flaky")));
    Ok(())
}

#[test]
fn normalize_splits_renames_and_drops_access_events() {
    let fs = ghostwriter::fs::mock::MockFileSystem::new(ROOT);
    fs.add_file("/project/here.txt");

    let both = Event::new(EventKind::Modify(ModifyKind::Name(RenameMode::Both)))
        .add_path(abs("a.txt"))
        .add_path(abs("b.txt"));
    assert_eq!(
        normalize(&both, &fs),
        vec![
            RawEvent::new(RawEventKind::Removed, abs("a.txt")),
            RawEvent::new(RawEventKind::Created, abs("b.txt")),
        ]
    );

    let from = Event::new(EventKind::Modify(ModifyKind::Name(RenameMode::From))).add_path(abs("a.txt"));
    assert_eq!(normalize(&from, &fs), vec![RawEvent::new(RawEventKind::Removed, abs("a.txt"))]);

    let ambiguous = Event::new(EventKind::Modify(ModifyKind::Name(RenameMode::Any)))
        .add_path(abs("here.txt"))
        .add_path(abs("gone.txt"));
    assert_eq!(
        normalize(&ambiguous, &fs),
        vec![
            RawEvent::new(RawEventKind::Created, abs("here.txt")),
            RawEvent::new(RawEventKind::Removed, abs("gone.txt")),
        ]
    );

    let access = Event::new(EventKind::Access(AccessKind::Any)).add_path(abs("here.txt"));
    assert!(normalize(&access, &fs).is_empty());
}
