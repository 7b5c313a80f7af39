/*!
 * Integration tests for the async playback session
 */

use std::time::Duration;
use tokio::time::timeout;

use signplay::errors::PlaybackError;
use signplay::media::mock::{MockMediaFactory, OpenBehavior};
use signplay::playback::{PlaybackSession, PlaybackSnapshot, PlaybackState, PlayerHandle, RecordingSink, ReasonCode};
use signplay::sequence::SignSequence;

use crate::common;

const WAIT: Duration = Duration::from_secs(5);

async fn wait_for<P>(handle: &PlayerHandle, predicate: P) -> PlaybackSnapshot
where
    P: FnMut(&PlaybackSnapshot) -> bool,
{
    timeout(WAIT, handle.wait_until(predicate))
        .await
        .expect("session did not reach the expected state in time")
        .unwrap()
}

async fn wait_settled(handle: &PlayerHandle) -> PlaybackSnapshot {
    timeout(WAIT, handle.wait_until_settled())
        .await
        .expect("session did not settle in time")
        .unwrap()
}

fn playing(index: usize) -> impl FnMut(&PlaybackSnapshot) -> bool {
    move |s: &PlaybackSnapshot| s.state == PlaybackState::Playing && s.active_index == Some(index)
}

/// Test a full run over scripted media
#[tokio::test]
async fn test_session_withScriptedMedia_shouldPlayPlayableUnitsInOrder() {
    common::init_logging();
    let factory = MockMediaFactory::new();
    let probe = factory.probe();
    let sink = RecordingSink::new();
    let handle = PlaybackSession::spawn(factory, sink.clone());

    handle.load(common::sample_sequence()).unwrap();
    handle.play().unwrap();

    wait_for(&handle, playing(0)).await;
    probe.finish(probe.last_adapter().unwrap());

    // Unit 1 has no clip and is skipped
    wait_for(&handle, playing(2)).await;
    probe.finish(probe.last_adapter().unwrap());

    let snapshot = wait_settled(&handle).await;
    assert_eq!(snapshot.state, PlaybackState::Completed);
    assert_eq!(snapshot.last_reason, Some(ReasonCode::EndOfSequence));
    assert_eq!(snapshot.cursor, 3);
    assert_eq!(snapshot.active_index, None);

    assert_eq!(
        sink.states(),
        vec![
            PlaybackState::Idle,
            PlaybackState::Loading,
            PlaybackState::Playing,
            PlaybackState::Loading,
            PlaybackState::Playing,
            PlaybackState::Completed,
        ]
    );
    assert_eq!(
        probe.opened_locators(),
        vec!["/static/videos/hello.mp4", "/static/videos/you.mp4"]
    );
    assert!(probe.live_adapters().is_empty());

    handle.shutdown().await.unwrap();
}

/// Test that events from a replaced adapter change nothing
#[tokio::test]
async fn test_session_withLateEventsFromReplacedAdapter_shouldIgnoreThem() {
    common::init_logging();
    let factory = MockMediaFactory::new().with_default(OpenBehavior::Hang);
    let probe = factory.probe();
    let handle = PlaybackSession::spawn(factory, RecordingSink::new());

    handle.load(common::sample_sequence()).unwrap();
    handle.play().unwrap();
    let snapshot = handle.query().await.unwrap();
    assert_eq!(snapshot.state, PlaybackState::Loading);
    assert_eq!(snapshot.active_index, Some(0));
    let first = probe.last_adapter().unwrap();

    handle.seek(2).await.unwrap();
    let second = probe.last_adapter().unwrap();
    assert_ne!(first, second);

    // Ready from the superseded adapter must not start anything
    probe.make_ready(first);
    let snapshot = handle.query().await.unwrap();
    assert_eq!(snapshot.state, PlaybackState::Loading);
    assert_eq!(snapshot.active_index, Some(2));

    probe.make_ready(second);
    wait_for(&handle, playing(2)).await;

    // Nor may a late Ended
    probe.finish(first);
    let snapshot = handle.query().await.unwrap();
    assert_eq!(snapshot.state, PlaybackState::Playing);
    assert_eq!(snapshot.active_index, Some(2));

    probe.finish(second);
    assert_eq!(wait_settled(&handle).await.state, PlaybackState::Completed);
    handle.shutdown().await.unwrap();
}

/// Test that invalid seeks are reported and leave the session alone
#[tokio::test]
async fn test_seek_withInvalidTargets_shouldRejectWithoutStateChange() {
    let sink = RecordingSink::new();
    let handle = PlaybackSession::spawn(MockMediaFactory::new(), sink.clone());
    handle.load(common::sample_sequence()).unwrap();

    assert_eq!(
        handle.seek(1).await,
        Err(PlaybackError::NoMedia {
            index: 1,
            word: "zed".to_string()
        })
    );
    assert_eq!(handle.seek(9).await, Err(PlaybackError::OutOfRange { index: 9, len: 3 }));

    let snapshot = handle.query().await.unwrap();
    assert_eq!(snapshot.state, PlaybackState::Idle);
    assert_eq!(snapshot.cursor, 0);
    assert_eq!(sink.rejections().len(), 2);
    assert_eq!(sink.states(), vec![PlaybackState::Idle]);

    handle.shutdown().await.unwrap();
}

/// Test stop during playback followed by a late end-of-media event
#[tokio::test]
async fn test_stop_whilePlaying_shouldRewindAndIgnoreLateEnd() {
    let factory = MockMediaFactory::new();
    let probe = factory.probe();
    let handle = PlaybackSession::spawn(factory, RecordingSink::new());

    handle.load(common::sample_sequence()).unwrap();
    handle.play().unwrap();
    wait_for(&handle, playing(0)).await;
    let active = probe.last_adapter().unwrap();

    handle.stop().unwrap();
    let snapshot = handle.query().await.unwrap();
    assert_eq!(snapshot.state, PlaybackState::Stopped);
    assert_eq!(snapshot.cursor, 0);
    assert_eq!(snapshot.active_index, None);
    assert!(probe.live_adapters().is_empty());

    probe.finish(active);
    let snapshot = handle.query().await.unwrap();
    assert_eq!(snapshot.state, PlaybackState::Stopped);
    assert_eq!(snapshot.cursor, 0);

    // Play starts over from the beginning
    handle.play().unwrap();
    wait_for(&handle, playing(0)).await;
    handle.shutdown().await.unwrap();
}

/// Test toggling between playing and paused
#[tokio::test]
async fn test_toggle_shouldAlternatePauseAndResume() {
    let factory = MockMediaFactory::new();
    let probe = factory.probe();
    let handle = PlaybackSession::spawn(factory, RecordingSink::new());

    handle.load(common::sample_sequence()).unwrap();
    handle.toggle().unwrap();
    wait_for(&handle, playing(0)).await;

    handle.toggle().unwrap();
    let snapshot = handle.query().await.unwrap();
    assert_eq!(snapshot.state, PlaybackState::Paused);
    assert_eq!(snapshot.active_index, Some(0));

    // A paused run is not settled
    assert!(
        timeout(Duration::from_millis(100), handle.wait_until_settled())
            .await
            .is_err()
    );

    handle.toggle().unwrap();
    wait_for(&handle, playing(0)).await;
    assert_eq!(probe.live_adapters().len(), 1);

    handle.shutdown().await.unwrap();
}

/// Test terminal failures reported through the session
#[tokio::test]
async fn test_play_withUnplayableSequences_shouldFailWithReason() {
    let handle = PlaybackSession::spawn(MockMediaFactory::new().with_default(OpenBehavior::Fail), RecordingSink::new());

    handle.load(common::sample_sequence()).unwrap();
    handle.play().unwrap();
    let snapshot = wait_settled(&handle).await;
    assert_eq!(snapshot.state, PlaybackState::Failed);
    assert_eq!(snapshot.last_reason, Some(ReasonCode::AllMediaFailed));

    handle.load(SignSequence::empty()).unwrap();
    handle.play().unwrap();
    let snapshot = wait_settled(&handle).await;
    assert_eq!(snapshot.state, PlaybackState::Failed);
    assert_eq!(snapshot.last_reason, Some(ReasonCode::EmptySequence));

    handle.shutdown().await.unwrap();
}

/// Test that clones drive the same session and shutdown closes them all
#[tokio::test]
async fn test_shutdown_shouldCloseEveryHandleAndReleaseMedia() {
    let factory = MockMediaFactory::new();
    let probe = factory.probe();
    let handle = PlaybackSession::spawn(factory, RecordingSink::new());
    let other = handle.clone();

    handle.load(common::sample_sequence()).unwrap();
    other.play().unwrap();
    wait_for(&handle, playing(0)).await;
    assert_eq!(other.snapshot().state, PlaybackState::Playing);

    handle.shutdown().await.unwrap();
    assert!(probe.live_adapters().is_empty());
    assert!(other.is_closed());
    assert_eq!(other.play(), Err(PlaybackError::SessionClosed));
    assert_eq!(other.query().await, Err(PlaybackError::SessionClosed));
}

/// Test real clip playback from a local directory
#[tokio::test]
async fn test_session_withClipFactory_shouldSkipMissingClipsAndComplete() {
    common::init_logging();
    let dir = common::create_temp_dir().unwrap();
    common::create_clip_library(dir.path(), &["hello"]).unwrap();

    let sink = RecordingSink::new();
    let handle = PlaybackSession::spawn(common::short_clip_factory(dir.path(), 20), sink.clone());

    // "you" has a locator but no file behind it
    handle.load(common::sample_sequence()).unwrap();
    handle.play().unwrap();

    let snapshot = wait_settled(&handle).await;
    assert_eq!(snapshot.state, PlaybackState::Completed);
    assert_eq!(snapshot.last_reason, Some(ReasonCode::EndOfSequence));

    let states = sink.states();
    assert_eq!(states.iter().filter(|s| **s == PlaybackState::Playing).count(), 1);
    assert_eq!(states.last(), Some(&PlaybackState::Completed));

    handle.shutdown().await.unwrap();
}
