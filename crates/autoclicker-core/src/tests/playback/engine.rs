use crate::{
    Action, ActionSequence, EngineError, EngineEvent, PlaybackEngine, RunSettings, RunState,
    ScrollDirection,
    tests::support::{Dispatched, RecordingSink},
};

use std::{sync::Arc, time::Duration};

use tokio::sync::mpsc;

fn run_settings(wait: &str, reps: &str, dpi: &str) -> RunSettings {
    RunSettings {
        wait_seconds: wait.to_string(),
        repetitions: reps.to_string(),
        dpi_scale: dpi.to_string(),
        randomize_delay: false,
        jitter_range: "0".to_string(),
        scroll_amount: "3".to_string(),
    }
}

fn click_then_scroll() -> ActionSequence {
    let mut sequence = ActionSequence::new();
    sequence.append(Action::Click { x: 10, y: 20 });
    sequence.append(Action::Scroll {
        direction: ScrollDirection::Up,
        amount: 5.0,
    });
    sequence
}

fn drain(events: &mut mpsc::UnboundedReceiver<EngineEvent>) -> Vec<EngineEvent> {
    let mut out = Vec::new();
    while let Ok(event) = events.try_recv() {
        out.push(event);
    }
    out
}

/// WHAT: Two passes over [click, scroll] dispatch four primitives in order
/// WHY: Actions run strictly in sequence order, pass after pass
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_click_and_scroll_when_playing_twice_then_four_calls_in_order() {
    // Given: An engine with a recording sink
    let sink = Arc::new(RecordingSink::default());
    let (events_tx, mut events_rx) = mpsc::unbounded_channel();
    let engine = PlaybackEngine::new(sink.clone(), events_tx);

    // When: Playing [Click{10,20}, Scroll{Up,5}] twice with no wait at scale 1.0
    let handle = engine
        .start(click_then_scroll().snapshot(), &run_settings("0", "2", "1.0"))
        .unwrap()
        .unwrap();
    let outcome = handle.join().await.unwrap();

    // Then: Exactly four calls, in order, and the run finished normally
    assert_eq!(
        sink.calls(),
        vec![
            Dispatched::Click(10, 20),
            Dispatched::Scroll(5.0),
            Dispatched::Click(10, 20),
            Dispatched::Scroll(5.0),
        ]
    );
    assert_eq!(outcome.completed_passes, 2);
    assert_eq!(outcome.dispatched, 4);
    assert!(!outcome.stopped);
    assert_eq!(engine.state(), RunState::Idle);
    assert_eq!(
        drain(&mut events_rx),
        vec![
            EngineEvent::PlaybackProgress { remaining: 1 },
            EngineEvent::PlaybackProgress { remaining: 0 },
            EngineEvent::PlaybackFinished,
        ]
    );
}

/// WHAT: Click coordinates are divided by the run's DPI scale
/// WHY: Logical coordinates map back to the current physical pixel space
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_dpi_scale_when_playing_click_then_coordinates_denormalized() {
    // Given: A logical click at (300, 151)
    let sink = Arc::new(RecordingSink::default());
    let (events_tx, _events_rx) = mpsc::unbounded_channel();
    let engine = PlaybackEngine::new(sink.clone(), events_tx);
    let mut sequence = ActionSequence::new();
    sequence.append(Action::Click { x: 300, y: 151 });

    // When: Playing at scale 1.5
    let handle = engine
        .start(sequence.snapshot(), &run_settings("0", "1", "1.5"))
        .unwrap()
        .unwrap();
    handle.join().await.unwrap();

    // Then: The sink receives truncated physical coordinates
    assert_eq!(sink.calls(), vec![Dispatched::Click(200, 100)]);
}

/// WHAT: Stop requested during a dispatch ends the run before the next action
/// WHY: At most one more dispatch may follow a stop call
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_stop_during_dispatch_when_playing_then_no_further_actions() {
    // Given: A sink that requests stop while performing its second call
    let sink = Arc::new(RecordingSink::stopping_after(1));
    let (events_tx, mut events_rx) = mpsc::unbounded_channel();
    let engine = PlaybackEngine::new(sink.clone(), events_tx);
    sink.attach(engine.clone());

    // When: Playing a long run
    let handle = engine
        .start(click_then_scroll().snapshot(), &run_settings("0", "50", "1"))
        .unwrap()
        .unwrap();
    let outcome = handle.join().await.unwrap();

    // Then: The in-flight call completed and nothing else was dispatched
    assert_eq!(sink.calls().len(), 2);
    assert!(outcome.stopped);
    assert!(outcome.completed_passes <= 50);
    assert_eq!(engine.state(), RunState::Idle);
    assert_eq!(drain(&mut events_rx).last(), Some(&EngineEvent::PlaybackStopped));
}

/// WHAT: Stop interrupts the inter-action sleep
/// WHY: A long wait must not delay a stop request
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_long_wait_when_stopped_then_run_ends_promptly() {
    // Given: A run that waits an hour between actions
    let sink = Arc::new(RecordingSink::default());
    let (events_tx, _events_rx) = mpsc::unbounded_channel();
    let engine = PlaybackEngine::new(sink.clone(), events_tx);
    let handle = engine
        .start(click_then_scroll().snapshot(), &run_settings("3600", "1", "1"))
        .unwrap()
        .unwrap();

    // When: Stop is requested once the first action has been dispatched
    while sink.calls().is_empty() {
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    assert!(engine.stop());
    let outcome = tokio::time::timeout(Duration::from_secs(5), handle.join())
        .await
        .unwrap()
        .unwrap();

    // Then: Only the first action ran
    assert!(outcome.stopped);
    assert_eq!(sink.calls(), vec![Dispatched::Click(10, 20)]);
}

/// WHAT: Stop is idempotent and harmless while idle
/// WHY: Stop may be called from any thread at any time
#[tokio::test]
async fn given_idle_engine_when_stopping_twice_then_no_effect() {
    let sink = Arc::new(RecordingSink::default());
    let (events_tx, mut events_rx) = mpsc::unbounded_channel();
    let engine = PlaybackEngine::new(sink, events_tx);

    assert!(!engine.stop());
    assert!(!engine.stop());
    assert_eq!(engine.state(), RunState::Idle);
    assert!(drain(&mut events_rx).is_empty());
}

/// WHAT: A second start while running is a no-op
/// WHY: At most one playback task per engine
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_running_engine_when_started_again_then_ignored() {
    // Given: A run in progress with a long wait
    let sink = Arc::new(RecordingSink::default());
    let (events_tx, _events_rx) = mpsc::unbounded_channel();
    let engine = PlaybackEngine::new(sink.clone(), events_tx);
    let first = engine
        .start(click_then_scroll().snapshot(), &run_settings("3600", "1", "1"))
        .unwrap()
        .unwrap();

    // When: Starting again
    let second = engine
        .start(click_then_scroll().snapshot(), &run_settings("0", "1", "1"))
        .unwrap();

    // Then: No second run was spawned
    assert!(second.is_none());
    assert!(engine.state().is_active());

    engine.stop();
    first.join().await.unwrap();
    assert_eq!(engine.state(), RunState::Idle);
}

/// WHAT: Invalid settings abort with a ConfigError and zero dispatches
/// WHY: Bad input must have no side effects on the real pointer
#[tokio::test]
async fn given_non_numeric_wait_when_starting_then_config_error_and_nothing_dispatched() {
    // Given: Settings with a non-numeric wait time
    let sink = Arc::new(RecordingSink::default());
    let (events_tx, mut events_rx) = mpsc::unbounded_channel();
    let engine = PlaybackEngine::new(sink.clone(), events_tx);

    // When: Starting
    let result = engine.start(click_then_scroll().snapshot(), &run_settings("soon", "1", "1"));

    // Then: InvalidRunConfig, a ConfigError event, no calls and still idle
    assert!(matches!(result, Err(EngineError::InvalidRunConfig { .. })));
    let events = drain(&mut events_rx);
    assert_eq!(events.len(), 1);
    assert!(matches!(&events[0], EngineEvent::ConfigError(message) if message.contains("wait")));
    assert!(sink.calls().is_empty());
    assert_eq!(engine.state(), RunState::Idle);
}

/// WHAT: Starting with no actions fails with EmptySequence
/// WHY: There is nothing to replay
#[tokio::test]
async fn given_empty_snapshot_when_starting_then_empty_sequence() {
    let sink = Arc::new(RecordingSink::default());
    let (events_tx, _events_rx) = mpsc::unbounded_channel();
    let engine = PlaybackEngine::new(sink, events_tx);

    let result = engine.start(ActionSequence::new().snapshot(), &run_settings("0", "1", "1"));

    assert!(matches!(result, Err(EngineError::EmptySequence { .. })));
    assert_eq!(engine.state(), RunState::Idle);
}

/// WHAT: A failing dispatch is skipped and the run continues
/// WHY: One bad coordinate must not abort the whole run
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_failing_first_call_when_playing_then_remaining_actions_dispatched() {
    // Given: A sink that fails its first call
    let sink = Arc::new(RecordingSink::failing_on(vec![0]));
    let (events_tx, mut events_rx) = mpsc::unbounded_channel();
    let engine = PlaybackEngine::new(sink.clone(), events_tx);

    // When: Playing one pass
    let handle = engine
        .start(click_then_scroll().snapshot(), &run_settings("0", "1", "1"))
        .unwrap()
        .unwrap();
    let outcome = handle.join().await.unwrap();

    // Then: Both actions were attempted, one failure counted, run finished
    assert_eq!(sink.calls().len(), 2);
    assert_eq!(outcome.failures, 1);
    assert!(!outcome.stopped);
    assert_eq!(drain(&mut events_rx).last(), Some(&EngineEvent::PlaybackFinished));
}

/// WHAT: Edits after start do not affect the running pass
/// WHY: Playback iterates the snapshot taken at start
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_running_playback_when_sequence_cleared_then_snapshot_still_played() {
    // Given: A run started from a two-action sequence
    let sink = Arc::new(RecordingSink::default());
    let (events_tx, _events_rx) = mpsc::unbounded_channel();
    let engine = PlaybackEngine::new(sink.clone(), events_tx);
    let mut sequence = click_then_scroll();
    let handle = engine
        .start(sequence.snapshot(), &run_settings("0.01", "1", "1"))
        .unwrap()
        .unwrap();

    // When: The live sequence is cleared mid-run
    sequence.clear();
    handle.join().await.unwrap();

    // Then: Both snapshot actions were still dispatched
    assert_eq!(sink.calls().len(), 2);
    assert!(sequence.is_empty());
}
