use crate::{
    Action, ActionSequence, HotkeyBinding, HotkeyRouter, HotkeyTrigger, PlaybackEngine,
    RunSettings, RunState,
    tests::support::RecordingSink,
};

use std::sync::Arc;

use tokio::sync::{mpsc, watch};

/// WHAT: Start key triggers only while idle, stop key only while running
/// WHY: Hotkeys must not restart a run or stop nothing
#[test]
fn given_run_states_when_routing_keys_then_triggers_follow_state() {
    // Given: A router bound to f6/f7 observing an idle engine
    let (state_tx, state_rx) = watch::channel(RunState::Idle);
    let router = HotkeyRouter::new(HotkeyBinding::new("F6", "F7"), state_rx);

    // When/Then: Idle accepts start, ignores stop
    assert_eq!(router.route("f6"), Some(HotkeyTrigger::Start));
    assert_eq!(router.route("f7"), None);

    // When/Then: Running accepts stop, ignores start
    state_tx.send_replace(RunState::Running);
    assert_eq!(router.route("f6"), None);
    assert_eq!(router.route("F7"), Some(HotkeyTrigger::Stop));

    // When/Then: Stopping still accepts stop
    state_tx.send_replace(RunState::Stopping);
    assert_eq!(router.route("f7"), Some(HotkeyTrigger::Stop));
}

/// WHAT: Key comparison ignores case and whitespace
/// WHY: Key names are case-insensitive identifiers
#[test]
fn given_mixed_case_key_when_routing_then_matches() {
    let (_state_tx, state_rx) = watch::channel(RunState::Idle);
    let router = HotkeyRouter::new(HotkeyBinding::new(" KeyS ", "Escape"), state_rx);

    assert_eq!(router.binding().start_key, "keys");
    assert_eq!(router.route("KEYS"), Some(HotkeyTrigger::Start));
}

/// WHAT: Unbound keys are ignored silently
/// WHY: Unrecognized key events are not errors
#[test]
fn given_unbound_key_when_routing_then_none() {
    let (_state_tx, state_rx) = watch::channel(RunState::Idle);
    let router = HotkeyRouter::new(HotkeyBinding::default(), state_rx);

    assert_eq!(router.route("space"), None);
    assert_eq!(router.route(""), None);
}

/// WHAT: Rebinding mid-run leaves the run alone and only affects later presses
/// WHY: The binding is swapped atomically without touching playback
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_running_playback_when_rebinding_start_key_then_run_unaffected() {
    // Given: A slow run in progress and a router bound to f6/f7
    let sink = Arc::new(RecordingSink::default());
    let (events_tx, _events_rx) = mpsc::unbounded_channel();
    let engine = PlaybackEngine::new(sink.clone(), events_tx);
    let router = HotkeyRouter::new(HotkeyBinding::new("f6", "f7"), engine.subscribe_state());
    let mut binding_rx = router.subscribe();

    let mut sequence = ActionSequence::new();
    sequence.append(Action::Click { x: 1, y: 1 });
    sequence.append(Action::Click { x: 2, y: 2 });
    let settings = RunSettings {
        wait_seconds: "0.05".to_string(),
        repetitions: "2".to_string(),
        ..RunSettings::default()
    };
    let handle = engine.start(sequence.snapshot(), &settings).unwrap().unwrap();

    // When: The start key is rebound from f6 to f9 while the run is active
    router.bind("f9", "f7");

    // Then: The subscriber sees the new binding and the run still completes fully
    assert!(binding_rx.has_changed().unwrap());
    assert_eq!(binding_rx.borrow_and_update().start_key, "f9");
    let outcome = handle.join().await.unwrap();
    assert_eq!(outcome.completed_passes, 2);
    assert_eq!(sink.calls().len(), 4);

    // Then: Future checks use the new binding only
    assert_eq!(engine.state(), RunState::Idle);
    assert_eq!(router.route("f6"), None);
    assert_eq!(router.route("f9"), Some(HotkeyTrigger::Start));
}
