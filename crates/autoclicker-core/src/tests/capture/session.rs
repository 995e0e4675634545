use crate::{
    Action, CaptureSession, DisplayScale, RawInput, ScrollDirection, tests::support::FixedDpi,
};

use std::sync::{Arc, Mutex};

fn session_with(dpi: Option<f64>, scroll_amount: Option<f64>) -> CaptureSession {
    let scale = Arc::new(DisplayScale::new(Arc::new(FixedDpi(dpi))));
    CaptureSession::new(scale, move || scroll_amount)
}

fn collector() -> (Arc<Mutex<Vec<Action>>>, impl Fn() -> Box<dyn FnOnce(Action) + Send>) {
    let captured = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&captured);
    let make = move || {
        let sink = Arc::clone(&sink);
        Box::new(move |action: Action| {
            sink.lock().unwrap_or_else(|e| e.into_inner()).push(action);
        }) as Box<dyn FnOnce(Action) + Send>
    };
    (captured, make)
}

/// WHAT: One begin plus two presses appends exactly one click
/// WHY: A capture session is single-shot
#[test]
#[allow(clippy::unwrap_used)]
fn given_armed_session_when_two_presses_arrive_then_only_first_captured() {
    // Given: An armed session at standard scaling
    let session = session_with(Some(96.0), Some(3.0));
    let (captured, make) = collector();
    session.begin(make());

    // When: Two pointer presses arrive
    let first = session.offer(RawInput::PointerPress { x: 10.0, y: 20.0 });
    let second = session.offer(RawInput::PointerPress { x: 30.0, y: 40.0 });

    // Then: Only the first became an action and the session disarmed
    assert_eq!(first, Some(Action::Click { x: 10, y: 20 }));
    assert_eq!(second, None);
    assert_eq!(*captured.lock().unwrap(), vec![Action::Click { x: 10, y: 20 }]);
    assert!(!session.is_active());
}

/// WHAT: Captured click coordinates are multiplied by the display scale
/// WHY: Clicks are stored in logical units
#[test]
fn given_scaled_display_when_press_captured_then_logical_coordinates() {
    // Given: A 1.5 scale display (144 DPI)
    let session = session_with(Some(144.0), None);
    session.begin(|_| {});

    // When: A press at physical (100, 33)
    let action = session.offer(RawInput::PointerPress { x: 100.0, y: 33.0 });

    // Then: Coordinates are scaled and truncated
    assert_eq!(action, Some(Action::Click { x: 150, y: 49 }));
}

/// WHAT: Scroll capture takes direction from the delta and amount from settings
/// WHY: The live delta magnitude is not the recorded amount
#[test]
fn given_armed_session_when_wheel_moves_then_scroll_with_configured_amount() {
    // Given: A session whose configured scroll amount is 7.5
    let session = session_with(Some(96.0), Some(7.5));
    session.begin(|_| {});

    // When: The wheel moves down by 120
    let action = session.offer(RawInput::Scroll { delta_y: -120.0 });

    // Then: A down scroll of 7.5 is captured
    assert_eq!(
        action,
        Some(Action::Scroll {
            direction: ScrollDirection::Down,
            amount: 7.5
        })
    );
}

/// WHAT: An unreadable scroll amount captures 0
/// WHY: Capture never fails on the listener thread
#[test]
fn given_unreadable_scroll_amount_when_wheel_moves_then_amount_is_zero() {
    // Given: A session whose scroll amount field cannot be read
    let session = session_with(Some(96.0), None);
    session.begin(|_| {});

    // When: The wheel moves up
    let action = session.offer(RawInput::Scroll { delta_y: 1.0 });

    // Then: The scroll is recorded with a safe amount of 0
    assert_eq!(
        action,
        Some(Action::Scroll {
            direction: ScrollDirection::Up,
            amount: 0.0
        })
    );
}

/// WHAT: Cancel before any event emits nothing
/// WHY: The user can abandon a capture (stop or new capture)
#[test]
#[allow(clippy::unwrap_used)]
fn given_armed_session_when_cancelled_then_later_press_ignored() {
    // Given: An armed session
    let session = session_with(Some(96.0), Some(1.0));
    let (captured, make) = collector();
    session.begin(make());

    // When: The capture is cancelled and a press arrives afterwards
    let was_active = session.cancel();
    let action = session.offer(RawInput::PointerPress { x: 1.0, y: 1.0 });

    // Then: Nothing was captured
    assert!(was_active);
    assert_eq!(action, None);
    assert!(captured.lock().unwrap().is_empty());
}

/// WHAT: A second begin replaces the first pending capture
/// WHY: Only one capture may be outstanding
#[test]
#[allow(clippy::unwrap_used)]
fn given_pending_capture_when_begin_called_again_then_only_new_callback_fires() {
    // Given: Two callbacks, armed one after the other
    let session = session_with(Some(96.0), Some(1.0));
    let (first, make_first) = collector();
    let (second, make_second) = collector();
    let first_id = session.begin(make_first());
    let second_id = session.begin(make_second());

    // When: A press arrives
    session.offer(RawInput::PointerPress { x: 5.0, y: 6.0 });

    // Then: Only the latest callback received the action
    assert_ne!(first_id, second_id);
    assert!(first.lock().unwrap().is_empty());
    assert_eq!(*second.lock().unwrap(), vec![Action::Click { x: 5, y: 6 }]);
}

/// WHAT: A press and a scroll racing from two threads capture exactly once
/// WHY: The pending capture is taken atomically on first match
#[test]
#[allow(clippy::unwrap_used)]
fn given_racing_press_and_scroll_when_offered_concurrently_then_single_capture() {
    for _ in 0..100 {
        // Given: An armed session shared by two listener threads
        let session = Arc::new(session_with(Some(96.0), Some(2.0)));
        let (captured, make) = collector();
        session.begin(make());

        // When: A press and a scroll are offered at the same time
        let press = {
            let session = Arc::clone(&session);
            std::thread::spawn(move || session.offer(RawInput::PointerPress { x: 1.0, y: 1.0 }))
        };
        let scroll = {
            let session = Arc::clone(&session);
            std::thread::spawn(move || session.offer(RawInput::Scroll { delta_y: 1.0 }))
        };
        let results = [press.join().unwrap(), scroll.join().unwrap()];

        // Then: Exactly one of them produced an action
        assert_eq!(results.iter().filter(|r| r.is_some()).count(), 1);
        assert_eq!(captured.lock().unwrap().len(), 1);
    }
}

/// WHAT: Offering input to an idle session does nothing
/// WHY: The platform listener feeds every event, armed or not
#[test]
fn given_idle_session_when_press_arrives_then_ignored() {
    let session = session_with(Some(96.0), Some(1.0));

    assert_eq!(
        session.offer(RawInput::PointerPress { x: 1.0, y: 2.0 }),
        None
    );
    assert!(!session.cancel());
}
