//! Single-shot capture of the next pointer press or wheel event.
//!
//! The platform listener runs on its own thread for the whole process
//! lifetime and feeds every raw event into [`CaptureSession::offer`]. A
//! session only turns an event into an [`Action`] while it is armed, and
//! disarms itself on the first match.

use crate::{
    Action, ScrollDirection,
    display::{DisplayScale, to_logical},
};

use std::sync::{Arc, Mutex};

use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

/// Raw pointer input as reported by the platform listener.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RawInput {
    /// A mouse button went down at physical screen coordinates.
    PointerPress {
        /// Physical x coordinate.
        x: f64,
        /// Physical y coordinate.
        y: f64,
    },
    /// The wheel moved vertically.
    Scroll {
        /// Vertical wheel delta; positive is up.
        delta_y: f64,
    },
}

type CaptureCallback = Box<dyn FnOnce(Action) + Send>;
type ScrollAmountReader = Box<dyn Fn() -> Option<f64> + Send + Sync>;

struct PendingCapture {
    capture_id: Uuid,
    on_captured: CaptureCallback,
}

/// Converts exactly one raw event into one action per [`begin`](Self::begin).
pub struct CaptureSession {
    scale: Arc<DisplayScale>,
    scroll_amount: ScrollAmountReader,
    pending: Mutex<Option<PendingCapture>>,
}

impl CaptureSession {
    /// Creates an idle session.
    ///
    /// `scroll_amount` reads the currently configured scroll amount when a
    /// wheel event is captured. `None` means the value is unreadable.
    pub fn new<F>(scale: Arc<DisplayScale>, scroll_amount: F) -> Self
    where
        F: Fn() -> Option<f64> + Send + Sync + 'static,
    {
        Self {
            scale,
            scroll_amount: Box::new(scroll_amount),
            pending: Mutex::new(None),
        }
    }

    /// Arms the session. Any capture still pending is cancelled first.
    ///
    /// `on_captured` runs on the listener thread, at most once.
    #[instrument(skip(self, on_captured))]
    pub fn begin<F>(&self, on_captured: F) -> Uuid
    where
        F: FnOnce(Action) + Send + 'static,
    {
        let capture_id = Uuid::new_v4();
        let previous = self.lock_pending().replace(PendingCapture {
            capture_id,
            on_captured: Box::new(on_captured),
        });

        if let Some(previous) = previous {
            debug!(capture_id = %previous.capture_id, "Pending capture replaced");
        }

        info!(capture_id = %capture_id, "Capture armed");

        capture_id
    }

    /// Disarms the session without emitting an action.
    ///
    /// Returns `true` if a capture was pending.
    #[instrument(skip(self))]
    pub fn cancel(&self) -> bool {
        match self.lock_pending().take() {
            Some(pending) => {
                info!(capture_id = %pending.capture_id, "Capture cancelled");
                true
            }
            None => false,
        }
    }

    /// Whether a capture is armed.
    pub fn is_active(&self) -> bool {
        self.lock_pending().is_some()
    }

    /// Feeds one raw event. Returns the captured action if this event
    /// completed an armed capture.
    pub fn offer(&self, input: RawInput) -> Option<Action> {
        // Take under the lock so a racing press and scroll cannot both match.
        let pending = self.lock_pending().take()?;

        let action = match input {
            RawInput::PointerPress { x, y } => {
                let scale = self.scale.query();
                Action::Click {
                    x: to_logical(x, scale),
                    y: to_logical(y, scale),
                }
            }
            RawInput::Scroll { delta_y } => Action::Scroll {
                direction: ScrollDirection::from_delta(delta_y),
                amount: self.read_scroll_amount(),
            },
        };

        info!(capture_id = %pending.capture_id, %action, "Action captured");
        (pending.on_captured)(action);

        Some(action)
    }

    fn read_scroll_amount(&self) -> f64 {
        match (self.scroll_amount)() {
            Some(amount) if amount.is_finite() && amount >= 0.0 => amount,
            other => {
                warn!(value = ?other, "Scroll amount unreadable, capturing 0");
                0.0
            }
        }
    }

    fn lock_pending(&self) -> std::sync::MutexGuard<'_, Option<PendingCapture>> {
        // A poisoned lock only means a callback panicked; the slot is still valid.
        self.pending.lock().unwrap_or_else(|e| e.into_inner())
    }
}
