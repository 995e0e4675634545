//! Global pointer listener feeding capture sessions.
//!
//! `rdev::listen` blocks its thread for the life of the process and has no
//! way to unregister, so it is started once and every event is offered to
//! the capture session, which ignores events while disarmed.

use crate::AppResult;

use std::{panic::Location, sync::Arc, thread::JoinHandle};

use autoclicker_core::{CaptureSession, EngineError, EngineEvent, RawInput};
use error_location::ErrorLocation;
use rdev::{Event, EventType};
use tokio::sync::mpsc;
use tracing::{debug, error, info, trace};

/// Starts the listener thread.
///
/// A listener that fails to hook the OS is reported through
/// `EngineEvent::CaptureUnavailable`; capture then never completes.
#[track_caller]
pub(crate) fn spawn(
    session: Arc<CaptureSession>,
    events_tx: mpsc::UnboundedSender<EngineEvent>,
) -> AppResult<JoinHandle<()>> {
    let handle = std::thread::Builder::new()
        .name("pointer-listener".to_string())
        .spawn(move || {
            info!("Pointer listener started");

            // Button events carry no position, so track the latest move.
            let mut last_position: Option<(f64, f64)> = None;
            let callback_session = Arc::clone(&session);

            let result = rdev::listen(move |event: Event| {
                if let Some(input) = to_raw_input(&event, &mut last_position) {
                    trace!(input = ?input, "Raw pointer input");
                    callback_session.offer(input);
                }
            });

            if let Err(e) = result {
                let failure = EngineError::CaptureUnavailable {
                    reason: format!("{:?}", e),
                    location: ErrorLocation::from(Location::caller()),
                };
                error!(error = %failure, "Pointer listener stopped");
                session.cancel();
                let _ = events_tx.send(EngineEvent::CaptureUnavailable(format!("{:?}", e)));
            }
        })?;

    Ok(handle)
}

pub(crate) fn to_raw_input(
    event: &Event,
    last_position: &mut Option<(f64, f64)>,
) -> Option<RawInput> {
    match event.event_type {
        EventType::MouseMove { x, y } => {
            *last_position = Some((x, y));
            None
        }
        EventType::ButtonPress(button) => match *last_position {
            Some((x, y)) => Some(RawInput::PointerPress { x, y }),
            None => {
                debug!(button = ?button, "Button press before any pointer move, ignored");
                None
            }
        },
        EventType::Wheel { delta_y, .. } if delta_y != 0 => Some(RawInput::Scroll {
            delta_y: delta_y as f64,
        }),
        _ => None,
    }
}
