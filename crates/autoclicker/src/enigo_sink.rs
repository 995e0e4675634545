//! Real pointer injection through enigo.

use std::panic::Location;

use autoclicker_core::{CoreResult, EngineError, InputSink};
use enigo::{Axis, Button, Coordinate, Direction, Enigo, Mouse, Settings};
use error_location::ErrorLocation;
use tracing::instrument;

/// Input sink that drives the OS pointer.
///
/// NOTE: A new Enigo instance is created per call because Enigo is not
/// Send, while the engine dispatches from the blocking pool. Enigo::new()
/// is cheap (no heavy platform initialization).
#[derive(Debug, Default)]
pub struct EnigoSink;

impl EnigoSink {
    #[track_caller]
    fn enigo() -> CoreResult<Enigo> {
        Enigo::new(&Settings::default()).map_err(|e| EngineError::InjectionFailure {
            reason: format!("Failed to create Enigo: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })
    }
}

impl InputSink for EnigoSink {
    #[instrument(skip(self))]
    fn click(&self, x: i32, y: i32) -> CoreResult<()> {
        let mut enigo = Self::enigo()?;

        enigo
            .move_mouse(x, y, Coordinate::Abs)
            .map_err(|e| EngineError::InjectionFailure {
                reason: format!("Failed to move pointer to ({}, {}): {}", x, y, e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        enigo
            .button(Button::Left, Direction::Click)
            .map_err(|e| EngineError::InjectionFailure {
                reason: format!("Failed to click at ({}, {}): {}", x, y, e),
                location: ErrorLocation::from(Location::caller()),
            })
    }

    #[instrument(skip(self))]
    fn scroll(&self, delta: f64) -> CoreResult<()> {
        let mut enigo = Self::enigo()?;

        // Enigo scrolls down for positive lengths; the engine uses positive for up.
        let ticks = -(delta.round() as i32);

        enigo
            .scroll(ticks, Axis::Vertical)
            .map_err(|e| EngineError::InjectionFailure {
                reason: format!("Failed to scroll by {}: {}", delta, e),
                location: ErrorLocation::from(Location::caller()),
            })
    }
}
