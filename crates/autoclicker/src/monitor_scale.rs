use std::{
    panic::Location,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
};

use autoclicker_core::{BASELINE_DPI, CoreResult, EngineError, ScaleSource};
use error_location::ErrorLocation;
use tracing::debug;

/// Primary monitor DPI published by the main thread.
///
/// Monitor handles can only be queried from the event loop thread, so the
/// main thread writes the latest reading here and capture reads it from
/// the listener thread.
#[derive(Debug, Clone, Default)]
pub struct MonitorScale {
    /// f64 bits of the DPI; 0 means not yet known.
    dpi_bits: Arc<AtomicU64>,
}

impl MonitorScale {
    /// Records a tao/winit scale factor (1.0 = 96 DPI).
    pub fn publish_scale_factor(&self, scale_factor: f64) {
        let dpi = scale_factor * BASELINE_DPI;
        self.dpi_bits.store(dpi.to_bits(), Ordering::Release);
        debug!(scale_factor, dpi, "Monitor scale published");
    }

    /// Forgets the reading, e.g. when no monitor is attached.
    pub fn clear(&self) {
        self.dpi_bits.store(0, Ordering::Release);
    }
}

impl ScaleSource for MonitorScale {
    fn dpi(&self) -> CoreResult<f64> {
        match self.dpi_bits.load(Ordering::Acquire) {
            0 => Err(EngineError::ScaleQueryFailure {
                reason: "No monitor scale reported yet".to_string(),
                location: ErrorLocation::from(Location::caller()),
            }),
            bits => Ok(f64::from_bits(bits)),
        }
    }
}
