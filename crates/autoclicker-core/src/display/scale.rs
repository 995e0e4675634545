use crate::{CoreResult, EngineError};

use std::{
    panic::Location,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
};

use error_location::ErrorLocation;
use tracing::{debug, instrument, warn};

/// DPI that corresponds to a scale factor of 1.0.
pub const BASELINE_DPI: f64 = 96.0;

/// Platform capability that reports the display's DPI.
pub trait ScaleSource: Send + Sync {
    /// Current DPI of the primary display.
    fn dpi(&self) -> CoreResult<f64>;
}

/// Display scale factor with a 1.0 fallback.
///
/// Query failures never reach the caller: they are logged as warnings and
/// the neutral scale is returned instead.
pub struct DisplayScale {
    source: Arc<dyn ScaleSource>,
    /// Bits of the last successfully queried factor; 0 means none yet.
    last_known: AtomicU64,
}

impl DisplayScale {
    /// Wraps a scale source.
    pub fn new(source: Arc<dyn ScaleSource>) -> Self {
        Self {
            source,
            last_known: AtomicU64::new(0),
        }
    }

    /// Ratio of the reported DPI to [`BASELINE_DPI`], or 1.0 if unavailable.
    #[instrument(skip(self))]
    pub fn query(&self) -> f64 {
        let scale = self.source.dpi().and_then(|dpi| {
            let scale = dpi / BASELINE_DPI;
            if scale.is_finite() && scale > 0.0 {
                Ok(scale)
            } else {
                Err(EngineError::ScaleQueryFailure {
                    reason: format!("Reported DPI {} is not usable", dpi),
                    location: ErrorLocation::from(Location::caller()),
                })
            }
        });

        match scale {
            Ok(scale) => {
                self.last_known.store(scale.to_bits(), Ordering::Release);
                debug!(scale, "Display scale queried");
                scale
            }
            Err(e) => {
                warn!(error = %e, "Display scale unavailable, using 1.0");
                1.0
            }
        }
    }

    /// Last factor returned by a successful [`query`](Self::query).
    pub fn last_known(&self) -> Option<f64> {
        match self.last_known.load(Ordering::Acquire) {
            0 => None,
            bits => Some(f64::from_bits(bits)),
        }
    }
}

/// Physical pixel coordinate to logical units (truncating).
pub fn to_logical(physical: f64, scale: f64) -> i32 {
    (physical * scale) as i32
}

/// Logical coordinate back to physical pixels for the given scale (truncating).
pub fn to_physical(logical: i32, scale: f64) -> i32 {
    (f64::from(logical) / scale) as i32
}
