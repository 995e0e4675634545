use crate::{CoreResult, EngineError};

use std::{panic::Location, time::Duration};

use error_location::ErrorLocation;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Run parameters as the user typed them.
///
/// Fields stay raw text until a run starts so that a bad value only fails
/// that run, with a message naming the field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSettings {
    /// Seconds to wait after each action.
    pub wait_seconds: String,
    /// Number of passes over the sequence.
    pub repetitions: String,
    /// Current display scale used to map logical coordinates back to pixels.
    pub dpi_scale: String,
    /// Whether to add jitter to each delay.
    pub randomize_delay: bool,
    /// Maximum jitter in seconds, applied in both directions.
    pub jitter_range: String,
    /// Amount stored with newly captured scroll actions.
    pub scroll_amount: String,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            wait_seconds: "1".to_string(),
            repetitions: "1".to_string(),
            dpi_scale: "1".to_string(),
            randomize_delay: false,
            jitter_range: "0".to_string(),
            scroll_amount: "3".to_string(),
        }
    }
}

impl RunSettings {
    /// Parsed scroll amount, or `None` if the field is not a number.
    pub fn scroll_amount(&self) -> Option<f64> {
        self.scroll_amount.trim().parse().ok()
    }
}

/// Validated parameters for one playback run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunConfig {
    /// Base delay after each action, in seconds (`>= 0`).
    pub wait_seconds: f64,
    /// Number of passes (`>= 1`).
    pub repetitions: u32,
    /// Display scale divisor for click coordinates (`> 0`).
    pub dpi_scale: f64,
    /// Whether to jitter each delay.
    pub randomize_delay: bool,
    /// Jitter half-width in seconds (`>= 0`).
    pub jitter_range: f64,
}

impl RunConfig {
    /// Builds a config, rejecting out-of-range values.
    #[track_caller]
    pub fn new(
        wait_seconds: f64,
        repetitions: u32,
        dpi_scale: f64,
        randomize_delay: bool,
        jitter_range: f64,
    ) -> CoreResult<Self> {
        if !wait_seconds.is_finite() || wait_seconds < 0.0 {
            return Err(invalid(format!(
                "wait time must be a non-negative number, got {}",
                wait_seconds
            )));
        }
        if repetitions == 0 {
            return Err(invalid("repetitions must be at least 1".to_string()));
        }
        if !dpi_scale.is_finite() || dpi_scale <= 0.0 {
            return Err(invalid(format!(
                "DPI scale must be greater than 0, got {}",
                dpi_scale
            )));
        }
        if !jitter_range.is_finite() || jitter_range < 0.0 {
            return Err(invalid(format!(
                "jitter range must be a non-negative number, got {}",
                jitter_range
            )));
        }

        Ok(Self {
            wait_seconds,
            repetitions,
            dpi_scale,
            randomize_delay,
            jitter_range,
        })
    }

    /// Parses and validates raw settings.
    ///
    /// # Errors
    ///
    /// Returns `InvalidRunConfig` naming the first field that is not a
    /// number or is out of range.
    #[track_caller]
    pub fn parse(settings: &RunSettings) -> CoreResult<Self> {
        let wait_seconds = parse_field::<f64>("wait time", &settings.wait_seconds)?;
        let repetitions = parse_field::<u32>("repetitions", &settings.repetitions)?;
        let dpi_scale = parse_field::<f64>("DPI scale", &settings.dpi_scale)?;
        let jitter_range = parse_field::<f64>("jitter range", &settings.jitter_range)?;

        Self::new(
            wait_seconds,
            repetitions,
            dpi_scale,
            settings.randomize_delay,
            jitter_range,
        )
    }

    /// Delay to sleep after one action.
    ///
    /// Without jitter this is exactly `wait_seconds`. With jitter it is drawn
    /// uniformly from `[wait - r, wait + r]` and clamped at zero.
    pub fn next_delay<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        let mut seconds = self.wait_seconds;
        if self.randomize_delay && self.jitter_range > 0.0 {
            seconds += rng.gen_range(-self.jitter_range..=self.jitter_range);
        }

        Duration::try_from_secs_f64(seconds.max(0.0)).unwrap_or(Duration::MAX)
    }
}

#[track_caller]
fn parse_field<T: std::str::FromStr>(name: &str, raw: &str) -> CoreResult<T> {
    raw.trim()
        .parse()
        .map_err(|_| invalid(format!("{} must be numeric, got {:?}", name, raw)))
}

#[track_caller]
fn invalid(reason: String) -> EngineError {
    EngineError::InvalidRunConfig {
        reason,
        location: ErrorLocation::from(Location::caller()),
    }
}
