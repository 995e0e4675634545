use crate::config::{
    default_dpi_scale, default_repetitions, default_scroll_amount, default_wait_seconds,
};

use autoclicker_core::RunSettings;
use serde::{Deserialize, Serialize};

/// Initial values for the run settings fields.
///
/// Only seeds the console fields at startup; every run re-reads the fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaybackConfig {
    /// Seconds to wait after each action.
    #[serde(default = "default_wait_seconds")]
    pub wait_seconds: f64,
    /// Number of passes over the sequence.
    #[serde(default = "default_repetitions")]
    pub repetitions: u32,
    /// Display scale used to map recorded coordinates back to pixels.
    #[serde(default = "default_dpi_scale")]
    pub dpi_scale: f64,
    /// Whether to jitter each delay.
    #[serde(default)]
    pub randomize_delay: bool,
    /// Jitter half-width in seconds.
    #[serde(default)]
    pub jitter_range: f64,
    /// Amount stored with captured scroll actions.
    #[serde(default = "default_scroll_amount")]
    pub scroll_amount: f64,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            wait_seconds: default_wait_seconds(),
            repetitions: default_repetitions(),
            dpi_scale: default_dpi_scale(),
            randomize_delay: false,
            jitter_range: 0.0,
            scroll_amount: default_scroll_amount(),
        }
    }
}

impl PlaybackConfig {
    /// Raw run settings seeded from these values.
    pub fn to_run_settings(&self) -> RunSettings {
        RunSettings {
            wait_seconds: self.wait_seconds.to_string(),
            repetitions: self.repetitions.to_string(),
            dpi_scale: self.dpi_scale.to_string(),
            randomize_delay: self.randomize_delay,
            jitter_range: self.jitter_range.to_string(),
            scroll_amount: self.scroll_amount.to_string(),
        }
    }

    /// Copies every run settings field that parses; others keep their value.
    pub fn update_from(&mut self, settings: &RunSettings) {
        fn parsed<T: std::str::FromStr>(raw: &str, current: T) -> T {
            raw.trim().parse().unwrap_or(current)
        }

        self.wait_seconds = parsed(&settings.wait_seconds, self.wait_seconds);
        self.repetitions = parsed(&settings.repetitions, self.repetitions);
        self.dpi_scale = parsed(&settings.dpi_scale, self.dpi_scale);
        self.randomize_delay = settings.randomize_delay;
        self.jitter_range = parsed(&settings.jitter_range, self.jitter_range);
        self.scroll_amount = parsed(&settings.scroll_amount, self.scroll_amount);
    }
}
