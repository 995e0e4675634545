mod logging_config;
#[allow(clippy::module_inception)]
mod config;
mod config_store;
mod playback_config;

pub(crate) use {
    config::Config, config_store::ConfigStore, logging_config::LoggingConfig,
    playback_config::PlaybackConfig,
};

pub(crate) const DEFAULT_WAIT_SECONDS: f64 = 1.0;
pub(crate) const DEFAULT_REPETITIONS: u32 = 1;
pub(crate) const DEFAULT_DPI_SCALE: f64 = 1.0;
pub(crate) const DEFAULT_SCROLL_AMOUNT: f64 = 3.0;
pub(crate) const DEFAULT_LOG_LEVEL: &str = "autoclicker=info,autoclicker_core=info";

pub(crate) fn default_wait_seconds() -> f64 {
    DEFAULT_WAIT_SECONDS
}

pub(crate) fn default_repetitions() -> u32 {
    DEFAULT_REPETITIONS
}

pub(crate) fn default_dpi_scale() -> f64 {
    DEFAULT_DPI_SCALE
}

pub(crate) fn default_scroll_amount() -> f64 {
    DEFAULT_SCROLL_AMOUNT
}

pub(crate) fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

pub(crate) fn default_true() -> bool {
    true
}
