mod engine;
mod run_config;
mod sink;

pub use {
    engine::{PlaybackEngine, PlaybackHandle, PlaybackOutcome, RunState},
    run_config::{RunConfig, RunSettings},
    sink::InputSink,
};
