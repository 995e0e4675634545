//! Autoclicker Core Library
//!
//! Recording and playback engine for mouse click and scroll sequences. All
//! OS access goes through the [`InputSink`] and [`ScaleSource`] capability
//! traits, so the engine can be driven without a real display.
//!
//! # Example
//!
//! ```no_run
//! use autoclicker_core::{
//!     Action, ActionSequence, CoreResult, EngineEvent, InputSink, PlaybackEngine, RunSettings,
//! };
//!
//! use std::sync::Arc;
//!
//! struct LogSink;
//!
//! impl InputSink for LogSink {
//!     fn click(&self, x: i32, y: i32) -> CoreResult<()> {
//!         println!("click {x},{y}");
//!         Ok(())
//!     }
//!
//!     fn scroll(&self, delta: f64) -> CoreResult<()> {
//!         println!("scroll {delta}");
//!         Ok(())
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> CoreResult<()> {
//!     let (events_tx, _events_rx) = tokio::sync::mpsc::unbounded_channel::<EngineEvent>();
//!     let engine = PlaybackEngine::new(Arc::new(LogSink), events_tx);
//!
//!     let mut sequence = ActionSequence::new();
//!     sequence.append(Action::Click { x: 10, y: 20 });
//!
//!     if let Some(handle) = engine.start(sequence.snapshot(), &RunSettings::default())? {
//!         let _ = handle.join().await;
//!     }
//!     Ok(())
//! }
//! ```

mod action;
mod capture;
mod display;
mod error;
mod event;
mod hotkey;
mod playback;

pub use {
    action::{Action, ActionSequence, ScrollDirection},
    capture::{CaptureSession, RawInput},
    display::{BASELINE_DPI, DisplayScale, ScaleSource, to_logical, to_physical},
    error::{EngineError, Result as CoreResult},
    event::EngineEvent,
    hotkey::{
        DEFAULT_START_KEY, DEFAULT_STOP_KEY, HotkeyBinding, HotkeyRouter, HotkeyTrigger,
        normalize_key,
    },
    playback::{
        InputSink, PlaybackEngine, PlaybackHandle, PlaybackOutcome, RunConfig, RunSettings,
        RunState,
    },
};
