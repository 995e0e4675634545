use crate::Action;

/// Notifications from background engine activity to the controller.
///
/// Posted on an unbounded channel so senders never block, including the
/// raw input listener thread.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    /// A capture session produced an action.
    ActionCaptured(Action),
    /// A playback pass finished; `remaining` passes are left.
    PlaybackProgress {
        /// Passes still to run.
        remaining: u32,
    },
    /// Playback ran every repetition.
    PlaybackFinished,
    /// Playback exited early because stop was requested.
    PlaybackStopped,
    /// Run settings were rejected before any action was dispatched.
    ConfigError(String),
    /// The raw input listener failed; capture will not complete.
    CaptureUnavailable(String),
}
