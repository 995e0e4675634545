/// Run setting that can be edited from the console.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingField {
    /// Seconds to wait after each action.
    Wait,
    /// Number of passes.
    Repetitions,
    /// Display scale used at playback.
    DpiScale,
    /// Jitter half-width in seconds.
    Jitter,
    /// Amount stored with captured scrolls.
    ScrollAmount,
}

/// Commands delivered to the controller inbox.
///
/// Sent by the console reader and the hotkey handler.
#[derive(Debug, Clone, PartialEq)]
pub enum AppCommand {
    /// Arm a capture for the next click or scroll.
    BeginCapture,
    /// Disarm a pending capture.
    CancelCapture,
    /// Remove the most recent action.
    RemoveLast,
    /// Remove every action.
    Clear,
    /// Print the recorded actions.
    List,
    /// Store a raw run setting value; validated at start.
    Set {
        /// Field to change.
        field: SettingField,
        /// Text exactly as entered.
        value: String,
    },
    /// Enable or disable delay jitter.
    SetRandomize(bool),
    /// Start playback of the current sequence.
    StartPlayback,
    /// Stop playback at the next checkpoint.
    StopPlayback,
    /// Replace the start/stop hotkeys.
    Bind {
        /// New start key name.
        start_key: String,
        /// New stop key name.
        stop_key: String,
    },
    /// Persist sequence and hotkeys.
    Save,
    /// Reload sequence and hotkeys from disk.
    Reload,
    /// Print run state and settings.
    Status,
    /// Print the command list.
    Help,
    /// Request application shutdown.
    Shutdown,
}
