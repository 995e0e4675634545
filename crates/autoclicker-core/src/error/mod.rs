use error_location::ErrorLocation;
use thiserror::Error;

/// Engine errors with source location tracking.
#[derive(Error, Debug)]
pub enum EngineError {
    /// The action sequence has no actions to remove or play.
    #[error("Action sequence is empty {location}")]
    EmptySequence {
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The raw input listener could not be started.
    #[error("Capture unavailable: {reason} {location}")]
    CaptureUnavailable {
        /// Description of the listener failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// A single click or scroll could not be injected.
    #[error("Input injection failed: {reason} {location}")]
    InjectionFailure {
        /// Description of the injection failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The display scale factor could not be queried.
    #[error("Display scale query failed: {reason} {location}")]
    ScaleQueryFailure {
        /// Description of the query failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Run parameters are non-numeric or out of range.
    #[error("Invalid run configuration: {reason} {location}")]
    InvalidRunConfig {
        /// Which field was rejected and why.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },
}

/// Result type alias using [`EngineError`].
pub type Result<T> = std::result::Result<T, EngineError>;
