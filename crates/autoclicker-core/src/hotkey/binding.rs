use serde::{Deserialize, Serialize};

/// Default key that starts playback.
pub const DEFAULT_START_KEY: &str = "f6";
/// Default key that stops playback.
pub const DEFAULT_STOP_KEY: &str = "f7";

/// Start/stop key names, stored normalized (trimmed, lowercase).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HotkeyBinding {
    /// Key that starts playback.
    pub start_key: String,
    /// Key that stops playback.
    pub stop_key: String,
}

impl HotkeyBinding {
    /// Creates a binding from user-supplied key names.
    pub fn new(start_key: &str, stop_key: &str) -> Self {
        Self {
            start_key: normalize_key(start_key),
            stop_key: normalize_key(stop_key),
        }
    }

    /// Same binding with both names normalized, for values read from disk.
    pub fn normalized(&self) -> Self {
        Self::new(&self.start_key, &self.stop_key)
    }
}

impl Default for HotkeyBinding {
    fn default() -> Self {
        Self::new(DEFAULT_START_KEY, DEFAULT_STOP_KEY)
    }
}

/// Canonical form of a key name for case-insensitive comparison.
pub fn normalize_key(key: &str) -> String {
    key.trim().to_lowercase()
}
