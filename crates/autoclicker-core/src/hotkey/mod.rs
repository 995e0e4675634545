mod binding;
mod router;

pub use {
    binding::{DEFAULT_START_KEY, DEFAULT_STOP_KEY, HotkeyBinding, normalize_key},
    router::{HotkeyRouter, HotkeyTrigger},
};
