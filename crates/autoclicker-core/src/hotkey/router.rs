use crate::{
    RunState,
    hotkey::{HotkeyBinding, normalize_key},
};

use tokio::sync::watch;
use tracing::{debug, info, instrument};

/// What a hotkey press asks the controller to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HotkeyTrigger {
    /// Start playback.
    Start,
    /// Stop playback.
    Stop,
}

/// Maps key-down events to playback triggers.
///
/// The binding lives in a watch channel so a rebind is a single atomic
/// replace; the key listener never restarts.
pub struct HotkeyRouter {
    binding: watch::Sender<HotkeyBinding>,
    run_state: watch::Receiver<RunState>,
}

impl HotkeyRouter {
    /// Creates a router that consults `run_state` on every key press.
    pub fn new(binding: HotkeyBinding, run_state: watch::Receiver<RunState>) -> Self {
        let (binding, _) = watch::channel(binding.normalized());
        Self { binding, run_state }
    }

    /// Replaces the start and stop keys.
    #[instrument(skip(self))]
    pub fn bind(&self, start_key: &str, stop_key: &str) -> HotkeyBinding {
        let binding = HotkeyBinding::new(start_key, stop_key);
        self.binding.send_replace(binding.clone());
        info!(start_key = %binding.start_key, stop_key = %binding.stop_key, "Hotkeys bound");
        binding
    }

    /// Current binding.
    pub fn binding(&self) -> HotkeyBinding {
        self.binding.borrow().clone()
    }

    /// Receiver that observes every rebind.
    pub fn subscribe(&self) -> watch::Receiver<HotkeyBinding> {
        self.binding.subscribe()
    }

    /// Decides what a key press means right now.
    ///
    /// The start key only triggers while idle and the stop key only while
    /// a run is active. Anything else is ignored.
    pub fn route(&self, key: &str) -> Option<HotkeyTrigger> {
        let key = normalize_key(key);
        let state = *self.run_state.borrow();
        let binding = self.binding.borrow();

        let trigger = if key == binding.start_key && state == RunState::Idle {
            Some(HotkeyTrigger::Start)
        } else if key == binding.stop_key && state.is_active() {
            Some(HotkeyTrigger::Stop)
        } else {
            None
        };

        debug!(key = %key, state = ?state, trigger = ?trigger, "Key routed");

        trigger
    }
}
