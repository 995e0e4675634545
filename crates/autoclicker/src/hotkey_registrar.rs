//! OS registration of the playback hotkeys.

use crate::{AppError, AppResult};

use std::{
    collections::HashMap,
    panic::Location,
    sync::{Arc, RwLock},
};

use autoclicker_core::HotkeyBinding;
use error_location::ErrorLocation;
use global_hotkey::{GlobalHotKeyManager, hotkey::HotKey};
use tracing::{error, info, instrument, warn};

/// Registered hotkey id to normalized key name, shared with the handler.
pub type HotkeyNames = Arc<RwLock<HashMap<u32, String>>>;

/// Owns the OS hotkey registrations.
///
/// Must live on a thread with a message pump (the main thread running the
/// `tao` event loop) so that `WM_HOTKEY` messages are dispatched on
/// Windows. Dropping it unregisters every hotkey.
pub struct HotkeyRegistrar {
    manager: GlobalHotKeyManager,
    registered: Vec<HotKey>,
    names: HotkeyNames,
}

impl HotkeyRegistrar {
    /// Creates a registrar with nothing registered yet.
    #[track_caller]
    #[instrument]
    pub fn new() -> AppResult<Self> {
        let manager =
            GlobalHotKeyManager::new().map_err(|e| AppError::HotkeyRegistrationFailed {
                reason: format!("Failed to create manager: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        Ok(Self {
            manager,
            registered: Vec::new(),
            names: Arc::new(RwLock::new(HashMap::new())),
        })
    }

    /// Id-to-name table the hotkey handler uses to identify presses.
    pub fn names(&self) -> HotkeyNames {
        Arc::clone(&self.names)
    }

    /// Replaces the registered keys with `binding`.
    ///
    /// Both names are parsed before anything is unregistered, so a typo
    /// leaves the previous keys working. If the OS rejects a new key, the
    /// previous keys are registered again.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn apply(&mut self, binding: &HotkeyBinding) -> AppResult<()> {
        let (start, stop) = validate_binding(binding)?;

        let previous = std::mem::take(&mut self.registered);
        if !previous.is_empty() {
            if let Err(e) = self.manager.unregister_all(&previous) {
                self.registered = previous;
                return Err(AppError::HotkeyRegistrationFailed {
                    reason: format!("Failed to unregister previous hotkeys: {}", e),
                    location: ErrorLocation::from(Location::caller()),
                });
            }
        }

        for (hotkey, name) in [(start, &binding.start_key), (stop, &binding.stop_key)] {
            if let Err(e) = self.manager.register(hotkey) {
                self.restore(previous);
                return Err(AppError::HotkeyRegistrationFailed {
                    reason: format!("Failed to register '{}': {}", name, e),
                    location: ErrorLocation::from(Location::caller()),
                });
            }
            self.registered.push(hotkey);
        }

        let mut names = self.names.write().unwrap_or_else(|e| e.into_inner());
        names.clear();
        names.insert(start.id(), binding.start_key.clone());
        names.insert(stop.id(), binding.stop_key.clone());

        info!(
            start_key = %binding.start_key,
            stop_key = %binding.stop_key,
            "Global hotkeys registered"
        );

        Ok(())
    }

    /// Drops partial new registrations and re-registers `previous`.
    ///
    /// The name table is untouched until a rebind succeeds, so it still
    /// describes `previous`.
    fn restore(&mut self, previous: Vec<HotKey>) {
        if !self.registered.is_empty() {
            if let Err(e) = self.manager.unregister_all(&self.registered) {
                warn!(error = %e, "Failed to drop partial hotkey registration");
            }
            self.registered.clear();
        }

        for hotkey in previous {
            match self.manager.register(hotkey) {
                Ok(()) => self.registered.push(hotkey),
                Err(e) => error!(hotkey_id = hotkey.id(), error = %e, "Failed to restore hotkey"),
            }
        }
    }
}

/// Parses both keys of `binding` and rejects a binding that uses one key twice.
#[track_caller]
pub(crate) fn validate_binding(binding: &HotkeyBinding) -> AppResult<(HotKey, HotKey)> {
    let start = parse_hotkey(&binding.start_key)?;
    let stop = parse_hotkey(&binding.stop_key)?;

    if start.id() == stop.id() {
        return Err(AppError::HotkeyRegistrationFailed {
            reason: format!("Start and stop keys are both '{}'", binding.start_key),
            location: ErrorLocation::from(Location::caller()),
        });
    }

    Ok((start, stop))
}

#[track_caller]
pub(crate) fn parse_hotkey(name: &str) -> AppResult<HotKey> {
    name.parse::<HotKey>()
        .map_err(|e| AppError::HotkeyRegistrationFailed {
            reason: format!("'{}' is not a known key: {}", name, e),
            location: ErrorLocation::from(Location::caller()),
        })
}
