use crate::{AppError, AppResult};

use std::panic::Location;

use autoclicker_core::HotkeyBinding;
use error_location::ErrorLocation;
use tao::event_loop::EventLoopProxy;
use tokio::sync::oneshot;

/// Commands sent from the async runtime to the main UI thread.
///
/// The main thread owns the `GlobalHotKeyManager` (registration must happen
/// on the thread that pumps OS messages) and the monitor handles, so hotkey
/// and display changes flow through this enum.
#[derive(Debug)]
pub enum UiCommand {
    /// Re-register the OS hotkeys for a new binding.
    ///
    /// The outcome is sent back on `reply`; on failure the previous keys
    /// stay registered.
    RebindHotkeys {
        /// Keys to register.
        binding: HotkeyBinding,
        /// Registration result.
        reply: oneshot::Sender<AppResult<()>>,
    },
    /// Re-read the primary monitor scale factor.
    RefreshScale,
    /// Shut down the application. The main thread will exit the event loop.
    Shutdown,
}

/// Delivery of [`UiCommand`]s to the main thread.
pub trait UiSender: Send {
    /// Queues `command` for the main thread.
    fn send(&self, command: UiCommand) -> AppResult<()>;
}

impl UiSender for EventLoopProxy<UiCommand> {
    fn send(&self, command: UiCommand) -> AppResult<()> {
        self.send_event(command)
            .map_err(|e| AppError::ChannelSendFailed {
                message: format!("Main thread event loop closed: {:?}", e),
                location: ErrorLocation::from(Location::caller()),
            })
    }
}
