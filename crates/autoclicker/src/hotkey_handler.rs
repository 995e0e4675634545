//! Global hotkey handler.
//!
//! Forwards OS hotkey presses to the [`HotkeyRouter`] and turns its
//! triggers into controller commands. Uses async channels to communicate
//! with the main application.

use crate::{AppCommand, AppError, AppResult, hotkey_registrar::HotkeyNames};

use std::{panic::Location, sync::Arc, time::Duration};

use autoclicker_core::{HotkeyRouter, HotkeyTrigger};
use error_location::ErrorLocation;
use global_hotkey::{GlobalHotKeyEvent, HotKeyState};
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, instrument, warn};

/// Routes global hotkey presses to playback commands.
pub struct HotkeyHandler {
    router: Arc<HotkeyRouter>,
    names: HotkeyNames,
    command_tx: mpsc::Sender<AppCommand>,
}

impl HotkeyHandler {
    /// Create a handler for the hotkeys listed in `names`.
    ///
    /// This struct is `Send` and can live on any thread; it only listens on
    /// the global [`GlobalHotKeyEvent`] channel.
    pub fn new(
        router: Arc<HotkeyRouter>,
        names: HotkeyNames,
        command_tx: mpsc::Sender<AppCommand>,
    ) -> Self {
        Self {
            router,
            names,
            command_tx,
        }
    }

    /// Run the hotkey handler event loop.
    ///
    /// This method blocks until a shutdown signal is received.
    #[instrument(skip(self))]
    pub async fn run(&self, mut shutdown_rx: watch::Receiver<bool>) -> AppResult<()> {
        let receiver = GlobalHotKeyEvent::receiver().clone();
        let (event_tx, mut event_rx) = mpsc::channel(32);

        // Single persistent blocking task that forwards key-down events.
        // GlobalHotKeyEvent::receiver() returns a crossbeam_channel::Receiver
        // which has blocking recv() -- zero polling, one thread.
        //
        // Shutdown: when event_rx is dropped (loop breaks), the next
        // event_tx.blocking_send() fails, breaking the blocking loop.
        let handle = tokio::task::spawn_blocking(move || {
            while let Ok(event) = receiver.recv() {
                if event.state != HotKeyState::Pressed {
                    continue;
                }
                if event_tx.blocking_send(event.id).is_err() {
                    break;
                }
            }
        });

        loop {
            tokio::select! {
                _ = shutdown_rx.changed() => {
                    info!("Hotkey handler shutting down");
                    break;
                }
                Some(hotkey_id) = event_rx.recv() => {
                    let name = self
                        .names
                        .read()
                        .unwrap_or_else(|e| e.into_inner())
                        .get(&hotkey_id)
                        .cloned();

                    match name {
                        Some(name) => self.handle_key(&name).await?,
                        None => debug!(hotkey_id, "Ignoring unregistered hotkey"),
                    }
                }
            }
        }

        // Drop event_rx to unblock the blocking task's next blocking_send().
        drop(event_rx);

        // Best-effort join: the blocking task may be stuck in recv() if no
        // hotkey event arrives after shutdown.
        match tokio::time::timeout(Duration::from_secs(1), handle).await {
            Ok(Ok(())) => debug!("Hotkey event forwarder stopped cleanly"),
            Ok(Err(e)) => warn!(error = ?e, "Hotkey event forwarder task panicked"),
            Err(_) => debug!(
                "Hotkey event forwarder did not stop within timeout, \
                   will be cleaned up on exit"
            ),
        }

        Ok(())
    }

    #[instrument(skip(self))]
    pub(crate) async fn handle_key(&self, key: &str) -> AppResult<()> {
        let command = match self.router.route(key) {
            Some(HotkeyTrigger::Start) => AppCommand::StartPlayback,
            Some(HotkeyTrigger::Stop) => AppCommand::StopPlayback,
            None => return Ok(()),
        };

        self.command_tx
            .send(command.clone())
            .await
            .map_err(|e| AppError::ChannelSendFailed {
                message: format!("Failed to send {:?}: {}", command, e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        info!(key, command = ?command, "Hotkey triggered");

        Ok(())
    }
}
