use crate::{
    AppCommand, AppError, AppResult, UiCommand,
    app_command::SettingField,
    config::{Config, ConfigStore},
    console::{print_help, print_sequence, print_status, prompt, say},
    hotkey_registrar::validate_binding,
    ui_command::UiSender,
};

use std::{panic::Location, sync::Arc};

use autoclicker_core::{
    ActionSequence, CaptureSession, DisplayScale, EngineError, EngineEvent, HotkeyBinding,
    HotkeyRouter, PlaybackEngine, RunSettings,
};
use error_location::ErrorLocation;
use tokio::sync::{mpsc, oneshot, watch};
use tracing::{debug, error, info, instrument, warn};

/// Controller state.
///
/// Runs on the async runtime thread and is the only owner of the action
/// sequence. Hotkey registration and monitor queries are requested from
/// the main thread via `ui` because they must happen where the OS
/// messages are pumped.
pub struct App {
    pub(crate) sequence: ActionSequence,
    pub(crate) settings_tx: watch::Sender<RunSettings>,
    pub(crate) engine: PlaybackEngine,
    pub(crate) capture: Arc<CaptureSession>,
    pub(crate) scale: Arc<DisplayScale>,
    pub(crate) router: Arc<HotkeyRouter>,
    pub(crate) store: ConfigStore,
    pub(crate) ui: Box<dyn UiSender>,
    pub(crate) command_rx: mpsc::Receiver<AppCommand>,
    pub(crate) events_tx: mpsc::UnboundedSender<EngineEvent>,
    pub(crate) events_rx: mpsc::UnboundedReceiver<EngineEvent>,
    pub(crate) shutdown_tx: watch::Sender<bool>,
}

impl App {
    /// Run the controller loop until shutdown.
    #[instrument(skip(self))]
    pub(crate) async fn run(mut self) -> AppResult<()> {
        info!(actions = self.sequence.len(), "Autoclicker starting");
        if !self.store.is_loaded() {
            say(&format!(
                "config file {} could not be loaded, starting empty; \
                 it is kept as-is unless you 'save'",
                self.store.path().display()
            ));
        }
        say("autoclicker ready, type 'help' for commands");
        prompt();

        loop {
            tokio::select! {
                Some(event) = self.events_rx.recv() => {
                    self.handle_event(event);
                    prompt();
                }

                Some(cmd) = self.command_rx.recv() => {
                    if cmd == AppCommand::Shutdown {
                        info!("Shutdown requested");
                        break;
                    }
                    if let Err(e) = self.handle_command(cmd).await {
                        error!(error = %e, "Command failed");
                        say(&format!("error: {}", e));
                    }
                    prompt();
                }

                else => {
                    info!("All channels closed, shutting down");
                    break;
                }
            }
        }

        self.shutdown();

        Ok(())
    }

    #[instrument(skip(self))]
    pub(crate) async fn handle_command(&mut self, cmd: AppCommand) -> AppResult<()> {
        match cmd {
            AppCommand::BeginCapture => self.begin_capture(),
            AppCommand::CancelCapture => {
                if self.capture.cancel() {
                    say("capture cancelled");
                } else {
                    say("no capture pending");
                }
            }
            AppCommand::RemoveLast => match self.sequence.remove_last() {
                Ok(action) => say(&format!("removed {}", action)),
                Err(EngineError::EmptySequence { .. }) => say("no actions to remove"),
                Err(e) => return Err(e.into()),
            },
            AppCommand::Clear => {
                self.sequence.clear();
                say("all actions cleared");
            }
            AppCommand::List => print_sequence(&self.sequence),
            AppCommand::Set { field, value } => self.set_field(field, value),
            AppCommand::SetRandomize(enabled) => {
                self.settings_tx
                    .send_modify(|settings| settings.randomize_delay = enabled);
                say(&format!("random delay {}", if enabled { "on" } else { "off" }));
            }
            AppCommand::StartPlayback => self.start_playback()?,
            AppCommand::StopPlayback => {
                // Stop also abandons a capture waiting for its click.
                let cancelled = self.capture.cancel();
                if cancelled {
                    say("capture cancelled");
                }
                if !self.engine.stop() && !cancelled {
                    say("playback is not running");
                }
            }
            AppCommand::Bind {
                start_key,
                stop_key,
            } => {
                let binding = self.bind(&start_key, &stop_key).await?;
                say(&format!(
                    "hotkeys: start {}, stop {}",
                    binding.start_key, binding.stop_key
                ));
            }
            AppCommand::Save => {
                self.save()?;
                say("saved");
            }
            AppCommand::Reload => self.reload().await?,
            AppCommand::Status => {
                let settings = self.settings_tx.borrow().clone();
                print_status(
                    self.engine.state(),
                    self.capture.is_active(),
                    self.sequence.len(),
                    self.scale.last_known(),
                    &settings,
                    &self.router.binding(),
                );
            }
            AppCommand::Help => print_help(),
            AppCommand::Shutdown => {}
        }

        Ok(())
    }

    pub(crate) fn handle_event(&mut self, event: EngineEvent) {
        match event {
            EngineEvent::ActionCaptured(action) => {
                self.sequence.append(action);
                say(&format!("recorded {}", action));
            }
            EngineEvent::PlaybackProgress { remaining } => {
                say(&format!("pass done, {} remaining", remaining));
            }
            EngineEvent::PlaybackFinished => say("playback finished"),
            EngineEvent::PlaybackStopped => say("playback stopped"),
            EngineEvent::ConfigError(message) => say(&format!("invalid settings: {}", message)),
            EngineEvent::CaptureUnavailable(reason) => {
                say(&format!("pointer capture unavailable: {}", reason));
            }
        }
    }

    fn begin_capture(&self) {
        // Capture converts with the current display scale.
        if let Err(e) = self.ui.send(UiCommand::RefreshScale) {
            warn!(error = %e, "Using last known display scale");
        }

        let events_tx = self.events_tx.clone();
        let capture_id = self.capture.begin(move |action| {
            if events_tx.send(EngineEvent::ActionCaptured(action)).is_err() {
                debug!("Controller gone, captured action dropped");
            }
        });

        debug!(capture_id = %capture_id, "Capture armed");
        say("click or scroll anywhere to record it");
    }

    fn set_field(&self, field: SettingField, value: String) {
        self.settings_tx.send_modify(|settings| {
            let slot = match field {
                SettingField::Wait => &mut settings.wait_seconds,
                SettingField::Repetitions => &mut settings.repetitions,
                SettingField::DpiScale => &mut settings.dpi_scale,
                SettingField::Jitter => &mut settings.jitter_range,
                SettingField::ScrollAmount => &mut settings.scroll_amount,
            };
            *slot = value.clone();
        });
        debug!(field = ?field, value = %value, "Run setting changed");
        say(&format!("{:?} set to {}", field, value));
    }

    #[instrument(skip(self))]
    fn start_playback(&self) -> AppResult<()> {
        let settings = self.settings_tx.borrow().clone();

        match self.engine.start(self.sequence.snapshot(), &settings) {
            Ok(Some(handle)) => {
                let run_id = handle.run_id();
                say(&format!("playing {} action(s)", self.sequence.len()));
                tokio::spawn(async move {
                    match handle.join().await {
                        Ok(outcome) => debug!(
                            run_id = %run_id,
                            failures = outcome.failures,
                            stopped = outcome.stopped,
                            "Playback task ended"
                        ),
                        Err(e) => error!(run_id = %run_id, error = ?e, "Playback task panicked"),
                    }
                });
                Ok(())
            }
            Ok(None) => {
                say("playback already running");
                Ok(())
            }
            Err(EngineError::EmptySequence { .. }) => {
                say("no actions to play");
                Ok(())
            }
            // Reported to the user through EngineEvent::ConfigError.
            Err(EngineError::InvalidRunConfig { .. }) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Replaces the hotkeys once the main thread has registered them.
    ///
    /// The router keeps its binding when the names are invalid or the OS
    /// rejects them.
    #[instrument(skip(self))]
    async fn bind(&self, start_key: &str, stop_key: &str) -> AppResult<HotkeyBinding> {
        let binding = HotkeyBinding::new(start_key, stop_key);
        validate_binding(&binding)?;

        let (reply_tx, reply_rx) = oneshot::channel();
        self.ui.send(UiCommand::RebindHotkeys {
            binding: binding.clone(),
            reply: reply_tx,
        })?;

        reply_rx.await.map_err(|e| AppError::ChannelSendFailed {
            message: format!("Main thread dropped the rebind reply: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })??;

        Ok(self.router.bind(&binding.start_key, &binding.stop_key))
    }

    /// Current state in persisted form.
    fn current_config(&self) -> Config {
        let mut config = self.store.config().clone();
        config.actions = self.sequence.to_serializable();
        config.hotkeys = self.router.binding();
        config.playback.update_from(&self.settings_tx.borrow());
        config
    }

    fn save(&mut self) -> AppResult<()> {
        let config = self.current_config();
        self.store.save(config)
    }

    /// Reloads the file; nothing changes unless every step succeeds.
    #[instrument(skip(self))]
    async fn reload(&mut self) -> AppResult<()> {
        let config = self.store.read()?;
        self.bind(&config.hotkeys.start_key, &config.hotkeys.stop_key)
            .await?;

        self.sequence = config.sequence();
        self.settings_tx.send_replace(config.playback.to_run_settings());
        self.store.replace(config);

        say(&format!("reloaded {} action(s)", self.sequence.len()));

        Ok(())
    }

    pub(crate) fn shutdown(&mut self) {
        self.engine.stop();
        self.capture.cancel();

        let config = self.current_config();
        match self.store.autosave(config) {
            Ok(true) => {}
            Ok(false) => say("config file was not loaded at startup, left untouched"),
            Err(e) => error!(error = %e, "Failed to save on exit"),
        }

        let _ = self.shutdown_tx.send(true);
        if let Err(e) = self.ui.send(UiCommand::Shutdown) {
            debug!(error = %e, "Main thread already gone");
        }

        info!("Autoclicker shut down successfully");
    }
}
