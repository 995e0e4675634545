//! Autoclicker: records clicks and scrolls and replays them, with global hotkey control.

mod app;
mod app_command;
mod config;
mod console;
mod enigo_sink;
mod error;
mod hotkey_handler;
mod hotkey_registrar;
mod logging;
mod monitor_scale;
mod pointer_listener;
mod ui_command;

pub(crate) use {
    app::App,
    app_command::AppCommand,
    enigo_sink::EnigoSink,
    error::{AppError, Result as AppResult},
    hotkey_handler::HotkeyHandler,
    hotkey_registrar::{HotkeyNames, HotkeyRegistrar},
    monitor_scale::MonitorScale,
    ui_command::UiCommand,
};

use crate::config::{Config, ConfigStore};

use std::{path::PathBuf, sync::Arc};

use autoclicker_core::{CaptureSession, DisplayScale, EngineEvent, HotkeyRouter, PlaybackEngine};
use tao::{
    event::{Event, StartCause},
    event_loop::{ControlFlow, EventLoopBuilder, EventLoopProxy, EventLoopWindowTarget},
};
use tokio::sync::{mpsc, watch};
use tracing::{error, info, warn};

/// Application entry point.
fn main() {
    let (config_path, path_error) = match Config::config_path() {
        Ok(path) => (path, None),
        Err(e) => (PathBuf::from("autoclicker.toml"), Some(e)),
    };
    let (store, load_error) = ConfigStore::open(config_path);

    // Held by the event loop closure so file logs flush on exit.
    let log_guard = logging::init(&store.config().logging);

    if let Some(e) = path_error {
        warn!(error = %e, "No config directory, using working directory");
    }
    if let Some(e) = load_error {
        error!(
            error = %e,
            config_path = ?store.path(),
            "Failed to load config, continuing with defaults; the file is left untouched"
        );
    }

    let event_loop = EventLoopBuilder::<UiCommand>::with_user_event().build();
    let ui_proxy = event_loop.create_proxy();
    let monitor_scale = MonitorScale::default();

    // Taken once at Init and moved onto the runtime thread.
    let mut pending_store = Some(store);

    // Persists across event loop iterations; dropping it unregisters the hotkeys.
    let mut registrar: Option<HotkeyRegistrar> = None;

    event_loop.run(move |event, target, control_flow| {
        *control_flow = ControlFlow::Wait;

        match event {
            Event::UserEvent(cmd) => {
                match cmd {
                    UiCommand::RebindHotkeys { binding, reply } => {
                        let result = match registrar.as_mut() {
                            Some(registrar) => registrar.apply(&binding),
                            None => {
                                warn!("Hotkeys unavailable, binding kept for routing only");
                                Ok(())
                            }
                        };
                        if let Err(e) = &result {
                            error!(error = %e, "Failed to rebind hotkeys, previous keys kept");
                        }
                        // The controller may have given up waiting.
                        let _ = reply.send(result);
                    }
                    UiCommand::RefreshScale => publish_scale(target, &monitor_scale),
                    UiCommand::Shutdown => {
                        *control_flow = ControlFlow::ExitWithCode(0);
                    }
                }
                return;
            }
            Event::NewEvents(StartCause::Init) => {
                let Some(store) = pending_store.take() else {
                    return;
                };

                publish_scale(target, &monitor_scale);

                // Register hotkeys on the main thread; tao's event loop pumps
                // the Windows messages needed for WM_HOTKEY delivery.
                let names = match HotkeyRegistrar::new() {
                    Ok(mut created) => {
                        if let Err(e) = created.apply(&store.config().hotkeys) {
                            error!(error = %e, "Failed to register hotkeys");
                        }
                        let names = created.names();
                        registrar = Some(created);
                        names
                    }
                    Err(e) => {
                        error!(error = %e, "Global hotkeys unavailable");
                        HotkeyNames::default()
                    }
                };

                #[cfg(target_os = "macos")]
                unsafe {
                    use core_foundation::runloop::{CFRunLoopGetMain, CFRunLoopWakeUp};
                    CFRunLoopWakeUp(CFRunLoopGetMain());
                }

                let ui_proxy = ui_proxy.clone();
                let monitor_scale = monitor_scale.clone();

                // Spawn tokio runtime on separate thread.
                // The registrar and monitor queries stay on the main thread.
                std::thread::spawn(move || {
                    let rt = match tokio::runtime::Runtime::new() {
                        Ok(rt) => rt,
                        Err(e) => {
                            error!("Failed to create tokio runtime: {:?}", e);
                            std::process::exit(1);
                        }
                    };

                    rt.block_on(run_services(store, names, monitor_scale, ui_proxy));

                    // The console and hotkey forwarders may still be blocked on input.
                    rt.shutdown_background();
                });
            }
            _ => {}
        }

        // Keep the registrar and log writer alive for the app's lifetime.
        let _ = (&registrar, &log_guard);
    });
}

fn publish_scale(target: &EventLoopWindowTarget<UiCommand>, monitor_scale: &MonitorScale) {
    match target.primary_monitor() {
        Some(monitor) => monitor_scale.publish_scale_factor(monitor.scale_factor()),
        None => {
            warn!("No primary monitor found");
            monitor_scale.clear();
        }
    }
}

/// Wires the engine, capture and front ends together and runs them.
async fn run_services(
    store: ConfigStore,
    names: HotkeyNames,
    monitor_scale: MonitorScale,
    ui_proxy: EventLoopProxy<UiCommand>,
) {
    let (command_tx, command_rx) = mpsc::channel(32);
    let (events_tx, events_rx) = mpsc::unbounded_channel();
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let config = store.config();
    let sequence = config.sequence();
    let (settings_tx, settings_rx) = watch::channel(config.playback.to_run_settings());

    let scale = Arc::new(DisplayScale::new(Arc::new(monitor_scale)));
    let capture = Arc::new(CaptureSession::new(Arc::clone(&scale), move || {
        settings_rx.borrow().scroll_amount()
    }));
    let engine = PlaybackEngine::new(Arc::new(EnigoSink), events_tx.clone());
    let router = Arc::new(HotkeyRouter::new(
        config.hotkeys.clone(),
        engine.subscribe_state(),
    ));

    if let Err(e) = pointer_listener::spawn(Arc::clone(&capture), events_tx.clone()) {
        error!(error = %e, "Failed to start pointer listener");
        let _ = events_tx.send(EngineEvent::CaptureUnavailable(e.to_string()));
    }

    let _console_reader = console::spawn_reader(command_tx.clone());

    let hotkey_handler = HotkeyHandler::new(Arc::clone(&router), names, command_tx);

    let app = App {
        sequence,
        settings_tx,
        engine,
        capture,
        scale,
        router,
        store,
        ui: Box::new(ui_proxy),
        command_rx,
        events_tx,
        events_rx,
        shutdown_tx,
    };

    tokio::join!(
        async {
            if let Err(e) = hotkey_handler.run(shutdown_rx).await {
                error!(error = ?e, "Hotkey handler error");
            }
        },
        async {
            if let Err(e) = app.run().await {
                error!(error = ?e, "App error");
            }
        }
    );

    info!("Services stopped");
}
