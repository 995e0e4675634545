//! Playback scheduler.
//!
//! One run at a time per engine. A run iterates a frozen snapshot for the
//! configured number of passes, dispatching each action through an
//! [`InputSink`] and sleeping between actions. Stop is cooperative: the
//! flag is checked before every pass and every action, so an action that
//! has already been dispatched always completes.

use crate::{
    Action, CoreResult, EngineError, EngineEvent,
    display::to_physical,
    playback::{InputSink, RunConfig, RunSettings},
};

use std::{
    panic::Location,
    sync::{Arc, Mutex, MutexGuard},
};

use error_location::ErrorLocation;
use rand::{SeedableRng, rngs::StdRng};
use tokio::{
    sync::{mpsc, watch},
    task::{JoinError, JoinHandle},
};
use tracing::{Instrument, debug, info, info_span, instrument, warn};
use uuid::Uuid;

/// Playback state as seen from outside the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// No run in progress.
    Idle,
    /// A run is in progress.
    Running,
    /// A run is in progress and will exit at its next checkpoint.
    Stopping,
}

impl RunState {
    /// Whether a run is in progress, stop pending or not.
    pub fn is_active(self) -> bool {
        !matches!(self, RunState::Idle)
    }
}

/// Summary of a finished run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaybackOutcome {
    /// Run identifier, also present on the run's tracing span.
    pub run_id: Uuid,
    /// Passes that ran to the end.
    pub completed_passes: u32,
    /// Actions handed to the input sink, including failed ones.
    pub dispatched: usize,
    /// Dispatches that failed and were skipped.
    pub failures: usize,
    /// Whether the run ended because stop was requested.
    pub stopped: bool,
}

/// Handle to a spawned run.
#[derive(Debug)]
pub struct PlaybackHandle {
    run_id: Uuid,
    join: JoinHandle<PlaybackOutcome>,
}

impl PlaybackHandle {
    /// Identifier of the run.
    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    /// Waits for the run to end.
    pub async fn join(self) -> Result<PlaybackOutcome, JoinError> {
        self.join.await
    }
}

struct Inner {
    sink: Arc<dyn InputSink>,
    events: mpsc::UnboundedSender<EngineEvent>,
    state_tx: watch::Sender<RunState>,
    /// Stop signal of the current run; `None` while idle.
    stop_tx: Mutex<Option<watch::Sender<bool>>>,
}

/// Replays action snapshots through an input sink.
///
/// Cheap to clone; clones share the same run state.
#[derive(Clone)]
pub struct PlaybackEngine {
    inner: Arc<Inner>,
}

impl PlaybackEngine {
    /// Creates an idle engine that reports to `events`.
    pub fn new(sink: Arc<dyn InputSink>, events: mpsc::UnboundedSender<EngineEvent>) -> Self {
        let (state_tx, _) = watch::channel(RunState::Idle);

        Self {
            inner: Arc::new(Inner {
                sink,
                events,
                state_tx,
                stop_tx: Mutex::new(None),
            }),
        }
    }

    /// Current run state.
    pub fn state(&self) -> RunState {
        *self.inner.state_tx.borrow()
    }

    /// Receiver that observes every run state change.
    pub fn subscribe_state(&self) -> watch::Receiver<RunState> {
        self.inner.state_tx.subscribe()
    }

    /// Starts a run over `snapshot`.
    ///
    /// Returns `Ok(None)` without doing anything if a run is already in
    /// progress. Must be called from within a tokio runtime.
    ///
    /// # Errors
    ///
    /// - `InvalidRunConfig` if `settings` do not parse; a
    ///   [`EngineEvent::ConfigError`] is emitted and nothing is dispatched.
    /// - `EmptySequence` if the snapshot has no actions.
    #[track_caller]
    #[instrument(skip(self, snapshot, settings), fields(actions = snapshot.len()))]
    pub fn start(
        &self,
        snapshot: Arc<[Action]>,
        settings: &RunSettings,
    ) -> CoreResult<Option<PlaybackHandle>> {
        let mut stop_slot = self.inner.lock_stop();

        if self.state().is_active() {
            debug!("Playback already running, start ignored");
            return Ok(None);
        }

        let config = match RunConfig::parse(settings) {
            Ok(config) => config,
            Err(e) => {
                let message = match &e {
                    EngineError::InvalidRunConfig { reason, .. } => reason.clone(),
                    other => other.to_string(),
                };
                let _ = self.inner.events.send(EngineEvent::ConfigError(message));
                warn!(error = %e, "Run aborted before any action");
                return Err(e);
            }
        };

        if snapshot.is_empty() {
            return Err(EngineError::EmptySequence {
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let run_id = Uuid::new_v4();
        let (stop_tx, stop_rx) = watch::channel(false);
        *stop_slot = Some(stop_tx);
        self.inner.state_tx.send_replace(RunState::Running);
        drop(stop_slot);

        info!(
            run_id = %run_id,
            repetitions = config.repetitions,
            wait_seconds = config.wait_seconds,
            "Playback started"
        );

        let inner = Arc::clone(&self.inner);
        let join = tokio::spawn(
            inner
                .run(run_id, snapshot, config, stop_rx)
                .instrument(info_span!("playback", run_id = %run_id)),
        );

        Ok(Some(PlaybackHandle { run_id, join }))
    }

    /// Requests the current run to stop at its next checkpoint.
    ///
    /// Idempotent and callable from any thread. Returns `true` if a run
    /// was in progress.
    #[instrument(skip(self))]
    pub fn stop(&self) -> bool {
        let stop_slot = self.inner.lock_stop();

        match stop_slot.as_ref() {
            Some(stop_tx) => {
                stop_tx.send_replace(true);
                self.inner.state_tx.send_if_modified(|state| {
                    if *state == RunState::Running {
                        *state = RunState::Stopping;
                        true
                    } else {
                        false
                    }
                });
                info!("Playback stop requested");
                true
            }
            None => {
                debug!("Stop requested while idle");
                false
            }
        }
    }
}

impl Inner {
    async fn run(
        self: Arc<Self>,
        run_id: Uuid,
        actions: Arc<[Action]>,
        config: RunConfig,
        mut stop_rx: watch::Receiver<bool>,
    ) -> PlaybackOutcome {
        let mut rng = StdRng::from_entropy();
        let mut outcome = PlaybackOutcome {
            run_id,
            completed_passes: 0,
            dispatched: 0,
            failures: 0,
            stopped: false,
        };

        'passes: for pass in 0..config.repetitions {
            if *stop_rx.borrow() {
                outcome.stopped = true;
                break;
            }

            for (index, action) in actions.iter().enumerate() {
                if *stop_rx.borrow() {
                    outcome.stopped = true;
                    break 'passes;
                }

                outcome.dispatched += 1;
                if let Err(e) = self.dispatch(*action, config.dpi_scale).await {
                    outcome.failures += 1;
                    warn!(pass, index, %action, error = %e, "Action failed, skipping");
                }

                let last = pass + 1 == config.repetitions && index + 1 == actions.len();
                if !last {
                    let delay = config.next_delay(&mut rng);
                    // Stop cuts the sleep short; the flag is re-checked at the top.
                    tokio::select! {
                        _ = tokio::time::sleep(delay) => {}
                        _ = stop_rx.changed() => {}
                    }
                }
            }

            outcome.completed_passes += 1;
            let remaining = config.repetitions - outcome.completed_passes;
            let _ = self.events.send(EngineEvent::PlaybackProgress { remaining });
            debug!(pass, remaining, "Pass complete");
        }

        self.finish();

        if outcome.stopped {
            let _ = self.events.send(EngineEvent::PlaybackStopped);
            info!(
                completed_passes = outcome.completed_passes,
                dispatched = outcome.dispatched,
                "Playback stopped"
            );
        } else {
            let _ = self.events.send(EngineEvent::PlaybackFinished);
            info!(
                completed_passes = outcome.completed_passes,
                dispatched = outcome.dispatched,
                failures = outcome.failures,
                "Playback finished"
            );
        }

        outcome
    }

    async fn dispatch(&self, action: Action, dpi_scale: f64) -> CoreResult<()> {
        let sink = Arc::clone(&self.sink);

        match action {
            Action::Click { x, y } => {
                debug!(
                    x = to_physical(x, dpi_scale),
                    y = to_physical(y, dpi_scale),
                    "Clicking at position"
                );
            }
            Action::Scroll { direction, amount } => {
                debug!(%direction, amount, "Scrolling");
            }
        }

        // Sink calls are synchronous OS calls; keep them off the async workers.
        tokio::task::spawn_blocking(move || match action {
            Action::Click { x, y } => {
                sink.click(to_physical(x, dpi_scale), to_physical(y, dpi_scale))
            }
            Action::Scroll { direction, amount } => sink.scroll(direction.signed(amount)),
        })
        .await
        .map_err(|e| EngineError::InjectionFailure {
            reason: format!("Dispatch task panicked: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?
    }

    fn finish(&self) {
        let mut stop_slot = self.lock_stop();
        *stop_slot = None;
        self.state_tx.send_replace(RunState::Idle);
    }

    fn lock_stop(&self) -> MutexGuard<'_, Option<watch::Sender<bool>>> {
        self.stop_tx.lock().unwrap_or_else(|e| e.into_inner())
    }
}
