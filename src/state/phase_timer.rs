//! The phase timer: owns all timer state and the transition rules
//!
//! One instance exists for the lifetime of the process. All mutation goes
//! through the operations below or through `tick`, and every observable change
//! is broadcast as a [`TimerEvent`] for the presentation layer.

use std::{
    sync::{Arc, Mutex},
    time::Instant,
};

use tokio::{
    sync::{broadcast, watch},
    task::JoinHandle,
};
use tracing::{debug, error, info};

use crate::{
    services::PlaybackControl,
    storage::{CounterStore, COUNTER_KEY, COUNTER_RETENTION_DAYS},
    tasks::ticker_task,
};

use super::{Phase, TimerEvent, TimerState};

/// Configured phase lengths, mutable at runtime.
///
/// Read at the instant of each phase flip, never snapshotted at `start()`, so
/// an edit made mid-phase applies to the next flip.
#[derive(Debug, Clone, Copy)]
pub struct Durations {
    pub study_minutes: u64,
    pub break_minutes: u64,
}

impl Durations {
    pub fn for_phase(&self, phase: Phase) -> u64 {
        match phase {
            Phase::Study => self.study_minutes,
            Phase::Break => self.break_minutes,
        }
    }
}

/// Handle on the one active ticker task
struct TickerGuard {
    cancel_tx: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl TickerGuard {
    fn spawn(timer: Arc<PhaseTimer>) -> Self {
        let (cancel_tx, cancel_rx) = watch::channel(false);
        let handle = tokio::spawn(ticker_task(timer, cancel_rx));
        Self { cancel_tx, handle }
    }

    fn cancel(self) {
        let _ = self.cancel_tx.send(true);
        self.handle.abort();
    }
}

/// The timer core.
///
/// Lock order: the ticker guard before the state record; the durations lock is
/// only ever taken while no other lock is needed afterwards.
pub struct PhaseTimer {
    state: Mutex<TimerState>,
    durations: Mutex<Durations>,
    ticker: Mutex<Option<TickerGuard>>,
    /// Non-fatal problems surfaced to the presentation layer
    warnings: Mutex<Vec<String>>,
    playback: Arc<dyn PlaybackControl>,
    store: Arc<dyn CounterStore>,
    event_tx: broadcast::Sender<TimerEvent>,
    start_time: Instant,
}

impl PhaseTimer {
    /// Create the timer, seeding the study total from the persisted counter.
    ///
    /// Absence or garbage in the store means "no prior value", never an error.
    pub fn new(
        study_minutes: u64,
        break_minutes: u64,
        playback: Arc<dyn PlaybackControl>,
        store: Arc<dyn CounterStore>,
    ) -> Self {
        let total_study_seconds = match store.load(COUNTER_KEY) {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(total) => {
                    info!("Restored persisted study total: {}s", total);
                    total
                }
                Err(_) => {
                    debug!("Persisted study counter {:?} is not a number, starting from 0", raw);
                    0
                }
            },
            None => 0,
        };

        let (event_tx, _) = broadcast::channel(100);

        Self {
            state: Mutex::new(TimerState::new(study_minutes, total_study_seconds)),
            durations: Mutex::new(Durations { study_minutes, break_minutes }),
            ticker: Mutex::new(None),
            warnings: Mutex::new(Vec::new()),
            playback,
            store,
            event_tx,
            start_time: Instant::now(),
        }
    }

    /// Subscribe to timer events
    pub fn subscribe(&self) -> broadcast::Receiver<TimerEvent> {
        self.event_tx.subscribe()
    }

    /// Emit the initial tick/phase/total events so the presentation layer can
    /// render the starting display without waiting for the first tick.
    /// Called once at startup, after subscribers have attached.
    pub fn publish_startup(&self) {
        let Ok(state) = self.state.lock().map(|s| s.clone()) else {
            error!("Failed to lock timer state for startup events");
            return;
        };
        self.emit(TimerEvent::Tick {
            remaining_seconds: state.remaining_seconds,
            phase: state.phase,
        });
        self.emit(TimerEvent::PhaseChanged { phase: state.phase });
        self.emit(TimerEvent::StudyTotalChanged { total_seconds: state.total_study_seconds });
    }

    /// Begin (or resume) the countdown.
    ///
    /// A no-op while already running: at most one ticker task ever exists.
    pub fn start(self: &Arc<Self>) -> Result<TimerState, String> {
        let mut ticker = self
            .ticker
            .lock()
            .map_err(|e| format!("failed to lock ticker guard: {}", e))?;

        let snapshot = {
            let mut state = self
                .state
                .lock()
                .map_err(|e| format!("failed to lock timer state: {}", e))?;
            if state.running {
                debug!("Start requested while already running, ignoring");
                return Ok(state.clone());
            }
            state.running = true;
            state.clone()
        };

        // A stale guard can linger if a pause raced ahead of a previous spawn
        if let Some(stale) = ticker.take() {
            stale.cancel();
        }
        *ticker = Some(TickerGuard::spawn(Arc::clone(self)));
        drop(ticker);

        self.playback.set_loop(true);
        if snapshot.phase == Phase::Study && self.playback.has_source() {
            self.spawn_play();
        }

        info!(
            "Timer started: {} with {}s remaining",
            snapshot.phase.label(),
            snapshot.remaining_seconds
        );
        Ok(snapshot)
    }

    /// Stop the countdown and persist the study total.
    ///
    /// Idempotent; once this returns, no further tick will be applied.
    pub fn pause(&self) -> Result<TimerState, String> {
        {
            let mut ticker = self
                .ticker
                .lock()
                .map_err(|e| format!("failed to lock ticker guard: {}", e))?;
            if let Some(guard) = ticker.take() {
                guard.cancel();
            }
        }

        let snapshot = {
            let mut state = self
                .state
                .lock()
                .map_err(|e| format!("failed to lock timer state: {}", e))?;
            state.running = false;
            state.clone()
        };

        self.playback.pause();
        self.persist(snapshot.total_study_seconds);

        info!("Timer paused with {}s remaining", snapshot.remaining_seconds);
        Ok(snapshot)
    }

    /// Pause, then return to an idle study phase with a zeroed study total
    pub fn reset(&self) -> Result<TimerState, String> {
        self.pause()?;

        let study_minutes = self
            .durations
            .lock()
            .map_err(|e| format!("failed to lock durations: {}", e))?
            .study_minutes;

        let snapshot = {
            let mut state = self
                .state
                .lock()
                .map_err(|e| format!("failed to lock timer state: {}", e))?;
            state.phase = Phase::Study;
            state.remaining_seconds = study_minutes * 60;
            state.total_study_seconds = 0;
            state.clone()
        };

        self.emit(TimerEvent::PhaseChanged { phase: snapshot.phase });
        self.emit(TimerEvent::Tick {
            remaining_seconds: snapshot.remaining_seconds,
            phase: snapshot.phase,
        });

        self.playback.pause();
        self.playback.rewind_to_start();

        self.emit(TimerEvent::StudyTotalChanged { total_seconds: 0 });
        self.persist(0);

        info!("Timer reset");
        Ok(snapshot)
    }

    /// Update the study phase length
    pub fn set_study_duration(&self, minutes: u64) -> Result<TimerState, String> {
        self.set_duration(Phase::Study, minutes)
    }

    /// Update the break phase length
    pub fn set_break_duration(&self, minutes: u64) -> Result<TimerState, String> {
        self.set_duration(Phase::Break, minutes)
    }

    fn set_duration(&self, phase: Phase, minutes: u64) -> Result<TimerState, String> {
        if minutes == 0 {
            return Err("duration must be a positive number of minutes".to_string());
        }

        {
            let mut durations = self
                .durations
                .lock()
                .map_err(|e| format!("failed to lock durations: {}", e))?;
            match phase {
                Phase::Study => durations.study_minutes = minutes,
                Phase::Break => durations.break_minutes = minutes,
            }
        }
        info!("{:?} duration set to {} minutes", phase, minutes);

        let mut state = self
            .state
            .lock()
            .map_err(|e| format!("failed to lock timer state: {}", e))?;

        // Editing the displayed phase while idle refreshes the display at once;
        // editing the other phase only shows up when that phase is reached.
        if !state.running && state.phase == phase {
            state.remaining_seconds = minutes * 60;
            let snapshot = state.clone();
            drop(state);
            self.emit(TimerEvent::Tick {
                remaining_seconds: snapshot.remaining_seconds,
                phase: snapshot.phase,
            });
            return Ok(snapshot);
        }

        Ok(state.clone())
    }

    /// Apply one second of elapsed time.
    ///
    /// Returns false when the timer is not running (the tick had no effect),
    /// which also tells a stale ticker to wind down.
    pub fn tick(self: &Arc<Self>) -> bool {
        let mut events = Vec::new();
        let mut entered = None;

        {
            let mut state = match self.state.lock() {
                Ok(state) => state,
                Err(e) => {
                    error!("Failed to lock timer state in tick: {}", e);
                    return false;
                }
            };
            if !state.running {
                return false;
            }

            state.remaining_seconds = state.remaining_seconds.saturating_sub(1);

            if state.phase == Phase::Study {
                state.total_study_seconds += 1;
                events.push(TimerEvent::StudyTotalChanged {
                    total_seconds: state.total_study_seconds,
                });
            }

            events.push(TimerEvent::Tick {
                remaining_seconds: state.remaining_seconds,
                phase: state.phase,
            });

            if state.remaining_seconds == 0 {
                let next = state.phase.flip();
                // Late-binding: the duration is whatever is configured now
                let minutes = match self.durations.lock() {
                    Ok(durations) => durations.for_phase(next),
                    Err(e) => {
                        error!("Failed to lock durations in tick: {}", e);
                        return false;
                    }
                };
                state.phase = next;
                state.remaining_seconds = minutes * 60;
                events.push(TimerEvent::PhaseChanged { phase: next });
                entered = Some(next);
            }
        }

        for event in events {
            self.emit(event);
        }

        match entered {
            Some(Phase::Study) => {
                if self.playback.has_source() {
                    self.spawn_play();
                }
            }
            Some(Phase::Break) => {
                self.playback.pause();
                self.playback.rewind_to_start();
            }
            None => {}
        }

        true
    }

    /// Persist the current study total unconditionally.
    ///
    /// The shutdown path calls this so closing the process without an explicit
    /// pause still saves the counter.
    pub fn persist_total(&self) {
        let total = match self.state.lock() {
            Ok(state) => state.total_study_seconds,
            Err(e) => {
                error!("Failed to lock timer state for final persist: {}", e);
                return;
            }
        };
        self.persist(total);
    }

    /// Get current timer state
    pub fn state(&self) -> Result<TimerState, String> {
        self.state
            .lock()
            .map(|state| state.clone())
            .map_err(|e| format!("failed to lock timer state: {}", e))
    }

    /// Get the configured phase durations
    pub fn durations(&self) -> Result<Durations, String> {
        self.durations
            .lock()
            .map(|durations| *durations)
            .map_err(|e| format!("failed to lock durations: {}", e))
    }

    /// Current warnings for client visibility
    pub fn warnings(&self) -> Vec<String> {
        self.warnings.lock().map(|w| w.clone()).unwrap_or_default()
    }

    /// Clear accumulated warnings
    pub fn clear_warnings(&self) {
        if let Ok(mut warnings) = self.warnings.lock() {
            warnings.clear();
        }
    }

    /// Record a non-fatal problem and tell the presentation layer about it
    pub fn report_warning(&self, message: String) {
        tracing::warn!("{}", message);
        if let Ok(mut warnings) = self.warnings.lock() {
            warnings.push(message.clone());
        }
        self.emit(TimerEvent::Warning { message });
    }

    /// Calculate server uptime as a formatted string
    pub fn uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    fn emit(&self, event: TimerEvent) {
        if let Err(e) = self.event_tx.send(event) {
            debug!("No event subscribers: {}", e);
        }
    }

    fn persist(&self, total_seconds: u64) {
        if let Err(e) = self.store.save(COUNTER_KEY, total_seconds, COUNTER_RETENTION_DAYS) {
            error!("Failed to persist study counter: {:#}", e);
            self.report_warning(format!("could not save study time: {}", e));
        }
    }

    fn spawn_play(self: &Arc<Self>) {
        let timer = Arc::clone(self);
        tokio::spawn(async move {
            if let Err(e) = timer.playback.play().await {
                timer.report_warning(format!("playback failed: {}", e));
            }
        });
    }
}
