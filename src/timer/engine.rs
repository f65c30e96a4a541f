//! Timer engine for the Pomodoro Timer.
//!
//! The engine is a single tokio task that exclusively owns [`TimerState`]
//! and the current [`TimerSettings`]. Public operations are messages posted
//! to that task; each one waits for the reply, so by the time `pause()`,
//! `reset()` or `rest()` return, no further tick can land and any alarm
//! task has been joined.
//!
//! Ticks come from a `tokio::time::Interval` anchored one second after
//! `start()`. The interval fires on fixed boundaries and delivers missed
//! ticks, so scheduling error does not accumulate over a long interval.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};
use tracing::{debug, info, warn};

use super::alarm::AlarmLoop;
use super::error::EngineError;
use crate::display::DisplaySink;
use crate::notification::{completion_message, NotificationSink, NOTIFICATION_TITLE};
use crate::settings::format_time;
use crate::sound::{AlarmPlayer, SoundSource};
use crate::types::{TimerSettings, TimerState};

/// Period of the countdown.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Capacity of the command channel.
const COMMAND_BUFFER: usize = 32;

// ============================================================================
// Capabilities
// ============================================================================

/// Collaborators supplied by the hosting shell.
#[derive(Clone)]
pub struct Capabilities {
    /// Receives the remaining time text
    pub display: Arc<dyn DisplaySink>,
    /// Receives phase-completion notifications
    pub notifier: Arc<dyn NotificationSink>,
    /// Plays the alarm
    pub player: Arc<dyn AlarmPlayer>,
}

#[derive(Debug)]
enum Command {
    Start(oneshot::Sender<TimerState>),
    Pause(oneshot::Sender<TimerState>),
    Reset(oneshot::Sender<TimerState>),
    Rest(oneshot::Sender<TimerState>),
    Reload(TimerSettings, oneshot::Sender<TimerState>),
    Settings(oneshot::Sender<TimerSettings>),
    Shutdown(oneshot::Sender<()>),
}

// ============================================================================
// TimerEngine
// ============================================================================

/// Handle to the timer engine task.
///
/// Dropping the handle also stops the engine (and its alarm) once pending
/// commands are drained; [`shutdown`](Self::shutdown) does the same and
/// waits for it.
#[derive(Debug)]
pub struct TimerEngine {
    commands: mpsc::Sender<Command>,
    snapshot: watch::Receiver<TimerState>,
    task: JoinHandle<()>,
}

impl TimerEngine {
    /// Spawns the engine on the current tokio runtime.
    ///
    /// The engine starts paused in the working phase with the full work
    /// duration, and renders it once.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    pub fn spawn(settings: TimerSettings, capabilities: Capabilities) -> Self {
        let state = TimerState::new(&settings);
        let (commands, command_rx) = mpsc::channel(COMMAND_BUFFER);
        let (snapshot_tx, snapshot) = watch::channel(state);
        let (alarm_exit_tx, alarm_exit_rx) = mpsc::unbounded_channel();

        let task = EngineTask {
            state,
            settings,
            capabilities,
            snapshot: snapshot_tx,
            ticker: None,
            alarm: None,
            alarm_generation: 0,
            alarm_exit_tx,
        };
        let task = tokio::spawn(task.run(command_rx, alarm_exit_rx));

        Self {
            commands,
            snapshot,
            task,
        }
    }

    /// Starts or resumes the countdown. No-op if already running.
    ///
    /// An alarm that is sounding is stopped first.
    pub async fn start(&self) -> Result<TimerState, EngineError> {
        self.request(Command::Start).await
    }

    /// Pauses the countdown, keeping the remaining time. No-op if paused.
    ///
    /// An alarm that is sounding is stopped first.
    pub async fn pause(&self) -> Result<TimerState, EngineError> {
        self.request(Command::Pause).await
    }

    /// Stops everything and returns to a paused, full-length work interval.
    pub async fn reset(&self) -> Result<TimerState, EngineError> {
        self.request(Command::Reset).await
    }

    /// Stops everything and jumps to a paused, full-length rest interval.
    pub async fn rest(&self) -> Result<TimerState, EngineError> {
        self.request(Command::Rest).await
    }

    /// Replaces the settings.
    ///
    /// The remaining time is reset to the new duration of the current phase;
    /// a running countdown keeps running.
    pub async fn reload_settings(
        &self,
        settings: TimerSettings,
    ) -> Result<TimerState, EngineError> {
        self.request(|reply| Command::Reload(settings, reply)).await
    }

    /// Returns the settings the engine is using.
    pub async fn settings(&self) -> Result<TimerSettings, EngineError> {
        self.request(Command::Settings).await
    }

    /// Returns the latest published state.
    pub fn snapshot(&self) -> TimerState {
        *self.snapshot.borrow()
    }

    /// Returns a receiver that observes every published state.
    pub fn subscribe(&self) -> watch::Receiver<TimerState> {
        self.snapshot.clone()
    }

    /// Stops the countdown and the alarm, then waits for the task to exit.
    pub async fn shutdown(self) -> Result<(), EngineError> {
        self.request(Command::Shutdown).await?;
        if let Err(e) = self.task.await {
            warn!("Timer engine task failed: {}", e);
        }
        Ok(())
    }

    async fn request<T>(
        &self,
        command: impl FnOnce(oneshot::Sender<T>) -> Command,
    ) -> Result<T, EngineError> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(command(reply))
            .await
            .map_err(|_| EngineError::Closed)?;
        response.await.map_err(|_| EngineError::Closed)
    }
}

// ============================================================================
// EngineTask
// ============================================================================

struct EngineTask {
    state: TimerState,
    settings: TimerSettings,
    capabilities: Capabilities,
    snapshot: watch::Sender<TimerState>,
    ticker: Option<Interval>,
    alarm: Option<AlarmLoop>,
    alarm_generation: u64,
    alarm_exit_tx: mpsc::UnboundedSender<u64>,
}

impl EngineTask {
    async fn run(
        mut self,
        mut commands: mpsc::Receiver<Command>,
        mut alarm_exits: mpsc::UnboundedReceiver<u64>,
    ) {
        self.render();

        loop {
            tokio::select! {
                command = commands.recv() => match command {
                    Some(command) => {
                        if !self.handle(command).await {
                            break;
                        }
                    }
                    None => {
                        self.halt().await;
                        break;
                    }
                },
                () = next_tick(&mut self.ticker) => self.on_tick().await,
                Some(generation) = alarm_exits.recv() => self.on_alarm_exit(generation).await,
            }
        }

        debug!("Timer engine stopped");
    }

    /// Handles one command. Returns false when the engine should exit.
    async fn handle(&mut self, command: Command) -> bool {
        match command {
            Command::Start(reply) => {
                self.start().await;
                let _ = reply.send(self.state);
            }
            Command::Pause(reply) => {
                self.pause().await;
                let _ = reply.send(self.state);
            }
            Command::Reset(reply) => {
                self.reset().await;
                let _ = reply.send(self.state);
            }
            Command::Rest(reply) => {
                self.rest().await;
                let _ = reply.send(self.state);
            }
            Command::Reload(settings, reply) => {
                self.reload(settings);
                let _ = reply.send(self.state);
            }
            Command::Settings(reply) => {
                let _ = reply.send(self.settings.clone());
            }
            Command::Shutdown(reply) => {
                self.halt().await;
                let _ = reply.send(());
                return false;
            }
        }
        true
    }

    async fn start(&mut self) {
        self.stop_alarm().await;
        if self.state.start() {
            self.ticker = Some(new_ticker());
            info!(
                "Timer started: {} with {} remaining",
                self.state.phase.as_str(),
                format_time(self.state.remaining_seconds)
            );
        } else {
            debug!("Start ignored, timer already running");
        }
        self.publish();
    }

    async fn pause(&mut self) {
        self.stop_alarm().await;
        if self.state.pause() {
            self.ticker = None;
            info!(
                "Timer paused with {} remaining",
                format_time(self.state.remaining_seconds)
            );
        }
        self.publish();
    }

    async fn reset(&mut self) {
        self.ticker = None;
        self.stop_alarm().await;
        self.state.reset(&self.settings);
        info!("Timer reset");
        self.render();
        self.publish();
    }

    async fn rest(&mut self) {
        self.ticker = None;
        self.stop_alarm().await;
        self.state.rest(&self.settings);
        info!("Switched to rest");
        self.render();
        self.publish();
    }

    fn reload(&mut self, settings: TimerSettings) {
        self.settings = settings;
        self.state.reload(&self.settings);
        info!(
            work = self.settings.work_duration,
            rest = self.settings.rest_duration,
            "Settings reloaded"
        );
        self.render();
        self.publish();
    }

    async fn on_tick(&mut self) {
        let Some(remaining) = self.state.tick() else {
            self.ticker = None;
            return;
        };
        debug!(remaining, "Tick");
        self.capabilities.display.update(&format_time(remaining));

        if remaining == 0 {
            self.complete_phase().await;
        }
        self.publish();
    }

    async fn complete_phase(&mut self) {
        self.ticker = None;
        self.stop_alarm().await;

        let finished = self.state.complete_phase(&self.settings);
        info!("{} interval finished", finished.as_str());
        self.capabilities
            .notifier
            .notify(NOTIFICATION_TITLE, completion_message(finished));
        self.render();

        self.alarm_generation += 1;
        let source = SoundSource::from_reference(&self.settings.sound_reference);
        self.alarm = Some(AlarmLoop::spawn(
            self.alarm_generation,
            Arc::clone(&self.capabilities.player),
            Arc::clone(&self.capabilities.notifier),
            source,
            self.alarm_exit_tx.clone(),
        ));
        self.state.alarm_active = true;
    }

    async fn on_alarm_exit(&mut self, generation: u64) {
        if self.alarm.as_ref().map(AlarmLoop::generation) == Some(generation) {
            self.stop_alarm().await;
            self.publish();
        }
    }

    async fn stop_alarm(&mut self) {
        if let Some(alarm) = self.alarm.take() {
            alarm.stop().await;
            debug!("Alarm stopped");
        }
        self.state.alarm_active = false;
    }

    async fn halt(&mut self) {
        self.ticker = None;
        self.stop_alarm().await;
        self.state.running = false;
        self.publish();
    }

    fn render(&self) {
        self.capabilities
            .display
            .update(&format_time(self.state.remaining_seconds));
    }

    fn publish(&self) {
        self.snapshot.send_replace(self.state);
    }
}

fn new_ticker() -> Interval {
    let mut ticker = interval_at(Instant::now() + TICK_PERIOD, TICK_PERIOD);
    // Missed seconds still count down.
    ticker.set_missed_tick_behavior(MissedTickBehavior::Burst);
    ticker
}

async fn next_tick(ticker: &mut Option<Interval>) {
    match ticker {
        Some(ticker) => {
            ticker.tick().await;
        }
        None => std::future::pending().await,
    }
}

// ============================================================================
// Tests
// ============================================================================
