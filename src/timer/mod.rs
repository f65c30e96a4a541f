//! Pomodoro timer engine.
//!
//! [`TimerEngine`] alternates between a work interval and a rest interval,
//! counting down once per second. When an interval finishes it posts a
//! notification, switches phase (paused) and loops the alarm sound until the
//! user starts, pauses, resets or jumps to rest.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use pomodoro_bar::display::MockDisplaySink;
//! use pomodoro_bar::notification::MockNotificationSink;
//! use pomodoro_bar::sound::MockAlarmPlayer;
//! use pomodoro_bar::timer::{Capabilities, TimerEngine};
//! use pomodoro_bar::types::TimerSettings;
//!
//! # async fn run() -> Result<(), pomodoro_bar::timer::EngineError> {
//! let engine = TimerEngine::spawn(
//!     TimerSettings::default(),
//!     Capabilities {
//!         display: Arc::new(MockDisplaySink::new()),
//!         notifier: Arc::new(MockNotificationSink::new()),
//!         player: Arc::new(MockAlarmPlayer::new()),
//!     },
//! );
//! engine.start().await?;
//! engine.shutdown().await?;
//! # Ok(())
//! # }
//! ```

mod alarm;
mod engine;
mod error;

pub use alarm::ALARM_REPEAT_GAP;
pub use engine::{Capabilities, TimerEngine, TICK_PERIOD};
pub use error::EngineError;
