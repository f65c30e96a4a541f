//! Pomodoro Timer Library
//!
//! This library provides the core functionality for the Pomodoro Timer.
//! It includes:
//! - Timer engine alternating work and rest intervals with a looping alarm
//! - Settings persistence (durations and alarm sound)
//! - Alarm playback through the default audio device
//! - Display and notification capabilities consumed by the engine
//! - CLI command parsing and an interactive terminal host

pub mod cli;
pub mod display;
pub mod notification;
pub mod settings;
pub mod sound;
pub mod timer;
pub mod types;

// Re-export commonly used types for convenience
pub use types::{TimerPhase, TimerSettings, TimerState};

// Re-export engine types
pub use timer::{Capabilities, EngineError, TimerEngine};

// Re-export settings types
pub use settings::{format_time, parse_time, SettingsEdit, SettingsError, SettingsStore};

// Re-export capability traits
pub use display::{ChannelSink, DisplaySink, DisplayUpdate, MockDisplaySink};
pub use notification::{MockNotificationSink, NotificationSink};

// Re-export sound types
pub use sound::{
    create_player, preview, AlarmPlayer, MockAlarmPlayer, RodioAlarmPlayer, SoundError,
    SoundSource, UnavailableAlarmPlayer,
};
