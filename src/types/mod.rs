//! Core data types for the Pomodoro Timer.
//!
//! This module defines the data structures used for:
//! - Timer phase and countdown state (pure transitions, no I/O)
//! - Timer settings with defaults and validation
//! - The persisted settings record layout

use serde::{Deserialize, Serialize};

use crate::sound::BUILTIN_ALARM;

/// Default work duration in seconds (25 minutes).
pub const DEFAULT_WORK_SECONDS: u32 = 25 * 60;

/// Default rest duration in seconds (5 minutes).
pub const DEFAULT_REST_SECONDS: u32 = 5 * 60;

/// Smallest duration the engine will ever count down from.
pub const MIN_DURATION_SECONDS: u32 = 1;

// ============================================================================
// TimerPhase
// ============================================================================

/// Represents the current phase of the timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerPhase {
    /// Counting down a work interval
    #[default]
    Working,
    /// Counting down a rest interval
    Resting,
}

impl TimerPhase {
    /// Returns the string representation of the phase.
    pub fn as_str(&self) -> &'static str {
        match self {
            TimerPhase::Working => "working",
            TimerPhase::Resting => "resting",
        }
    }

    /// Returns the phase that follows this one.
    pub fn opposite(&self) -> Self {
        match self {
            TimerPhase::Working => TimerPhase::Resting,
            TimerPhase::Resting => TimerPhase::Working,
        }
    }
}

// ============================================================================
// TimerSettings
// ============================================================================

fn default_work_time() -> u32 {
    DEFAULT_WORK_SECONDS
}

fn default_rest_time() -> u32 {
    DEFAULT_REST_SECONDS
}

fn default_sound_file() -> String {
    BUILTIN_ALARM.to_string()
}

/// Work/rest durations and the alarm sound.
///
/// Serialized as the flat settings record (`work_time`, `rest_time`,
/// `sound_file`). Missing fields fall back to their defaults one by one.
/// A loaded value is never mutated in place; a reload replaces it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerSettings {
    /// Work interval in seconds
    #[serde(rename = "work_time", default = "default_work_time")]
    pub work_duration: u32,
    /// Rest interval in seconds
    #[serde(rename = "rest_time", default = "default_rest_time")]
    pub rest_duration: u32,
    /// Opaque alarm reference: a file path or the built-in alarm
    #[serde(rename = "sound_file", default = "default_sound_file")]
    pub sound_reference: String,
}

impl Default for TimerSettings {
    fn default() -> Self {
        Self {
            work_duration: default_work_time(),
            rest_duration: default_rest_time(),
            sound_reference: default_sound_file(),
        }
    }
}

impl TimerSettings {
    /// Returns a copy with the given work duration.
    pub fn with_work_duration(mut self, seconds: u32) -> Self {
        self.work_duration = seconds;
        self
    }

    /// Returns a copy with the given rest duration.
    pub fn with_rest_duration(mut self, seconds: u32) -> Self {
        self.rest_duration = seconds;
        self
    }

    /// Returns a copy with the given alarm reference.
    pub fn with_sound_reference(mut self, reference: impl Into<String>) -> Self {
        self.sound_reference = reference.into();
        self
    }

    /// Validates the durations.
    ///
    /// Returns the name of the first offending field.
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.work_duration == 0 {
            return Err("work_time");
        }
        if self.rest_duration == 0 {
            return Err("rest_time");
        }
        Ok(())
    }

    /// Replaces each invalid duration with its default.
    ///
    /// Returns the names of the fields that were replaced.
    pub fn sanitized(mut self) -> (Self, Vec<&'static str>) {
        let mut replaced = Vec::new();
        if self.work_duration == 0 {
            self.work_duration = default_work_time();
            replaced.push("work_time");
        }
        if self.rest_duration == 0 {
            self.rest_duration = default_rest_time();
            replaced.push("rest_time");
        }
        (self, replaced)
    }

    /// Returns the configured duration for `phase`.
    ///
    /// A zero duration here means validation was skipped upstream: debug
    /// builds panic, release builds clamp to [`MIN_DURATION_SECONDS`].
    pub fn duration_for(&self, phase: TimerPhase) -> u32 {
        let seconds = match phase {
            TimerPhase::Working => self.work_duration,
            TimerPhase::Resting => self.rest_duration,
        };
        debug_assert!(
            seconds >= MIN_DURATION_SECONDS,
            "{} duration must be positive",
            phase.as_str()
        );
        seconds.max(MIN_DURATION_SECONDS)
    }
}

// ============================================================================
// TimerState
// ============================================================================

/// Countdown state owned by the timer engine.
///
/// All transitions are plain methods so they can be exercised without a
/// runtime; the engine task is the only caller in production.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerState {
    /// Current phase
    pub phase: TimerPhase,
    /// Whether the countdown is ticking
    pub running: bool,
    /// Seconds left in the current phase
    pub remaining_seconds: u32,
    /// Whether the alarm is looping
    pub alarm_active: bool,
}

impl TimerState {
    /// Creates a paused working state with the full work duration.
    pub fn new(settings: &TimerSettings) -> Self {
        Self {
            phase: TimerPhase::Working,
            running: false,
            remaining_seconds: settings.duration_for(TimerPhase::Working),
            alarm_active: false,
        }
    }

    /// Marks the countdown as running.
    ///
    /// Returns false if it was already running.
    pub fn start(&mut self) -> bool {
        if self.running {
            return false;
        }
        self.running = true;
        true
    }

    /// Stops the countdown, keeping the remaining time.
    ///
    /// Returns false if it was not running.
    pub fn pause(&mut self) -> bool {
        if !self.running {
            return false;
        }
        self.running = false;
        true
    }

    /// Returns to a paused work interval at full length.
    pub fn reset(&mut self, settings: &TimerSettings) {
        self.enter(TimerPhase::Working, settings);
    }

    /// Jumps to a paused rest interval at full length.
    pub fn rest(&mut self, settings: &TimerSettings) {
        self.enter(TimerPhase::Resting, settings);
    }

    /// Reloads the remaining time for the current phase from new settings.
    ///
    /// Whether the countdown is running is left untouched.
    pub fn reload(&mut self, settings: &TimerSettings) {
        self.remaining_seconds = settings.duration_for(self.phase);
    }

    /// Decrements the countdown by one second.
    ///
    /// Returns the new remaining time, or `None` when the countdown is not
    /// running or has nothing left.
    pub fn tick(&mut self) -> Option<u32> {
        if !self.running || self.remaining_seconds == 0 {
            return None;
        }
        self.remaining_seconds -= 1;
        Some(self.remaining_seconds)
    }

    /// Finishes the current phase and moves to the next one.
    ///
    /// Stops the countdown, flips the phase, loads its duration and raises
    /// the alarm flag. Returns the phase that just finished.
    pub fn complete_phase(&mut self, settings: &TimerSettings) -> TimerPhase {
        let finished = self.phase;
        self.running = false;
        self.phase = finished.opposite();
        self.remaining_seconds = settings.duration_for(self.phase);
        self.alarm_active = true;
        finished
    }

    fn enter(&mut self, phase: TimerPhase, settings: &TimerSettings) {
        self.running = false;
        self.phase = phase;
        self.remaining_seconds = settings.duration_for(phase);
    }
}

// ============================================================================
// Tests
// ============================================================================
