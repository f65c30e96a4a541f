//! Display utilities for the Pomodoro Timer CLI.
//!
//! This module provides formatted output for:
//! - Timer status
//! - Settings
//! - Render-thread updates (remaining time, notifications)
//! - Error messages

use std::path::Path;

use crate::settings::format_time;
use crate::sound::SoundSource;
use crate::types::{TimerPhase, TimerSettings, TimerState};

// ============================================================================
// Display
// ============================================================================

/// Display utilities for CLI output.
pub struct Display;

impl Display {
    /// Shows the current timer status.
    pub fn show_status(state: &TimerState) {
        println!("{}", Self::format_status(state));
    }

    /// Shows the settings and where they are stored.
    pub fn show_settings(settings: &TimerSettings, path: &Path) {
        println!("{}", Self::format_settings(settings));
        println!("File:  {}", path.display());
    }

    /// Shows a success message after saving settings.
    pub fn show_settings_saved(settings: &TimerSettings) {
        println!("* Settings saved");
        println!("{}", Self::format_settings(settings));
    }

    /// Shows a success message after restoring defaults.
    pub fn show_settings_reset(settings: &TimerSettings) {
        println!("* Settings restored to defaults");
        println!("{}", Self::format_settings(settings));
    }

    /// Shows the commands accepted by `run`.
    pub fn show_shell_help() {
        println!("Commands:");
        println!("  start   (s)  start or resume the countdown, silencing the alarm");
        println!("  pause   (p)  pause the countdown, silencing the alarm");
        println!("  reset        back to a full work interval");
        println!("  rest         jump to a full rest interval");
        println!("  reload       re-read the settings file");
        println!("  status       show the timer state");
        println!("  quit    (q)  exit");
    }

    /// Shows an error message.
    pub fn show_error(message: &str) {
        eprintln!("Error: {}", message);
    }

    /// Formats the timer state as a multi-line report.
    pub fn format_status(state: &TimerState) -> String {
        let activity = match (state.running, state.alarm_active) {
            (_, true) => "alarm ringing",
            (true, false) => "running",
            (false, false) => "paused",
        };
        format!(
            "Pomodoro Timer Status\n\
             ─────────────────────────────\n\
             Phase:     {}\n\
             State:     {}\n\
             Remaining: {}",
            Self::phase_label(state.phase),
            activity,
            format_time(state.remaining_seconds)
        )
    }

    /// Formats the settings record for people.
    pub fn format_settings(settings: &TimerSettings) -> String {
        let sound = SoundSource::from_reference(&settings.sound_reference);
        let sound = if sound.is_builtin() {
            sound.name()
        } else {
            sound.reference()
        };
        format!(
            "Work:  {}\nRest:  {}\nSound: {}",
            format_time(settings.work_duration),
            format_time(settings.rest_duration),
            sound
        )
    }

    /// Formats the remaining time for the title line.
    pub fn format_title(text: &str) -> String {
        format!("\r[{}] ", text)
    }

    /// Formats a notification, ringing the terminal bell.
    pub fn format_notification(title: &str, message: &str) -> String {
        format!("\x07\n** {}: {} **\n", title, message)
    }

    fn phase_label(phase: TimerPhase) -> &'static str {
        match phase {
            TimerPhase::Working => "work",
            TimerPhase::Resting => "rest",
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
