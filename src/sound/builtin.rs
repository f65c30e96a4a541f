//! Built-in alarm sound.
//!
//! The fallback alarm is synthesized rather than shipped as a file: three
//! short 880 Hz beeps followed by a pause. One pass of the pattern is what
//! the alarm loop repeats.

use std::time::Duration;

/// One step of the built-in alarm pattern.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AlarmSegment {
    /// A sine tone.
    Tone {
        /// Frequency in Hz
        frequency: f32,
        /// Length of the tone
        duration: Duration,
    },
    /// Silence.
    Silence(Duration),
}

/// Frequency of the alarm beeps.
pub const ALARM_FREQUENCY_HZ: f32 = 880.0;

/// Output amplitude applied to the beeps.
pub const ALARM_AMPLITUDE: f32 = 0.25;

const BEEP: AlarmSegment = AlarmSegment::Tone {
    frequency: ALARM_FREQUENCY_HZ,
    duration: Duration::from_millis(150),
};
const GAP: AlarmSegment = AlarmSegment::Silence(Duration::from_millis(100));
const PAUSE: AlarmSegment = AlarmSegment::Silence(Duration::from_millis(600));

const ALARM_PATTERN: &[AlarmSegment] = &[BEEP, GAP, BEEP, GAP, BEEP, PAUSE];

/// Returns one pass of the built-in alarm.
#[must_use]
pub const fn alarm_pattern() -> &'static [AlarmSegment] {
    ALARM_PATTERN
}
