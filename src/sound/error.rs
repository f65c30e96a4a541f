//! Sound system error types.
//!
//! None of these are fatal: the timer keeps its bookkeeping when the alarm
//! cannot be heard, and the failure is surfaced as a notification.

use thiserror::Error;

/// Errors that can occur in the sound playback system.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SoundError {
    /// Audio device is not available (e.g., no speakers connected).
    #[error("audio device unavailable: {0}")]
    DeviceNotAvailable(String),

    /// Sound file was not found at the specified path.
    #[error("sound file not found: {0}")]
    FileNotFound(String),

    /// Failed to decode the audio file.
    #[error("failed to decode sound: {0}")]
    DecodeError(String),

    /// Failed to create the audio output stream.
    #[error("failed to open audio stream: {0}")]
    StreamError(String),

    /// Generic sound playback error.
    #[error("sound playback failed: {0}")]
    PlaybackError(String),
}

impl SoundError {
    /// Returns true if this error is related to device availability.
    #[must_use]
    pub fn is_device_error(&self) -> bool {
        matches!(self, Self::DeviceNotAvailable(_) | Self::StreamError(_))
    }

    /// Returns true if this error is related to the audio file.
    #[must_use]
    pub fn is_file_error(&self) -> bool {
        matches!(self, Self::FileNotFound(_) | Self::DecodeError(_))
    }

    /// Returns true if playback should fall back to the built-in alarm.
    #[must_use]
    pub fn should_fallback_to_builtin(&self) -> bool {
        self.is_file_error()
    }
}
