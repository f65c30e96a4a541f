//! Settings error types.

use std::path::PathBuf;

use thiserror::Error;

/// A duration string that is not `ss`, `mm:ss` or `hh:mm:ss`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimeFormatError {
    /// More than three colon-separated components.
    #[error("invalid time format '{0}': expected ss, mm:ss or hh:mm:ss")]
    TooManyComponents(String),

    /// A component that is empty or not a number.
    #[error("invalid time format '{input}': '{component}' is not a number")]
    InvalidComponent {
        /// Whole input
        input: String,
        /// Offending component
        component: String,
    },

    /// A negative component.
    #[error("invalid time format '{0}': negative values are not allowed")]
    Negative(String),

    /// The total does not fit in the duration type.
    #[error("invalid time format '{0}': value is too large")]
    Overflow(String),
}

/// Errors raised while loading, editing or saving settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// A duration string could not be parsed.
    #[error(transparent)]
    Format(#[from] TimeFormatError),

    /// A duration that must be positive was zero.
    #[error("{0} must be at least one second")]
    InvalidDuration(&'static str),

    /// The configured sound file does not exist.
    #[error("sound file not found: {}", .0.display())]
    SoundNotFound(PathBuf),

    /// The settings record is not valid JSON for the expected layout.
    #[error("settings record {} is corrupt: {source}", path.display())]
    Parse {
        /// Record location
        path: PathBuf,
        /// Underlying decode error
        #[source]
        source: serde_json::Error,
    },

    /// Reading or writing the record failed.
    #[error("settings I/O failed for {}: {source}", path.display())]
    Io {
        /// Record location
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Encoding the record failed.
    #[error("failed to encode settings: {0}")]
    Encode(#[source] serde_json::Error),

    /// No per-user configuration directory on this platform.
    #[error("could not determine the configuration directory")]
    ConfigDirNotFound,
}

impl SettingsError {
    /// Returns true if the error comes from user input rather than storage.
    #[must_use]
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::Format(_) | Self::InvalidDuration(_) | Self::SoundNotFound(_)
        )
    }
}
