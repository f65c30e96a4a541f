//! Sound source resolution.
//!
//! The settings record stores the alarm as an opaque string. This module
//! turns that string into something the player can open.

use std::path::{Path, PathBuf};

/// Reference string for the built-in alarm.
pub const BUILTIN_ALARM: &str = "builtin:alarm";

/// Represents the source of a sound to be played.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SoundSource {
    /// An audio file on disk.
    File {
        /// Location of the file.
        path: PathBuf,
    },
    /// The synthesized alarm compiled into the binary.
    Builtin,
}

impl SoundSource {
    /// Resolves a settings reference.
    ///
    /// [`BUILTIN_ALARM`] and blank strings map to the built-in alarm; any
    /// other value is treated as a file path.
    #[must_use]
    pub fn from_reference(reference: &str) -> Self {
        let reference = reference.trim();
        if reference.is_empty() || reference == BUILTIN_ALARM {
            Self::Builtin
        } else {
            Self::file(reference)
        }
    }

    /// Creates a file sound source.
    #[must_use]
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::File { path: path.into() }
    }

    /// Returns the reference string stored in settings.
    #[must_use]
    pub fn reference(&self) -> String {
        match self {
            Self::File { path } => path.display().to_string(),
            Self::Builtin => BUILTIN_ALARM.to_string(),
        }
    }

    /// Returns a short human-readable name.
    #[must_use]
    pub fn name(&self) -> String {
        match self {
            Self::File { path } => path
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string()),
            Self::Builtin => "built-in alarm".to_string(),
        }
    }

    /// Returns true if this is the built-in alarm.
    #[must_use]
    pub fn is_builtin(&self) -> bool {
        matches!(self, Self::Builtin)
    }

    /// Returns the file path if this is a file sound.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::File { path } => Some(path),
            Self::Builtin => None,
        }
    }
}

impl Default for SoundSource {
    fn default() -> Self {
        Self::Builtin
    }
}
