//! Settings persistence for the Pomodoro Timer.
//!
//! The settings record is a small JSON file:
//!
//! ```json
//! { "work_time": 1500, "rest_time": 300, "sound_file": "builtin:alarm" }
//! ```
//!
//! [`SettingsStore::load`] never fails: a missing or corrupt record is
//! replaced with the defaults. Inside a well-formed record each field is
//! decoded on its own, so one bad value never costs the others.
//! [`SettingsStore::save`] writes through a temporary file in the same
//! directory and renames it over the record, so a crash mid-write leaves
//! either the old record or the new one.

mod error;
mod time_format;

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::sound::SoundSource;
use crate::types::TimerSettings;

pub use error::{SettingsError, TimeFormatError};
pub use time_format::{format_time, parse_time};

/// Directory name under the platform configuration directory.
pub const APP_DIR_NAME: &str = "pomodoro-bar";

/// File name of the settings record.
pub const SETTINGS_FILE_NAME: &str = "settings.json";

// ============================================================================
// SettingsStore
// ============================================================================

/// Loads and saves [`TimerSettings`] at a fixed path.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    /// Creates a store for the record at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Creates a store at `<config dir>/pomodoro-bar/settings.json`.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError::ConfigDirNotFound` if the platform has no
    /// per-user configuration directory.
    pub fn at_default_location() -> Result<Self, SettingsError> {
        let config_dir = dirs::config_dir().ok_or(SettingsError::ConfigDirNotFound)?;
        Ok(Self::new(
            config_dir.join(APP_DIR_NAME).join(SETTINGS_FILE_NAME),
        ))
    }

    /// Returns the record location.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the settings, healing the record when needed.
    ///
    /// - No record: the defaults are written and returned.
    /// - Unreadable record, or one that is not a JSON object: a warning is
    ///   logged, the defaults are written over it and returned.
    /// - Missing fields take their defaults. Fields that are present but
    ///   invalid (wrong type, negative, fractional, zero) are replaced by
    ///   their defaults with a warning; the file itself is left as is.
    pub fn load(&self) -> TimerSettings {
        match self.read() {
            Ok(Some(record)) => {
                let (settings, rejected) = settings_from_record(&record);
                for field in rejected {
                    warn!(
                        "Ignoring invalid {} in {}, using default",
                        field,
                        self.path.display()
                    );
                }
                settings
            }
            Ok(None) => {
                info!("No settings record at {}, writing defaults", self.path.display());
                self.write_defaults()
            }
            Err(e) => {
                warn!("{}; restoring defaults", e);
                self.write_defaults()
            }
        }
    }

    /// Saves the settings, replacing any existing record.
    ///
    /// # Errors
    ///
    /// Returns an error if a duration is zero, or the record cannot be
    /// written. On error the previous record is left intact.
    pub fn save(&self, settings: &TimerSettings) -> Result<(), SettingsError> {
        settings.validate().map_err(SettingsError::InvalidDuration)?;

        let mut json = serde_json::to_string_pretty(settings).map_err(SettingsError::Encode)?;
        json.push('\n');

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir).map_err(|e| self.io_error(e))?;

        let mut staged = tempfile::NamedTempFile::new_in(&dir).map_err(|e| self.io_error(e))?;
        staged
            .write_all(json.as_bytes())
            .and_then(|()| staged.as_file().sync_all())
            .map_err(|e| self.io_error(e))?;
        staged
            .persist(&self.path)
            .map_err(|e| self.io_error(e.error))?;

        debug!("Settings written to {}", self.path.display());
        Ok(())
    }

    /// Overwrites the record with the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be written.
    pub fn reset(&self) -> Result<TimerSettings, SettingsError> {
        let defaults = TimerSettings::default();
        self.save(&defaults)?;
        Ok(defaults)
    }

    /// Reads the raw record without healing it.
    fn read(&self) -> Result<Option<Map<String, Value>>, SettingsError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(self.io_error(e)),
        };
        serde_json::from_str(&contents)
            .map(Some)
            .map_err(|source| SettingsError::Parse {
                path: self.path.clone(),
                source,
            })
    }

    fn write_defaults(&self) -> TimerSettings {
        let defaults = TimerSettings::default();
        if let Err(e) = self.save(&defaults) {
            warn!("Could not write default settings: {}", e);
        }
        defaults
    }

    fn io_error(&self, source: std::io::Error) -> SettingsError {
        SettingsError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

/// Decodes a record field by field.
///
/// Returns the settings along with the names of the fields that were present
/// but unusable and were replaced by their defaults.
fn settings_from_record(record: &Map<String, Value>) -> (TimerSettings, Vec<&'static str>) {
    let defaults = TimerSettings::default();
    let mut rejected = Vec::new();

    let work_duration = duration_field(record, "work_time", defaults.work_duration, &mut rejected);
    let rest_duration = duration_field(record, "rest_time", defaults.rest_duration, &mut rejected);
    let sound_reference = match record.get("sound_file") {
        None => defaults.sound_reference,
        Some(Value::String(reference)) => reference.clone(),
        Some(_) => {
            rejected.push("sound_file");
            defaults.sound_reference
        }
    };

    let (settings, zeroed) = TimerSettings {
        work_duration,
        rest_duration,
        sound_reference,
    }
    .sanitized();
    rejected.extend(zeroed);
    (settings, rejected)
}

/// Reads a whole number of seconds that fits in a `u32`.
fn duration_field(
    record: &Map<String, Value>,
    key: &'static str,
    default: u32,
    rejected: &mut Vec<&'static str>,
) -> u32 {
    let Some(value) = record.get(key) else {
        return default;
    };
    match value.as_u64().and_then(|seconds| u32::try_from(seconds).ok()) {
        Some(seconds) => seconds,
        None => {
            rejected.push(key);
            default
        }
    }
}

// ============================================================================
// SettingsEdit
// ============================================================================

/// A pending edit of the settings record, as typed by the user.
///
/// Durations are `hh:mm:ss` strings; `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsEdit {
    /// New work duration
    pub work: Option<String>,
    /// New rest duration
    pub rest: Option<String>,
    /// New alarm reference
    pub sound: Option<String>,
}

impl SettingsEdit {
    /// Returns true if the edit changes nothing.
    pub fn is_empty(&self) -> bool {
        self.work.is_none() && self.rest.is_none() && self.sound.is_none()
    }

    /// Applies the edit on top of `current`.
    ///
    /// # Errors
    ///
    /// Returns an error if a duration does not parse or is zero, or if the
    /// sound refers to a file that does not exist. `current` is untouched
    /// either way.
    pub fn apply(&self, current: &TimerSettings) -> Result<TimerSettings, SettingsError> {
        let mut next = current.clone();

        if let Some(work) = &self.work {
            next.work_duration = parse_time(work)?;
        }
        if let Some(rest) = &self.rest {
            next.rest_duration = parse_time(rest)?;
        }
        if let Some(sound) = &self.sound {
            if let Some(path) = SoundSource::from_reference(sound).path() {
                if !path.exists() {
                    return Err(SettingsError::SoundNotFound(path.to_path_buf()));
                }
            }
            next.sound_reference = sound.trim().to_string();
        }

        next.validate().map_err(SettingsError::InvalidDuration)?;
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sound::BUILTIN_ALARM;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> SettingsStore {
        SettingsStore::new(dir.path().join("nested").join(SETTINGS_FILE_NAME))
    }

    mod store_tests {
        use super::*;

        #[test]
        fn test_load_fresh_environment_writes_defaults() {
            let dir = TempDir::new().unwrap();
            let store = store_in(&dir);
            assert!(!store.path().exists());

            let settings = store.load();

            assert_eq!(settings.work_duration, 1500);
            assert_eq!(settings.rest_duration, 300);
            assert_eq!(settings.sound_reference, BUILTIN_ALARM);
            assert!(store.path().exists());

            let on_disk: TimerSettings =
                serde_json::from_str(&fs::read_to_string(store.path()).unwrap()).unwrap();
            assert_eq!(on_disk, TimerSettings::default());
        }

        #[test]
        fn test_save_then_load() {
            let dir = TempDir::new().unwrap();
            let store = store_in(&dir);
            let settings = TimerSettings::default()
                .with_work_duration(3000)
                .with_rest_duration(600)
                .with_sound_reference("/sounds/bell.mp3");

            store.save(&settings).unwrap();

            assert_eq!(store.load(), settings);
        }

        #[test]
        fn test_missing_fields_fall_back_per_field() {
            let dir = TempDir::new().unwrap();
            let store = store_in(&dir);
            fs::create_dir_all(store.path().parent().unwrap()).unwrap();
            fs::write(store.path(), r#"{"work_time": 120}"#).unwrap();

            let settings = store.load();

            assert_eq!(settings.work_duration, 120);
            assert_eq!(settings.rest_duration, 300);
            assert_eq!(settings.sound_reference, BUILTIN_ALARM);
        }

        #[test]
        fn test_corrupt_record_is_replaced_with_defaults() {
            let dir = TempDir::new().unwrap();
            let store = store_in(&dir);
            fs::create_dir_all(store.path().parent().unwrap()).unwrap();
            fs::write(store.path(), "{ not json").unwrap();

            let settings = store.load();

            assert_eq!(settings, TimerSettings::default());
            let healed: TimerSettings =
                serde_json::from_str(&fs::read_to_string(store.path()).unwrap()).unwrap();
            assert_eq!(healed, TimerSettings::default());
        }

        #[test]
        fn test_zero_duration_in_record_uses_default() {
            let dir = TempDir::new().unwrap();
            let store = store_in(&dir);
            fs::create_dir_all(store.path().parent().unwrap()).unwrap();
            fs::write(
                store.path(),
                r#"{"work_time": 0, "rest_time": 45, "sound_file": "x.wav"}"#,
            )
            .unwrap();

            let settings = store.load();

            assert_eq!(settings.work_duration, 1500);
            assert_eq!(settings.rest_duration, 45);
            assert_eq!(settings.sound_reference, "x.wav");
        }

        #[test]
        fn test_negative_duration_keeps_other_fields() {
            let dir = TempDir::new().unwrap();
            let store = store_in(&dir);
            let record = r#"{"work_time": -5, "rest_time": 45, "sound_file": "x.wav"}"#;
            fs::create_dir_all(store.path().parent().unwrap()).unwrap();
            fs::write(store.path(), record).unwrap();

            let settings = store.load();

            assert_eq!(settings.work_duration, 1500);
            assert_eq!(settings.rest_duration, 45);
            assert_eq!(settings.sound_reference, "x.wav");
            // The record is not rewritten with defaults.
            assert_eq!(fs::read_to_string(store.path()).unwrap(), record);
        }

        #[test]
        fn test_mistyped_fields_fall_back_per_field() {
            let dir = TempDir::new().unwrap();
            let store = store_in(&dir);
            fs::create_dir_all(store.path().parent().unwrap()).unwrap();
            fs::write(
                store.path(),
                r#"{"work_time": 1500.0, "rest_time": 4294967296, "sound_file": 7}"#,
            )
            .unwrap();

            assert_eq!(store.load(), TimerSettings::default());

            fs::write(
                store.path(),
                r#"{"work_time": 90, "rest_time": "45", "sound_file": "x.wav"}"#,
            )
            .unwrap();

            let settings = store.load();
            assert_eq!(settings.work_duration, 90);
            assert_eq!(settings.rest_duration, 300);
            assert_eq!(settings.sound_reference, "x.wav");
        }

        #[test]
        fn test_non_object_record_is_replaced_with_defaults() {
            let dir = TempDir::new().unwrap();
            let store = store_in(&dir);
            fs::create_dir_all(store.path().parent().unwrap()).unwrap();
            fs::write(store.path(), "[1500, 300]").unwrap();

            assert_eq!(store.load(), TimerSettings::default());
            let healed: TimerSettings =
                serde_json::from_str(&fs::read_to_string(store.path()).unwrap()).unwrap();
            assert_eq!(healed, TimerSettings::default());
        }

        #[test]
        fn test_record_decoding_reports_rejected_fields() {
            let record: Map<String, Value> =
                serde_json::from_str(r#"{"work_time": 0, "rest_time": -1, "extra": true}"#)
                    .unwrap();

            let (settings, rejected) = settings_from_record(&record);

            assert_eq!(settings, TimerSettings::default());
            assert_eq!(rejected, vec!["rest_time", "work_time"]);
        }

        #[test]
        fn test_save_rejects_zero_duration_and_keeps_record() {
            let dir = TempDir::new().unwrap();
            let store = store_in(&dir);
            let original = TimerSettings::default().with_work_duration(60);
            store.save(&original).unwrap();

            let result = store.save(&TimerSettings::default().with_rest_duration(0));

            assert!(matches!(
                result,
                Err(SettingsError::InvalidDuration("rest_time"))
            ));
            assert_eq!(store.load(), original);
        }

        #[test]
        fn test_save_leaves_no_staging_files() {
            let dir = TempDir::new().unwrap();
            let store = store_in(&dir);

            store.save(&TimerSettings::default()).unwrap();
            store.save(&TimerSettings::default().with_work_duration(10)).unwrap();

            let entries: Vec<_> = fs::read_dir(store.path().parent().unwrap())
                .unwrap()
                .map(|e| e.unwrap().file_name())
                .collect();
            assert_eq!(entries, vec![std::ffi::OsString::from(SETTINGS_FILE_NAME)]);
        }

        #[test]
        fn test_reset_overwrites_record() {
            let dir = TempDir::new().unwrap();
            let store = store_in(&dir);
            store
                .save(&TimerSettings::default().with_work_duration(5))
                .unwrap();

            let defaults = store.reset().unwrap();

            assert_eq!(defaults, TimerSettings::default());
            assert_eq!(store.load(), TimerSettings::default());
        }

        #[test]
        fn test_default_location_file_name() {
            if let Ok(store) = SettingsStore::at_default_location() {
                assert!(store.path().ends_with("pomodoro-bar/settings.json"));
            }
        }
    }

    mod edit_tests {
        use super::*;

        #[test]
        fn test_empty_edit_keeps_values() {
            let edit = SettingsEdit::default();
            assert!(edit.is_empty());

            let current = TimerSettings::default();
            assert_eq!(edit.apply(&current).unwrap(), current);
        }

        #[test]
        fn test_apply_durations() {
            let edit = SettingsEdit {
                work: Some("50:00".to_string()),
                rest: Some("00:10:00".to_string()),
                sound: None,
            };

            let next = edit.apply(&TimerSettings::default()).unwrap();

            assert_eq!(next.work_duration, 3000);
            assert_eq!(next.rest_duration, 600);
        }

        #[test]
        fn test_malformed_duration_is_rejected() {
            let edit = SettingsEdit {
                work: Some("ab:cd".to_string()),
                ..SettingsEdit::default()
            };

            let err = edit.apply(&TimerSettings::default()).unwrap_err();
            assert!(matches!(err, SettingsError::Format(_)));
            assert!(err.is_input_error());
        }

        #[test]
        fn test_zero_duration_is_rejected() {
            let edit = SettingsEdit {
                rest: Some("00:00".to_string()),
                ..SettingsEdit::default()
            };

            let err = edit.apply(&TimerSettings::default()).unwrap_err();
            assert!(matches!(err, SettingsError::InvalidDuration("rest_time")));
        }

        #[test]
        fn test_missing_sound_file_is_rejected() {
            let edit = SettingsEdit {
                sound: Some("/definitely/not/here.mp3".to_string()),
                ..SettingsEdit::default()
            };

            let err = edit.apply(&TimerSettings::default()).unwrap_err();
            assert!(matches!(err, SettingsError::SoundNotFound(_)));
        }

        #[test]
        fn test_existing_sound_file_is_accepted() {
            let dir = TempDir::new().unwrap();
            let sound = dir.path().join("bell.wav");
            fs::write(&sound, b"RIFF").unwrap();
            let edit = SettingsEdit {
                sound: Some(sound.display().to_string()),
                ..SettingsEdit::default()
            };

            let next = edit.apply(&TimerSettings::default()).unwrap();
            assert_eq!(next.sound_reference, sound.display().to_string());
        }

        #[test]
        fn test_builtin_sound_is_accepted() {
            let current = TimerSettings::default().with_sound_reference("/old.wav");
            let edit = SettingsEdit {
                sound: Some(BUILTIN_ALARM.to_string()),
                ..SettingsEdit::default()
            };

            let next = edit.apply(&current).unwrap();
            assert_eq!(next.sound_reference, BUILTIN_ALARM);
        }
    }
}
