//! Alarm sound playback for the Pomodoro Timer.
//!
//! This module provides:
//!
//! - The [`AlarmPlayer`] capability consumed by the timer engine
//! - Resolution of the settings' sound reference into a [`SoundSource`]
//! - A synthesized built-in alarm used when no file is configured or the
//!   configured file cannot be played
//! - A rodio-backed player and stand-ins for missing hardware and tests
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐  play / stop   ┌──────────────────┐
//! │    AlarmLoop     │───────────────▶│   AlarmPlayer    │
//! │ (timer engine)   │◀───────────────│                  │
//! └──────────────────┘   finished     └────────┬─────────┘
//!                                              │ crossbeam
//!                                              ▼
//!                                     ┌──────────────────┐
//!                                     │   audio thread   │
//!                                     │ (rodio Sink)     │
//!                                     └──────────────────┘
//! ```

mod builtin;
mod error;
mod player;
mod source;

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::oneshot;
use tracing::warn;

pub use builtin::{alarm_pattern, AlarmSegment};
pub use error::SoundError;
pub use player::RodioAlarmPlayer;
pub use source::{SoundSource, BUILTIN_ALARM};

/// Capability for playing the alarm sound.
///
/// Implementations play one pass of a sound per [`play`](Self::play) call;
/// looping is the caller's job. Only one pass may be audible at a time.
pub trait AlarmPlayer: Send + Sync {
    /// Starts one pass of `source`.
    ///
    /// Must not block the caller. The returned receiver resolves when the
    /// pass finishes on its own. It is dropped without a value if the pass
    /// is stopped or cannot be started.
    ///
    /// # Errors
    ///
    /// Returns an error if the audio device cannot be used.
    fn play(&self, source: &SoundSource) -> Result<oneshot::Receiver<()>, SoundError>;

    /// Stops the pass in progress, if any.
    ///
    /// Must not block the caller. The stop takes effect before any pass
    /// started by a later `play`.
    fn stop(&self);
}

/// Creates the rodio player, or a stand-in that reports the failure.
///
/// The stand-in keeps the timer usable on machines without audio; each
/// alarm then surfaces as an "alarm unavailable" notification.
#[must_use]
pub fn create_player() -> Arc<dyn AlarmPlayer> {
    match RodioAlarmPlayer::new() {
        Ok(player) => Arc::new(player),
        Err(e) => {
            warn!("Audio not available, alarm disabled: {}", e);
            Arc::new(UnavailableAlarmPlayer::new(e.to_string()))
        }
    }
}

/// Plays one pass of `source` and waits for it to finish.
///
/// # Errors
///
/// Returns an error if playback cannot start or is cut off.
pub async fn preview(player: &dyn AlarmPlayer, source: &SoundSource) -> Result<(), SoundError> {
    let finished = player.play(source)?;
    finished
        .await
        .map_err(|_| SoundError::PlaybackError("preview was interrupted".to_string()))
}

// ============================================================================
// UnavailableAlarmPlayer
// ============================================================================

/// Alarm player used when no audio device could be opened.
#[derive(Debug, Clone)]
pub struct UnavailableAlarmPlayer {
    reason: String,
}

impl UnavailableAlarmPlayer {
    /// Creates a player that fails every `play` with `reason`.
    #[must_use]
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl AlarmPlayer for UnavailableAlarmPlayer {
    fn play(&self, _source: &SoundSource) -> Result<oneshot::Receiver<()>, SoundError> {
        Err(SoundError::DeviceNotAvailable(self.reason.clone()))
    }

    fn stop(&self) {}
}

// ============================================================================
// MockAlarmPlayer
// ============================================================================

/// Mock alarm player for testing.
///
/// Passes never finish on their own; call
/// [`finish_playback`](Self::finish_playback) to complete them.
#[derive(Debug, Default)]
pub struct MockAlarmPlayer {
    play_calls: Mutex<Vec<SoundSource>>,
    in_progress: Mutex<Vec<oneshot::Sender<()>>>,
    stop_calls: AtomicUsize,
    should_fail: AtomicBool,
}

impl MockAlarmPlayer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_should_fail(&self, should_fail: bool) {
        self.should_fail.store(should_fail, Ordering::SeqCst);
    }

    #[must_use]
    pub fn play_count(&self) -> usize {
        self.play_calls.lock().unwrap().len()
    }

    #[must_use]
    pub fn get_play_calls(&self) -> Vec<SoundSource> {
        self.play_calls.lock().unwrap().clone()
    }

    #[must_use]
    pub fn stop_count(&self) -> usize {
        self.stop_calls.load(Ordering::SeqCst)
    }

    /// Returns true while a pass is audible.
    #[must_use]
    pub fn is_playing(&self) -> bool {
        !self.in_progress.lock().unwrap().is_empty()
    }

    /// Completes every pass in progress.
    pub fn finish_playback(&self) {
        for finished in self.in_progress.lock().unwrap().drain(..) {
            let _ = finished.send(());
        }
    }
}

impl AlarmPlayer for MockAlarmPlayer {
    fn play(&self, source: &SoundSource) -> Result<oneshot::Receiver<()>, SoundError> {
        if self.should_fail.load(Ordering::SeqCst) {
            return Err(SoundError::DeviceNotAvailable("Mock failure".to_string()));
        }
        let mut in_progress = self.in_progress.lock().unwrap();
        assert!(
            in_progress.is_empty(),
            "play called while another pass is audible"
        );
        let (tx, rx) = oneshot::channel();
        in_progress.push(tx);
        self.play_calls.lock().unwrap().push(source.clone());
        Ok(rx)
    }

    fn stop(&self) {
        self.stop_calls.fetch_add(1, Ordering::SeqCst);
        self.in_progress.lock().unwrap().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unavailable_player_fails_with_reason() {
        let player = UnavailableAlarmPlayer::new("no speakers");
        let err = player.play(&SoundSource::Builtin).unwrap_err();

        assert_eq!(err, SoundError::DeviceNotAvailable("no speakers".to_string()));
        assert!(err.is_device_error());
    }

    #[test]
    fn test_mock_records_plays() {
        let mock = MockAlarmPlayer::new();
        let _finished = mock.play(&SoundSource::file("/tmp/a.wav")).unwrap();

        assert_eq!(mock.play_count(), 1);
        assert!(mock.is_playing());
        assert_eq!(mock.get_play_calls(), vec![SoundSource::file("/tmp/a.wav")]);
    }

    #[test]
    fn test_mock_stop_drops_completion() {
        let mock = MockAlarmPlayer::new();
        let mut finished = mock.play(&SoundSource::Builtin).unwrap();

        mock.stop();

        assert!(!mock.is_playing());
        assert_eq!(mock.stop_count(), 1);
        assert!(finished.try_recv().is_err());
    }

    #[test]
    fn test_mock_failure() {
        let mock = MockAlarmPlayer::new();
        mock.set_should_fail(true);

        assert!(mock.play(&SoundSource::Builtin).is_err());
        assert_eq!(mock.play_count(), 0);
    }

    #[tokio::test]
    async fn test_preview_waits_for_completion() {
        let mock = Arc::new(MockAlarmPlayer::new());
        let finisher = Arc::clone(&mock);

        let waiter = tokio::spawn(async move {
            tokio::task::yield_now().await;
            finisher.finish_playback();
        });

        preview(mock.as_ref(), &SoundSource::Builtin).await.unwrap();
        waiter.await.unwrap();
        assert_eq!(mock.play_count(), 1);
    }

    #[tokio::test]
    async fn test_preview_interrupted() {
        let mock = Arc::new(MockAlarmPlayer::new());
        let stopper = Arc::clone(&mock);

        let waiter = tokio::spawn(async move {
            tokio::task::yield_now().await;
            stopper.stop();
        });

        let result = preview(mock.as_ref(), &SoundSource::Builtin).await;
        waiter.await.unwrap();
        assert!(matches!(result, Err(SoundError::PlaybackError(_))));
    }

    #[tokio::test]
    async fn test_preview_unavailable() {
        let player = UnavailableAlarmPlayer::new("none");
        let result = preview(&player, &SoundSource::Builtin).await;
        assert!(matches!(result, Err(SoundError::DeviceNotAvailable(_))));
    }
}
