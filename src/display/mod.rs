//! Display capability for the Pomodoro Timer.
//!
//! The timer engine renders its remaining time through a [`DisplaySink`].
//! In the terminal host, updates travel over a crossbeam channel from the
//! engine (running in tokio) to a render thread that owns stdout:
//!
//! ```ignore
//! use pomodoro_bar::display::{ChannelSink, DisplayUpdate};
//! use crossbeam_channel::unbounded;
//!
//! let (tx, rx) = unbounded();
//! let sink = ChannelSink::new(tx);
//!
//! // From the render thread
//! while let Ok(update) = rx.recv() {
//!     match update {
//!         DisplayUpdate::Title(text) => println!("{}", text),
//!         DisplayUpdate::Notification { title, message } => println!("{title}: {message}"),
//!     }
//! }
//! ```

use std::sync::Mutex;

use crossbeam_channel::Sender;
use tracing::debug;

use crate::notification::NotificationSink;

/// Capability for showing the remaining time.
pub trait DisplaySink: Send + Sync {
    /// Replaces the displayed text.
    fn update(&self, text: &str);
}

// ============================================================================
// DisplayUpdate / ChannelSink
// ============================================================================

/// A message for the render thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayUpdate {
    /// New title text (remaining time)
    Title(String),
    /// A phase-completion or error notice
    Notification {
        /// Notification title
        title: String,
        /// Notification body
        message: String,
    },
}

/// Forwards display text and notifications to a channel.
///
/// Implements both [`DisplaySink`] and [`NotificationSink`] so a single
/// consumer sees them in the order the engine produced them.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: Sender<DisplayUpdate>,
}

impl ChannelSink {
    /// Creates a sink that sends into `tx`.
    pub fn new(tx: Sender<DisplayUpdate>) -> Self {
        Self { tx }
    }

    fn send(&self, update: DisplayUpdate) {
        if self.tx.send(update).is_err() {
            debug!("Display receiver closed, dropping update");
        }
    }
}

impl DisplaySink for ChannelSink {
    fn update(&self, text: &str) {
        self.send(DisplayUpdate::Title(text.to_string()));
    }
}

impl NotificationSink for ChannelSink {
    fn notify(&self, title: &str, message: &str) {
        self.send(DisplayUpdate::Notification {
            title: title.to_string(),
            message: message.to_string(),
        });
    }
}

// ============================================================================
// MockDisplaySink
// ============================================================================

/// Mock display for testing; records every update.
#[derive(Debug, Default)]
pub struct MockDisplaySink {
    updates: Mutex<Vec<String>>,
}

impl MockDisplaySink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get_updates(&self) -> Vec<String> {
        self.updates.lock().unwrap().clone()
    }

    #[must_use]
    pub fn last(&self) -> Option<String> {
        self.updates.lock().unwrap().last().cloned()
    }

    pub fn clear(&self) {
        self.updates.lock().unwrap().clear();
    }
}

impl DisplaySink for MockDisplaySink {
    fn update(&self, text: &str) {
        self.updates.lock().unwrap().push(text.to_string());
    }
}
