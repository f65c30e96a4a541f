//! Notification capability for the Pomodoro Timer.
//!
//! The engine posts one notification per completed phase, plus one when the
//! alarm cannot be played.

use std::sync::Mutex;

use crate::types::TimerPhase;

/// Title used for every timer notification.
pub const NOTIFICATION_TITLE: &str = "Pomodoro Timer";

/// Capability for posting user-visible notifications.
pub trait NotificationSink: Send + Sync {
    /// Posts a notification.
    fn notify(&self, title: &str, message: &str);
}

/// Returns the message for the end of `finished`.
pub fn completion_message(finished: TimerPhase) -> &'static str {
    match finished {
        TimerPhase::Working => "Take a break!",
        TimerPhase::Resting => "Back to work!",
    }
}

/// Mock notification sink for testing.
#[derive(Debug, Default)]
pub struct MockNotificationSink {
    notifications: Mutex<Vec<(String, String)>>,
}

impl MockNotificationSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get_notifications(&self) -> Vec<(String, String)> {
        self.notifications.lock().unwrap().clone()
    }

    /// Returns just the message bodies, in order.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.notifications
            .lock()
            .unwrap()
            .iter()
            .map(|(_, message)| message.clone())
            .collect()
    }

    #[must_use]
    pub fn notification_count(&self) -> usize {
        self.notifications.lock().unwrap().len()
    }

    pub fn clear_recorded(&self) {
        self.notifications.lock().unwrap().clear();
    }
}

impl NotificationSink for MockNotificationSink {
    fn notify(&self, title: &str, message: &str) {
        self.notifications
            .lock()
            .unwrap()
            .push((title.to_string(), message.to_string()));
    }
}
