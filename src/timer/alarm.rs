//! Looping alarm worker.
//!
//! An [`AlarmLoop`] plays the configured sound pass after pass until it is
//! stopped. Each pass ends with an explicit completion signal from the
//! [`AlarmPlayer`]; there is no polling of playback status.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::notification::{NotificationSink, NOTIFICATION_TITLE};
use crate::sound::{AlarmPlayer, SoundSource};

/// Pause between two passes of the alarm sound.
pub const ALARM_REPEAT_GAP: Duration = Duration::from_millis(300);

/// How an alarm task ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AlarmExit {
    /// Stopped by its owner.
    Cancelled,
    /// The player could not start a pass.
    Unavailable,
    /// A pass was cut off without completing.
    Interrupted,
}

/// Handle to a running alarm task.
#[derive(Debug)]
pub(crate) struct AlarmLoop {
    generation: u64,
    cancel: oneshot::Sender<()>,
    handle: JoinHandle<()>,
}

impl AlarmLoop {
    /// Spawns the alarm task.
    ///
    /// If the task ends on its own (device unavailable, pass cut off) it
    /// sends `generation` on `exited` so the owner can clear its flag.
    pub(crate) fn spawn(
        generation: u64,
        player: Arc<dyn AlarmPlayer>,
        notifier: Arc<dyn NotificationSink>,
        source: SoundSource,
        exited: mpsc::UnboundedSender<u64>,
    ) -> Self {
        let (cancel, cancel_rx) = oneshot::channel();
        let handle = tokio::spawn(async move {
            let exit = run_alarm(player.as_ref(), notifier.as_ref(), &source, cancel_rx).await;
            debug!(generation, ?exit, "Alarm task finished");
            if exit != AlarmExit::Cancelled {
                let _ = exited.send(generation);
            }
        });

        Self {
            generation,
            cancel,
            handle,
        }
    }

    pub(crate) fn generation(&self) -> u64 {
        self.generation
    }

    /// Stops the alarm and waits for its task to exit.
    pub(crate) async fn stop(self) {
        let _ = self.cancel.send(());
        if let Err(e) = self.handle.await {
            warn!("Alarm task failed: {}", e);
        }
    }
}

async fn run_alarm(
    player: &dyn AlarmPlayer,
    notifier: &dyn NotificationSink,
    source: &SoundSource,
    mut cancel: oneshot::Receiver<()>,
) -> AlarmExit {
    loop {
        let finished = match player.play(source) {
            Ok(finished) => finished,
            Err(e) => {
                warn!("Alarm unavailable: {}", e);
                notifier.notify(NOTIFICATION_TITLE, &format!("Alarm unavailable: {}", e));
                return AlarmExit::Unavailable;
            }
        };

        tokio::select! {
            biased;
            _ = &mut cancel => {
                player.stop();
                return AlarmExit::Cancelled;
            }
            result = finished => {
                if result.is_err() {
                    warn!("Alarm pass ended before completing");
                    return AlarmExit::Interrupted;
                }
            }
        }

        tokio::select! {
            biased;
            _ = &mut cancel => return AlarmExit::Cancelled,
            _ = tokio::time::sleep(ALARM_REPEAT_GAP) => {}
        }
    }
}
