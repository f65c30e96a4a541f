//! Alarm player implementation using rodio.
//!
//! The rodio output stream is not `Send`, so it lives on a dedicated audio
//! thread. [`RodioAlarmPlayer`] is a handle that queues commands to that
//! thread over a crossbeam channel and never waits on it, so callers on an
//! async runtime are not blocked while a file is opened. The audio thread
//! applies commands in order: a `stop` followed by a `play` can never leave
//! two passes audible. Only one `Sink` exists at a time; starting a new pass
//! stops the old one.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::Mutex;
use std::thread::{self, JoinHandle};

use crossbeam_channel::{bounded, unbounded, Receiver, Sender};
use rodio::source::{EmptyCallback, SineWave, Source, Zero};
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};
use tokio::sync::oneshot;
use tracing::{debug, warn};

use super::builtin::{alarm_pattern, AlarmSegment, ALARM_AMPLITUDE};
use super::error::SoundError;
use super::source::SoundSource;
use super::AlarmPlayer;

/// Sample rate used for the synthesized silence segments.
const SILENCE_SAMPLE_RATE: u32 = 48_000;

enum AudioCommand {
    Play {
        source: SoundSource,
        finished: oneshot::Sender<()>,
    },
    Stop,
    Shutdown,
}

/// An alarm player backed by the default audio output device.
pub struct RodioAlarmPlayer {
    commands: Sender<AudioCommand>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl RodioAlarmPlayer {
    /// Opens the default output device on a new audio thread.
    ///
    /// # Errors
    ///
    /// Returns `SoundError::DeviceNotAvailable` if no audio output device
    /// is available or the audio thread cannot be started.
    pub fn new() -> Result<Self, SoundError> {
        let (commands, command_rx) = unbounded();
        let (ready_tx, ready_rx) = bounded(1);

        let worker = thread::Builder::new()
            .name("alarm-audio".to_string())
            .spawn(move || audio_thread(command_rx, ready_tx))
            .map_err(|e| SoundError::DeviceNotAvailable(e.to_string()))?;

        match ready_rx.recv() {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                let _ = worker.join();
                return Err(e);
            }
            Err(_) => {
                let _ = worker.join();
                return Err(SoundError::DeviceNotAvailable(
                    "audio thread exited during startup".to_string(),
                ));
            }
        }

        debug!("Audio output stream initialized");
        Ok(Self {
            commands,
            worker: Mutex::new(Some(worker)),
        })
    }

    fn thread_gone() -> SoundError {
        SoundError::PlaybackError("audio thread is not running".to_string())
    }
}

impl AlarmPlayer for RodioAlarmPlayer {
    /// Queues a pass on the audio thread.
    ///
    /// If the audio thread cannot start the pass it logs the failure and
    /// drops the completion sender, so the returned receiver resolves with
    /// an error.
    fn play(&self, source: &SoundSource) -> Result<oneshot::Receiver<()>, SoundError> {
        let (finished_tx, finished_rx) = oneshot::channel();
        self.commands
            .send(AudioCommand::Play {
                source: source.clone(),
                finished: finished_tx,
            })
            .map_err(|_| Self::thread_gone())?;
        Ok(finished_rx)
    }

    fn stop(&self) {
        if self.commands.send(AudioCommand::Stop).is_err() {
            debug!("Audio thread already gone, nothing to stop");
        }
    }
}

impl Drop for RodioAlarmPlayer {
    fn drop(&mut self) {
        let _ = self.commands.send(AudioCommand::Shutdown);
        let worker = self.worker.lock().ok().and_then(|mut slot| slot.take());
        if let Some(worker) = worker {
            let _ = worker.join();
        }
    }
}

impl std::fmt::Debug for RodioAlarmPlayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RodioAlarmPlayer").finish_non_exhaustive()
    }
}

fn audio_thread(commands: Receiver<AudioCommand>, ready: Sender<Result<(), SoundError>>) {
    let (_stream, handle) = match OutputStream::try_default() {
        Ok(pair) => pair,
        Err(e) => {
            let _ = ready.send(Err(SoundError::DeviceNotAvailable(e.to_string())));
            return;
        }
    };
    let _ = ready.send(Ok(()));

    let mut current: Option<Sink> = None;
    for command in commands.iter() {
        match command {
            AudioCommand::Play { source, finished } => {
                if let Some(sink) = current.take() {
                    sink.stop();
                }
                match start_pass(&handle, &source, finished) {
                    Ok(sink) => current = Some(sink),
                    Err(e) => warn!("Could not start alarm pass: {}", e),
                }
            }
            AudioCommand::Stop => {
                if let Some(sink) = current.take() {
                    sink.stop();
                    debug!("Alarm playback stopped");
                }
            }
            AudioCommand::Shutdown => break,
        }
    }

    if let Some(sink) = current.take() {
        sink.stop();
    }
    debug!("Audio thread exiting");
}

/// Queues one pass of `source` followed by a completion callback.
fn start_pass(
    handle: &OutputStreamHandle,
    source: &SoundSource,
    finished: oneshot::Sender<()>,
) -> Result<Sink, SoundError> {
    let sink = Sink::try_new(handle).map_err(|e| SoundError::StreamError(e.to_string()))?;

    match source {
        SoundSource::File { path } => match open_decoder(path) {
            Ok(decoder) => {
                debug!("Playing alarm file: {}", path.display());
                sink.append(decoder);
            }
            Err(e) if e.should_fallback_to_builtin() => {
                warn!("{}, falling back to the built-in alarm", e);
                append_builtin(&sink);
            }
            Err(e) => return Err(e),
        },
        SoundSource::Builtin => {
            debug!("Playing built-in alarm");
            append_builtin(&sink);
        }
    }

    let finished = Mutex::new(Some(finished));
    sink.append(EmptyCallback::<f32>::new(Box::new(move || {
        let sender = finished.lock().ok().and_then(|mut slot| slot.take());
        if let Some(sender) = sender {
            let _ = sender.send(());
        }
    })));

    Ok(sink)
}

fn open_decoder(path: &Path) -> Result<Decoder<BufReader<File>>, SoundError> {
    let file = File::open(path)
        .map_err(|e| SoundError::FileNotFound(format!("{}: {}", path.display(), e)))?;
    Decoder::new(BufReader::new(file)).map_err(|e| SoundError::DecodeError(e.to_string()))
}

fn append_builtin(sink: &Sink) {
    for segment in alarm_pattern() {
        match *segment {
            AlarmSegment::Tone {
                frequency,
                duration,
            } => sink.append(
                SineWave::new(frequency)
                    .take_duration(duration)
                    .amplify(ALARM_AMPLITUDE),
            ),
            AlarmSegment::Silence(duration) => {
                sink.append(Zero::<f32>::new(1, SILENCE_SAMPLE_RATE).take_duration(duration))
            }
        }
    }
}
