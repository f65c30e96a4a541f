//! Interactive terminal host for the timer engine.
//!
//! The terminal stands in for the menu bar: a render thread owns stdout and
//! draws the remaining time and notifications it receives over a crossbeam
//! channel, while commands typed on stdin drive the engine.
//!
//! ```text
//! stdin thread ──lines──▶ shell loop ──commands──▶ TimerEngine
//!                                                      │ ChannelSink
//!                                                      ▼
//!                                   render thread ◀── crossbeam
//! ```

use std::io::{self, BufRead, Write};
use std::str::FromStr;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use anyhow::{Context, Result};
use crossbeam_channel::Receiver;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use super::display::Display;
use crate::display::{ChannelSink, DisplayUpdate};
use crate::settings::SettingsStore;
use crate::sound::create_player;
use crate::timer::{Capabilities, TimerEngine};

/// Capacity of the stdin line channel.
const INPUT_BUFFER: usize = 16;

// ============================================================================
// ShellCommand
// ============================================================================

/// A command typed into the running timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellCommand {
    Start,
    Pause,
    Reset,
    Rest,
    Reload,
    Status,
    Help,
    Quit,
}

impl FromStr for ShellCommand {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "start" | "s" | "resume" => Ok(Self::Start),
            "pause" | "p" => Ok(Self::Pause),
            "reset" => Ok(Self::Reset),
            "rest" => Ok(Self::Rest),
            "reload" => Ok(Self::Reload),
            "status" => Ok(Self::Status),
            "help" | "h" | "?" => Ok(Self::Help),
            "quit" | "q" | "exit" => Ok(Self::Quit),
            other => Err(format!("unknown command '{}', type 'help'", other)),
        }
    }
}

// ============================================================================
// run
// ============================================================================

/// Runs the timer until `quit`, end of input or Ctrl-C.
pub async fn run(store: SettingsStore) -> Result<()> {
    let settings = store.load();
    debug!("Running with settings from {}", store.path().display());

    let (display_tx, display_rx) = crossbeam_channel::unbounded();
    let renderer = spawn_renderer(display_rx)?;
    let mut lines = spawn_input_reader()?;

    let sink = Arc::new(ChannelSink::new(display_tx));
    let engine = TimerEngine::spawn(
        settings,
        Capabilities {
            display: sink.clone(),
            notifier: sink,
            player: create_player(),
        },
    );

    println!("Type 'start' to begin, 'help' for commands.");

    loop {
        tokio::select! {
            line = lines.recv() => {
                let Some(line) = line else {
                    debug!("End of input");
                    break;
                };
                if line.trim().is_empty() {
                    continue;
                }
                match line.parse::<ShellCommand>() {
                    Ok(ShellCommand::Quit) => break,
                    Ok(command) => execute(&engine, &store, command).await?,
                    Err(e) => Display::show_error(&e),
                }
            }
            result = tokio::signal::ctrl_c() => {
                result.context("failed to listen for Ctrl-C")?;
                debug!("Interrupted");
                break;
            }
        }
    }

    engine.shutdown().await?;
    // The engine dropped the last channel sender, so the renderer drains and exits.
    if renderer.join().is_err() {
        warn!("Render thread panicked");
    }
    println!();
    Ok(())
}

async fn execute(engine: &TimerEngine, store: &SettingsStore, command: ShellCommand) -> Result<()> {
    match command {
        ShellCommand::Start => {
            engine.start().await?;
        }
        ShellCommand::Pause => {
            engine.pause().await?;
        }
        ShellCommand::Reset => {
            engine.reset().await?;
        }
        ShellCommand::Rest => {
            engine.rest().await?;
        }
        ShellCommand::Reload => {
            let settings = store.load();
            engine.reload_settings(settings).await?;
        }
        ShellCommand::Status => Display::show_status(&engine.snapshot()),
        ShellCommand::Help => Display::show_shell_help(),
        ShellCommand::Quit => {}
    }
    Ok(())
}

// ============================================================================
// Threads
// ============================================================================

fn spawn_renderer(updates: Receiver<DisplayUpdate>) -> Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("render".to_string())
        .spawn(move || {
            let stdout = io::stdout();
            if let Err(e) = render(&updates, &mut stdout.lock()) {
                warn!("Render thread stopped: {}", e);
            }
        })
        .context("failed to start render thread")
}

/// Writes every update to `out` until all senders are gone.
fn render<W: Write>(updates: &Receiver<DisplayUpdate>, out: &mut W) -> io::Result<()> {
    for update in updates.iter() {
        match update {
            DisplayUpdate::Title(text) => write!(out, "{}", Display::format_title(&text))?,
            DisplayUpdate::Notification { title, message } => {
                write!(out, "{}", Display::format_notification(&title, &message))?
            }
        }
        out.flush()?;
    }
    Ok(())
}

/// Reads stdin lines on a plain thread.
///
/// The thread is left detached; it ends with the process or at end of input.
fn spawn_input_reader() -> Result<mpsc::Receiver<String>> {
    let (tx, rx) = mpsc::channel(INPUT_BUFFER);
    thread::Builder::new()
        .name("stdin".to_string())
        .spawn(move || {
            for line in io::stdin().lock().lines() {
                let Ok(line) = line else { break };
                if tx.blocking_send(line).is_err() {
                    break;
                }
            }
        })
        .context("failed to start input thread")?;
    Ok(rx)
}

// ============================================================================
// Tests
// ============================================================================
