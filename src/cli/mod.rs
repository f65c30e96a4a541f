//! CLI module for the Pomodoro Timer.
//!
//! This module provides the command-line interface:
//! - `commands`: Command definitions using clap derive
//! - `display`: Output formatting and display logic
//! - `shell`: Interactive terminal host for the timer engine

pub mod commands;
pub mod display;
pub mod shell;

pub use commands::{Cli, Commands, SetArgs, SettingsCommand};
pub use display::Display;
pub use shell::{run, ShellCommand};
