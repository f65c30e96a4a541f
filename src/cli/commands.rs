//! Command definitions for the Pomodoro Timer CLI.
//!
//! Uses clap derive macro for argument parsing.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::settings::parse_time;

// ============================================================================
// CLI Structure
// ============================================================================

/// Pomodoro Timer - work/rest intervals with a looping alarm
#[derive(Parser, Debug)]
#[command(
    name = "pomodoro-bar",
    version,
    about = "Pomodoro work/rest timer with a looping alarm",
    long_about = "A Pomodoro timer that alternates between a work interval and a rest interval.\n\
                  When an interval ends it notifies you and loops an alarm until you respond.",
    propagate_version = true
)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Settings file to use instead of the default location
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

// ============================================================================
// Subcommands
// ============================================================================

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Run the timer in this terminal
    Run,

    /// View or edit the timer settings
    Settings {
        #[command(subcommand)]
        action: SettingsCommand,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell type for completion script
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Settings subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum SettingsCommand {
    /// Print the current settings
    Show,

    /// Change one or more settings
    Set(SetArgs),

    /// Restore the default settings
    Reset,

    /// Play one pass of the configured alarm
    Preview,

    /// Print the location of the settings file
    Path,
}

// ============================================================================
// Set Command Arguments
// ============================================================================

/// Arguments for `settings set`
#[derive(Args, Debug, Clone, Default)]
pub struct SetArgs {
    /// Work duration as hh:mm:ss, mm:ss or seconds
    #[arg(short, long, value_parser = validate_time)]
    pub work: Option<String>,

    /// Rest duration as hh:mm:ss, mm:ss or seconds
    #[arg(short, long, value_parser = validate_time)]
    pub rest: Option<String>,

    /// Alarm sound file, or "builtin:alarm" for the built-in alarm
    #[arg(short, long)]
    pub sound: Option<String>,
}

// ============================================================================
// Validation Functions
// ============================================================================

/// Validates a duration argument.
///
/// - Must parse as `hh:mm:ss`
/// - Must not be zero
fn validate_time(s: &str) -> Result<String, String> {
    match parse_time(s) {
        Ok(0) => Err("duration must be at least one second".to_string()),
        Ok(_) => Ok(s.to_string()),
        Err(e) => Err(e.to_string()),
    }
}

// ============================================================================
// Tests
// ============================================================================
