//! Pomodoro Timer - work/rest intervals with a looping alarm
//!
//! This tool helps you stay focused using the Pomodoro Technique:
//! - a work interval (25 minutes by default)
//! - a rest interval (5 minutes by default)
//! - an alarm that keeps ringing until you acknowledge it

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{CommandFactory, Parser};

use pomodoro_bar::cli::{shell, Cli, Commands, Display, SetArgs, SettingsCommand};
use pomodoro_bar::settings::{SettingsEdit, SettingsError, SettingsStore};
use pomodoro_bar::sound::{create_player, preview, SoundSource};

/// Main entry point
#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Parse command line arguments
    let cli = Cli::parse();

    // Initialize logging
    init_tracing(cli.verbose);

    // Execute command
    if let Err(e) = execute(cli).await {
        Display::show_error(&format!("{:#}", e));
        std::process::exit(exit_code(&e));
    }
}

/// Exit status for a failed command: 2 for rejected user input, 1 otherwise.
fn exit_code(error: &anyhow::Error) -> i32 {
    match error.downcast_ref::<SettingsError>() {
        Some(e) if e.is_input_error() => 2,
        _ => 1,
    }
}

/// Initializes the tracing subscriber for logging.
///
/// `RUST_LOG` is honoured unless `--verbose` asks for debug output.
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}

/// Executes the CLI command.
async fn execute(cli: Cli) -> Result<()> {
    if cli.verbose {
        tracing::info!("Verbose mode enabled");
    }

    match cli.command {
        Some(Commands::Run) => {
            let store = open_store(cli.config)?;
            shell::run(store).await?;
        }
        Some(Commands::Settings { action }) => {
            let store = open_store(cli.config)?;
            execute_settings(&store, action).await?;
        }
        Some(Commands::Completions { shell }) => {
            generate_completions(shell);
        }
        None => {
            // No command provided, show help
            Cli::command().print_help()?;
        }
    }

    Ok(())
}

/// Executes a `settings` subcommand.
async fn execute_settings(store: &SettingsStore, action: SettingsCommand) -> Result<()> {
    match action {
        SettingsCommand::Show => {
            let settings = store.load();
            Display::show_settings(&settings, store.path());
        }
        SettingsCommand::Set(args) => {
            let edit = settings_edit(args);
            if edit.is_empty() {
                bail!("nothing to change, pass --work, --rest or --sound");
            }
            let current = store.load();
            let updated = edit.apply(&current)?;
            store
                .save(&updated)
                .with_context(|| format!("failed to save {}", store.path().display()))?;
            Display::show_settings_saved(&updated);
        }
        SettingsCommand::Reset => {
            let defaults = store
                .reset()
                .with_context(|| format!("failed to reset {}", store.path().display()))?;
            Display::show_settings_reset(&defaults);
        }
        SettingsCommand::Preview => {
            let settings = store.load();
            let source = SoundSource::from_reference(&settings.sound_reference);
            println!("Playing {}...", source.name());
            let player = create_player();
            preview(player.as_ref(), &source)
                .await
                .context("alarm preview failed")?;
        }
        SettingsCommand::Path => {
            println!("{}", store.path().display());
        }
    }
    Ok(())
}

fn open_store(config: Option<PathBuf>) -> Result<SettingsStore> {
    match config {
        Some(path) => Ok(SettingsStore::new(path)),
        None => SettingsStore::at_default_location().context("cannot locate the settings file"),
    }
}

fn settings_edit(args: SetArgs) -> SettingsEdit {
    SettingsEdit {
        work: args.work,
        rest: args.rest,
        sound: args.sound,
    }
}

/// Generates shell completion scripts.
fn generate_completions(shell: clap_complete::Shell) {
    use clap_complete::generate;
    use std::io;

    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();
    generate(shell, &mut cmd, bin_name, &mut io::stdout());
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_no_args() {
        let cli = Cli::parse_from(["pomodoro-bar"]);
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_cli_parse_settings_show() {
        let cli = Cli::parse_from(["pomodoro-bar", "settings", "show"]);
        assert!(matches!(
            cli.command,
            Some(Commands::Settings {
                action: SettingsCommand::Show
            })
        ));
    }

    #[test]
    fn test_open_store_with_override() {
        let store = open_store(Some(PathBuf::from("/tmp/custom.json"))).unwrap();
        assert_eq!(store.path(), std::path::Path::new("/tmp/custom.json"));
    }

    #[test]
    fn test_settings_edit_from_args() {
        let edit = settings_edit(SetArgs {
            work: Some("30:00".to_string()),
            rest: None,
            sound: None,
        });
        assert_eq!(edit.work.as_deref(), Some("30:00"));
        assert!(!edit.is_empty());
        assert!(settings_edit(SetArgs::default()).is_empty());
    }

    #[test]
    fn test_exit_code_for_rejected_input() {
        let input = anyhow::Error::new(SettingsError::InvalidDuration("work_time"));
        assert_eq!(exit_code(&input), 2);

        let storage = anyhow::Error::new(SettingsError::ConfigDirNotFound)
            .context("cannot locate the settings file");
        assert_eq!(exit_code(&storage), 1);

        assert_eq!(exit_code(&anyhow::anyhow!("nothing to change")), 1);
    }

    #[test]
    fn test_cli_parse_verbose() {
        let cli = Cli::parse_from(["pomodoro-bar", "--verbose", "settings", "path"]);
        assert!(cli.verbose);
    }
}
