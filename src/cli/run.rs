//! CLI entry point and dispatch logic
//!
//! `run()` parses arguments, discovers configuration, initializes logging,
//! creates the tokio runtime, dispatches to a command and handles all error
//! output.

use clap::Parser;

use super::args::{Cli, Commands};
use super::commands;

use crate::logging::init_tracing;
use crate::{
    Config, ConfigError, ExitCode, LlmError, RepoGlanceError, SourceError, UserFriendlyError,
};

/// Main CLI execution function.
///
/// Prints everything itself, including errors, and returns the exit code to
/// use on failure. main.rs only calls `std::process::exit`.
pub fn run() -> Result<(), ExitCode> {
    let cli = Cli::parse();
    let cli_args = cli.to_cli_args();

    let config = match Config::discover(&cli_args) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{}", render_error(&err, "config"));
            return Err(ExitCode::CLI_ARGS);
        }
    };

    if let Err(e) = init_tracing(config.defaults.verbose) {
        eprintln!("Warning: failed to initialize logging: {e}");
    }

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("✗ Failed to create async runtime: {e}");
            return Err(ExitCode::INTERNAL);
        }
    };

    let operation = cli.command.name();

    let result = rt.block_on(async {
        match cli.command {
            Commands::Select { path, json } => {
                commands::execute_select_command(&path, json, &config)
            }
            Commands::Chunk { path, json } => commands::execute_chunk_command(&path, json, &config),
            Commands::Analyze {
                path,
                offline,
                json,
            } => commands::execute_analyze_command(&path, offline, json, &config).await,
            Commands::Config { json } => commands::execute_config_command(json, &config),
        }
    });

    if let Err(error) = result {
        eprintln!("{}", render_error(&error, operation));
        return Err(exit_code_for(&error));
    }

    Ok(())
}

/// Exit code for an error that reached the top of a command.
pub(super) fn exit_code_for(error: &anyhow::Error) -> ExitCode {
    if let Some(err) = error.downcast_ref::<RepoGlanceError>() {
        return err.to_exit_code();
    }
    if error.downcast_ref::<ConfigError>().is_some() {
        return ExitCode::CLI_ARGS;
    }
    if error.downcast_ref::<SourceError>().is_some() {
        return ExitCode::SOURCE_ERROR;
    }
    if let Some(err) = error.downcast_ref::<LlmError>() {
        return RepoGlanceError::Llm(err.clone()).to_exit_code();
    }
    ExitCode::INTERNAL
}

/// User-facing report for `error`, with context and suggestions when the
/// error carries them.
pub(super) fn render_error(error: &anyhow::Error, operation: &str) -> String {
    if let Some(err) = error.downcast_ref::<RepoGlanceError>() {
        return err.display_for_user();
    }
    if let Some(err) = error.downcast_ref::<ConfigError>() {
        return friendly_report(err);
    }
    if let Some(err) = error.downcast_ref::<SourceError>() {
        return friendly_report(err);
    }
    if let Some(err) = error.downcast_ref::<LlmError>() {
        return friendly_report(err);
    }

    let mut report = format!("✗ {operation} failed: {error:#}\n");
    report.push_str("\n  Run with --verbose for more detailed output\n");
    report
}

fn friendly_report(err: &dyn UserFriendlyError) -> String {
    let mut output = format!("Error: {}\n", err.user_message());

    if let Some(ctx) = err.context() {
        output.push_str(&format!("\nContext: {ctx}\n"));
    }

    let suggestions = err.suggestions();
    if !suggestions.is_empty() {
        output.push_str("\nSuggestions:\n");
        for suggestion in suggestions {
            output.push_str(&format!("  • {suggestion}\n"));
        }
    }

    output
}
