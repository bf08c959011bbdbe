//! SpecSpec CLI - check package directories and documents against spec files
//!
//! This is the main entry point for the `specspec` binary, providing
//! commands for running, linting and listing spec rules.

mod cli;
mod config;
mod error;
mod handlers;
mod logging;
mod output;

use cli::{Cli, Commands, OutputFormat};
use colored::control;
use config::Config;
use error::Result;
use handlers::Outcome;
use logging::{timing::Timer, LogFormat, LoggingConfig};
use output::OutputWriter;
use std::process;
use tracing::instrument;

fn main() {
    // Parse command-line arguments
    let cli = Cli::parse_args();

    let config = match Config::load_with_file(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => exit_with(&e, !cli.no_color),
    };

    let use_color = cli.use_color() && config.output.color;
    control::set_override(use_color);

    // Held until exit so buffered file logs are flushed
    let _log_guard = match init_logging(&cli, &config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {}", e);
            None
        }
    };

    match run(cli, &config, use_color) {
        Ok(outcome) => process::exit(outcome.exit_code()),
        Err(e) => exit_with(&e, use_color),
    }
}

fn exit_with(e: &error::Error, use_color: bool) -> ! {
    eprintln!("{}", error::format_error(e, use_color));

    if e.should_show_help() {
        eprintln!("\nFor more information, try '--help'");
    }

    process::exit(e.exit_code());
}

/// Main application logic
#[instrument(skip(cli, config), fields(command = ?cli.command))]
fn run(cli: Cli, config: &Config, use_color: bool) -> Result<Outcome> {
    let _timer = Timer::new("cli_execution");

    let format = cli
        .output
        .or_else(|| OutputFormat::from_config(&config.output.format))
        .unwrap_or(OutputFormat::Human);
    let mut output = OutputWriter::new(format, use_color, cli.quiet);

    tracing::info!(
        command = ?cli.command,
        verbosity = cli.verbosity_level(),
        request_id = logging::current_request_id().unwrap_or("unknown"),
        "Executing command"
    );

    match cli.command {
        Commands::Check(args) => handlers::handle_check(args, config, &mut output),
        Commands::Lint(args) => handlers::handle_lint(args, &mut output),
        Commands::Kinds => handlers::handle_kinds(&mut output),
        Commands::Config(args) => handlers::handle_config(args, config, &mut output),
        Commands::Completions(args) => handlers::handle_completions(args),
    }
}

/// Initialize the logging system
fn init_logging(
    cli: &Cli,
    config: &Config,
) -> Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
    let verbosity = cli.verbosity_level();
    let mut logging_config = LoggingConfig::from_verbosity(verbosity);

    // Configured values apply only where the command line is silent
    if verbosity == 0 {
        if let Some(level) = &config.logging.level {
            logging_config.level = level.clone();
        }
    }
    if let Some(format) = LogFormat::parse(&config.logging.format) {
        if verbosity < 3 {
            logging_config.format = format;
        }
    }
    logging_config.file = config.logging.file.clone();

    // Apply environment overrides
    logging_config.merge_with_env();

    // If quiet mode, only log errors
    if cli.quiet {
        logging_config.level = "error".to_string();
        logging_config.console = false;
    }

    logging::init_logging(logging_config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::parse_from(["specspec", "kinds"]);
        assert_eq!(cli.verbosity_level(), 0);
        assert!(matches!(cli.command, Commands::Kinds));

        let cli = Cli::parse_from(["specspec", "-vvv", "check", "spec.ss", "."]);
        assert_eq!(cli.verbosity_level(), 3);

        let cli = Cli::parse_from(["specspec", "config", "init", "--force"]);
        assert!(matches!(cli.command, Commands::Config(_)));
    }

    #[test]
    fn test_outcome_exit_codes() {
        assert_eq!(Outcome::Success.exit_code(), 0);
        assert_eq!(Outcome::ValidationFailed.exit_code(), error::VALIDATION_FAILED);
    }
}
