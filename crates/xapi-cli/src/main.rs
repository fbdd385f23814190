//! xAPI CLI - Command-line interface for validating xAPI statements
//!
//! This is the main entry point for the `xapi` binary, providing commands
//! for validating statements, inspecting the statement grammar and
//! producing xAPI-ready timestamps.

mod cli;
mod config;
mod error;
mod handlers;
mod logging;
mod output;

use cli::{Cli, Commands};
use colored::control;
use config::Config;
use error::Result;
use logging::{timing::Timer, LoggingConfig};
use output::OutputWriter;
use std::process;
use tracing::instrument;

fn main() {
    // Parse command-line arguments
    let cli = Cli::parse_args();

    // Configuration errors are reported after logging is up
    let config = Config::load_with_file(cli.config.as_deref());

    let use_color = cli.use_color() && config.as_ref().map(|c| c.output.color).unwrap_or(true);
    control::set_override(use_color);

    if let Err(e) = init_logging(&cli, config.as_ref().ok()) {
        eprintln!("Failed to initialize logging: {}", e);
    }

    let result = config.and_then(|config| run(cli, config, use_color));

    match result {
        Ok(()) => {
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}", error::format_error(&e, use_color));

            if e.should_show_help() {
                eprintln!("\nFor more information, try '--help'");
            }

            process::exit(e.exit_code());
        }
    }
}

/// Main application logic
#[instrument(skip(cli, config, use_color), fields(command = ?cli.command))]
fn run(cli: Cli, config: Config, use_color: bool) -> Result<()> {
    let _timer = Timer::new("cli_execution");

    let format = match cli.output {
        Some(format) => format,
        None => config.output_format()?,
    };

    let mut output = OutputWriter::new(format, use_color, cli.quiet);
    if !config.output.progress {
        output = output.without_progress();
    }

    tracing::info!(
        command = ?cli.command,
        verbosity = cli.verbosity_level(),
        format = ?output.format(),
        "Executing command"
    );

    match cli.command {
        Commands::Validate(args) => handlers::handle_validate(args, &config, &mut output),
        Commands::Schema(args) => handlers::handle_schema(args, &mut output),
        Commands::Timestamp(args) => handlers::handle_timestamp(args, &mut output),
        Commands::Config(args) => handlers::handle_config(args, &config, &mut output),
        Commands::Completions(args) => handlers::handle_completions(args),
    }
}

/// Initialize the logging system
fn init_logging(cli: &Cli, config: Option<&Config>) -> Result<()> {
    // -v flags win over the config file
    let mut logging_config = match (cli.verbosity_level(), config) {
        (0, Some(config)) => LoggingConfig::from_settings(&config.logging),
        (verbosity, _) => LoggingConfig::from_verbosity(verbosity),
    };

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
        let cli = Cli::parse_from(["xapi", "-vv", "validate", "statement.json"]);
        assert_eq!(cli.verbosity_level(), 2);
        assert!(cli.output.is_none());

        let cli = Cli::parse_from(["xapi", "-o", "json", "schema", "list"]);
        assert_eq!(cli.output, Some(cli::OutputFormat::Json));
        assert!(matches!(cli.command, Commands::Schema(_)));

        let cli = Cli::parse_from(["xapi", "timestamp", "--utc"]);
        assert!(matches!(cli.command, Commands::Timestamp(ref args) if args.utc));
    }
}
