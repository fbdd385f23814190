//! Command-line interface argument parsing and definitions
//!
//! This module defines the CLI structure using clap's derive API,
//! providing a type-safe and well-documented command interface.

use clap::{Parser, Subcommand, ValueEnum};
use is_terminal::IsTerminal;
use std::path::PathBuf;

/// xAPI CLI - Validate Experience API statements
///
/// Checks xAPI (Tin Can) statements against the xAPI 1.0.x statement grammar
/// and reports every violation with a JSON Pointer to the offending value.
#[derive(Parser, Debug)]
#[command(
    name = "xapi",
    version,
    author,
    about,
    long_about = None,
    propagate_version = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Enable verbose output (can be used multiple times for increased verbosity)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all non-essential output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "XAPI_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format for results [default: human]
    #[arg(short, long, value_enum, global = true)]
    pub output: Option<OutputFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// The subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate xAPI statements read from files or stdin
    Validate(ValidateArgs),

    /// Inspect the statement grammar
    Schema(SchemaArgs),

    /// Print the current time and an xAPI-ready UTC timestamp
    Timestamp(TimestampArgs),

    /// Manage configuration files and settings
    Config(ConfigArgs),

    /// Generate shell completions for the specified shell
    Completions(CompletionsArgs),
}

/// Arguments for the validate command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// JSON files to validate; reads stdin when empty or '-'
    #[arg(value_name = "FILE")]
    pub files: Vec<PathBuf>,

    /// Schema node to validate against (e.g. statement, agent, statement_list)
    #[arg(short, long, value_name = "ID")]
    pub root: Option<String>,

    /// Expect the statement wrapped as {"statement": {...}}
    #[arg(long, conflicts_with = "root")]
    pub envelope: bool,

    /// Check shape only; named formats (email, uri, ...) are not asserted
    #[arg(long)]
    pub structural: bool,

    /// Show rule names, schema nodes and the causes of oneOf failures
    #[arg(long)]
    pub detailed: bool,

    /// Stop after this many violations across all documents (0 = unlimited)
    #[arg(long, value_name = "N")]
    pub max_errors: Option<usize>,

    /// Stop at the first invalid document
    #[arg(long)]
    pub fail_fast: bool,
}

/// Arguments for the schema command
#[derive(Parser, Debug)]
pub struct SchemaArgs {
    #[command(subcommand)]
    pub action: SchemaAction,
}

/// Schema inspection actions
#[derive(Subcommand, Debug)]
pub enum SchemaAction {
    /// List every named schema node
    List,

    /// Show the definition of one schema node
    Show(SchemaShowArgs),
}

/// Arguments for schema show
#[derive(Parser, Debug)]
pub struct SchemaShowArgs {
    /// Id of the schema node (see 'xapi schema list')
    pub id: String,
}

/// Arguments for the timestamp command
#[derive(Parser, Debug)]
pub struct TimestampArgs {
    /// Print only the UTC timestamp
    #[arg(long)]
    pub utc: bool,
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Configuration management actions
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Write a default configuration file
    Init(ConfigInitArgs),

    /// Show current configuration values
    Show(ConfigShowArgs),
}

/// Arguments for config init
#[derive(Parser, Debug)]
pub struct ConfigInitArgs {
    /// Where to write the file (defaults to the user config directory)
    #[arg(long, value_name = "PATH")]
    pub path: Option<PathBuf>,

    /// Force overwrite an existing config file
    #[arg(long)]
    pub force: bool,
}

/// Arguments for config show
#[derive(Parser, Debug)]
pub struct ConfigShowArgs {
    /// Show configuration in specified format
    #[arg(short, long, value_enum, default_value = "yaml")]
    pub format: ConfigFormat,
}

/// Configuration file formats
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ConfigFormat {
    /// JSON format
    Json,
    /// YAML format
    Yaml,
}

/// Arguments for generating shell completions
#[derive(Parser, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Output format options
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable formatted output
    Human,
    /// JSON output
    Json,
    /// YAML output
    Yaml,
    /// Pretty-printed JSON output
    JsonPretty,
}

impl OutputFormat {
    /// Parse the name used in configuration files
    pub fn from_name(name: &str) -> Option<Self> {
        <Self as ValueEnum>::from_str(name, true).ok()
    }
}

/// Supported shells for completion generation
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Shell {
    /// Bash shell
    Bash,
    /// Zsh shell
    Zsh,
    /// Fish shell
    Fish,
    /// PowerShell
    PowerShell,
    /// Elvish shell
    Elvish,
}

impl Cli {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Get the effective verbosity level (considering quiet flag)
    pub fn verbosity_level(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose
        }
    }

    /// Check if colored output should be used
    pub fn use_color(&self) -> bool {
        !self.no_color && std::io::stdout().is_terminal()
    }
}

impl Shell {
    /// Convert to clap_complete shell type
    pub fn to_clap_shell(self) -> clap_complete::Shell {
        match self {
            Shell::Bash => clap_complete::Shell::Bash,
            Shell::Zsh => clap_complete::Shell::Zsh,
            Shell::Fish => clap_complete::Shell::Fish,
            Shell::PowerShell => clap_complete::Shell::PowerShell,
            Shell::Elvish => clap_complete::Shell::Elvish,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_verbosity_level() {
        let cli = Cli::parse_from(["xapi", "-vv", "validate", "statement.json"]);
        assert_eq!(cli.verbosity_level(), 2);

        let cli = Cli::parse_from(["xapi", "--quiet", "validate", "statement.json"]);
        assert_eq!(cli.verbosity_level(), 0);
    }

    #[test]
    fn test_validate_defaults_to_stdin() {
        let cli = Cli::parse_from(["xapi", "validate"]);
        match cli.command {
            Commands::Validate(args) => {
                assert!(args.files.is_empty());
                assert!(args.root.is_none());
                assert!(!args.structural);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_envelope_conflicts_with_root() {
        let result = Cli::try_parse_from(["xapi", "validate", "--envelope", "--root", "agent"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_output_format_names() {
        assert_eq!(OutputFormat::from_name("json-pretty"), Some(OutputFormat::JsonPretty));
        assert_eq!(OutputFormat::from_name("YAML"), Some(OutputFormat::Yaml));
        assert_eq!(OutputFormat::from_name("xml"), None);
    }
}
