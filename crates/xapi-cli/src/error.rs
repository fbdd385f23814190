//! Error types and handling for the CLI
//!
//! This module provides error types and utilities for handling
//! various failure modes in the CLI application.

use std::io;
use std::path::PathBuf;
use xapi_schemas::{SchemaError, ValidationError};

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for CLI operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// One or more documents violated the grammar
    #[error("{invalid} of {checked} document(s) failed validation with {violations} violation(s)")]
    Invalid {
        invalid: usize,
        checked: usize,
        violations: usize,
    },

    /// IO error (file operations, etc.)
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Fault in the schema model or an unknown root
    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    /// File not found
    #[error("File not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    /// Input text is not JSON
    #[error("Malformed JSON in {source_name} at line {line}, column {column}: {message}")]
    MalformedInput {
        source_name: String,
        line: usize,
        column: usize,
        message: String,
    },

    /// Input text is JSON nested beyond what the parser accepts
    #[error("{source_name} nests too deeply to parse at line {line}, column {column}")]
    NestingTooDeep {
        source_name: String,
        line: usize,
        column: usize,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid argument combination
    #[error("Invalid arguments: {0}")]
    InvalidArgs(String),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML serialization/deserialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Generic error with context
    #[error("{message}")]
    Other { message: String },
}

impl Error {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create an invalid arguments error
    pub fn invalid_args(message: impl Into<String>) -> Self {
        Self::InvalidArgs(message.into())
    }

    /// Create a generic error
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }

    /// Attribute an engine error to the input it came from
    pub fn from_validation(source_name: &str, error: ValidationError) -> Self {
        match error {
            ValidationError::MalformedInput {
                line,
                column,
                message,
            } => Self::MalformedInput {
                source_name: source_name.to_string(),
                line,
                column,
                message,
            },
            ValidationError::NestingTooDeep { line, column } => Self::NestingTooDeep {
                source_name: source_name.to_string(),
                line,
                column,
            },
            ValidationError::Schema(e) => Self::Schema(e),
        }
    }

    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Invalid { .. } => 1,
            Self::Io(_) => 2,
            Self::Schema(_) => 3,
            Self::FileNotFound { .. } => 4,
            Self::MalformedInput { .. } | Self::NestingTooDeep { .. } => 5,
            Self::Config(_) => 6,
            Self::InvalidArgs(_) => 7,
            Self::Json(_) => 8,
            Self::Yaml(_) => 9,
            Self::Other { .. } => 99,
        }
    }

    /// Check if this error should display usage help
    pub fn should_show_help(&self) -> bool {
        matches!(self, Self::InvalidArgs(_))
    }
}

impl From<ValidationError> for Error {
    fn from(error: ValidationError) -> Self {
        Self::from_validation("<input>", error)
    }
}

/// Extension trait for displaying errors with context
pub trait ErrorContext<T> {
    /// Add context with a closure (only evaluated on error)
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ErrorContext<T> for std::result::Result<T, E>
where
    E: Into<Error>,
{
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other {
                message: format!("{}: {}", f(), inner),
            }
        })
    }
}

/// Format an error for display to the user
pub fn format_error(error: &Error, use_color: bool) -> String {
    if use_color {
        use colored::Colorize;
        format!("{} {}", "Error:".red().bold(), error)
    } else {
        format!("Error: {}", error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_are_distinct() {
        let errors = vec![
            Error::Invalid {
                invalid: 1,
                checked: 1,
                violations: 2,
            },
            Error::Io(io::Error::new(io::ErrorKind::Other, "disk")),
            Error::Schema(SchemaError::unknown_root("nope")),
            Error::FileNotFound {
                path: PathBuf::from("missing.json"),
            },
            Error::config("bad"),
            Error::invalid_args("bad"),
            Error::other("bad"),
        ];

        let mut codes: Vec<_> = errors.iter().map(Error::exit_code).collect();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
        assert_eq!(errors[0].exit_code(), 1);
    }

    #[test]
    fn test_other_error() {
        let error = Error::other("Failed to initialize logging");
        assert_eq!(error.to_string(), "Failed to initialize logging");
        assert_eq!(error.exit_code(), 99);
        assert!(!error.should_show_help());
    }

    #[test]
    fn test_malformed_input_names_source() {
        let error = Error::from_validation(
            "statement.json",
            ValidationError::MalformedInput {
                line: 3,
                column: 7,
                message: "EOF while parsing an object".to_string(),
            },
        );

        assert_eq!(error.exit_code(), 5);
        let message = error.to_string();
        assert!(message.contains("statement.json"));
        assert!(message.contains("line 3, column 7"));
    }

    #[test]
    fn test_deep_input_is_not_called_malformed() {
        let error = Error::from_validation(
            "deep.json",
            ValidationError::NestingTooDeep {
                line: 1,
                column: 129,
            },
        );

        assert_eq!(error.exit_code(), 5);
        let message = error.to_string();
        assert!(message.starts_with("deep.json nests too deeply"));
        assert!(!message.contains("Malformed"));
    }

    #[test]
    fn test_format_error_without_color() {
        let error = Error::invalid_args("--envelope cannot be combined with --root");
        assert_eq!(
            format_error(&error, false),
            "Error: Invalid arguments: --envelope cannot be combined with --root"
        );
        assert!(error.should_show_help());
    }

    #[test]
    fn test_with_context_wraps_message() {
        let result: std::result::Result<(), io::Error> =
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied"));
        let error = result.with_context(|| "Failed to write config".to_string()).unwrap_err();
        assert!(error.to_string().starts_with("Failed to write config: IO error"));
    }
}
