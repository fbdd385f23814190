//! The validate command

use crate::cli::ValidateArgs;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::logging::{redaction, timing::Timer};
use crate::output::{DocumentReport, OutputWriter};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use serde_json::Value;
use tracing::{debug, instrument, trace, Level};
use xapi_schemas::{
    parse_document, Batch, StatementValidator, ValidationConfig, ValidationMode,
    STATEMENT_ENVELOPE,
};

const STDIN_NAME: &str = "<stdin>";

/// Where a document is read from
#[derive(Debug, Clone, PartialEq, Eq)]
enum Input {
    Stdin,
    File(PathBuf),
}

impl Input {
    fn name(&self) -> String {
        match self {
            Input::Stdin => STDIN_NAME.to_string(),
            Input::File(path) => path.display().to_string(),
        }
    }

    fn read(&self) -> Result<String> {
        match self {
            Input::Stdin => {
                let mut text = String::new();
                io::stdin().read_to_string(&mut text)?;
                Ok(text)
            }
            Input::File(path) => {
                if !path.exists() {
                    return Err(Error::FileNotFound { path: path.clone() });
                }
                Ok(fs::read_to_string(path)?)
            }
        }
    }
}

fn collect_inputs(files: &[PathBuf]) -> Vec<Input> {
    if files.is_empty() {
        return vec![Input::Stdin];
    }

    files
        .iter()
        .map(|path| {
            if path == Path::new("-") {
                Input::Stdin
            } else {
                Input::File(path.clone())
            }
        })
        .collect()
}

/// Command-line flags override the `validation` section of the config
fn effective_settings(args: &ValidateArgs, config: &Config) -> ValidationConfig {
    let mut settings = config.validation_config();

    if let Some(root) = &args.root {
        settings = settings.with_root(root.as_str());
    } else if args.envelope {
        settings = settings.with_root(STATEMENT_ENVELOPE);
    }
    if args.structural {
        settings.mode = ValidationMode::Structural;
    }
    if let Some(max_errors) = args.max_errors {
        settings = settings.with_max_errors(max_errors);
    }
    if args.fail_fast {
        settings = settings.with_fail_fast();
    }

    settings
}

fn redacted_copy(document: &Value) -> Value {
    let mut copy = document.clone();
    redaction::redact_json_value(&mut copy);
    copy
}

/// Handle the validate command
#[instrument(skip_all, fields(files = args.files.len()))]
pub fn handle_validate(args: ValidateArgs, config: &Config, output: &mut OutputWriter) -> Result<()> {
    let settings = effective_settings(&args, config);
    let validator = StatementValidator::new()?;

    // An unknown root is a usage problem, not a document problem
    validator.schema().root(&settings.root)?;

    let inputs = collect_inputs(&args.files);
    let timer = Timer::with_details("validate", &format!("{} input(s)", inputs.len()));
    let multiple = inputs.len() > 1;
    debug!(root = %settings.root, mode = ?settings.mode, inputs = inputs.len(), "Validating");

    let progress = if multiple && output.is_human() && output.show_progress() {
        output.progress_bar(inputs.len() as u64, "Validating statements")
    } else {
        None
    };

    // Documents are echoed back only in detailed human output
    let echo = args.detailed && output.is_human();
    let mut batch = Batch::new(&validator, &settings);
    let mut reports = Vec::with_capacity(inputs.len());
    let mut echoed = Vec::with_capacity(inputs.len());

    for input in &inputs {
        if batch.is_done() {
            debug!(checked = batch.checked(), "Stopping batch early");
            break;
        }

        let name = input.name();
        let text = input.read()?;
        let document = parse_document(&text).map_err(|e| Error::from_validation(&name, e))?;

        let redacted = if echo || tracing::enabled!(Level::TRACE) {
            Some(redacted_copy(&document))
        } else {
            None
        };
        if let Some(copy) = &redacted {
            trace!(source = %name, document = %copy, "Parsed input");
        }

        let result = batch
            .check(&document)
            .map_err(|e| Error::from_validation(&name, e))?;

        if let Some(pb) = &progress {
            pb.inc(1);
        }

        reports.push(DocumentReport::new(name, settings.root.clone(), result));
        echoed.push(redacted.filter(|_| echo));
    }

    if let Some(pb) = progress {
        pb.finish_and_clear();
    }

    if output.is_human() {
        for (report, document) in reports.iter().zip(&echoed) {
            if multiple {
                output.section(&report.source)?;
            }
            output.document_report(report, args.detailed)?;
            if let Some(document) = document {
                output.section("Document")?;
                output.data(document)?;
            }
        }
        if multiple {
            output.info(&format!(
                "Validated {} document(s) in {} ms",
                reports.len(),
                timer.elapsed().as_millis()
            ))?;
        }
    } else if let [report] = reports.as_slice() {
        output.document_report(report, args.detailed)?;
    } else {
        output.data(&reports)?;
    }

    let invalid: Vec<_> = reports.iter().filter(|r| !r.result.is_valid()).collect();
    if invalid.is_empty() {
        return Ok(());
    }

    Err(Error::Invalid {
        invalid: invalid.len(),
        checked: reports.len(),
        violations: invalid.iter().map(|r| r.result.violation_count()).sum(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn args(argv: &[&str]) -> ValidateArgs {
        #[derive(Parser)]
        struct Wrapper {
            #[command(flatten)]
            args: ValidateArgs,
        }
        let mut full = vec!["validate"];
        full.extend_from_slice(argv);
        Wrapper::parse_from(full).args
    }

    #[test]
    fn test_collect_inputs() {
        assert_eq!(collect_inputs(&[]), vec![Input::Stdin]);
        assert_eq!(
            collect_inputs(&[PathBuf::from("-"), PathBuf::from("a.json")]),
            vec![Input::Stdin, Input::File(PathBuf::from("a.json"))]
        );
    }

    #[test]
    fn test_effective_settings_from_config() {
        let mut config = Config::default();
        config.validation.strict_formats = false;
        config.validation.max_errors = 10;

        let settings = effective_settings(&args(&[]), &config);
        assert_eq!(settings.root, "statement");
        assert_eq!(settings.mode, ValidationMode::Structural);
        assert_eq!(settings.max_errors, 10);
    }

    #[test]
    fn test_flags_override_config() {
        let config = Config::default();

        let settings = effective_settings(&args(&["--envelope", "--max-errors", "2"]), &config);
        assert_eq!(settings.root, STATEMENT_ENVELOPE);
        assert_eq!(settings.max_errors, 2);

        let settings = effective_settings(&args(&["--root", "agent", "--structural", "--fail-fast"]), &config);
        assert_eq!(settings.root, "agent");
        assert_eq!(settings.mode, ValidationMode::Structural);
        assert!(settings.fail_fast);
    }

    #[test]
    fn test_redacted_copy_leaves_document_intact() {
        let document = serde_json::json!({"actor": {"mbox": "mailto:learner@example.com"}});
        let copy = redacted_copy(&document);
        assert_eq!(copy["actor"]["mbox"], "***");
        assert_eq!(document["actor"]["mbox"], "mailto:learner@example.com");
    }

    #[test]
    fn test_missing_file() {
        let input = Input::File(PathBuf::from("/nonexistent/statement.json"));
        assert!(matches!(input.read(), Err(Error::FileNotFound { .. })));
    }
}
