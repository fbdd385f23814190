//! Validation Engine for documents described by a Schema Model
//!
//! The engine walks a JSON document and a schema node in lockstep and reports
//! every violation it finds, each located by a JSON Pointer. It supports two
//! modes:
//!
//! - **Strict**: every constraint, named formats included
//! - **Structural**: shape only, format names are annotations
//!
//! Copyright (c) 2025 xAPI Tools Team
//! Licensed under the Apache-2.0 license

pub mod base;
mod engine;
pub mod error;
pub mod statement;

// Re-export commonly used types
pub use base::{
    escape_pointer_segment, parse_document, SchemaValidator, ValidationContext, ValidationMode,
    MAX_DEPTH,
};
pub use error::{EngineResult, Rule, ValidationError, ValidationResult, Violation};
pub use statement::StatementValidator;

use crate::schema::STATEMENT;
use serde_json::Value;
use tracing::debug;

/// Convenience function to create a validator for the built-in xAPI grammar
///
/// # Examples
///
/// ```rust
/// use xapi_schemas::validation::{create_statement_validator, SchemaValidator};
/// use serde_json::json;
///
/// let validator = create_statement_validator().unwrap();
/// let statement = json!({
///     "actor": {"mbox": "mailto:learner@example.com"},
///     "verb": {"id": "http://adlnet.gov/expapi/verbs/completed"},
///     "object": {"id": "http://example.com/activities/course-1"}
/// });
///
/// assert!(validator.validate(&statement, "statement").unwrap().is_valid());
/// ```
pub fn create_statement_validator() -> EngineResult<StatementValidator> {
    Ok(StatementValidator::new()?)
}

/// Validation configuration for batch operations
#[derive(Debug, Clone)]
pub struct ValidationConfig {
    /// Validation mode to use
    pub mode: ValidationMode,
    /// Schema node each document is validated against
    pub root: String,
    /// Stop after the first invalid document
    pub fail_fast: bool,
    /// Maximum number of violations to collect (0 = unlimited)
    pub max_errors: usize,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            mode: ValidationMode::Strict,
            root: STATEMENT.to_string(),
            fail_fast: false,
            max_errors: 0,
        }
    }
}

impl ValidationConfig {
    /// Create a configuration asserting every constraint
    pub fn strict() -> Self {
        Self::default()
    }

    /// Create a configuration checking shape only
    pub fn structural() -> Self {
        Self {
            mode: ValidationMode::Structural,
            ..Self::default()
        }
    }

    /// Validate against a different root node
    pub fn with_root<S: Into<String>>(mut self, root: S) -> Self {
        self.root = root.into();
        self
    }

    /// Enable fail-fast mode
    pub fn with_fail_fast(mut self) -> Self {
        self.fail_fast = true;
        self
    }

    /// Set maximum number of violations to collect
    pub fn with_max_errors(mut self, max_errors: usize) -> Self {
        self.max_errors = max_errors;
        self
    }
}

/// Incremental batch run over documents supplied one at a time
///
/// Applies the `fail_fast` and `max_errors` knobs of a [`ValidationConfig`]
/// across every document checked so far. Callers stop feeding documents once
/// [`Batch::is_done`] returns true.
pub struct Batch<'a, V: SchemaValidator + ?Sized> {
    validator: &'a V,
    config: &'a ValidationConfig,
    context: ValidationContext,
    checked: usize,
    collected: usize,
    done: bool,
}

impl<'a, V: SchemaValidator + ?Sized> Batch<'a, V> {
    pub fn new(validator: &'a V, config: &'a ValidationConfig) -> Self {
        Self {
            validator,
            config,
            context: ValidationContext::new(config.mode),
            checked: 0,
            collected: 0,
            done: false,
        }
    }

    /// Whether the error budget is spent or fail-fast has tripped
    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Number of documents checked so far
    pub fn checked(&self) -> usize {
        self.checked
    }

    /// Validate the next document
    ///
    /// The result keeps only as many violations as the error budget has left,
    /// and never fewer than one for an invalid document.
    pub fn check(&mut self, document: &Value) -> EngineResult<ValidationResult> {
        let result =
            self.validator
                .validate_with_context(document, &self.config.root, &self.context)?;
        self.checked += 1;
        if result.is_valid() {
            return Ok(result);
        }

        let mut violations = result.violations;
        if self.config.max_errors > 0 {
            let remaining = self.config.max_errors.saturating_sub(self.collected).max(1);
            if violations.len() >= remaining {
                debug!(
                    max_errors = self.config.max_errors,
                    dropped = violations.len() - remaining,
                    "Error budget spent"
                );
                violations.truncate(remaining);
                self.done = true;
            }
        }
        self.collected += violations.len();

        if self.config.fail_fast {
            self.done = true;
        }

        Ok(ValidationResult::from_violations(violations))
    }
}

/// Validate many documents, locating violations under `/<index>`
pub fn validate_batch<V: SchemaValidator + ?Sized>(
    validator: &V,
    documents: &[Value],
    config: &ValidationConfig,
) -> EngineResult<ValidationResult> {
    let mut batch = Batch::new(validator, config);
    let mut violations = Vec::new();

    for (i, document) in documents.iter().enumerate() {
        if batch.is_done() {
            break;
        }

        let prefix = format!("/{}", i);
        for mut violation in batch.check(document)?.violations {
            violation.nest_under(&prefix);
            violations.push(violation);
        }
    }

    debug!(
        documents = documents.len(),
        checked = batch.checked(),
        violations = violations.len(),
        "Batch validated"
    );

    Ok(ValidationResult::from_violations(violations))
}

/// Batch validation with the built-in xAPI grammar
pub fn validate_statements_batch(
    documents: &[Value],
    config: &ValidationConfig,
) -> EngineResult<ValidationResult> {
    let validator = create_statement_validator()?;
    validate_batch(&validator, documents, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn statement(verb: &str) -> Value {
        json!({
            "actor": {"mbox": "mailto:learner@example.com"},
            "verb": {"id": verb},
            "object": {"id": "http://example.com/activities/course-1"}
        })
    }

    #[test]
    fn test_validation_config_defaults() {
        let config = ValidationConfig::default();
        assert_eq!(config.mode, ValidationMode::Strict);
        assert_eq!(config.root, "statement");
        assert!(!config.fail_fast);
        assert_eq!(config.max_errors, 0);
    }

    #[test]
    fn test_validation_config_builders() {
        let config = ValidationConfig::structural()
            .with_root("agent")
            .with_fail_fast()
            .with_max_errors(5);
        assert_eq!(config.mode, ValidationMode::Structural);
        assert_eq!(config.root, "agent");
        assert!(config.fail_fast);
        assert_eq!(config.max_errors, 5);
    }

    #[test]
    fn test_batch_locates_violations_by_index() {
        let documents = vec![
            statement("http://adlnet.gov/expapi/verbs/completed"),
            statement("completed"),
            statement("also bad"),
        ];

        let result = validate_statements_batch(&documents, &ValidationConfig::strict()).unwrap();
        assert!(!result.is_valid());
        let paths: Vec<_> = result.violations.iter().map(|v| v.path.as_str()).collect();
        assert_eq!(paths, vec!["/1/verb/id", "/2/verb/id"]);
    }

    #[test]
    fn test_batch_fail_fast_and_max_errors() {
        let documents = vec![json!({}), json!({})];

        let fail_fast = ValidationConfig::strict().with_fail_fast();
        let result = validate_statements_batch(&documents, &fail_fast).unwrap();
        assert!(result.violations.iter().all(|v| v.path.starts_with("/0")));

        let capped = ValidationConfig::strict().with_max_errors(2);
        let result = validate_statements_batch(&documents, &capped).unwrap();
        assert_eq!(result.violation_count(), 2);
    }

    #[test]
    fn test_batch_budget_spans_documents() {
        let validator = create_statement_validator().unwrap();
        let first = json!({"verb": {"id": "completed"}});
        let found = validator.validate(&first, STATEMENT).unwrap().violation_count();

        let config = ValidationConfig::strict().with_max_errors(found + 1);
        let mut batch = Batch::new(&validator, &config);

        assert_eq!(batch.check(&first).unwrap().violation_count(), found);
        assert!(!batch.is_done());
        let second = batch.check(&json!({})).unwrap();
        assert_eq!(second.violation_count(), 1);
        assert!(batch.is_done());
        assert_eq!(batch.checked(), 2);
    }

    #[test]
    fn test_batch_keeps_invalid_documents_invalid() {
        let validator = create_statement_validator().unwrap();
        let config = ValidationConfig::strict().with_max_errors(1);
        let mut batch = Batch::new(&validator, &config);

        batch.check(&json!({})).unwrap();
        assert!(batch.is_done());
        let late = batch.check(&json!({})).unwrap();
        assert_eq!(late.violation_count(), 1);
    }

    #[test]
    fn test_batch_valid_documents_do_not_stop() {
        let validator = create_statement_validator().unwrap();
        let config = ValidationConfig::strict().with_fail_fast().with_max_errors(1);
        let mut batch = Batch::new(&validator, &config);

        for _ in 0..3 {
            let result = batch.check(&statement("http://adlnet.gov/expapi/verbs/completed")).unwrap();
            assert!(result.is_valid());
        }
        assert!(!batch.is_done());
        assert_eq!(batch.checked(), 3);
    }

    #[test]
    fn test_batch_structural_mode() {
        let mut bad_mbox = statement("http://adlnet.gov/expapi/verbs/completed");
        bad_mbox["actor"]["mbox"] = json!("nobody");

        let strict = validate_statements_batch(&[bad_mbox.clone()], &ValidationConfig::strict());
        assert!(!strict.unwrap().is_valid());

        let structural = validate_statements_batch(&[bad_mbox], &ValidationConfig::structural());
        assert!(structural.unwrap().is_valid());
    }
}
