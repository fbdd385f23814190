//! Validator for xAPI statements and other documents described by a Schema Model
//!
//! Copyright (c) 2025 xAPI Tools Team
//! Licensed under the Apache-2.0 license

use crate::formats::FormatRegistry;
use crate::schema::{SchemaRegistry, SchemaResult};
use crate::validation::base::{SchemaValidator, ValidationContext};
use crate::validation::engine::Evaluator;
use crate::validation::error::{EngineResult, ValidationResult};
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

/// Validation Engine bound to a schema registry and a set of format checkers
///
/// Holds no per-call state; share one instance across threads freely.
#[derive(Debug, Clone)]
pub struct StatementValidator {
    schema: Arc<SchemaRegistry>,
    formats: Arc<FormatRegistry>,
}

impl StatementValidator {
    /// Create a validator for the built-in xAPI grammar with default formats
    pub fn new() -> SchemaResult<Self> {
        Ok(Self::with_registry(SchemaRegistry::xapi()?))
    }

    /// Create a validator for an arbitrary registry with default formats
    pub fn with_registry(schema: Arc<SchemaRegistry>) -> Self {
        Self {
            schema,
            formats: Arc::new(FormatRegistry::with_defaults()),
        }
    }

    /// Replace the format checkers
    pub fn with_formats(mut self, formats: Arc<FormatRegistry>) -> Self {
        self.formats = formats;
        self
    }

    pub fn schema(&self) -> &SchemaRegistry {
        &self.schema
    }

    pub fn formats(&self) -> &FormatRegistry {
        &self.formats
    }
}

impl SchemaValidator for StatementValidator {
    fn validate_with_context(
        &self,
        document: &Value,
        root_id: &str,
        context: &ValidationContext,
    ) -> EngineResult<ValidationResult> {
        let root = self.schema.root(root_id)?;
        let evaluator = Evaluator::new(&self.schema, &self.formats);

        let mut violations = Vec::new();
        evaluator.evaluate(root, document, &context.within(root_id), &mut violations)?;

        debug!(
            root = root_id,
            path = %context.path,
            mode = ?context.mode,
            violations = violations.len(),
            "Document validated"
        );

        Ok(ValidationResult::from_violations(violations))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{SchemaError, SchemaNode, STATEMENT};
    use crate::validation::base::ValidationMode;
    use crate::validation::error::{Rule, ValidationError};
    use serde_json::json;

    fn minimal_statement() -> Value {
        json!({
            "actor": {"mbox": "mailto:learner@example.com"},
            "verb": {"id": "http://adlnet.gov/expapi/verbs/completed"},
            "object": {"id": "http://example.com/activities/course-1"}
        })
    }

    #[test]
    fn test_minimal_statement_is_valid() {
        let validator = StatementValidator::new().unwrap();
        let result = validator.validate(&minimal_statement(), STATEMENT).unwrap();
        assert!(result.is_valid(), "{}", result);
    }

    #[test]
    fn test_unknown_root_is_an_error() {
        let validator = StatementValidator::new().unwrap();
        let err = validator.validate(&minimal_statement(), "statment").unwrap_err();
        assert_eq!(err, ValidationError::Schema(SchemaError::unknown_root("statment")));
    }

    #[test]
    fn test_malformed_text_produces_no_violations() {
        let validator = StatementValidator::new().unwrap();
        let err = validator.validate_str("{\"actor\": {", STATEMENT).unwrap_err();
        assert!(matches!(err, ValidationError::MalformedInput { .. }));
    }

    #[test]
    fn test_structural_mode_skips_formats() {
        let validator = StatementValidator::new().unwrap();
        let mut statement = minimal_statement();
        statement["actor"]["mbox"] = json!("not-an-email");

        assert!(!validator.validate(&statement, STATEMENT).unwrap().is_valid());
        assert!(validator
            .validate_structural(&statement, STATEMENT)
            .unwrap()
            .is_valid());
    }

    #[test]
    fn test_custom_registry_and_formats() {
        let registry = SchemaRegistry::from_nodes([(
            "course",
            SchemaNode::object()
                .require(["code"])
                .property("code", SchemaNode::string().format("course-code")),
        )])
        .unwrap();
        let formats = FormatRegistry::new().with_format("course-code", |v: &str| v.starts_with("CS"));
        let validator = StatementValidator::with_registry(Arc::new(registry))
            .with_formats(Arc::new(formats));

        assert!(validator.validate(&json!({"code": "CS101"}), "course").unwrap().is_valid());

        let result = validator.validate(&json!({"code": "MA101"}), "course").unwrap();
        assert_eq!(result.violations[0].rule, Rule::Format);
        assert_eq!(result.violations[0].path, "/code");
    }

    #[test]
    fn test_context_path_prefixes_violations() {
        let validator = StatementValidator::new().unwrap();
        let context = ValidationContext::new(ValidationMode::Strict).child_index(3);
        let result = validator
            .validate_with_context(&json!({}), STATEMENT, &context)
            .unwrap();
        assert!(result.violations.iter().all(|v| v.path.starts_with("/3")));
    }
}
