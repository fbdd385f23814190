//! Validation outcome and error types
//!
//! Document problems are [`Violation`]s collected into a [`ValidationResult`].
//! Only unparseable input and schema-authoring faults abort a validation call,
//! as a [`ValidationError`].
//!
//! Copyright (c) 2025 xAPI Tools Team
//! Licensed under the Apache-2.0 license

use crate::schema::SchemaError;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// The schema keyword a violation was raised by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Rule {
    Type,
    Required,
    AdditionalProperties,
    Enum,
    Format,
    Pattern,
    MinLength,
    Minimum,
    Maximum,
    MinItems,
    MaxItems,
    OneOf,
    OneOfAmbiguous,
    Not,
    MaxDepth,
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keyword = match self {
            Rule::Type => "type",
            Rule::Required => "required",
            Rule::AdditionalProperties => "additionalProperties",
            Rule::Enum => "enum",
            Rule::Format => "format",
            Rule::Pattern => "pattern",
            Rule::MinLength => "minLength",
            Rule::Minimum => "minimum",
            Rule::Maximum => "maximum",
            Rule::MinItems => "minItems",
            Rule::MaxItems => "maxItems",
            Rule::OneOf => "oneOf",
            Rule::OneOfAmbiguous => "oneOfAmbiguous",
            Rule::Not => "not",
            Rule::MaxDepth => "maxDepth",
        };
        f.write_str(keyword)
    }
}

/// A single document violation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Violation {
    /// JSON Pointer to the offending value; `""` is the document root
    pub path: String,
    /// Human-readable description
    pub message: String,
    /// The constraint that failed
    #[serde(rename = "schemaRule")]
    pub rule: Rule,
    /// Nearest named schema node the constraint belongs to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema_node: Option<String>,
    /// Violations of each rejected variant, for `oneOf` failures
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub causes: Vec<Violation>,
}

impl Violation {
    pub fn new<P, M>(path: P, rule: Rule, message: M) -> Self
    where
        P: Into<String>,
        M: Into<String>,
    {
        Self {
            path: path.into(),
            message: message.into(),
            rule,
            schema_node: None,
            causes: Vec::new(),
        }
    }

    pub fn with_schema_node(mut self, node: Option<String>) -> Self {
        self.schema_node = node;
        self
    }

    pub fn with_causes(mut self, causes: Vec<Violation>) -> Self {
        self.causes = causes;
        self
    }

    /// Path for display, naming the root explicitly
    pub fn display_path(&self) -> &str {
        if self.path.is_empty() {
            "(root)"
        } else {
            &self.path
        }
    }

    /// Prefix this violation's path, and its causes', with a parent pointer
    pub fn nest_under(&mut self, prefix: &str) {
        self.path = format!("{}{}", prefix, self.path);
        for cause in &mut self.causes {
            cause.nest_under(prefix);
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.display_path(), self.message)
    }
}

/// Outcome of one validation run, owned by the caller
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub violations: Vec<Violation>,
}

impl ValidationResult {
    pub fn from_violations(violations: Vec<Violation>) -> Self {
        Self {
            valid: violations.is_empty(),
            violations,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Number of top-level violations
    pub fn violation_count(&self) -> usize {
        self.violations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// Every violation including nested causes, depth-first
    pub fn iter_all(&self) -> impl Iterator<Item = &Violation> {
        let mut all = Vec::new();
        let mut stack: Vec<&Violation> = self.violations.iter().rev().collect();
        while let Some(violation) = stack.pop() {
            all.push(violation);
            stack.extend(violation.causes.iter().rev());
        }
        all.into_iter()
    }

    /// Ok if valid, Err carrying this result otherwise
    pub fn into_result(self) -> Result<(), Self> {
        if self.valid {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.valid {
            return write!(f, "xAPI JSON is valid.");
        }
        write!(f, "{} violation(s) found:", self.violations.len())?;
        for (i, violation) in self.violations.iter().enumerate() {
            write!(f, "\n{}. {}", i + 1, violation)?;
        }
        Ok(())
    }
}

/// Failures that abort a validation call
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The input text is not JSON
    #[error("Malformed JSON input at line {line}, column {column}: {message}")]
    MalformedInput {
        line: usize,
        column: usize,
        message: String,
    },

    /// The input text nests deeper than the JSON parser accepts
    #[error("JSON input nests too deeply to parse at line {line}, column {column}")]
    NestingTooDeep { line: usize, column: usize },

    /// The Schema Model is inconsistent or the root does not exist
    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),
}

impl From<serde_json::Error> for ValidationError {
    fn from(error: serde_json::Error) -> Self {
        if error.is_syntax() && error.to_string().starts_with("recursion limit exceeded") {
            return Self::NestingTooDeep {
                line: error.line(),
                column: error.column(),
            };
        }

        let message = match error.classify() {
            serde_json::error::Category::Eof => "unexpected end of input".to_string(),
            _ => error.to_string(),
        };
        Self::MalformedInput {
            line: error.line(),
            column: error.column(),
            message,
        }
    }
}

/// Result type for validation calls
pub type EngineResult<T> = Result<T, ValidationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_violation_display() {
        let root = Violation::new("", Rule::Required, "missing required property 'verb'");
        assert_eq!(root.to_string(), "(root): missing required property 'verb'");

        let nested = Violation::new("/actor/mbox", Rule::Format, "string is not a valid 'email'");
        assert_eq!(nested.to_string(), "/actor/mbox: string is not a valid 'email'");
    }

    #[test]
    fn test_iter_all_is_depth_first() {
        let result = ValidationResult::from_violations(vec![
            Violation::new("/actor", Rule::OneOf, "no matching variant").with_causes(vec![
                Violation::new("/actor/mbox", Rule::Format, "a"),
                Violation::new("/actor", Rule::Required, "b"),
            ]),
            Violation::new("/foo", Rule::AdditionalProperties, "c"),
        ]);

        let messages: Vec<_> = result.iter_all().map(|v| v.message.as_str()).collect();
        assert_eq!(messages, vec!["no matching variant", "a", "b", "c"]);
        assert_eq!(result.violation_count(), 2);
        assert!(!result.is_valid());
    }

    #[test]
    fn test_nest_under_prefixes_causes() {
        let mut violation = Violation::new("/verb", Rule::OneOf, "x")
            .with_causes(vec![Violation::new("/verb/id", Rule::Format, "y")]);
        violation.nest_under("/2");
        assert_eq!(violation.path, "/2/verb");
        assert_eq!(violation.causes[0].path, "/2/verb/id");
    }

    #[test]
    fn test_parse_errors() {
        let eof = ValidationError::from(serde_json::from_str::<serde_json::Value>("[1, 2").unwrap_err());
        assert!(matches!(eof, ValidationError::MalformedInput { ref message, .. } if message == "unexpected end of input"));

        let deep = format!("{}{}", "[".repeat(200), "]".repeat(200));
        let error = ValidationError::from(serde_json::from_str::<serde_json::Value>(&deep).unwrap_err());
        assert!(matches!(error, ValidationError::NestingTooDeep { line: 1, .. }));
        assert!(!error.to_string().contains("Malformed"));
    }

    #[test]
    fn test_into_result() {
        assert!(ValidationResult::from_violations(vec![]).into_result().is_ok());
        let invalid = ValidationResult::from_violations(vec![Violation::new("", Rule::Type, "x")]);
        assert_eq!(invalid.clone().into_result(), Err(invalid));
    }

    #[test]
    fn test_malformed_input_from_json_error() {
        let err: ValidationError = serde_json::from_str::<serde_json::Value>("{\"actor\": }")
            .unwrap_err()
            .into();
        match err {
            ValidationError::MalformedInput { line, column, .. } => {
                assert_eq!(line, 1);
                assert!(column > 0);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_rule_serializes_as_keyword() {
        let violation = Violation::new("", Rule::AdditionalProperties, "x");
        let json = serde_json::to_value(&violation).unwrap();
        assert_eq!(json["schemaRule"], "additionalProperties");
        assert!(json.get("causes").is_none());
    }
}
