//! Base validation trait and context
//!
//! Copyright (c) 2025 xAPI Tools Team
//! Licensed under the Apache-2.0 license

use crate::validation::error::{EngineResult, Rule, ValidationResult, Violation};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// How much of the Schema Model is asserted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationMode {
    /// Every constraint, including named formats
    #[default]
    Strict,
    /// Shape only: format names are annotations
    Structural,
}

impl ValidationMode {
    pub fn checks_formats(self) -> bool {
        matches!(self, ValidationMode::Strict)
    }
}

/// Deepest document nesting the engine descends into
pub const MAX_DEPTH: usize = 64;

/// Where in the document and the schema the engine currently is
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationContext {
    /// JSON Pointer to the current value
    pub path: String,
    /// Validation mode
    pub mode: ValidationMode,
    /// Nearest enclosing named schema node
    pub schema_node: Option<String>,
    /// Number of reference tokens in `path`
    pub depth: usize,
}

impl ValidationContext {
    /// Create a context positioned at the document root
    pub fn new(mode: ValidationMode) -> Self {
        Self {
            path: String::new(),
            mode,
            schema_node: None,
            depth: 0,
        }
    }

    /// Create a child context for an object member
    pub fn child<P: AsRef<str>>(&self, key: P) -> Self {
        Self {
            path: format!("{}/{}", self.path, escape_pointer_segment(key.as_ref())),
            mode: self.mode,
            schema_node: self.schema_node.clone(),
            depth: self.depth + 1,
        }
    }

    /// Create a child context for an array index
    pub fn child_index(&self, index: usize) -> Self {
        Self {
            path: format!("{}/{}", self.path, index),
            mode: self.mode,
            schema_node: self.schema_node.clone(),
            depth: self.depth + 1,
        }
    }

    /// Same position, attributed to a named schema node
    pub fn within<S: Into<String>>(&self, node: S) -> Self {
        Self {
            path: self.path.clone(),
            mode: self.mode,
            schema_node: Some(node.into()),
            depth: self.depth,
        }
    }

    /// Whether members of the current value lie beyond [`MAX_DEPTH`]
    pub fn at_depth_limit(&self) -> bool {
        self.depth >= MAX_DEPTH
    }

    /// Build a violation located at this context
    pub fn violation<M: Into<String>>(&self, rule: Rule, message: M) -> Violation {
        Violation::new(self.path.clone(), rule, message).with_schema_node(self.schema_node.clone())
    }
}

/// Escape one reference token per RFC 6901
pub fn escape_pointer_segment(segment: &str) -> String {
    segment.replace('~', "~0").replace('/', "~1")
}

/// Validators of JSON documents against named schema roots
pub trait SchemaValidator {
    /// Validate with an explicit starting context
    fn validate_with_context(
        &self,
        document: &Value,
        root_id: &str,
        context: &ValidationContext,
    ) -> EngineResult<ValidationResult>;

    /// Validate every constraint, formats included
    fn validate(&self, document: &Value, root_id: &str) -> EngineResult<ValidationResult> {
        let context = ValidationContext::new(ValidationMode::Strict);
        self.validate_with_context(document, root_id, &context)
    }

    /// Validate shape only
    fn validate_structural(
        &self,
        document: &Value,
        root_id: &str,
    ) -> EngineResult<ValidationResult> {
        let context = ValidationContext::new(ValidationMode::Structural);
        self.validate_with_context(document, root_id, &context)
    }

    /// Parse JSON text, then validate it
    ///
    /// Unparseable text is an input error and no violations are produced.
    fn validate_str(&self, text: &str, root_id: &str) -> EngineResult<ValidationResult> {
        let document = parse_document(text)?;
        self.validate(&document, root_id)
    }
}

/// Parse JSON text into a document value
pub fn parse_document(text: &str) -> EngineResult<Value> {
    Ok(serde_json::from_str(text)?)
}
