//! xAPI Schemas - statement grammar and validation engine
//!
//! This crate decides whether a JSON document is a well-formed xAPI
//! (Experience API / Tin Can) statement and, when it is not, reports every
//! violation with a JSON Pointer to the offending value.
//!
//! ## Features
//!
//! - **Schema Model**: the xAPI 1.0.x grammar as data, held in an id-keyed
//!   registry that is self-checked once at construction
//! - **Validation Engine**: a recursive evaluator with `allOf`/`oneOf`/`not`
//!   composition, used for xAPI's mutually exclusive identifier rules
//! - **Pluggable Formats**: named string checkers (`uri`, `email`, `uuid`, ...)
//!   that can be extended without touching the engine
//! - **Batch Processing**: validate many statements in one call
//!
//! ## Quick Start
//!
//! ```rust
//! use xapi_schemas::{StatementValidator, SchemaValidator, STATEMENT};
//! use serde_json::json;
//!
//! let validator = StatementValidator::new().unwrap();
//!
//! let statement = json!({
//!     "actor": {"mbox": "mailto:learner@example.com", "openid": "http://openid.example.org/1"},
//!     "verb": {"id": "http://adlnet.gov/expapi/verbs/completed"},
//!     "object": {"id": "http://example.com/activities/course-1"}
//! });
//!
//! let result = validator.validate(&statement, STATEMENT).unwrap();
//! for violation in &result.violations {
//!     println!("{}", violation);
//! }
//! assert!(!result.is_valid());
//! ```
//!
//! Copyright (c) 2025 xAPI Tools Team
//! Licensed under the Apache-2.0 license

pub mod formats;
pub mod schema;
pub mod validation;

// Re-export commonly used types for convenience
pub use formats::{FormatChecker, FormatRegistry};
pub use schema::{
    Kind, SchemaDocument, SchemaError, SchemaNode, SchemaRegistry, SchemaResult, ROOTS,
    STATEMENT, STATEMENT_ENVELOPE, STATEMENT_LIST,
};
pub use validation::{
    create_statement_validator, parse_document, validate_batch, validate_statements_batch, Batch,
    EngineResult, Rule, SchemaValidator, StatementValidator, ValidationConfig,
    ValidationContext, ValidationError, ValidationMode, ValidationResult, Violation, MAX_DEPTH,
};
