//! Error types for schema construction and lookup
//!
//! These are schema-authoring faults. They are detected when a
//! [`SchemaRegistry`](crate::schema::SchemaRegistry) is built, never per
//! document, with the exception of asking for a root that does not exist.
//!
//! Copyright (c) 2025 xAPI Tools Team
//! Licensed under the Apache-2.0 license

use thiserror::Error;

/// Result type for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Internal-consistency faults of a Schema Model
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// Two nodes claim the same id
    #[error("Duplicate schema node id '{id}'")]
    DuplicateId { id: String },

    /// A `$ref` names a node that does not exist
    #[error("Unresolved reference '{reference}' in schema node '{referenced_from}'")]
    UnresolvedReference {
        reference: String,
        referenced_from: String,
    },

    /// References that only point at each other and never reach a constraint
    #[error("Circular reference detected: {chain}")]
    CircularReference { chain: String },

    /// A `pattern` or `patternProperties` key is not a valid regular expression
    #[error("Invalid pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    /// Validation was requested against a node id the registry does not hold
    #[error("Unknown root schema node '{id}'")]
    UnknownRoot { id: String },

    /// The schema document itself could not be read
    #[error("Malformed schema document: {reason}")]
    MalformedDocument { reason: String },
}

impl SchemaError {
    /// Create an unresolved reference error
    pub fn unresolved(reference: impl Into<String>, referenced_from: impl Into<String>) -> Self {
        Self::UnresolvedReference {
            reference: reference.into(),
            referenced_from: referenced_from.into(),
        }
    }

    /// Create a circular reference error from the chain of ids followed
    pub fn circular_reference(chain: &[&str]) -> Self {
        Self::CircularReference {
            chain: chain.join(" -> "),
        }
    }

    /// Create an invalid pattern error
    pub fn invalid_pattern(pattern: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidPattern {
            pattern: pattern.into(),
            reason: reason.into(),
        }
    }

    /// Create an unknown root error
    pub fn unknown_root(id: impl Into<String>) -> Self {
        Self::UnknownRoot { id: id.into() }
    }
}

impl From<serde_json::Error> for SchemaError {
    fn from(error: serde_json::Error) -> Self {
        Self::MalformedDocument {
            reason: error.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = SchemaError::unresolved("agnet", "statement_base");
        assert_eq!(
            err.to_string(),
            "Unresolved reference 'agnet' in schema node 'statement_base'"
        );

        let err = SchemaError::circular_reference(&["a", "b", "a"]);
        assert_eq!(err.to_string(), "Circular reference detected: a -> b -> a");
    }

    #[test]
    fn test_from_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = SchemaError::from(json_err);
        assert!(matches!(err, SchemaError::MalformedDocument { .. }));
    }
}
