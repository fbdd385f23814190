//! The built-in xAPI 1.0.x statement grammar
//!
//! The grammar ships as an embedded JSON document and is parsed on first use.
//! Every caller shares the same immutable registry.
//!
//! Copyright (c) 2025 xAPI Tools Team
//! Licensed under the Apache-2.0 license

use crate::schema::error::SchemaResult;
use crate::schema::registry::SchemaRegistry;
use std::sync::{Arc, OnceLock};

/// Source text of the embedded grammar
pub const XAPI_SCHEMA_SOURCE: &str = include_str!("../../schemas/xapi-statement.schema.json");

/// Root for a single statement
pub const STATEMENT: &str = "statement";
/// Root for an array of statements
pub const STATEMENT_LIST: &str = "statement_list";
/// Root for `{"statement": {...}}` wrappers
pub const STATEMENT_ENVELOPE: &str = "statement_envelope";

/// Roots offered to command-line users
pub const ROOTS: &[&str] = &[STATEMENT, STATEMENT_LIST, STATEMENT_ENVELOPE];

static XAPI_REGISTRY: OnceLock<SchemaResult<Arc<SchemaRegistry>>> = OnceLock::new();

impl SchemaRegistry {
    /// Shared registry holding the xAPI statement grammar
    pub fn xapi() -> SchemaResult<Arc<SchemaRegistry>> {
        XAPI_REGISTRY
            .get_or_init(|| SchemaRegistry::from_json_str(XAPI_SCHEMA_SOURCE).map(Arc::new))
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::node::Kind;

    #[test]
    fn test_grammar_builds() {
        let registry = SchemaRegistry::xapi().unwrap();
        assert_eq!(registry.title(), Some("xAPI Statement"));
        for root in ROOTS {
            assert!(registry.root(root).is_ok(), "missing root {}", root);
        }
    }

    #[test]
    fn test_registry_is_shared() {
        let first = SchemaRegistry::xapi().unwrap();
        let second = SchemaRegistry::xapi().unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_top_level_nodes_carry_their_name() {
        let registry = SchemaRegistry::xapi().unwrap();
        let agent = registry.get("agent").unwrap();
        assert_eq!(agent.id.as_deref(), Some("agent"));
        assert!(agent.is_closed());
    }

    #[test]
    fn test_inline_activity_list_anchor() {
        let registry = SchemaRegistry::xapi().unwrap();
        let list = registry.get("activity_list").unwrap();
        assert_eq!(list.kind, Kind::Array);
    }

    #[test]
    fn test_identifier_variants_are_exclusive() {
        let registry = SchemaRegistry::xapi().unwrap();
        let variants = &registry.get("inversefunctional").unwrap().one_of;
        let names: Vec<_> = variants.iter().filter_map(|v| v.display_name()).collect();
        assert_eq!(names, vec!["ifi_mbox", "ifi_mbox_sha1sum", "ifi_openid", "ifi_account"]);

        let mbox = registry.get("ifi_mbox").unwrap();
        assert_eq!(mbox.required, vec!["mbox"]);
        for other in ["mbox_sha1sum", "openid", "account"] {
            assert_eq!(mbox.properties[other].kind, Kind::Null);
        }
    }
}
