//! Schema node definitions
//!
//! A [`SchemaNode`] is the atomic unit of the Schema Model. Nodes use a
//! JSON-Schema-like keyword vocabulary so that the xAPI grammar can be kept as
//! a plain JSON document, and they can equally be assembled in code through
//! the builder methods below.
//!
//! Copyright (c) 2025 xAPI Tools Team
//! Licensed under the Apache-2.0 license

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// The runtime shape a node constrains a value to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    Object,
    Array,
    String,
    Number,
    Boolean,
    /// Absent or explicitly `null`
    Null,
    /// No shape constraint
    #[default]
    Any,
}

impl Kind {
    /// Check whether a JSON value has this shape
    pub fn matches(self, value: &Value) -> bool {
        match self {
            Kind::Object => value.is_object(),
            Kind::Array => value.is_array(),
            Kind::String => value.is_string(),
            Kind::Number => value.is_number(),
            Kind::Boolean => value.is_boolean(),
            Kind::Null => value.is_null(),
            Kind::Any => true,
        }
    }

    /// Name of the shape of a JSON value, using this enum's vocabulary
    pub fn of(value: &Value) -> Kind {
        match value {
            Value::Object(_) => Kind::Object,
            Value::Array(_) => Kind::Array,
            Value::String(_) => Kind::String,
            Value::Number(_) => Kind::Number,
            Value::Bool(_) => Kind::Boolean,
            Value::Null => Kind::Null,
        }
    }

    pub fn is_any(&self) -> bool {
        matches!(self, Kind::Any)
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Kind::Object => "object",
            Kind::Array => "array",
            Kind::String => "string",
            Kind::Number => "number",
            Kind::Boolean => "boolean",
            Kind::Null => "null",
            Kind::Any => "any",
        };
        f.write_str(name)
    }
}

/// A single schema constraint node
///
/// A node whose `$ref` is set is a reference node: it stands for the named
/// node it points at, and its own keywords are ignored by the engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SchemaNode {
    /// Stable name other nodes can reference
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(rename = "type", default, skip_serializing_if = "Kind::is_any")]
    pub kind: Kind,

    /// Name of the node this one stands for
    #[serde(rename = "$ref", default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, SchemaNode>,

    /// Keys matched by regular expression rather than by name
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub pattern_properties: BTreeMap<String, SchemaNode>,

    /// `Some(false)` rejects keys not covered by `properties`/`patternProperties`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_properties: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<SchemaNode>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_items: Option<usize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_items: Option<usize>,

    #[serde(rename = "enum", default, skip_serializing_if = "Option::is_none")]
    pub enumeration: Option<Vec<Value>>,

    /// Name of an external format checker
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub all_of: Vec<SchemaNode>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub one_of: Vec<SchemaNode>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub not: Option<Box<SchemaNode>>,
}

impl SchemaNode {
    /// Create a node constraining values to the given kind
    pub fn of_kind(kind: Kind) -> Self {
        Self {
            kind,
            ..Self::default()
        }
    }

    pub fn object() -> Self {
        Self::of_kind(Kind::Object)
    }

    pub fn array() -> Self {
        Self::of_kind(Kind::Array)
    }

    pub fn string() -> Self {
        Self::of_kind(Kind::String)
    }

    pub fn number() -> Self {
        Self::of_kind(Kind::Number)
    }

    pub fn boolean() -> Self {
        Self::of_kind(Kind::Boolean)
    }

    /// A node accepting only an absent or `null` value
    pub fn null() -> Self {
        Self::of_kind(Kind::Null)
    }

    pub fn any() -> Self {
        Self::default()
    }

    /// Create a reference node pointing at a named node
    pub fn reference<S: Into<String>>(id: S) -> Self {
        Self {
            reference: Some(id.into()),
            ..Self::default()
        }
    }

    pub fn with_id<S: Into<String>>(mut self, id: S) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn describe<S: Into<String>>(mut self, description: S) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn property<S: Into<String>>(mut self, name: S, node: SchemaNode) -> Self {
        self.properties.insert(name.into(), node);
        self
    }

    pub fn pattern_property<S: Into<String>>(mut self, pattern: S, node: SchemaNode) -> Self {
        self.pattern_properties.insert(pattern.into(), node);
        self
    }

    pub fn require<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required.extend(names.into_iter().map(Into::into));
        self
    }

    /// Reject keys not declared on this node
    pub fn closed(mut self) -> Self {
        self.additional_properties = Some(false);
        self
    }

    pub fn items_of(mut self, node: SchemaNode) -> Self {
        self.items = Some(Box::new(node));
        self
    }

    pub fn min_items(mut self, min: usize) -> Self {
        self.min_items = Some(min);
        self
    }

    pub fn max_items(mut self, max: usize) -> Self {
        self.max_items = Some(max);
        self
    }

    pub fn enumeration<I: IntoIterator<Item = Value>>(mut self, values: I) -> Self {
        self.enumeration = Some(values.into_iter().collect());
        self
    }

    pub fn format<S: Into<String>>(mut self, name: S) -> Self {
        self.format = Some(name.into());
        self
    }

    pub fn pattern<S: Into<String>>(mut self, pattern: S) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    pub fn minimum(mut self, min: f64) -> Self {
        self.minimum = Some(min);
        self
    }

    pub fn maximum(mut self, max: f64) -> Self {
        self.maximum = Some(max);
        self
    }

    pub fn min_length(mut self, min: usize) -> Self {
        self.min_length = Some(min);
        self
    }

    pub fn all_of<I: IntoIterator<Item = SchemaNode>>(mut self, nodes: I) -> Self {
        self.all_of.extend(nodes);
        self
    }

    pub fn one_of<I: IntoIterator<Item = SchemaNode>>(mut self, nodes: I) -> Self {
        self.one_of.extend(nodes);
        self
    }

    pub fn negate(mut self, node: SchemaNode) -> Self {
        self.not = Some(Box::new(node));
        self
    }

    /// Whether this node stands for another named node
    pub fn is_ref(&self) -> bool {
        self.reference.is_some()
    }

    /// Name used when reporting on this node: its id, or the id it references
    pub fn display_name(&self) -> Option<&str> {
        self.id.as_deref().or(self.reference.as_deref())
    }

    /// Whether keys outside the declared ones are rejected
    pub fn is_closed(&self) -> bool {
        self.additional_properties == Some(false)
    }

    /// Direct sub-nodes, in keyword order
    pub fn children(&self) -> impl Iterator<Item = &SchemaNode> {
        self.properties
            .values()
            .chain(self.pattern_properties.values())
            .chain(self.items.as_deref())
            .chain(self.all_of.iter())
            .chain(self.one_of.iter())
            .chain(self.not.as_deref())
    }

    /// Every regular expression this node declares directly
    pub fn patterns(&self) -> impl Iterator<Item = &str> {
        self.pattern_properties
            .keys()
            .map(String::as_str)
            .chain(self.pattern.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_kind_matches() {
        assert!(Kind::Object.matches(&json!({})));
        assert!(Kind::Number.matches(&json!(1.5)));
        assert!(Kind::Null.matches(&Value::Null));
        assert!(!Kind::String.matches(&json!(1)));
        assert!(Kind::Any.matches(&json!([1, 2])));
        assert_eq!(Kind::of(&json!(true)), Kind::Boolean);
    }

    #[test]
    fn test_builder_sets_keywords() {
        let node = SchemaNode::object()
            .with_id("account")
            .require(["homePage", "name"])
            .property("homePage", SchemaNode::string().format("uri"))
            .property("name", SchemaNode::string())
            .closed();

        assert_eq!(node.display_name(), Some("account"));
        assert_eq!(node.required, vec!["homePage", "name"]);
        assert!(node.is_closed());
        assert_eq!(node.children().count(), 2);
    }

    #[test]
    fn test_deserialize_keywords() {
        let node: SchemaNode = serde_json::from_value(json!({
            "type": "object",
            "required": ["mbox"],
            "properties": {
                "mbox": {"$ref": "mbox"},
                "openid": {"type": "null"}
            },
            "patternProperties": {"^x-": {"type": "string"}},
            "additionalProperties": false,
            "oneOf": [{"$ref": "a"}, {"$ref": "b"}]
        }))
        .unwrap();

        assert_eq!(node.kind, Kind::Object);
        assert!(node.properties["mbox"].is_ref());
        assert_eq!(node.properties["openid"].kind, Kind::Null);
        assert!(node.is_closed());
        assert_eq!(node.one_of.len(), 2);
        assert_eq!(node.patterns().collect::<Vec<_>>(), vec!["^x-"]);
    }

    #[test]
    fn test_unknown_keyword_is_rejected() {
        let result: Result<SchemaNode, _> = serde_json::from_value(json!({"tpye": "object"}));
        assert!(result.is_err());
    }

    #[test]
    fn test_serialize_skips_defaults() {
        let node = SchemaNode::reference("agent");
        assert_eq!(serde_json::to_value(&node).unwrap(), json!({"$ref": "agent"}));
    }
}
