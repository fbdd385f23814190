//! Id-keyed table of schema nodes
//!
//! The registry is the only place references are resolved. It is built once,
//! self-checked at construction, and read-only afterwards, so one registry
//! can serve any number of concurrent validations.
//!
//! Copyright (c) 2025 xAPI Tools Team
//! Licensed under the Apache-2.0 license

use crate::schema::error::{SchemaError, SchemaResult};
use crate::schema::node::SchemaNode;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

/// On-disk form of a Schema Model: named nodes plus descriptive metadata
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SchemaDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    pub nodes: BTreeMap<String, SchemaNode>,
}

/// Immutable id → node table with memoized regular expressions
#[derive(Debug)]
pub struct SchemaRegistry {
    title: Option<String>,
    version: Option<String>,
    nodes: BTreeMap<String, SchemaNode>,
    patterns: HashMap<String, Regex>,
}

impl SchemaRegistry {
    /// Build a registry from named nodes
    pub fn from_nodes<I, S>(nodes: I) -> SchemaResult<Self>
    where
        I: IntoIterator<Item = (S, SchemaNode)>,
        S: Into<String>,
    {
        let mut document = SchemaDocument::default();
        for (name, node) in nodes {
            let name = name.into();
            if document.nodes.contains_key(&name) {
                return Err(SchemaError::DuplicateId { id: name });
            }
            document.nodes.insert(name, node);
        }
        Self::from_document(document)
    }

    /// Build a registry from a JSON schema document
    pub fn from_json_str(text: &str) -> SchemaResult<Self> {
        let document: SchemaDocument = serde_json::from_str(text)?;
        Self::from_document(document)
    }

    /// Build a registry from a parsed schema document, running the self-check
    pub fn from_document(document: SchemaDocument) -> SchemaResult<Self> {
        let mut nodes = BTreeMap::new();

        for (name, mut node) in document.nodes {
            // top-level nodes are named by their key unless they carry an alias
            let id = node.id.get_or_insert_with(|| name.clone()).clone();
            collect_anchors(&node, &mut nodes)?;
            if id != name {
                insert_node(&mut nodes, id, node.clone())?;
            }
            insert_node(&mut nodes, name, node)?;
        }

        let mut registry = Self {
            title: document.title,
            version: document.version,
            nodes,
            patterns: HashMap::new(),
        };
        registry.self_check()?;

        debug!(
            nodes = registry.nodes.len(),
            patterns = registry.patterns.len(),
            "Schema registry built"
        );

        Ok(registry)
    }

    /// Verify references and compile patterns
    fn self_check(&mut self) -> SchemaResult<()> {
        let mut patterns = HashMap::new();

        for (name, node) in &self.nodes {
            let mut stack = vec![node];
            while let Some(current) = stack.pop() {
                if let Some(target) = &current.reference {
                    if !self.nodes.contains_key(target) {
                        return Err(SchemaError::unresolved(target, name));
                    }
                }
                for pattern in current.patterns() {
                    if !patterns.contains_key(pattern) {
                        let regex = Regex::new(pattern)
                            .map_err(|e| SchemaError::invalid_pattern(pattern, e.to_string()))?;
                        patterns.insert(pattern.to_string(), regex);
                    }
                }
                stack.extend(current.children());
            }
        }

        for name in self.nodes.keys() {
            self.check_reference_chain(name)?;
        }

        self.patterns = patterns;
        Ok(())
    }

    /// Reject ref → ref chains that loop without reaching a constraint
    fn check_reference_chain(&self, start: &str) -> SchemaResult<()> {
        let mut chain = vec![start];
        let mut current = &self.nodes[start];

        while let Some(target) = current.reference.as_deref() {
            if chain.contains(&target) {
                chain.push(target);
                return Err(SchemaError::circular_reference(&chain));
            }
            chain.push(target);
            current = self
                .nodes
                .get(target)
                .ok_or_else(|| SchemaError::unresolved(target, start))?;
        }

        Ok(())
    }

    /// Look up a node by id
    pub fn get(&self, id: &str) -> Option<&SchemaNode> {
        self.nodes.get(id)
    }

    /// Look up a node that is about to be used as a validation root
    pub fn root(&self, id: &str) -> SchemaResult<&SchemaNode> {
        self.get(id).ok_or_else(|| SchemaError::unknown_root(id))
    }

    /// Follow references until reaching a node that carries constraints
    pub fn resolve<'a>(&'a self, node: &'a SchemaNode) -> SchemaResult<&'a SchemaNode> {
        let mut current = node;
        let mut hops = 0;

        while let Some(target) = &current.reference {
            current = self.nodes.get(target).ok_or_else(|| {
                SchemaError::unresolved(target, node.display_name().unwrap_or("<inline>"))
            })?;
            hops += 1;
            if hops > self.nodes.len() {
                return Err(SchemaError::circular_reference(&[target.as_str()]));
            }
        }

        Ok(current)
    }

    /// Compiled form of a pattern declared somewhere in this registry
    pub fn regex(&self, pattern: &str) -> SchemaResult<&Regex> {
        self.patterns.get(pattern).ok_or_else(|| {
            SchemaError::invalid_pattern(pattern, "pattern is not declared in this schema")
        })
    }

    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    /// All node ids, sorted
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.nodes.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }
}

/// Register every inline descendant that carries an id
fn collect_anchors(node: &SchemaNode, nodes: &mut BTreeMap<String, SchemaNode>) -> SchemaResult<()> {
    for child in node.children() {
        if let Some(id) = &child.id {
            insert_node(nodes, id.clone(), child.clone())?;
        }
        collect_anchors(child, nodes)?;
    }
    Ok(())
}

fn insert_node(
    nodes: &mut BTreeMap<String, SchemaNode>,
    id: String,
    node: SchemaNode,
) -> SchemaResult<()> {
    if nodes.contains_key(&id) {
        return Err(SchemaError::DuplicateId { id });
    }
    nodes.insert(id, node);
    Ok(())
}
