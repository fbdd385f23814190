//! Recursive evaluation of a document against a schema node
//!
//! A node is evaluated in a fixed order: reference resolution, kind check,
//! enumeration, kind-specific keywords, then composition (`allOf`, `oneOf`,
//! `not`). A kind mismatch ends the node, composition included. Members
//! nested deeper than [`MAX_DEPTH`] are not visited.
//!
//! Copyright (c) 2025 xAPI Tools Team
//! Licensed under the Apache-2.0 license

use crate::formats::FormatRegistry;
use crate::schema::{Kind, SchemaNode, SchemaRegistry, SchemaResult};
use crate::validation::base::{ValidationContext, MAX_DEPTH};
use crate::validation::error::{Rule, Violation};
use serde_json::{Map, Value};
use tracing::trace;

/// Borrowed view of everything one validation run reads
pub(crate) struct Evaluator<'a> {
    schema: &'a SchemaRegistry,
    formats: &'a FormatRegistry,
}

impl<'a> Evaluator<'a> {
    pub(crate) fn new(schema: &'a SchemaRegistry, formats: &'a FormatRegistry) -> Self {
        Self { schema, formats }
    }

    /// Append every violation of `value` against `node` to `out`
    pub(crate) fn evaluate(
        &self,
        node: &SchemaNode,
        value: &Value,
        context: &ValidationContext,
        out: &mut Vec<Violation>,
    ) -> SchemaResult<()> {
        let node = self.schema.resolve(node)?;
        let scoped;
        let context = match &node.id {
            Some(id) if context.schema_node.as_ref() != Some(id) => {
                scoped = context.within(id.as_str());
                &scoped
            }
            _ => context,
        };

        if !node.kind.matches(value) {
            out.push(context.violation(Rule::Type, kind_message(node.kind, value)));
            return Ok(());
        }

        if let Some(allowed) = &node.enumeration {
            if !allowed.contains(value) {
                out.push(context.violation(
                    Rule::Enum,
                    format!("{} is not one of {}", value, Value::Array(allowed.clone())),
                ));
            }
        }

        match value {
            Value::Object(members) => self.evaluate_object(node, members, context, out)?,
            Value::Array(items) => self.evaluate_array(node, items, context, out)?,
            Value::String(text) => self.evaluate_string(node, text, context, out)?,
            Value::Number(_) => evaluate_number(node, value, context, out),
            Value::Bool(_) | Value::Null => {}
        }

        for part in &node.all_of {
            self.evaluate(part, value, context, out)?;
        }

        if !node.one_of.is_empty() {
            self.evaluate_one_of(node, value, context, out)?;
        }

        if let Some(negated) = &node.not {
            let mut inner = Vec::new();
            self.evaluate(negated, value, context, &mut inner)?;
            if inner.is_empty() {
                let name = negated.display_name().unwrap_or("the negated schema");
                out.push(context.violation(Rule::Not, format!("value must not match '{}'", name)));
            }
        }

        Ok(())
    }

    fn evaluate_object(
        &self,
        node: &SchemaNode,
        members: &Map<String, Value>,
        context: &ValidationContext,
        out: &mut Vec<Violation>,
    ) -> SchemaResult<()> {
        for key in &node.required {
            if !members.contains_key(key) {
                out.push(context.violation(
                    Rule::Required,
                    format!("missing required property '{}'", key),
                ));
            }
        }

        for (key, member) in members {
            let member_context = context.child(key);
            let member_node = match node.properties.get(key) {
                Some(property) => Some(property),
                None => self.matching_pattern(node, key)?,
            };

            match member_node {
                Some(_) if context.at_depth_limit() => {
                    out.push(depth_violation(context));
                    return Ok(());
                }
                Some(member_node) => self.evaluate(member_node, member, &member_context, out)?,
                None if node.is_closed() => out.push(member_context.violation(
                    Rule::AdditionalProperties,
                    format!("property '{}' is not allowed", key),
                )),
                None => {}
            }
        }

        Ok(())
    }

    /// First `patternProperties` entry, in key order, whose regex matches
    fn matching_pattern<'n>(
        &self,
        node: &'n SchemaNode,
        key: &str,
    ) -> SchemaResult<Option<&'n SchemaNode>> {
        for (pattern, pattern_node) in &node.pattern_properties {
            if self.schema.regex(pattern)?.is_match(key) {
                return Ok(Some(pattern_node));
            }
        }
        Ok(None)
    }

    fn evaluate_array(
        &self,
        node: &SchemaNode,
        items: &[Value],
        context: &ValidationContext,
        out: &mut Vec<Violation>,
    ) -> SchemaResult<()> {
        if let Some(min) = node.min_items {
            if items.len() < min {
                out.push(context.violation(
                    Rule::MinItems,
                    format!("expected at least {} item(s), found {}", min, items.len()),
                ));
            }
        }
        if let Some(max) = node.max_items {
            if items.len() > max {
                out.push(context.violation(
                    Rule::MaxItems,
                    format!("expected at most {} item(s), found {}", max, items.len()),
                ));
            }
        }

        if let Some(item_node) = &node.items {
            if !items.is_empty() && context.at_depth_limit() {
                out.push(depth_violation(context));
                return Ok(());
            }
            for (index, item) in items.iter().enumerate() {
                self.evaluate(item_node, item, &context.child_index(index), out)?;
            }
        }

        Ok(())
    }

    fn evaluate_string(
        &self,
        node: &SchemaNode,
        text: &str,
        context: &ValidationContext,
        out: &mut Vec<Violation>,
    ) -> SchemaResult<()> {
        if let Some(min) = node.min_length {
            let length = text.chars().count();
            if length < min {
                out.push(context.violation(
                    Rule::MinLength,
                    format!("expected at least {} character(s), found {}", min, length),
                ));
            }
        }

        if let Some(pattern) = &node.pattern {
            if !self.schema.regex(pattern)?.is_match(text) {
                out.push(context.violation(
                    Rule::Pattern,
                    format!("string does not match pattern '{}'", pattern),
                ));
            }
        }

        if let Some(format) = &node.format {
            if context.mode.checks_formats() {
                match self.formats.check(format, text) {
                    Some(true) => {}
                    Some(false) => out.push(context.violation(
                        Rule::Format,
                        format!("string is not a valid '{}'", format),
                    )),
                    None => trace!(format = %format, path = %context.path, "No checker for format, accepting"),
                }
            }
        }

        Ok(())
    }

    fn evaluate_one_of(
        &self,
        node: &SchemaNode,
        value: &Value,
        context: &ValidationContext,
        out: &mut Vec<Violation>,
    ) -> SchemaResult<()> {
        let mut matched = Vec::new();
        let mut causes = Vec::new();
        let mut names = Vec::with_capacity(node.one_of.len());

        for (index, variant) in node.one_of.iter().enumerate() {
            let name = variant
                .display_name()
                .map(str::to_string)
                .unwrap_or_else(|| format!("#{}", index));

            let mut variant_out = Vec::new();
            self.evaluate(variant, value, context, &mut variant_out)?;

            if variant_out.is_empty() {
                matched.push(name.clone());
            } else {
                causes.extend(variant_out);
            }
            names.push(name);
        }

        trace!(
            path = %context.path,
            variants = names.len(),
            matched = matched.len(),
            "oneOf evaluated"
        );

        match matched.len() {
            1 => {}
            0 => out.push(
                context
                    .violation(
                        Rule::OneOf,
                        format!("no matching variant among [{}]", names.join(", ")),
                    )
                    .with_causes(causes),
            ),
            _ => out.push(context.violation(
                Rule::OneOfAmbiguous,
                format!("value matches more than one variant: [{}]", matched.join(", ")),
            )),
        }

        Ok(())
    }
}

fn evaluate_number(
    node: &SchemaNode,
    value: &Value,
    context: &ValidationContext,
    out: &mut Vec<Violation>,
) {
    let Some(number) = value.as_f64() else {
        return;
    };

    if let Some(min) = node.minimum {
        if number < min {
            out.push(context.violation(
                Rule::Minimum,
                format!("{} is less than the minimum of {}", value, min),
            ));
        }
    }
    if let Some(max) = node.maximum {
        if number > max {
            out.push(context.violation(
                Rule::Maximum,
                format!("{} is greater than the maximum of {}", value, max),
            ));
        }
    }
}

fn depth_violation(context: &ValidationContext) -> Violation {
    context.violation(
        Rule::MaxDepth,
        format!("document nests deeper than {} levels", MAX_DEPTH),
    )
}

fn kind_message(expected: Kind, value: &Value) -> String {
    match expected {
        Kind::Null => format!("property must be absent, found {}", Kind::of(value)),
        _ => format!("expected {}, found {}", expected, Kind::of(value)),
    }
}
