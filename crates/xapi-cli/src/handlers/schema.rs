//! The schema command: inspect the statement grammar

use crate::cli::{SchemaAction, SchemaArgs};
use crate::error::{Error, Result};
use crate::output::OutputWriter;
use serde::Serialize;
use xapi_schemas::{SchemaNode, SchemaRegistry, ROOTS};

/// One row of `schema list`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchemaEntry {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub root: bool,
}

impl SchemaEntry {
    fn from_node(id: &str, node: &SchemaNode) -> Self {
        let kind = match &node.reference {
            Some(target) => format!("→ {}", target),
            None => node.kind.to_string(),
        };

        Self {
            id: id.to_string(),
            kind,
            description: node.description.clone(),
            root: ROOTS.contains(&id),
        }
    }
}

/// Every named node, in id order
pub fn schema_entries(registry: &SchemaRegistry) -> Vec<SchemaEntry> {
    registry
        .ids()
        .filter_map(|id| registry.get(id).map(|node| SchemaEntry::from_node(id, node)))
        .collect()
}

/// Handle the schema command
pub fn handle_schema(args: SchemaArgs, output: &mut OutputWriter) -> Result<()> {
    let registry = SchemaRegistry::xapi()?;

    match args.action {
        SchemaAction::List => {
            let entries = schema_entries(&registry);
            if !output.is_human() {
                return output.data(&entries);
            }

            let title = match (registry.title(), registry.version()) {
                (Some(title), Some(version)) => format!("{} ({})", title, version),
                (Some(title), None) => title.to_string(),
                _ => "Schema nodes".to_string(),
            };
            output.section(&title)?;

            let rows = entries
                .into_iter()
                .map(|entry| {
                    vec![
                        if entry.root { format!("{} *", entry.id) } else { entry.id },
                        entry.kind,
                        entry.description.unwrap_or_default(),
                    ]
                })
                .collect();
            output.table(&["ID", "TYPE", "DESCRIPTION"], rows)?;
            output.info("* document roots; any listed id can be passed to 'xapi validate --root'")
        }
        SchemaAction::Show(show) => {
            let node = registry.get(&show.id).ok_or_else(|| {
                Error::invalid_args(format!(
                    "no schema node named '{}'; run 'xapi schema list' for the known ids",
                    show.id
                ))
            })?;

            output.section(&show.id)?;
            output.data(node)
        }
    }
}
