//! Schema Model: the declarative description of well-formed xAPI documents
//!
//! Nodes are kept in a [`SchemaRegistry`] keyed by id and refer to each other
//! through `$ref` names rather than owning pointers, which keeps recursive
//! grammars acyclic in memory.
//!
//! Copyright (c) 2025 xAPI Tools Team
//! Licensed under the Apache-2.0 license

pub mod error;
pub mod node;
pub mod registry;
pub mod xapi;

pub use error::{SchemaError, SchemaResult};
pub use node::{Kind, SchemaNode};
pub use registry::{SchemaDocument, SchemaRegistry};
pub use xapi::{ROOTS, STATEMENT, STATEMENT_ENVELOPE, STATEMENT_LIST};
