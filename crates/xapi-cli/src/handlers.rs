//! Command handlers for CLI subcommands
//!
//! This module contains the implementation logic for each CLI subcommand.

mod completions;
mod config;
mod schema;
mod timestamp;
mod validate;

pub use completions::handle_completions;
pub use config::handle_config;
pub use schema::handle_schema;
pub use timestamp::handle_timestamp;
pub use validate::handle_validate;
