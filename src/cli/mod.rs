//! CLI module
//!
//! Command-line interface over [`ResourceClient`](crate::client::ResourceClient).
//!
//! # Commands
//!
//! - `list` - List accounts (`--stream` prints page by page)
//! - `list-children` - List a child collection of an account
//! - `get` - Show an account or a child
//! - `create` / `update` / `delete` - Long-running writes (`--no-wait` to skip polling)
//! - `check-name` - Name availability in a region
//!
//! Items are printed one JSON document per line.

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat, QueryArgs};
pub use runner::{exit_code, Runner};

#[cfg(test)]
mod tests;
