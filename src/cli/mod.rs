//! Command-line interface for the store.
//!
//! Provides a category/command system for reading and writing store
//! entries. Commands are organized by category and describe themselves
//! through metadata.

mod commands;
pub mod formatting;
mod registry;
mod service;
mod types;

#[cfg(test)]
mod tests;

pub use commands::store::{GetCommand, KeysCommand, RemoveCommand, SetCommand, WatchCommand};
pub use registry::CommandRegistry;
pub use service::CliService;
pub use types::{ArgType, CliError, Command, CommandArg, CommandMetadata, CommandResult};
