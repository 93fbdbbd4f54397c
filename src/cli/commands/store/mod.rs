//! Store entry commands.
mod get;
mod keys;
mod remove;
mod set;
mod watch;

use std::sync::Arc;

pub use get::GetCommand;
pub use keys::KeysCommand;
pub use remove::RemoveCommand;
pub use set::SetCommand;
pub use watch::WatchCommand;

use crate::{
    cli::{ArgType, CommandArg, CommandRegistry},
    store::JsonFileStore,
};

/// Registers all store commands with the command registry.
///
/// Registers commands in the "store" category for reading, writing,
/// listing and watching entries.
///
/// # Arguments
///
/// * `registry` - Mutable reference to the command registry
/// * `store` - Shared store for the commands
pub fn register_commands(registry: &mut CommandRegistry, store: Arc<JsonFileStore>) {
    const CATEGORY_NAME: &str = "store";

    registry.register_command(CATEGORY_NAME, Box::new(GetCommand::new(store.clone())));
    registry.register_command(CATEGORY_NAME, Box::new(SetCommand::new(store.clone())));
    registry.register_command(CATEGORY_NAME, Box::new(RemoveCommand::new(store.clone())));
    registry.register_command(CATEGORY_NAME, Box::new(KeysCommand::new(store.clone())));
    registry.register_command(CATEGORY_NAME, Box::new(WatchCommand::new(store)));
}

fn prefix_arg() -> CommandArg {
    CommandArg {
        name: "prefix".to_string(),
        description: "Namespace the key belongs to (e.g., ui)".to_string(),
        required: true,
        value_type: ArgType::Key,
    }
}

fn key_arg() -> CommandArg {
    CommandArg {
        name: "key".to_string(),
        description: "Key within the namespace".to_string(),
        required: true,
        value_type: ArgType::Key,
    }
}
