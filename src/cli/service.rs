use std::sync::Arc;

use crate::store::JsonFileStore;

use super::{CliError, CommandRegistry};

/// High-level service for managing and executing CLI commands.
pub struct CliService {
    registry: CommandRegistry,
}

impl CliService {
    /// Creates a new CLI service with all available commands registered.
    ///
    /// # Arguments
    /// * `store` - Store shared by every command
    pub fn new(store: JsonFileStore) -> Self {
        let mut registry = CommandRegistry::new(Arc::new(store));
        registry.register_all_commands();

        CliService { registry }
    }

    /// Executes a command by category and name with the provided arguments.
    ///
    /// # Errors
    /// Returns `CliError::CommandNotFound` if the command doesn't exist in the category.
    /// Returns other `CliError` variants if the command fails during execution.
    pub async fn execute_command(
        &self,
        category: &str,
        command_name: &str,
        args: &[String],
    ) -> Result<String, CliError> {
        self.registry.execute(category, command_name, args).await
    }

    /// Lists all available commands as (category_name, command_names) tuples.
    pub fn list_all(&self) -> Vec<(String, Vec<String>)> {
        self.registry.list_commands()
    }
}
