use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    cli::{CliError, Command, CommandResult, types::CommandMetadata},
    store::JsonFileStore,
};

use super::{key_arg, prefix_arg};

/// Command for removing an entry from the store.
pub struct RemoveCommand {
    store: Arc<JsonFileStore>,
}

impl RemoveCommand {
    /// Creates a new RemoveCommand with the provided store.
    pub fn new(store: Arc<JsonFileStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Command for RemoveCommand {
    async fn execute(&self, args: &[String]) -> CommandResult {
        let (Some(prefix), Some(key)) = (args.first(), args.get(1)) else {
            return Err(CliError::InvalidArguments(
                "Expected <prefix> <key> arguments for 'remove' command".to_string(),
            ));
        };

        self.store
            .remove(prefix, &[key])
            .await
            .map_err(|e| CliError::StoreError(e.to_string()))?;

        Ok(format!("Removed '{key}' from '{prefix}'"))
    }

    fn metadata(&self) -> CommandMetadata {
        CommandMetadata {
            name: "remove".to_string(),
            description: "Remove a stored value".to_string(),
            category: "store".to_string(),
            args: vec![prefix_arg(), key_arg()],
            examples: vec!["jsonstore store remove ui theme".to_string()],
        }
    }
}
