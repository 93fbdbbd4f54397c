use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    cli::{CliError, Command, CommandResult, types::CommandMetadata},
    store::JsonFileStore,
};

use super::prefix_arg;

/// Command for listing the keys stored under a prefix.
pub struct KeysCommand {
    store: Arc<JsonFileStore>,
}

impl KeysCommand {
    /// Creates a new KeysCommand with the provided store.
    pub fn new(store: Arc<JsonFileStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Command for KeysCommand {
    async fn execute(&self, args: &[String]) -> CommandResult {
        let prefix = args.first().ok_or_else(|| {
            CliError::InvalidArguments("Expected <prefix> argument for 'keys' command".to_string())
        })?;

        let keys = self
            .store
            .keys(prefix)
            .await
            .map_err(|e| CliError::StoreError(e.to_string()))?;

        if keys.is_empty() {
            return Ok(format!("No keys stored under '{prefix}'"));
        }

        Ok(keys.join("\n"))
    }

    fn metadata(&self) -> CommandMetadata {
        CommandMetadata {
            name: "keys".to_string(),
            description: "List keys stored under a prefix".to_string(),
            category: "store".to_string(),
            args: vec![prefix_arg()],
            examples: vec!["jsonstore store keys ui".to_string()],
        }
    }
}
