use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    cli::{
        CliError, Command, CommandResult, formatting::format_json_value, types::CommandMetadata,
    },
    store::JsonFileStore,
};

use super::{key_arg, prefix_arg};

/// Command for reading a single entry from the store.
///
/// # Example Usage
///
/// ```bash
/// jsonstore store get ui theme
/// ```
pub struct GetCommand {
    store: Arc<JsonFileStore>,
}

impl GetCommand {
    /// Creates a new GetCommand with the provided store.
    pub fn new(store: Arc<JsonFileStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Command for GetCommand {
    /// Reads the value stored under `<prefix>.<key>`.
    ///
    /// # Errors
    ///
    /// * `CliError::InvalidArguments` - If prefix or key is missing
    /// * `CliError::StoreError` - If the store cannot be read
    async fn execute(&self, args: &[String]) -> CommandResult {
        let (Some(prefix), Some(key)) = (args.first(), args.get(1)) else {
            return Err(CliError::InvalidArguments(
                "Expected <prefix> <key> arguments for 'get' command".to_string(),
            ));
        };

        let value = self
            .store
            .get(prefix, key)
            .await
            .map_err(|e| CliError::StoreError(e.to_string()))?;

        Ok(format!("{key}: {}", format_json_value(value.as_ref())))
    }

    fn metadata(&self) -> CommandMetadata {
        CommandMetadata {
            name: "get".to_string(),
            description: "Get a stored value".to_string(),
            category: "store".to_string(),
            args: vec![prefix_arg(), key_arg()],
            examples: vec![
                "jsonstore store get ui theme".to_string(),
                "jsonstore store get network timeout".to_string(),
            ],
        }
    }
}
