use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::{
    cli::{
        CliError, Command, CommandResult,
        types::{ArgType, CommandArg, CommandMetadata},
    },
    store::JsonFileStore,
};

use super::{key_arg, prefix_arg};

/// Command for writing a single entry to the store.
pub struct SetCommand {
    store: Arc<JsonFileStore>,
}

impl SetCommand {
    /// Creates a new SetCommand with the provided store.
    pub fn new(store: Arc<JsonFileStore>) -> Self {
        Self { store }
    }

    /// Parses the value as JSON, falling back to a plain string.
    pub(crate) fn parse_value(value_str: &str) -> Value {
        serde_json::from_str(value_str).unwrap_or_else(|_| Value::String(value_str.to_string()))
    }
}

#[async_trait]
impl Command for SetCommand {
    async fn execute(&self, args: &[String]) -> CommandResult {
        let (Some(prefix), Some(key)) = (args.first(), args.get(1)) else {
            return Err(CliError::InvalidArguments(
                "Expected <prefix> <key> arguments for 'set' command".to_string(),
            ));
        };

        let value_str = args.get(2).ok_or_else(|| {
            CliError::InvalidArguments("Expected <value> argument for 'set' command".to_string())
        })?;
        let value = Self::parse_value(value_str);

        match self.store.set(prefix, key, value).await {
            Ok(()) => Ok(format!("Set '{key}' in '{prefix}' to {value_str}")),
            Err(e) => Err(CliError::StoreError(e.to_string())),
        }
    }

    fn metadata(&self) -> CommandMetadata {
        CommandMetadata {
            name: "set".to_string(),
            description: "Set a stored value".to_string(),
            category: "store".to_string(),
            args: vec![
                prefix_arg(),
                key_arg(),
                CommandArg {
                    name: "value".to_string(),
                    description: "New value (JSON, or a plain string)".to_string(),
                    required: true,
                    value_type: ArgType::Json,
                },
            ],
            examples: vec![
                "jsonstore store set ui theme dark".to_string(),
                "jsonstore store set network timeout 30".to_string(),
                "jsonstore store set ui panels '[\"top\", \"left\"]'".to_string(),
            ],
        }
    }
}
