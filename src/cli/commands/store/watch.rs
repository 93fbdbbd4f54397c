use std::sync::Arc;

use async_trait::async_trait;
use futures::StreamExt;

use crate::{
    cli::{
        CliError, Command, CommandResult,
        formatting::format_json_value,
        types::{ArgType, CommandArg, CommandMetadata},
    },
    store::{JsonFileStore, full_key},
};

use super::prefix_arg;

/// Command for printing changes to a set of keys as they are written.
///
/// # Example Usage
///
/// ```bash
/// jsonstore store watch ui theme,font
/// jsonstore store watch ui theme 1
/// ```
pub struct WatchCommand {
    store: Arc<JsonFileStore>,
}

impl WatchCommand {
    /// Creates a new WatchCommand with the provided store.
    pub fn new(store: Arc<JsonFileStore>) -> Self {
        Self { store }
    }

    pub(crate) fn parse_keys(raw: &str) -> Result<Vec<&str>, CliError> {
        let keys: Vec<&str> = raw
            .split(',')
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .collect();

        if keys.is_empty() {
            return Err(CliError::InvalidArguments(
                "Expected at least one key to watch".to_string(),
            ));
        }

        Ok(keys)
    }

    pub(crate) fn parse_count(raw: &str) -> Result<usize, CliError> {
        match raw.parse::<usize>() {
            Ok(count) if count > 0 => Ok(count),
            _ => Err(CliError::InvalidArguments(format!(
                "Invalid count '{raw}', expected a positive number"
            ))),
        }
    }
}

#[async_trait]
impl Command for WatchCommand {
    /// Prints every batch of changes to the watched keys.
    ///
    /// Runs until interrupted, or until `count` batches have been printed.
    ///
    /// # Errors
    ///
    /// * `CliError::InvalidArguments` - If the key list is empty or the
    ///   count is not a positive number
    async fn execute(&self, args: &[String]) -> CommandResult {
        let (Some(prefix), Some(raw_keys)) = (args.first(), args.get(1)) else {
            return Err(CliError::InvalidArguments(
                "Expected <prefix> <keys> arguments for 'watch' command".to_string(),
            ));
        };
        let keys = Self::parse_keys(raw_keys)?;
        let limit = args.get(2).map(|raw| Self::parse_count(raw)).transpose()?;

        println!("Watching {} under '{prefix}'...", keys.join(", "));
        if limit.is_none() {
            println!("Press Ctrl+C to stop");
        }

        let stream = self.store.subscribe(prefix, &keys).into_stream();
        futures::pin_mut!(stream);

        let mut seen = 0;
        while limit.is_none_or(|limit| seen < limit) {
            let Some(changes) = stream.next().await else {
                break;
            };

            for (key, value) in &changes {
                println!(
                    "{} -> {}",
                    full_key(prefix, key),
                    format_json_value(value.as_ref())
                );
            }
            seen += 1;
        }

        Ok(format!("Watch ended after {seen} change(s)"))
    }

    fn metadata(&self) -> CommandMetadata {
        CommandMetadata {
            name: "watch".to_string(),
            description: "Print changes to keys as they are written".to_string(),
            category: "store".to_string(),
            args: vec![
                prefix_arg(),
                CommandArg {
                    name: "keys".to_string(),
                    description: "Comma-separated keys to watch (e.g., theme,font)".to_string(),
                    required: true,
                    value_type: ArgType::KeyList,
                },
                CommandArg {
                    name: "count".to_string(),
                    description: "Stop after this many changes".to_string(),
                    required: false,
                    value_type: ArgType::Count,
                },
            ],
            examples: vec![
                "jsonstore store watch ui theme,font".to_string(),
                "jsonstore store watch ui theme 1".to_string(),
            ],
        }
    }
}
