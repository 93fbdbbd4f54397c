use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur during CLI command execution.
#[derive(Error, Debug)]
pub enum CliError {
    /// A command or category was not found in the registry.
    #[error("Command not found: {0}")]
    CommandNotFound(String),

    /// Invalid arguments were provided to a command.
    ///
    /// Returned when argument validation fails, such as missing required
    /// arguments or too many arguments.
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// An error reported by the store.
    ///
    /// This wraps access errors from the backing file and listener errors.
    #[error("Store error: {0}")]
    StoreError(String),
}

/// Type alias for command execution results.
///
/// All CLI commands return either a success message or a `CliError`.
pub type CommandResult = Result<String, CliError>;

/// Specification for a single command argument.
#[derive(Debug, Clone)]
pub struct CommandArg {
    /// The name of the argument (e.g., "prefix", "key", "value").
    pub name: String,

    /// Human-readable description of what this argument does.
    pub description: String,

    /// Whether this argument is required for command execution.
    pub required: bool,

    /// The expected type of this argument for help display.
    pub value_type: ArgType,
}

/// Type classification for command arguments.
#[derive(Debug, Clone)]
pub enum ArgType {
    /// A namespace prefix or key.
    Key,

    /// A JSON value, falling back to a plain string.
    Json,

    /// A comma-separated list of keys.
    KeyList,

    /// A positive whole number.
    Count,
}

/// Complete metadata for a CLI command.
///
/// The CLI system uses this metadata for help generation, argument
/// validation, and command discovery.
#[derive(Debug, Clone)]
pub struct CommandMetadata {
    /// The command name (e.g., "get", "set", "remove").
    pub name: String,

    /// Brief description of what this command does.
    pub description: String,

    /// Specification of all arguments this command accepts.
    pub args: Vec<CommandArg>,

    /// Example usage strings to show in help text.
    pub examples: Vec<String>,

    /// Category this command belongs to (e.g., "store").
    pub category: String,
}

/// Trait defining the interface for all CLI commands.
///
/// Commands receive dependencies through their constructors.
#[async_trait]
pub trait Command: Send + Sync {
    /// Executes the command with the provided arguments.
    ///
    /// The registry has already checked the argument count against the
    /// command's metadata.
    ///
    /// # Errors
    ///
    /// Returns `CliError` for invalid argument values or store failures.
    async fn execute(&self, args: &[String]) -> CommandResult;

    /// Returns the complete metadata for this command.
    fn metadata(&self) -> CommandMetadata;
}
