use std::{path::PathBuf, result};

use thiserror::Error;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No backing file has been configured for the store.
    #[error("no backing file configured for the store")]
    NoTarget,

    /// Error occurred while reading the backing file
    #[error("I/O error on '{path}': {details}")]
    Io {
        /// Path where the I/O error occurred
        path: PathBuf,
        /// I/O error details
        details: String,
    },

    /// The backing file exists but does not hold a readable mapping
    #[error("failed to parse store '{path}': {details}")]
    Parse {
        /// Path of the backing file
        path: PathBuf,
        /// Parse error details
        details: String,
    },

    /// Error occurred while serializing the mapping
    #[error("failed to serialize mapping: {details}")]
    Serialization {
        /// Serialization error details
        details: String,
    },

    /// Error occurred while persisting the mapping to disk
    #[error("failed to persist store to '{path}': {details}")]
    Persistence {
        /// Path where persistence failed
        path: PathBuf,
        /// Error details from the persistence operation
        details: String,
    },

    /// `unwatch` did not match exactly one registered listener
    #[error("listener not found for prefix '{prefix}' and keys {keys:?} ({removed} removed)")]
    ListenerNotFound {
        /// Prefix passed to `unwatch`
        prefix: String,
        /// Unprefixed keys passed to `unwatch`
        keys: Vec<String>,
        /// Number of listeners that matched and were removed
        removed: usize,
    },

    /// Host settings could not be read or parsed
    #[error("invalid store settings in '{path}': {details}")]
    Settings {
        /// Path of the settings file
        path: PathBuf,
        /// Error details
        details: String,
    },
}

/// A specialized `Result` type for store operations.
pub type Result<T> = result::Result<T, StoreError>;

impl StoreError {
    /// Whether this error comes from accessing the backing file.
    ///
    /// These are the failures surfaced verbatim through `read`, `write`
    /// and `remove`.
    pub fn is_access_error(&self) -> bool {
        matches!(
            self,
            StoreError::NoTarget
                | StoreError::Io { .. }
                | StoreError::Parse { .. }
                | StoreError::Serialization { .. }
                | StoreError::Persistence { .. }
        )
    }
}
