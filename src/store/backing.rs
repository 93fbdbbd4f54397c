use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::{Arc, PoisonError, RwLock},
};

use serde_json::{Map, Value};
use tokio::fs;
use tracing::{debug, instrument};

use super::{Result, StoreError};

/// The full persisted state: prefixed key to value.
pub type Mapping = Map<String, Value>;

/// Shared, replaceable location of the backing file.
pub(crate) type SharedTarget = Arc<RwLock<Option<PathBuf>>>;

/// Reasons a document could not be decoded into a [`Mapping`].
#[derive(Debug, Clone, PartialEq)]
pub enum FormatError {
    /// The document ended before it was complete (including an empty document).
    Truncated,
    /// The document is malformed or is not a mapping of string keys.
    Malformed(String),
}

/// Encoding of a whole [`Mapping`] to and from file contents.
pub trait MappingFormat: Send + Sync {
    /// Decodes file contents into a mapping.
    ///
    /// # Errors
    /// Returns `FormatError::Truncated` for empty or prematurely ended
    /// documents and `FormatError::Malformed` for anything else unreadable.
    fn decode(&self, contents: &str) -> std::result::Result<Mapping, FormatError>;

    /// Encodes a mapping into file contents.
    ///
    /// # Errors
    /// Returns `FormatError::Malformed` if the mapping cannot be encoded.
    fn encode(&self, mapping: &Mapping) -> std::result::Result<String, FormatError>;
}

/// JSON encoding backed by serde_json.
#[derive(Debug, Clone)]
pub struct JsonFormat {
    /// Write indented JSON instead of a single line.
    pub pretty: bool,
}

impl Default for JsonFormat {
    fn default() -> Self {
        Self { pretty: true }
    }
}

impl MappingFormat for JsonFormat {
    fn decode(&self, contents: &str) -> std::result::Result<Mapping, FormatError> {
        if contents.trim().is_empty() {
            return Err(FormatError::Truncated);
        }

        match serde_json::from_str::<Value>(contents) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(other) => Err(FormatError::Malformed(format!(
                "expected an object at the top level, found {}",
                json_type_name(&other)
            ))),
            Err(e) if e.is_eof() => Err(FormatError::Truncated),
            Err(e) => Err(FormatError::Malformed(e.to_string())),
        }
    }

    fn encode(&self, mapping: &Mapping) -> std::result::Result<String, FormatError> {
        let encoded = if self.pretty {
            serde_json::to_string_pretty(mapping)
        } else {
            serde_json::to_string(mapping)
        };

        encoded
            .map(|mut s| {
                s.push('\n');
                s
            })
            .map_err(|e| FormatError::Malformed(e.to_string()))
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Loads and saves the whole mapping against the current file target.
///
/// Every call goes to disk; nothing is cached between calls. Saves rewrite
/// the file in place and are not atomic.
#[derive(Clone)]
pub struct FileAccessor {
    target: SharedTarget,
    format: Arc<dyn MappingFormat>,
}

impl FileAccessor {
    /// Creates an accessor for `target` using the given format.
    pub fn new(target: Option<PathBuf>, format: Arc<dyn MappingFormat>) -> Self {
        Self {
            target: Arc::new(RwLock::new(target)),
            format,
        }
    }

    /// Returns the current file target.
    pub fn target(&self) -> Option<PathBuf> {
        self.target
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replaces the file target used by subsequent loads and saves.
    ///
    /// Existing data is not carried over to the new target.
    pub fn set_target(&self, target: Option<PathBuf>) {
        *self.target.write().unwrap_or_else(PoisonError::into_inner) = target;
    }

    pub(crate) fn shared_target(&self) -> SharedTarget {
        Arc::clone(&self.target)
    }

    /// Reads and decodes the current file target.
    ///
    /// A missing file, an empty file and a truncated document all load as an
    /// empty mapping.
    ///
    /// # Errors
    /// * `StoreError::NoTarget` - If no file target is configured
    /// * `StoreError::Io` - If the file exists but cannot be read
    /// * `StoreError::Parse` - If the contents are not a valid mapping
    pub async fn load(&self) -> Result<Mapping> {
        self.load_current().await.map(|(_, mapping)| mapping)
    }

    /// Resolves the current file target once and loads it, returning the
    /// path alongside the mapping.
    ///
    /// A load-modify-save cycle must hand the returned path to
    /// [`save_to`](Self::save_to) so a target switch in between cannot carry
    /// this file's data into the new target.
    ///
    /// # Errors
    /// Same as [`load`](Self::load).
    pub async fn load_current(&self) -> Result<(PathBuf, Mapping)> {
        let path = self.target().ok_or(StoreError::NoTarget)?;
        let mapping = self.load_from(&path).await?;
        Ok((path, mapping))
    }

    /// Reads and decodes `path`, ignoring the configured target.
    ///
    /// # Errors
    /// * `StoreError::Io` - If the file exists but cannot be read
    /// * `StoreError::Parse` - If the contents are not a valid mapping
    #[instrument(skip(self))]
    pub async fn load_from(&self, path: &Path) -> Result<Mapping> {
        let read = fs::read_to_string(path).await;
        let contents = match read {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("Store file {} does not exist, using empty mapping", path.display());
                return Ok(Mapping::new());
            }
            Err(e) => {
                return Err(StoreError::Io {
                    path: path.to_path_buf(),
                    details: e.to_string(),
                });
            }
        };

        match self.format.decode(&contents) {
            Ok(mapping) => Ok(mapping),
            Err(FormatError::Truncated) => {
                debug!("Store file {} is empty or truncated, using empty mapping", path.display());
                Ok(Mapping::new())
            }
            Err(FormatError::Malformed(details)) => Err(StoreError::Parse {
                path: path.to_path_buf(),
                details,
            }),
        }
    }

    /// Encodes `mapping` and writes it over the current file target.
    ///
    /// # Errors
    /// * `StoreError::NoTarget` - If no file target is configured
    /// * `StoreError::Serialization` - If the mapping cannot be encoded
    /// * `StoreError::Persistence` - If the file cannot be written
    pub async fn save(&self, mapping: &Mapping) -> Result<()> {
        let path = self.target().ok_or(StoreError::NoTarget)?;
        self.save_to(&path, mapping).await
    }

    /// Encodes `mapping` and writes it over `path`, ignoring the configured
    /// target.
    ///
    /// # Errors
    /// * `StoreError::Serialization` - If the mapping cannot be encoded
    /// * `StoreError::Persistence` - If the file cannot be written
    #[instrument(skip(self, mapping), fields(entries = mapping.len()))]
    pub async fn save_to(&self, path: &Path, mapping: &Mapping) -> Result<()> {
        let contents = self.format.encode(mapping).map_err(|e| match e {
            FormatError::Truncated => StoreError::Serialization {
                details: "encoder produced a truncated document".to_string(),
            },
            FormatError::Malformed(details) => StoreError::Serialization { details },
        })?;

        if let Err(e) = fs::write(path, contents).await {
            return Err(StoreError::Persistence {
                path: path.to_path_buf(),
                details: e.to_string(),
            });
        }

        Ok(())
    }
}
