//! Namespaced key-value store backed by a single JSON file.
//!
//! Provides read/write/remove over `(prefix, key)` pairs, change
//! notification for watched keys, and a file target that the host can
//! replace at runtime.

mod backing;
mod error;
mod keys;
mod listeners;
#[allow(clippy::module_inception)]
mod store;
mod subscription;

#[cfg(test)]
mod tests;

use std::collections::BTreeMap;

use serde_json::Value;

pub use backing::{FileAccessor, FormatError, JsonFormat, Mapping, MappingFormat};
pub(crate) use backing::SharedTarget;
pub use error::{Result, StoreError};
pub use keys::{SEPARATOR, full_key, local_key};
pub use listeners::ListenerCallback;
pub use store::JsonFileStore;
pub use subscription::Subscription;

/// Unprefixed key to value, where `None` means the key is unset.
///
/// Used as the input of `write`, the output of `read`, and the payload
/// delivered to listeners.
pub type Properties = BTreeMap<String, Option<Value>>;
