//! jsonfile-store - Namespaced configuration store backed by a JSON file.
//!
//! Entries are addressed by a namespace prefix and a key, persisted as
//! `prefix.key` in a single JSON object. The main features include:
//!
//! - Read/write/remove of `(prefix, key)` entries, reloaded from disk on every access
//! - Change notification for watched keys
//! - Runtime replacement of the backing file through a settings host
//! - CLI interface for inspecting and editing the store
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use jsonfile_store::store::{JsonFileStore, ListenerCallback};
//! use serde_json::json;
//!
//! # async fn run() -> jsonfile_store::Result<()> {
//! let store = JsonFileStore::new(Some("settings.json".into()));
//!
//! store.watch("ui", &["theme"], ListenerCallback::new(|changes| {
//!     println!("ui changed: {changes:?}");
//! }));
//!
//! store.set("ui", "theme", json!("dark")).await?;
//! let theme = store.get("ui", "theme").await?;
//! # Ok(())
//! # }
//! ```

/// Command-line interface for the store.
pub mod cli;

/// Store settings and the host configuration hook.
pub mod config;

/// Namespaced key-value store with change notification.
pub mod store;

/// Tracing subscriber setup.
pub mod tracing_config;

/// Re-exported core types for convenience.
pub use store::{Result, StoreError};
