use std::{path::PathBuf, sync::Arc};

use tracing::{debug, info, instrument};

use crate::config::{SettingsApplier, SettingsHost, StoreSettings};

use super::{
    FileAccessor, JsonFormat, ListenerCallback, MappingFormat, Properties, Result, StoreError,
    Subscription,
    keys::{full_key, local_key},
    listeners::ListenerRegistry,
};

/// A namespaced key-value store persisted to a single JSON file.
///
/// Keys are addressed as `(prefix, key)` pairs and stored as `prefix.key`.
/// Every operation reloads the file, so separate stores (or processes) that
/// share a file see each other's saved state. Clones share the listener
/// registry and the file target.
#[derive(Clone)]
pub struct JsonFileStore {
    accessor: FileAccessor,
    listeners: ListenerRegistry,
}

impl JsonFileStore {
    /// Creates a store targeting `filename` with the default JSON encoding.
    pub fn new(filename: Option<PathBuf>) -> Self {
        Self::with_format(filename, Arc::new(JsonFormat::default()))
    }

    /// Creates a store targeting `filename` with a custom mapping encoding.
    pub fn with_format(filename: Option<PathBuf>, format: Arc<dyn MappingFormat>) -> Self {
        Self {
            accessor: FileAccessor::new(filename, format),
            listeners: ListenerRegistry::default(),
        }
    }

    /// Hands the current settings to the host along with an applier for
    /// replacement settings.
    ///
    /// The host may apply fresh settings right away or keep the applier and
    /// reconfigure the store later; this is the only way the file target
    /// changes after construction.
    ///
    /// # Errors
    /// Returns whatever error the host reports while delivering settings.
    #[instrument(skip(self, host))]
    pub fn init(&self, host: &dyn SettingsHost) -> Result<()> {
        let applier = SettingsApplier::new(self.accessor.shared_target());
        host.deliver(self.settings(), applier)?;

        info!(target_file = ?self.accessor.target(), "Store initialized");
        Ok(())
    }

    /// Returns the settings currently in effect.
    pub fn settings(&self) -> StoreSettings {
        StoreSettings {
            filename: self.accessor.target(),
        }
    }

    /// Returns the accessor used for loading and saving the mapping.
    pub fn accessor(&self) -> &FileAccessor {
        &self.accessor
    }

    /// Removes every listener.
    pub fn dispose(&self) {
        self.unwatch_all();
    }

    /// Reads `keys` under `prefix`.
    ///
    /// The result is keyed by the unprefixed names; keys that are not stored
    /// map to `None`.
    ///
    /// # Errors
    /// Returns an access error if the backing file cannot be read or parsed.
    #[instrument(skip(self, keys), fields(keys = keys.len()))]
    pub async fn read<S: AsRef<str>>(&self, prefix: &str, keys: &[S]) -> Result<Properties> {
        let mapping = self.accessor.load().await?;

        Ok(keys
            .iter()
            .map(|key| {
                let key = key.as_ref();
                (key.to_string(), mapping.get(&full_key(prefix, key)).cloned())
            })
            .collect())
    }

    /// Reads a single key under `prefix`.
    ///
    /// # Errors
    /// Returns an access error if the backing file cannot be read or parsed.
    pub async fn get(&self, prefix: &str, key: &str) -> Result<Option<serde_json::Value>> {
        let mut values = self.read(prefix, &[key]).await?;
        Ok(values.remove(key).flatten())
    }

    /// Lists the unprefixed keys stored under `prefix`, sorted.
    ///
    /// # Errors
    /// Returns an access error if the backing file cannot be read or parsed.
    pub async fn keys(&self, prefix: &str) -> Result<Vec<String>> {
        let mapping = self.accessor.load().await?;

        let mut keys: Vec<String> = mapping
            .keys()
            .filter_map(|full| local_key(prefix, full))
            .map(str::to_string)
            .collect();
        keys.sort();

        Ok(keys)
    }

    /// Writes a batch of properties under `prefix` and notifies listeners.
    ///
    /// `Some(value)` sets a key and `None` deletes it. The whole batch is
    /// applied in one load-modify-save cycle against the target resolved at
    /// load time; if that fails nothing is notified.
    ///
    /// # Errors
    /// Returns an access error if the backing file cannot be read, parsed or
    /// written.
    #[instrument(skip(self, properties), fields(properties = properties.len()))]
    pub async fn write(&self, prefix: &str, properties: Properties) -> Result<()> {
        let (path, mut mapping) = self.accessor.load_current().await?;

        for (key, value) in &properties {
            let full = full_key(prefix, key);
            match value {
                Some(value) => {
                    mapping.insert(full, value.clone());
                }
                None => {
                    mapping.remove(&full);
                }
            }
        }

        self.accessor.save_to(&path, &mapping).await?;

        let notified = self.notify_change(prefix, &properties);
        debug!("Write persisted, {notified} listener(s) notified");
        Ok(())
    }

    /// Sets a single key under `prefix`.
    ///
    /// # Errors
    /// Returns an access error if the backing file cannot be read, parsed or
    /// written.
    pub async fn set(&self, prefix: &str, key: &str, value: serde_json::Value) -> Result<()> {
        self.write(prefix, Properties::from([(key.to_string(), Some(value))]))
            .await
    }

    /// Removes `keys` under `prefix`. Keys that are not stored are ignored.
    ///
    /// # Errors
    /// Returns an access error if the backing file cannot be read, parsed or
    /// written.
    pub async fn remove<S: AsRef<str>>(&self, prefix: &str, keys: &[S]) -> Result<()> {
        let properties = keys
            .iter()
            .map(|key| (key.as_ref().to_string(), None))
            .collect();

        self.write(prefix, properties).await
    }

    /// Registers `callback` for changes to `keys` under `prefix`.
    pub fn watch<S: AsRef<str>>(&self, prefix: &str, keys: &[S], callback: ListenerCallback) {
        debug!(prefix, keys = keys.len(), "Registering listener");
        self.listeners.add(prefix, keys, callback);
    }

    /// Registers a channel-backed listener for `keys` under `prefix`.
    ///
    /// The listener is removed when the returned subscription is dropped.
    pub fn subscribe<S: AsRef<str>>(&self, prefix: &str, keys: &[S]) -> Subscription {
        Subscription::register(&self.listeners, prefix, keys)
    }

    /// Removes the listener registered with exactly this callback and key set.
    ///
    /// Key order is irrelevant but the set must match the watched set
    /// exactly; a subset or superset does not match.
    ///
    /// # Errors
    /// Returns `StoreError::ListenerNotFound` if the number of removed
    /// listeners is not exactly one. Any matching listeners are still removed.
    #[instrument(skip(self, keys, callback))]
    pub fn unwatch<S: AsRef<str>>(
        &self,
        prefix: &str,
        keys: &[S],
        callback: &ListenerCallback,
    ) -> Result<()> {
        let removed = self.listeners.remove_exact(prefix, keys, callback.id());

        if removed != 1 {
            return Err(StoreError::ListenerNotFound {
                prefix: prefix.to_string(),
                keys: keys.iter().map(|k| k.as_ref().to_string()).collect(),
                removed,
            });
        }

        Ok(())
    }

    /// Removal by prefix alone is not supported; this leaves every listener
    /// in place.
    pub fn unwatch_prefix(&self, prefix: &str, callback: &ListenerCallback) {
        debug!(prefix, ?callback, "Unwatch by prefix is not supported, ignoring");
    }

    /// Removes every listener.
    pub fn unwatch_all(&self) {
        let removed = self.listeners.clear();
        debug!("Removed {removed} listener(s)");
    }

    /// Number of registered listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Invokes every listener watching a key of `properties`, in
    /// registration order, with only the keys it watches.
    ///
    /// Returns the number of listeners invoked.
    pub fn notify_change(&self, prefix: &str, properties: &Properties) -> usize {
        self.listeners.dispatch(prefix, properties)
    }
}
