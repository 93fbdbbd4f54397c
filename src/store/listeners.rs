use std::{
    collections::{HashMap, HashSet},
    fmt,
    sync::{
        Arc, PoisonError, RwLock,
        atomic::{AtomicUsize, Ordering},
    },
};

use super::{
    Properties,
    keys::{full_key, prefixed_keys},
};

static NEXT_CALLBACK_ID: AtomicUsize = AtomicUsize::new(1);

/// A change callback with a stable identity.
///
/// Clones share the identity of the original, so the same handle passed to
/// `watch` can later be passed to `unwatch`. Two handles built from
/// separate `new` calls never compare equal, even around the same closure.
#[derive(Clone)]
pub struct ListenerCallback {
    id: usize,
    f: Arc<dyn Fn(&Properties) + Send + Sync>,
}

impl ListenerCallback {
    /// Wraps a closure receiving the changed keys (unprefixed) and their new values.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&Properties) + Send + Sync + 'static,
    {
        Self {
            id: NEXT_CALLBACK_ID.fetch_add(1, Ordering::Relaxed),
            f: Arc::new(f),
        }
    }

    /// Invokes the callback.
    pub fn call(&self, changes: &Properties) {
        (self.f)(changes)
    }

    pub(super) fn id(&self) -> usize {
        self.id
    }
}

impl PartialEq for ListenerCallback {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ListenerCallback {}

impl fmt::Debug for ListenerCallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerCallback")
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}

/// A registered callback and the prefixed keys it watches.
struct Listener {
    watched: HashSet<String>,
    /// Prefixed key -> key as passed to `watch`
    originals: HashMap<String, String>,
    callback: ListenerCallback,
}

impl Listener {
    /// Picks the watched subset of `properties`, keyed by the original key names.
    fn matching(&self, prefix: &str, properties: &Properties) -> Option<Properties> {
        let mut changes = Properties::new();

        for (key, value) in properties {
            let full = full_key(prefix, key);
            if !self.watched.contains(&full) {
                continue;
            }

            let original = self
                .originals
                .get(&full)
                .cloned()
                .unwrap_or_else(|| key.clone());
            changes.insert(original, value.clone());
        }

        (!changes.is_empty()).then_some(changes)
    }
}

/// Ordered list of listeners, scanned linearly on every notification.
#[derive(Clone, Default)]
pub(super) struct ListenerRegistry {
    listeners: Arc<RwLock<Vec<Listener>>>,
}

impl ListenerRegistry {
    pub(super) fn add<S: AsRef<str>>(&self, prefix: &str, keys: &[S], callback: ListenerCallback) {
        let (watched, originals) = prefixed_keys(prefix, keys);

        self.listeners
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Listener {
                watched,
                originals,
                callback,
            });
    }

    /// Removes listeners with this callback id whose watched set equals the
    /// prefixed `keys` exactly, returning how many were removed.
    pub(super) fn remove_exact<S: AsRef<str>>(
        &self,
        prefix: &str,
        keys: &[S],
        callback_id: usize,
    ) -> usize {
        let (wanted, _) = prefixed_keys(prefix, keys);
        let mut listeners = self.listeners.write().unwrap_or_else(PoisonError::into_inner);

        let before = listeners.len();
        listeners.retain(|listener| {
            !(listener.callback.id() == callback_id && listener.watched == wanted)
        });

        before - listeners.len()
    }

    pub(super) fn clear(&self) -> usize {
        let mut listeners = self.listeners.write().unwrap_or_else(PoisonError::into_inner);
        let removed = listeners.len();
        listeners.clear();
        removed
    }

    pub(super) fn len(&self) -> usize {
        self.listeners
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Invokes every listener watching at least one key of `properties`, in
    /// registration order, returning how many were invoked.
    ///
    /// Matches are collected first and the lock released before any callback
    /// runs, so callbacks may watch or unwatch.
    pub(super) fn dispatch(&self, prefix: &str, properties: &Properties) -> usize {
        let pending: Vec<(ListenerCallback, Properties)> = self
            .listeners
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter_map(|listener| {
                listener
                    .matching(prefix, properties)
                    .map(|changes| (listener.callback.clone(), changes))
            })
            .collect();

        for (callback, changes) in &pending {
            callback.call(changes);
        }

        pending.len()
    }
}
