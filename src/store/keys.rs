use std::collections::{HashMap, HashSet};

/// Separator between a namespace prefix and a local key.
pub const SEPARATOR: char = '.';

/// Joins a namespace prefix and a local key into the key stored on disk
///
/// # Examples
/// * `("ui", "theme")` becomes `"ui.theme"`
/// * `("modules.clock", "format")` becomes `"modules.clock.format"`
pub fn full_key(prefix: &str, key: &str) -> String {
    format!("{prefix}{SEPARATOR}{key}")
}

/// Returns the local key if `full` lives directly under `prefix`
///
/// # Examples
/// * `("ui", "ui.theme")` gives `Some("theme")`
/// * `("ui", "uix.theme")` gives `None`
pub fn local_key<'a>(prefix: &str, full: &'a str) -> Option<&'a str> {
    full.strip_prefix(prefix)?.strip_prefix(SEPARATOR)
}

/// Builds the prefixed key set together with its reverse lookup
///
/// # Returns
/// A tuple of (prefixed keys, prefixed key -> original key)
pub(super) fn prefixed_keys<S: AsRef<str>>(
    prefix: &str,
    keys: &[S],
) -> (HashSet<String>, HashMap<String, String>) {
    let mut watched = HashSet::with_capacity(keys.len());
    let mut originals = HashMap::with_capacity(keys.len());

    for key in keys {
        let key = key.as_ref();
        let full = full_key(prefix, key);
        watched.insert(full.clone());
        originals.insert(full, key.to_string());
    }

    (watched, originals)
}
