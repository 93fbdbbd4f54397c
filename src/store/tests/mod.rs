//! Unit tests for store module

#![allow(clippy::unwrap_used)]


use std::{
    path::PathBuf,
    sync::{Arc, Mutex, OnceLock, PoisonError},
    time::Duration,
};

use serde_json::json;
use tempfile::TempDir;

use crate::store::{
    FormatError, JsonFileStore, JsonFormat, ListenerCallback, Mapping, MappingFormat, Properties,
    SharedTarget, StoreError,
};

fn temp_store() -> (TempDir, JsonFileStore) {
    let dir = TempDir::new().unwrap();
    let store = JsonFileStore::new(Some(dir.path().join("store.json")));
    (dir, store)
}

fn recorder() -> (ListenerCallback, Arc<Mutex<Vec<Properties>>>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let callback = ListenerCallback::new(move |changes| {
        sink.lock().unwrap().push(changes.clone());
    });
    (callback, seen)
}

#[test]
fn store_error_access_classification() {
    assert!(StoreError::NoTarget.is_access_error());
    assert!(
        StoreError::Parse {
            path: "x.json".into(),
            details: "bad".to_string(),
        }
        .is_access_error()
    );
    assert!(
        !StoreError::ListenerNotFound {
            prefix: "p".to_string(),
            keys: vec![],
            removed: 0,
        }
        .is_access_error()
    );
}

#[test]
fn watch_and_unwatch_track_listener_count() {
    let (_dir, store) = temp_store();
    let callback = ListenerCallback::new(|_| {});

    store.watch("app", &["a"], callback.clone());
    store.watch("app", &["b"], callback.clone());
    assert_eq!(store.listener_count(), 2);

    store.unwatch("app", &["a"], &callback).unwrap();
    assert_eq!(store.listener_count(), 1);
}

#[test]
fn unwatch_unknown_listener_fails() {
    let (_dir, store) = temp_store();
    let callback = ListenerCallback::new(|_| {});
    store.watch("app", &["a", "b"], callback.clone());

    let err = store.unwatch("app", &["a"], &callback).unwrap_err();
    assert!(matches!(
        err,
        StoreError::ListenerNotFound { removed: 0, .. }
    ));
    assert_eq!(store.listener_count(), 1);
}

#[test]
fn unwatch_duplicate_registrations_reports_not_found() {
    let (_dir, store) = temp_store();
    let callback = ListenerCallback::new(|_| {});
    store.watch("app", &["a"], callback.clone());
    store.watch("app", &["a"], callback.clone());

    let err = store.unwatch("app", &["a"], &callback).unwrap_err();
    assert!(matches!(
        err,
        StoreError::ListenerNotFound { removed: 2, .. }
    ));
    assert_eq!(store.listener_count(), 0);
}

#[test]
fn unwatch_prefix_leaves_listeners() {
    let (_dir, store) = temp_store();
    let callback = ListenerCallback::new(|_| {});
    store.watch("app", &["a"], callback.clone());

    store.unwatch_prefix("app", &callback);
    assert_eq!(store.listener_count(), 1);
}

#[test]
fn dispose_clears_every_listener() {
    let (_dir, store) = temp_store();
    store.watch("app", &["a"], ListenerCallback::new(|_| {}));
    store.watch("other", &["b"], ListenerCallback::new(|_| {}));

    store.dispose();
    assert_eq!(store.listener_count(), 0);
}

#[test]
fn notify_change_fires_in_registration_order() {
    let (_dir, store) = temp_store();
    let order = Arc::new(Mutex::new(Vec::new()));

    for id in 0..3 {
        let order = Arc::clone(&order);
        store.watch(
            "app",
            &["k"],
            ListenerCallback::new(move |_| order.lock().unwrap().push(id)),
        );
    }

    let properties = Properties::from([("k".to_string(), Some(json!(1)))]);
    assert_eq!(store.notify_change("app", &properties), 3);
    assert_eq!(*order.lock().unwrap(), vec![0, 1, 2]);
}

#[test]
fn clones_share_listeners() {
    let (_dir, store) = temp_store();
    let (callback, seen) = recorder();
    store.clone().watch("app", &["k"], callback);

    let properties = Properties::from([("k".to_string(), None)]);
    store.notify_change("app", &properties);

    assert_eq!(seen.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn read_without_target_is_access_error() {
    let store = JsonFileStore::new(None);

    let err = store.read("app", &["k"]).await.unwrap_err();
    assert!(matches!(err, StoreError::NoTarget));
    assert!(err.is_access_error());
}

#[tokio::test]
async fn failed_write_does_not_notify() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("store.json");
    std::fs::write(&path, "{ not json }").unwrap();

    let store = JsonFileStore::new(Some(path));
    let (callback, seen) = recorder();
    store.watch("app", &["k"], callback);

    let err = store.set("app", "k", json!(1)).await.unwrap_err();
    assert!(matches!(err, StoreError::Parse { .. }));
    assert!(seen.lock().unwrap().is_empty());
}

#[tokio::test]
async fn keys_lists_only_prefix() {
    let (_dir, store) = temp_store();
    store.set("app", "b", json!(2)).await.unwrap();
    store.set("app", "a", json!(1)).await.unwrap();
    store.set("application", "c", json!(3)).await.unwrap();

    assert_eq!(store.keys("app").await.unwrap(), vec!["a", "b"]);
}

#[tokio::test]
async fn subscription_receives_watched_changes() {
    let (_dir, store) = temp_store();
    let mut subscription = store.subscribe("app", &["a", "b"]);

    store.set("app", "c", json!("ignored")).await.unwrap();
    store.set("app", "b", json!("hello")).await.unwrap();

    let changes = subscription.recv().await.unwrap();
    assert_eq!(changes, Properties::from([("b".to_string(), Some(json!("hello")))]));
    let next = tokio::time::timeout(Duration::from_millis(50), subscription.recv()).await;
    assert!(next.is_err());
}

#[tokio::test]
async fn dropping_subscription_unregisters() {
    let (_dir, store) = temp_store();
    let subscription = store.subscribe("app", &["a"]);
    assert_eq!(store.listener_count(), 1);

    drop(subscription);
    assert_eq!(store.listener_count(), 0);
}

#[tokio::test]
async fn subscription_closes_on_dispose() {
    let (_dir, store) = temp_store();
    let mut subscription = store.subscribe("app", &["a"]);

    store.dispose();
    assert!(subscription.recv().await.is_none());
}

#[tokio::test]
async fn subscription_stream_yields_changes() {
    use futures::StreamExt;

    let (_dir, store) = temp_store();
    let stream = store.subscribe("app", &["a"]).into_stream();
    futures::pin_mut!(stream);

    store.remove("app", &["a"]).await.unwrap();

    let changes = stream.next().await.unwrap();
    assert_eq!(changes, Properties::from([("a".to_string(), None)]));
}

/// JSON format that switches the store's target the first time it decodes,
/// as a host reconfiguration landing between load and save would.
struct RetargetOnDecode {
    switch: OnceLock<(SharedTarget, PathBuf)>,
}

impl MappingFormat for RetargetOnDecode {
    fn decode(&self, contents: &str) -> Result<Mapping, FormatError> {
        if let Some((target, next)) = self.switch.get() {
            *target.write().unwrap_or_else(PoisonError::into_inner) = Some(next.clone());
        }
        JsonFormat::default().decode(contents)
    }

    fn encode(&self, mapping: &Mapping) -> Result<String, FormatError> {
        JsonFormat::default().encode(mapping)
    }
}

#[tokio::test]
async fn write_saves_to_target_it_loaded_from() {
    let dir = TempDir::new().unwrap();
    let old = dir.path().join("old.json");
    let new = dir.path().join("new.json");
    std::fs::write(&old, r#"{"secret.token": "abc"}"#).unwrap();

    let format = Arc::new(RetargetOnDecode {
        switch: OnceLock::new(),
    });
    let store = JsonFileStore::with_format(Some(old.clone()), format.clone());
    format
        .switch
        .set((store.accessor().shared_target(), new.clone()))
        .unwrap();

    store.set("app", "k", json!(1)).await.unwrap();

    assert!(!new.exists());
    let old_contents: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&old).unwrap()).unwrap();
    assert_eq!(old_contents, json!({"secret.token": "abc", "app.k": 1}));
    assert_eq!(store.settings().filename, Some(new));
}
