//! Unit tests for config module
//!
//! Tests settings parsing and the settings hosts.

#![allow(clippy::unwrap_used)]

use std::{fs, path::Path};

use tempfile::TempDir;

use crate::{
    config::{FixedSettings, StoreSettings, TomlSettingsHost},
    store::{JsonFileStore, StoreError},
};

#[test]
fn settings_default_has_no_file() {
    assert_eq!(StoreSettings::default().filename, None);
}

#[test]
fn settings_parse_store_table() {
    let settings = StoreSettings::from_toml_str(
        r#"
        [store]
        filename = "/var/lib/app/store.json"
        "#,
        Path::new("settings.toml"),
        None,
    )
    .unwrap();

    assert_eq!(
        settings,
        StoreSettings::with_filename("/var/lib/app/store.json")
    );
}

#[test]
fn settings_without_store_table_are_empty() {
    let settings = StoreSettings::from_toml_str("", Path::new("settings.toml"), None).unwrap();
    assert_eq!(settings, StoreSettings::default());
}

#[test]
fn settings_resolve_relative_filename() {
    let settings = StoreSettings::from_toml_str(
        "[store]\nfilename = \"data/store.json\"\n",
        Path::new("/etc/app/settings.toml"),
        Some(Path::new("/etc/app")),
    )
    .unwrap();

    assert_eq!(
        settings.filename.as_deref(),
        Some(Path::new("/etc/app/data/store.json"))
    );
}

#[test]
fn settings_reject_invalid_toml() {
    let result = StoreSettings::from_toml_str(
        "[store\nfilename = 1",
        Path::new("settings.toml"),
        None,
    );

    assert!(matches!(result, Err(StoreError::Settings { .. })));
}

#[test]
fn settings_load_missing_file_is_none() {
    let dir = TempDir::new().unwrap();
    let loaded = StoreSettings::load(&dir.path().join("missing.toml")).unwrap();
    assert!(loaded.is_none());
}

#[test]
fn fixed_settings_replace_target() {
    let store = JsonFileStore::new(Some("/tmp/original.json".into()));
    store
        .init(&FixedSettings(StoreSettings::with_filename("/tmp/fresh.json")))
        .unwrap();

    assert_eq!(
        store.settings(),
        StoreSettings::with_filename("/tmp/fresh.json")
    );
}

#[test]
fn toml_host_keeps_target_without_settings_file() {
    let dir = TempDir::new().unwrap();
    let host = TomlSettingsHost::new(dir.path().join("settings.toml"));
    let store = JsonFileStore::new(Some(dir.path().join("default.json")));

    store.init(&host).unwrap();

    assert_eq!(
        store.settings().filename,
        Some(dir.path().join("default.json"))
    );
}

#[test]
fn toml_host_reload_before_init_does_nothing() {
    let dir = TempDir::new().unwrap();
    let host = TomlSettingsHost::new(dir.path().join("settings.toml"));

    assert!(!host.reload().unwrap());
}

#[test]
fn toml_host_reload_switches_target() {
    let dir = TempDir::new().unwrap();
    let settings_path = dir.path().join("settings.toml");
    fs::write(&settings_path, "[store]\nfilename = \"first.json\"\n").unwrap();

    let host = TomlSettingsHost::new(&settings_path);
    let store = JsonFileStore::new(None);
    store.init(&host).unwrap();
    assert_eq!(store.settings().filename, Some(dir.path().join("first.json")));

    fs::write(&settings_path, "[store]\nfilename = \"second.json\"\n").unwrap();
    assert!(host.reload().unwrap());
    assert_eq!(
        store.settings().filename,
        Some(dir.path().join("second.json"))
    );
}

#[test]
fn toml_host_reload_keeps_target_on_bad_settings() {
    let dir = TempDir::new().unwrap();
    let settings_path = dir.path().join("settings.toml");
    fs::write(&settings_path, "[store]\nfilename = \"first.json\"\n").unwrap();

    let host = TomlSettingsHost::new(&settings_path);
    let store = JsonFileStore::new(None);
    store.init(&host).unwrap();

    fs::write(&settings_path, "not = [valid").unwrap();
    assert!(host.reload().is_err());
    assert_eq!(store.settings().filename, Some(dir.path().join("first.json")));
}
