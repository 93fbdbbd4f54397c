//! Unit tests for CLI module
//!
//! Tests command registry, formatting, and command execution against a
//! temporary store.

#![allow(clippy::unwrap_used)]

use std::{sync::Arc, time::Duration};

use serde_json::{Value, json};
use tempfile::TempDir;

use crate::{
    cli::{
        CliError, CliService, CommandRegistry, SetCommand, WatchCommand,
        formatting::{format_command_list, format_json_value},
    },
    store::JsonFileStore,
};

fn args(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

fn temp_service() -> (TempDir, JsonFileStore, CliService) {
    let dir = TempDir::new().unwrap();
    let store = JsonFileStore::new(Some(dir.path().join("store.json")));
    let service = CliService::new(store.clone());
    (dir, store, service)
}

#[test]
fn format_json_value_scalars() {
    assert_eq!(format_json_value(Some(&json!("hello world"))), "\"hello world\"");
    assert_eq!(format_json_value(Some(&json!(42))), "42");
    assert_eq!(format_json_value(Some(&json!(-2.5))), "-2.5");
    assert_eq!(format_json_value(Some(&json!(true))), "true");
    assert_eq!(format_json_value(Some(&Value::Null)), "null");
}

#[test]
fn format_json_value_compound() {
    assert_eq!(format_json_value(Some(&json!([1, "a"]))), "[1,\"a\"]");
    assert_eq!(format_json_value(Some(&json!({"k": 1}))), "{\"k\":1}");
}

#[test]
fn format_json_value_unset() {
    assert_eq!(format_json_value(None), "<unset>");
}

#[test]
fn set_parses_json_or_falls_back_to_string() {
    assert_eq!(SetCommand::parse_value("30"), json!(30));
    assert_eq!(SetCommand::parse_value("true"), json!(true));
    assert_eq!(SetCommand::parse_value("[1,2]"), json!([1, 2]));
    assert_eq!(SetCommand::parse_value("\"quoted\""), json!("quoted"));
    assert_eq!(SetCommand::parse_value("dark"), json!("dark"));
}

#[test]
fn command_registry_starts_empty() {
    let store = Arc::new(JsonFileStore::new(None));
    let registry = CommandRegistry::new(store);

    assert!(registry.list_commands().is_empty());
}

#[test]
fn service_lists_store_commands() {
    let (_dir, _store, service) = temp_service();

    assert_eq!(
        service.list_all(),
        vec![(
            "store".to_string(),
            args(&["get", "keys", "remove", "set", "watch"])
        )]
    );

    let help = format_command_list(&service.list_all());
    assert!(help.contains("jsonstore store get"));
}

#[tokio::test]
async fn unknown_category_is_not_found() {
    let (_dir, _store, service) = temp_service();

    let err = service.execute_command("panel", "get", &[]).await.unwrap_err();
    assert!(matches!(err, CliError::CommandNotFound(_)));
}

#[tokio::test]
async fn wrong_argument_count_is_rejected() {
    let (_dir, _store, service) = temp_service();

    let err = service
        .execute_command("store", "get", &args(&["ui"]))
        .await
        .unwrap_err();
    assert!(matches!(err, CliError::InvalidArguments(_)));

    let err = service
        .execute_command("store", "keys", &args(&["ui", "extra"]))
        .await
        .unwrap_err();
    assert!(matches!(err, CliError::InvalidArguments(_)));
}

#[tokio::test]
async fn set_get_remove_round_trip() {
    let (_dir, store, service) = temp_service();

    service
        .execute_command("store", "set", &args(&["ui", "theme", "dark"]))
        .await
        .unwrap();
    assert_eq!(store.get("ui", "theme").await.unwrap(), Some(json!("dark")));

    let output = service
        .execute_command("store", "get", &args(&["ui", "theme"]))
        .await
        .unwrap();
    assert_eq!(output, "theme: \"dark\"");

    service
        .execute_command("store", "remove", &args(&["ui", "theme"]))
        .await
        .unwrap();
    let output = service
        .execute_command("store", "get", &args(&["ui", "theme"]))
        .await
        .unwrap();
    assert_eq!(output, "theme: <unset>");
}

#[tokio::test]
async fn keys_lists_prefix_entries() {
    let (_dir, store, service) = temp_service();
    store.set("ui", "theme", json!("dark")).await.unwrap();
    store.set("ui", "font", json!("mono")).await.unwrap();

    let output = service
        .execute_command("store", "keys", &args(&["ui"]))
        .await
        .unwrap();
    assert_eq!(output, "font\ntheme");

    let output = service
        .execute_command("store", "keys", &args(&["net"]))
        .await
        .unwrap();
    assert_eq!(output, "No keys stored under 'net'");
}

#[tokio::test]
async fn store_failures_surface_as_store_errors() {
    let service = CliService::new(JsonFileStore::new(None));

    let err = service
        .execute_command("store", "get", &args(&["ui", "theme"]))
        .await
        .unwrap_err();
    assert!(matches!(err, CliError::StoreError(_)));
}

#[test]
fn watch_parses_key_lists_and_counts() {
    assert_eq!(WatchCommand::parse_keys("theme, font,").unwrap(), vec!["theme", "font"]);
    assert!(matches!(
        WatchCommand::parse_keys(" , "),
        Err(CliError::InvalidArguments(_))
    ));

    assert_eq!(WatchCommand::parse_count("3").unwrap(), 3);
    assert!(matches!(
        WatchCommand::parse_count("0"),
        Err(CliError::InvalidArguments(_))
    ));
    assert!(matches!(
        WatchCommand::parse_count("soon"),
        Err(CliError::InvalidArguments(_))
    ));
}

#[tokio::test]
async fn watch_ends_after_requested_changes() {
    let (_dir, store, service) = temp_service();
    let service = Arc::new(service);

    let watcher = {
        let service = Arc::clone(&service);
        tokio::spawn(async move {
            service
                .execute_command("store", "watch", &args(&["ui", "theme,font", "2"]))
                .await
        })
    };

    while store.listener_count() == 0 {
        tokio::time::sleep(Duration::from_millis(5)).await;
    }

    store.set("ui", "other", json!(0)).await.unwrap();
    store.set("ui", "theme", json!("dark")).await.unwrap();
    store.set("ui", "font", json!("mono")).await.unwrap();

    let output = tokio::time::timeout(Duration::from_secs(5), watcher)
        .await
        .unwrap()
        .unwrap()
        .unwrap();
    assert_eq!(output, "Watch ended after 2 change(s)");
    assert_eq!(store.listener_count(), 0);
}
