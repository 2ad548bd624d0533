use knowledge_sync::load_config::{load_config, API_KEY_ENV};
use knowledge_sync_core::config::{
    DEFAULT_API_URL, DEFAULT_ARCHIVE_URL, DEFAULT_COLLECTION_DESCRIPTION, DEFAULT_COLLECTION_NAME,
};
use serial_test::serial;
use std::fs::write;
use std::path::PathBuf;
use tempfile::NamedTempFile;

fn yaml_file(content: &str) -> NamedTempFile {
    let file = NamedTempFile::new().expect("Creating temp config file failed");
    write(file.path(), content).expect("Writing temp config failed");
    file
}

#[test]
#[serial]
fn test_defaults_apply_without_config_file() {
    std::env::set_var(API_KEY_ENV, "sk-test");

    let config = load_config(None, DEFAULT_ARCHIVE_URL.to_string()).expect("should load");

    assert_eq!(config.api.base_url, DEFAULT_API_URL);
    assert_eq!(config.api.api_key, "sk-test");
    assert_eq!(config.collection.name, DEFAULT_COLLECTION_NAME);
    assert_eq!(config.collection.description, DEFAULT_COLLECTION_DESCRIPTION);
    assert_eq!(config.archive_url, DEFAULT_ARCHIVE_URL);
    assert_eq!(config.work_dir, std::env::current_dir().unwrap());
}

#[test]
#[serial]
fn test_yaml_overrides_defaults() {
    std::env::set_var(API_KEY_ENV, "sk-test");
    let file = yaml_file(
        "api_url: https://chat.example.com/api/v1/\nwork_dir: /tmp/knowledge-run\ncollection:\n  name: Team Docs\n",
    );

    let config = load_config(Some(file.path()), "https://example.com/a.zip".into()).unwrap();

    assert_eq!(config.api.base_url, "https://chat.example.com/api/v1/");
    assert_eq!(config.work_dir, PathBuf::from("/tmp/knowledge-run"));
    assert_eq!(config.collection.name, "Team Docs");
    assert_eq!(config.collection.description, DEFAULT_COLLECTION_DESCRIPTION);
    assert_eq!(config.archive_url, "https://example.com/a.zip");
}

#[test]
#[serial]
fn test_missing_api_key_is_an_error() {
    std::env::remove_var(API_KEY_ENV);

    let err = load_config(None, DEFAULT_ARCHIVE_URL.to_string()).unwrap_err();
    assert!(err.to_string().contains(API_KEY_ENV), "got: {err}");
}

#[test]
#[serial]
fn test_api_key_in_yaml_is_rejected() {
    std::env::set_var(API_KEY_ENV, "sk-test");
    let file = yaml_file("api_key: sk-should-not-live-here\n");

    let err = load_config(Some(file.path()), DEFAULT_ARCHIVE_URL.to_string()).unwrap_err();
    assert!(err.to_string().contains("Failed to parse config YAML"));
}

#[test]
#[serial]
fn test_unreadable_config_path_is_an_error() {
    std::env::set_var(API_KEY_ENV, "sk-test");
    let missing = PathBuf::from("/definitely/not/here/knowledge-sync.yaml");

    let err = load_config(Some(&missing), DEFAULT_ARCHIVE_URL.to_string()).unwrap_err();
    assert!(err.to_string().contains("Failed to read config file"));
}
