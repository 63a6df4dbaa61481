//! Loading configuration files from disk.

use quiver_config::{ConfigError, ConfigLoader, LogFormat, QuiverConfig};
use std::fs;

#[test]
fn loads_toml_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("quiver.toml");
    fs::write(
        &path,
        r#"
        [http]
        base_path = "/api"

        [logging]
        level = "quiver_middleware=debug,info"
        service_name = "events"
        "#,
    )
    .unwrap();

    let loader = ConfigLoader::new().with_file(&path).unwrap();
    assert!(loader.file_loaded());

    let config = loader.load().unwrap();
    assert_eq!(config.http.base_path, "/api");
    assert_eq!(config.logging.service_name, "events");
    assert_eq!(config.docs.base_path, "/docs");
}

#[test]
fn loads_json_file_by_extension() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("quiver.JSON");
    fs::write(&path, r#"{"logging": {"format": "pretty"}}"#).unwrap();

    let config = ConfigLoader::new().with_file(&path).unwrap().load().unwrap();
    assert_eq!(config.logging.format, LogFormat::Pretty);
}

#[test]
fn rejects_unknown_extension() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("quiver.yaml");
    fs::write(&path, "http: {}").unwrap();

    let result = ConfigLoader::new().with_file(&path);
    assert!(matches!(result, Err(ConfigError::UnsupportedFormat { .. })));
}

#[test]
fn optional_file_loads_when_present() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("quiver.toml");
    fs::write(&path, "[docs]\nenabled = false\n").unwrap();

    let config = ConfigLoader::new()
        .with_optional_file(&path)
        .unwrap()
        .load()
        .unwrap();

    assert!(!config.docs.enabled);
}

#[test]
fn invalid_file_contents_fail_to_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("quiver.toml");
    fs::write(&path, "[http\nbase_path = ").unwrap();

    let result = ConfigLoader::new().with_file(&path);
    assert!(matches!(result, Err(ConfigError::TomlError(_))));
}

#[test]
fn file_round_trips_through_serialization() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("quiver.json");
    let original = QuiverConfig::development();
    fs::write(&path, serde_json::to_string_pretty(&original).unwrap()).unwrap();

    let config = ConfigLoader::new().with_file(&path).unwrap().load().unwrap();
    assert_eq!(config, original);
}
