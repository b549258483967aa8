//! # Configuration Tests
//!
//! Defaults, partial JSON documents and file loading.

use std::io::Write;
use std::path::{Path, PathBuf};

use sicsim_core::SimError;
use sicsim_core::config::*;

#[test]
fn test_config_default() {
    let config = Config::default();
    assert!(!config.general.trace_instructions);
    assert_eq!(config.general.max_steps, None);
    assert_eq!(config.devices.directory, PathBuf::from("./device"));
    assert_eq!(config.devices.extension, "device");
    assert!(config.catalog.path.is_none());
}

#[test]
fn test_empty_document_uses_defaults() {
    let config = Config::from_json_str("{}").unwrap();
    assert_eq!(config.devices.extension, "device");
    assert_eq!(config.general.max_steps, None);
}

#[test]
fn test_partial_sections_keep_remaining_defaults() {
    let config = Config::from_json_str(r#"{ "devices": { "extension": "dev" } }"#).unwrap();
    assert_eq!(config.devices.extension, "dev");
    assert_eq!(config.devices.directory, PathBuf::from("./device"));
}

#[test]
fn test_catalog_path() {
    let config = Config::from_json_str(r#"{ "catalog": { "path": "ops.data" } }"#).unwrap();
    assert_eq!(config.catalog.path.as_deref(), Some(Path::new("ops.data")));
}

#[test]
fn test_invalid_json_is_config_error() {
    let err = Config::from_json_str(r#"{ "general": { "max_steps": "many" } }"#).unwrap_err();
    assert!(matches!(err, SimError::Config(_)));
}

#[test]
fn test_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, r#"{{ "general": {{ "trace_instructions": true }} }}"#).unwrap();
    let config = Config::from_file(file.path()).unwrap();
    assert!(config.general.trace_instructions);
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("absent.json");
    match Config::from_file(&missing) {
        Err(SimError::Io { path, .. }) => assert_eq!(path, missing),
        other => panic!("expected Io error, got {other:?}"),
    }
}
