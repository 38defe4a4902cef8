//! Integration tests for Settings loading and dataset files.
//!
//! These tests only use explicit config files in temp directories; the global
//! config (if any) sits below them in precedence and is overridden field by field.

use std::fs;

use tempfile::TempDir;

use foldertree::application::dataset::{load_records, sample_records, to_toml};
use foldertree::application::{ApplicationError, FolderService};
use foldertree::config::Settings;
use foldertree::domain::DomainError;

#[test]
fn given_local_config_when_load_then_overrides_fields() {
    // Arrange
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("foldertree.toml");
    fs::write(
        &config_path,
        r#"
data_file = "/srv/folders.toml"
workers = 3
"#,
    )
    .unwrap();

    // Act
    let settings = Settings::load(Some(&config_path)).expect("load settings");

    // Assert
    assert_eq!(settings.workers, 3);
    assert_eq!(
        settings.data_file.as_deref(),
        Some(std::path::Path::new("/srv/folders.toml"))
    );
}

#[test]
fn given_missing_local_config_when_load_then_config_error() {
    let dir = TempDir::new().unwrap();
    let result = Settings::load(Some(&dir.path().join("absent.toml")));
    assert!(matches!(result, Err(ApplicationError::Config { .. })));
}

#[test]
fn given_broken_local_config_when_load_then_config_error() {
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("broken.toml");
    fs::write(&config_path, "workers = \"many\"\n").unwrap();

    let result = Settings::load(Some(&config_path));
    assert!(matches!(result, Err(ApplicationError::Config { .. })));
}

#[test]
fn given_config_file_when_load_file_only_then_defaults_fill_gaps() {
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("only.toml");
    fs::write(&config_path, "data_file = \"~/folders.toml\"\n").unwrap();

    let settings = Settings::load_file_only(&config_path).unwrap();

    assert_eq!(settings.workers, 0);
    let data_file = settings.data_file.unwrap();
    assert!(!data_file.to_string_lossy().contains('~'));
}

#[test]
fn given_dataset_file_when_loading_then_service_answers_queries() {
    // Arrange
    let dir = TempDir::new().unwrap();
    let data_path = dir.path().join("folders.toml");
    fs::write(&data_path, to_toml(&sample_records()).unwrap()).unwrap();

    // Act
    let records = load_records(&data_path).unwrap();
    let service = FolderService::from_records(records, &Settings::default()).unwrap();

    // Assert
    assert_eq!(service.get_all_folders().unwrap().len(), 8);
    assert_eq!(
        service.get_named_folder("foxtrot").unwrap().path,
        "alpha.charlie.foxtrot"
    );
}

#[test]
fn given_missing_dataset_file_when_loading_then_operation_failed() {
    let dir = TempDir::new().unwrap();
    let err = load_records(&dir.path().join("nope.toml")).unwrap_err();
    assert!(matches!(err, ApplicationError::OperationFailed { .. }));
    assert!(err.to_string().contains("nope.toml"));
}

#[test]
fn given_dataset_with_duplicate_names_when_building_then_validation_error() {
    let dir = TempDir::new().unwrap();
    let data_path = dir.path().join("dupes.toml");
    fs::write(
        &data_path,
        r#"
[[folders]]
name = "alpha"
org_id = "c1556e17-b7c0-45a3-a6ae-9546248fb17a"
path = "alpha"

[[folders]]
name = "alpha"
org_id = "38b9879b-f73b-4b0e-b9d9-4fc4c23643a7"
path = "alpha"
"#,
    )
    .unwrap();

    let records = load_records(&data_path).unwrap();
    let err = FolderService::from_records(records, &Settings::default())
        .err()
        .expect("duplicate names must be rejected");
    assert!(matches!(
        err.domain(),
        Some(DomainError::Validation { .. })
    ));
}

#[test]
fn given_malformed_dataset_when_loading_then_dataset_error() {
    let dir = TempDir::new().unwrap();
    let data_path = dir.path().join("bad.toml");
    fs::write(&data_path, "[[folders]]\nname = 1\n").unwrap();

    let err = load_records(&data_path).unwrap_err();
    assert!(matches!(err, ApplicationError::Dataset { .. }));
}
