//! Directory loading against real files on disk.

use std::fs;

use riskscore_core::config::{DatasetConfig, TextEncoding};
use riskscore_core::{FieldValue, RiskError};
use riskscore_dataset::{load_dir, LoadStatus};
use tempfile::TempDir;

fn config() -> DatasetConfig {
    DatasetConfig::default()
}

#[test]
fn unifies_files_with_different_schemas() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("claims.csv"),
        "first_name,last_name,Age\nJan,Pereira,70\nAna,Silva,40\n",
    )
    .unwrap();
    fs::write(
        dir.path().join("policies.csv"),
        "PolicyNumber,first_name,last_name\nP-1,Jan,Pereira\n",
    )
    .unwrap();
    fs::write(dir.path().join("notes.txt"), "not a dataset").unwrap();

    let loaded = load_dir(dir.path(), &config()).unwrap();
    let ds = &loaded.dataset;

    assert_eq!(ds.len(), 3);
    assert_eq!(
        ds.column_names().collect::<Vec<_>>(),
        vec!["first_name", "last_name", "Age", "PolicyNumber"]
    );
    assert_eq!(ds.column("Age").unwrap()[2], FieldValue::Null);
    assert_eq!(ds.column("PolicyNumber").unwrap()[0], FieldValue::Null);
    assert_eq!(ds.source_files(), &["claims.csv", "claims.csv", "policies.csv"]);
    assert!(loaded.warnings().is_empty());
    assert!(loaded
        .results
        .iter()
        .any(|r| matches!(r.status, LoadStatus::Skipped { .. })));
}

#[test]
fn latin1_file_falls_back() {
    let dir = TempDir::new().unwrap();
    let mut bytes = b"Nombre,Apellido\nJos".to_vec();
    bytes.push(0xE9); // é
    bytes.extend_from_slice(b",Pe\xF1a\n");
    fs::write(dir.path().join("latin.csv"), bytes).unwrap();

    let loaded = load_dir(dir.path(), &config()).unwrap();

    assert_eq!(
        loaded.dataset.column("Nombre").unwrap()[0],
        FieldValue::Text("José".into())
    );
    assert_eq!(
        loaded.dataset.column("Apellido").unwrap()[0],
        FieldValue::Text("Peña".into())
    );
    match &loaded.results[0].status {
        LoadStatus::Loaded { encoding, .. } => assert_eq!(*encoding, TextEncoding::Latin1),
        other => panic!("unexpected status {other:?}"),
    }
}

#[test]
fn empty_and_header_only_files_are_reported() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("a_good.csv"), "Age\n1\n").unwrap();
    fs::write(dir.path().join("b_empty.csv"), "").unwrap();
    fs::write(dir.path().join("c_header.csv"), "Age,Country\n").unwrap();

    let loaded = load_dir(dir.path(), &config()).unwrap();
    let warnings = loaded.warnings();

    assert_eq!(loaded.dataset.len(), 1);
    assert_eq!(warnings.len(), 2);
    assert!(warnings[0].starts_with("b_empty.csv: "));
    assert_eq!(warnings[1], "c_header.csv: empty file");
}

#[test]
fn malformed_lines_do_not_abort_file() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("d.csv"), "a,b\n1,2\n1,2,3,4\n5,6\n").unwrap();

    let loaded = load_dir(dir.path(), &config()).unwrap();

    assert_eq!(loaded.dataset.len(), 2);
    match &loaded.results[0].status {
        LoadStatus::Loaded { skipped_lines, .. } => assert_eq!(*skipped_lines, 1),
        other => panic!("unexpected status {other:?}"),
    }
}

#[test]
fn no_valid_files_is_fatal() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("empty.csv"), "").unwrap();

    let err = load_dir(dir.path(), &config()).unwrap_err();
    assert!(matches!(err, RiskError::NoValidFiles(_)));
}

#[test]
fn missing_directory_is_fatal() {
    let dir = TempDir::new().unwrap();
    let err = load_dir(&dir.path().join("nope"), &config()).unwrap_err();
    assert!(matches!(err, RiskError::DirectoryNotFound(_)));
}

#[test]
fn standard_null_spellings_become_null() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("contacts.csv"),
        "Email\nNULL\nn/a\nx@y\n#N/A\nNONE\n",
    )
    .unwrap();

    let loaded = load_dir(dir.path(), &config()).unwrap();

    assert_eq!(
        loaded.dataset.column("Email").unwrap(),
        &[
            FieldValue::Null,
            FieldValue::Null,
            FieldValue::Text("x@y".into()),
            FieldValue::Null,
            FieldValue::Text("NONE".into()),
        ]
    );
}
