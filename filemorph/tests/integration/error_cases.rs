//! Integration tests for setup errors and edge cases.

use rstest::rstest;
use std::path::PathBuf;
use tempfile::TempDir;

use filemorph::config::{Config, OutputFormat};
use filemorph::error::FileMorphError;
use filemorph::input::InputSpec;

use crate::common::{folder_config, make_dir, stub_pipeline, write_docx};

#[tokio::test]
async fn test_error_no_inputs() {
    let temp = TempDir::new().unwrap();
    let out = temp.path().join("out");
    let config = Config::new(InputSpec::default(), &out, vec![OutputFormat::Pdf]);

    let err = stub_pipeline().run(&config).await.unwrap_err();
    assert!(matches!(err, FileMorphError::NoInputs));
    assert_eq!(err.exit_code(), 2);
    assert!(!out.exists());
}

#[tokio::test]
async fn test_error_missing_output_root() {
    let temp = TempDir::new().unwrap();
    let input = write_docx(temp.path(), "a.docx", &["A"]);
    let config = Config::new(InputSpec::Single(input), "", vec![OutputFormat::Txt]);

    let err = stub_pipeline().run(&config).await.unwrap_err();
    assert!(matches!(err, FileMorphError::MissingOutputRoot));
}

#[tokio::test]
async fn test_error_no_formats() {
    let temp = TempDir::new().unwrap();
    let input = write_docx(temp.path(), "a.docx", &["A"]);
    let out = temp.path().join("out");
    let config = Config::new(InputSpec::Single(input), &out, Vec::new());

    let err = stub_pipeline().run(&config).await.unwrap_err();
    assert!(matches!(err, FileMorphError::NoOutputFormats));
    assert!(!out.exists());
}

#[rstest]
#[case("  ")]
#[case("../escape")]
#[tokio::test]
async fn test_error_bad_merge_name(#[case] name: &str) {
    let temp = TempDir::new().unwrap();
    let input = write_docx(temp.path(), "a.docx", &["A"]);
    let mut config = folder_config(&input, &temp.path().join("out"), &[OutputFormat::Pdf]);
    config.merge_name = Some(name.to_string());

    let err = stub_pipeline().run(&config).await.unwrap_err();
    assert!(matches!(err, FileMorphError::InvalidConfig { .. }));
}

#[tokio::test]
async fn test_empty_folder_is_no_inputs() {
    let temp = TempDir::new().unwrap();
    let src = make_dir(temp.path(), "empty");
    let config = folder_config(&src, &temp.path().join("out"), &[OutputFormat::Pdf]);

    let err = stub_pipeline().run(&config).await.unwrap_err();
    assert!(matches!(err, FileMorphError::NoInputs));
}

#[tokio::test]
async fn test_missing_list_entries_are_dropped() {
    let temp = TempDir::new().unwrap();
    let present = write_docx(temp.path(), "present.docx", &["P"]);
    let out = temp.path().join("out");

    let mut config = folder_config(&present, &out, &[OutputFormat::Txt]);
    config.inputs = InputSpec::List(vec![PathBuf::from("/nonexistent/gone.docx"), present]);

    let report = stub_pipeline().run(&config).await.unwrap();
    assert_eq!(report.entries.len(), 1);
    assert!(out.join("txt_output").join("present.txt").exists());
}

#[tokio::test]
async fn test_folders_inside_selection_are_not_walked() {
    let temp = TempDir::new().unwrap();
    let src = make_dir(temp.path(), "src");
    let nested = make_dir(&src, "nested");
    write_docx(&nested, "deep.docx", &["D"]);
    write_docx(&src, "top.docx", &["T"]);

    let out = temp.path().join("out");
    let config = folder_config(&src, &out, &[OutputFormat::Txt]);

    let report = stub_pipeline().run(&config).await.unwrap();
    assert_eq!(report.entries.len(), 1);
    assert!(!out.join("txt_output").join("deep.txt").exists());
}

#[tokio::test]
async fn test_unwritable_output_root() {
    let temp = TempDir::new().unwrap();
    let input = write_docx(temp.path(), "a.docx", &["A"]);
    let blocker = temp.path().join("file_not_dir");
    std::fs::write(&blocker, b"").unwrap();

    let config = folder_config(&input, &blocker.join("out"), &[OutputFormat::Txt]);

    let err = stub_pipeline().run(&config).await.unwrap_err();
    assert!(matches!(err, FileMorphError::FailedToCreateOutput { .. }));
}
