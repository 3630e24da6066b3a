use std::fs;

use tempfile::tempdir;
use treedoc_model::TreeDocument;
use treedoc_store::{backup_path, staging_path, DurableWriter, WriteError, WriteOptions};

fn document(marker: &str) -> TreeDocument {
    let mut document = TreeDocument::new("state");
    document.root_mut().append_child("marker").set_text(marker);
    document
}

#[test]
fn first_write_creates_only_the_target() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("state.xml");

    DurableWriter::new().write(&document("one"), &path).unwrap();

    assert!(path.is_file());
    assert!(!staging_path(&path).exists());
    assert!(!backup_path(&path).exists());
}

#[test]
fn overwrite_replaces_contents_and_cleans_up() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("state.xml");
    let writer = DurableWriter::new();

    writer.write(&document("one"), &path).unwrap();
    writer.write(&document("two"), &path).unwrap();

    let contents = fs::read_to_string(&path).unwrap();
    assert!(contents.contains("<marker>two</marker>"));
    assert!(!staging_path(&path).exists());
    assert!(!backup_path(&path).exists());
}

#[test]
fn missing_parent_directories_are_created() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("deep").join("state.xml");

    DurableWriter::new().write(&document("one"), &path).unwrap();
    assert!(path.is_file());
}

#[test]
fn direct_write_skips_staging() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("state.xml");

    let options = WriteOptions {
        use_staging: false,
        ..WriteOptions::default()
    };
    DurableWriter::with_options(options)
        .write(&document("one"), &path)
        .unwrap();

    assert!(path.is_file());
    assert!(!staging_path(&path).exists());
    assert!(!backup_path(&path).exists());
}

#[test]
fn empty_root_tag_is_rejected_before_touching_disk() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("state.xml");

    let err = DurableWriter::new()
        .write(&TreeDocument::new(""), &path)
        .unwrap_err();
    assert!(matches!(err, WriteError::InvalidDocument));
    assert!(err.target_intact());
    assert!(!path.exists());
}

#[test]
fn unknown_charset_label_is_rejected() {
    let err = WriteOptions::default().charset_label("utf-99").unwrap_err();
    assert!(matches!(err, WriteError::UnsupportedCharset(label) if label == "utf-99"));
}

#[test]
fn failed_staging_write_leaves_the_original_untouched() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("state.xml");
    let writer = DurableWriter::new();

    writer.write(&document("one"), &path).unwrap();
    let before = fs::read(&path).unwrap();

    // A directory squatting on the staging path makes the staging write
    // fail before the original is touched.
    fs::create_dir(staging_path(&path)).unwrap();
    let err = writer.write(&document("two"), &path).unwrap_err();

    assert!(matches!(err, WriteError::Write { .. }));
    assert!(err.target_intact());
    assert_eq!(fs::read(&path).unwrap(), before);
    assert!(!backup_path(&path).exists());
}
