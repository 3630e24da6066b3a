use std::fs;

use tempfile::tempdir;
use treedoc_model::{DocumentError, NodeQuery, TreeDocument};

#[test]
fn parse_file_reads_config_like_documents() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("settings.xml");
    fs::write(
        &path,
        r#"<?xml version="1.0" encoding="UTF-8"?>
<settings>
    <window maximized="yes">
        <width>1024</width>
        <height>768</height>
    </window>
    <recent>
        <entry order="1">alpha.sok</entry>
        <entry order="2">beta.sok</entry>
    </recent>
</settings>
"#,
    )
    .unwrap();

    let document = TreeDocument::parse_file(&path).unwrap();
    assert_eq!(document.source(), Some(path.as_path()));

    let root = document.root();
    assert!(root.child("window").attribute_bool_or("maximized", false));
    assert_eq!(root.child("width").int_or(0), 1024);
    assert_eq!(root.child_count("entry"), 2);
    assert_eq!(
        root.child_with_attribute("entry", "order", "2").text_or(""),
        "beta.sok"
    );
}

#[test]
fn parse_file_reports_missing_and_non_file_paths() {
    let dir = tempdir().unwrap();

    let absent = dir.path().join("absent.xml");
    assert!(matches!(
        TreeDocument::parse_file(&absent),
        Err(DocumentError::NotFound(path)) if path == absent
    ));

    assert!(matches!(
        TreeDocument::parse_file(dir.path()),
        Err(DocumentError::NotAFile(_))
    ));
}

#[test]
fn parse_or_create_treats_missing_file_as_first_run() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("fresh.xml");

    let mut document = TreeDocument::parse_or_create(&path, "settings").unwrap();
    assert_eq!(document.root().tag(), "settings");
    assert_eq!(document.source(), Some(path.as_path()));

    // Mutations behave exactly as on a parsed document.
    document.root_mut().append_child("width").set_text(640);
    assert_eq!(document.root().child("width").int_or(0), 640);
}

#[test]
fn parse_or_create_still_reports_malformed_content() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("broken.xml");
    fs::write(&path, "<settings><window></settings>").unwrap();

    assert!(matches!(
        TreeDocument::parse_or_create(&path, "settings"),
        Err(DocumentError::Malformed(_))
    ));
}
