use std::fs;

use tempfile::tempdir;

use ceres_ingest::{IngestError, read_json_items};

#[test]
fn reads_json_array() {
    let dir = tempdir().expect("temp dir");
    let path = dir.path().join("items.json");
    fs::write(&path, r#"[{"data": {"commit": "a"}}, {"data": {"commit": "b"}}]"#)
        .expect("write json");

    let items = read_json_items(&path).expect("read items");

    assert_eq!(items.len(), 2);
    assert_eq!(items[1]["data"]["commit"], "b");
}

#[test]
fn reads_json_lines_skipping_blanks() {
    let dir = tempdir().expect("temp dir");
    let path = dir.path().join("items.jsonl");
    fs::write(
        &path,
        "{\"data\": {\"commit\": \"a\"}}\n\n{\"data\": {\"commit\": \"b\"}}\n",
    )
    .expect("write json");

    let items = read_json_items(&path).expect("read items");

    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["data"]["commit"], "a");
}

#[test]
fn reports_line_of_malformed_item() {
    let dir = tempdir().expect("temp dir");
    let path = dir.path().join("broken.jsonl");
    fs::write(&path, "{\"data\": {}}\n{not json}\n").expect("write json");

    match read_json_items(&path) {
        Err(IngestError::Json { line, .. }) => assert_eq!(line, 2),
        other => panic!("expected json error, got {other:?}"),
    }
}
